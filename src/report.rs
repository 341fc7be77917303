//! Text reports
//!
//! Renders a scoring outcome as the per-category F-score table and the
//! scene list with flagged scenes marked.

use crate::data::TruthData;
use crate::scorer::ScoreOutcome;
use std::fmt::Write;

pub const NOTHING_TO_SCORE: &str = "Nothing to score";

/// Separator between a flagged scene and the guess that was wrong
const ARROW: &str = " \u{21d2} ";

/// Width of the category column, including at least one space
const CATEGORY_COLUMN: usize = 16;

/// Overall score plus one row per category
pub fn format_score_text(outcome: &ScoreOutcome) -> String {
    let report = match outcome.report() {
        Some(report) if !report.is_degenerate() => report,
        _ => return format!("\n{}\n", NOTHING_TO_SCORE),
    };

    let mut out = String::new();
    let _ = writeln!(out, "\nOverall F-score : {:.6}", report.overall_score());
    let _ = writeln!(
        out,
        "  {}F-score; TP; FP; FN; precision; recall; weight",
        pad("--category--", CATEGORY_COLUMN)
    );
    for (category, score) in report.categories() {
        let m = &score.metrics;
        let _ = writeln!(
            out,
            "  {}{:.3}; {}; {}; {}; {:.3}; {:.3}; {:.3}",
            pad(category, CATEGORY_COLUMN),
            m.f_score(),
            m.true_positives,
            m.false_positives,
            m.false_negatives,
            m.precision(),
            m.recall(),
            score.weight
        );
    }
    out
}

/// Scene list, flagged scenes marked with `*` and their wrong guess
pub fn format_scene_listing(truth: &TruthData, errors_only: bool) -> String {
    let mut out = String::from("\n========\n Images\n========\n");
    for scene in truth.scenes() {
        if errors_only && !scene.is_error {
            continue;
        }
        out.push_str(if scene.is_error { " * " } else { "   " });
        out.push_str(&scene.id);
        for t in &scene.temporal_indices {
            let _ = write!(out, " _{}", t);
        }
        if let Some(guess) = scene.mismatched_guess.as_deref().filter(|_| scene.is_error) {
            out.push_str(ARROW);
            out.push_str(guess);
        }
        out.push('\n');
    }
    out
}

/// Truncate to `width - 1` characters, then pad with spaces to `width`
fn pad(text: &str, width: usize) -> String {
    let visible: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{:<width$}", visible, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryRegistry;
    use crate::scorer::{ScoringEngine, SkipReason};
    use crate::solution::Predictions;
    use std::path::Path;

    fn example_truth() -> TruthData {
        let mut truth = TruthData::new();
        let airport = truth.scene_entry("airport_0", Path::new("/d/airport/airport_0"));
        airport.add_temporal_index(1);
        airport.add_temporal_index(0);
        truth.scene_entry("dam_0", Path::new("/d/dam/dam_0")).add_temporal_index(2);
        truth.insert_box(1, Some("airport"), "airport_0");
        truth.insert_box(2, Some("dam"), "dam_0");
        truth
    }

    fn example_outcome(truth: &mut TruthData) -> ScoreOutcome {
        let registry = CategoryRegistry::standard().unwrap();
        let guesses: Predictions = [(1, "airport".to_string()), (2, "road_bridge".to_string())]
            .into_iter()
            .collect();
        ScoringEngine::new(&registry).score(truth, &guesses).unwrap()
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("dam", 6), "dam   ");
        assert_eq!(pad("ground_transportation_station", 16), "ground_transpor ");
        assert_eq!(pad("exactly_sixteen!", 16).len(), 16);
    }

    #[test]
    fn test_score_text() {
        let mut truth = example_truth();
        let text = format_score_text(&example_outcome(&mut truth));

        let expected = "\nOverall F-score : 0.294118\n\
            \x20 --category--    F-score; TP; FP; FN; precision; recall; weight\n\
            \x20 airport         1.000; 1; 0; 0; 1.000; 1.000; 1.000\n\
            \x20 dam             0.000; 0; 0; 1; 0.000; 0.000; 1.000\n\
            \x20 road_bridge     0.000; 0; 1; 0; 0.000; 0.000; 1.400\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_nothing_to_score() {
        let text = format_score_text(&ScoreOutcome::Skipped(SkipReason::EmptyPredictions));
        assert_eq!(text.trim(), NOTHING_TO_SCORE);
    }

    #[test]
    fn test_scene_listing() {
        let mut truth = example_truth();
        example_outcome(&mut truth);

        let listing = format_scene_listing(&truth, false);
        assert_eq!(
            listing,
            "\n========\n Images\n========\n   airport_0 _0 _1\n * dam_0 _2 \u{21d2} road_bridge\n"
        );

        let errors = format_scene_listing(&truth, true);
        assert!(!errors.contains("airport_0"));
        assert!(errors.contains(" * dam_0 _2"));
    }
}
