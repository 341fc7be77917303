//! Scoring Engine - compares predictions to truth
//!
//! Tallies per-category counts over every truth box, derives precision,
//! recall and F-score, and combines the F-scores into a category-weighted
//! overall score. Scenes holding a misclassified box are flagged for the
//! report.

use crate::categories::CategoryRegistry;
use crate::data::TruthData;
use crate::error::{Result, ScoringError};
use crate::metrics::CategoryMetrics;
use crate::solution::Predictions;
use std::collections::BTreeMap;

/// Why a scoring pass did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyTruth,
    EmptyPredictions,
}

#[derive(Debug, Clone)]
pub enum ScoreOutcome {
    /// Nothing was compared
    Skipped(SkipReason),
    Scored(ScoreReport),
}

impl ScoreOutcome {
    pub fn report(&self) -> Option<&ScoreReport> {
        match self {
            ScoreOutcome::Scored(report) => Some(report),
            ScoreOutcome::Skipped(_) => None,
        }
    }

    /// True when there is no weighted score to show
    pub fn is_nothing_to_score(&self) -> bool {
        self.report().map_or(true, ScoreReport::is_degenerate)
    }
}

/// Counts and weight of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub metrics: CategoryMetrics,
    pub weight: f64,
}

/// Result of a scoring pass
#[derive(Debug, Clone)]
pub struct ScoreReport {
    /// Category → score, sorted by category
    categories: BTreeMap<String, CategoryScore>,
    overall_score: f64,
    weight_sum: f64,
}

impl ScoreReport {
    /// Weighted mean F-score, 0 when the weight sum is 0
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Only zero-weight categories (false detections) were scored
    pub fn is_degenerate(&self) -> bool {
        self.weight_sum <= 0.0
    }

    pub fn category(&self, category: &str) -> Option<&CategoryScore> {
        self.categories.get(category)
    }

    /// Scored categories in lexicographic order
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryScore)> {
        self.categories.iter().map(|(name, score)| (name.as_str(), score))
    }
}

pub struct ScoringEngine<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Score `predictions` against `truth`
    ///
    /// Scene flags from any earlier pass are cleared first. Truth boxes are
    /// visited in ascending ID order, so a scene with several misclassified
    /// boxes keeps the guess of its highest-numbered one.
    pub fn score(&self, truth: &mut TruthData, predictions: &Predictions) -> Result<ScoreOutcome> {
        for scene in truth.scenes_mut() {
            scene.clear_flags();
        }

        if truth.box_count() == 0 {
            tracing::info!("Nothing to score: no truth boxes");
            return Ok(ScoreOutcome::Skipped(SkipReason::EmptyTruth));
        }
        if predictions.is_empty() {
            tracing::info!("Nothing to score: no predictions");
            return Ok(ScoreOutcome::Skipped(SkipReason::EmptyPredictions));
        }

        let mut counts: BTreeMap<String, CategoryMetrics> = BTreeMap::new();
        let mut mismatches: Vec<(String, String)> = Vec::new();

        for (box_id, truth_box) in truth.boxes() {
            let guess = predictions
                .get(box_id)
                .ok_or(ScoringError::MissingPrediction(box_id))?;

            if truth_box.category == guess {
                counts
                    .entry(truth_box.category.clone())
                    .or_default()
                    .true_positives += 1;
            } else {
                counts
                    .entry(truth_box.category.clone())
                    .or_default()
                    .false_negatives += 1;
                counts.entry(guess.to_string()).or_default().false_positives += 1;
                mismatches.push((truth_box.scene_id.clone(), guess.to_string()));
            }
        }

        for (scene_id, guess) in mismatches {
            if let Some(scene) = truth.scene_mut(&scene_id) {
                scene.is_error = true;
                scene.mismatched_guess = Some(guess);
            }
        }

        let report = self.summarize(counts);
        tracing::info!(
            "Scored {} categories, overall F-score {:.6}",
            report.categories.len(),
            report.overall_score
        );
        Ok(ScoreOutcome::Scored(report))
    }

    fn summarize(&self, counts: BTreeMap<String, CategoryMetrics>) -> ScoreReport {
        let mut f_sum = 0.0;
        let mut weight_sum = 0.0;
        let categories: BTreeMap<String, CategoryScore> = counts
            .into_iter()
            .map(|(category, metrics)| {
                let weight = self.registry.weight(&category);
                f_sum += metrics.f_score() * weight;
                weight_sum += weight;
                (category, CategoryScore { metrics, weight })
            })
            .collect();

        let overall_score = if weight_sum > 0.0 { f_sum / weight_sum } else { 0.0 };

        ScoreReport {
            categories,
            overall_score,
            weight_sum,
        }
    }
}
