// End-to-end pipeline tests
//
// Builds a miniature fMoW tree in a temp dir and runs the whole evaluation:
// scan or TOC ingestion, solution loading, scoring and report rendering.

use approx::assert_relative_eq;
use fmow_scorer::{run, Imagery, RunConfig, RunOutcome, ScoringError};
use serde_json::json;
use std::fs;
use std::path::Path;

// Helper: write one capture's metadata and image
fn write_capture(root: &Path, category: &str, scene_id: &str, t: u32, boxes: serde_json::Value) {
    let dir = root.join(category).join(scene_id);
    fs::create_dir_all(&dir).unwrap();
    let metadata = json!({
        "gsd": 0.5,
        "img_width": 100,
        "img_height": 80,
        "bounding_boxes": boxes,
    });
    fs::write(
        dir.join(format!("{}_{}_msrgb.json", scene_id, t)),
        metadata.to_string(),
    )
    .unwrap();
    fs::write(dir.join(format!("{}_{}_msrgb.jpg", scene_id, t)), b"jpeg").unwrap();
}

// Helper: airport_0 (box 1), dam_0 with two captures (box 2), a false detection (box 3)
fn sample_dataset(root: &Path) {
    write_capture(
        root,
        "airport",
        "airport_0",
        0,
        json!([{"ID": 1, "category": "airport", "box": [0, 0, 10, 10]}]),
    );
    for t in [0, 1] {
        write_capture(
            root,
            "dam",
            "dam_0",
            t,
            json!([{"ID": 2, "category": "dam", "box": [5, 5, 20, 20]}]),
        );
    }
    write_capture(
        root,
        "dam",
        "dam_1",
        0,
        json!([{"ID": 3, "category": null, "box": [1, 1, 2, 2]}]),
    );
}

fn evaluate(config: &RunConfig) -> fmow_scorer::Evaluation {
    match run(config).unwrap() {
        RunOutcome::Evaluated(evaluation) => evaluation,
        other => panic!("expected an evaluation, got {:?}", other),
    }
}

// =========================================================================
// Section 1: Scoring
// =========================================================================

#[test]
fn test_score_from_full_scan() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);
    let solution = root.join("solution.txt");
    fs::write(&solution, "1,airport\n2,road_bridge\n3,unknown\n").unwrap();

    let mut config = RunConfig::new(root);
    config.solution = Some(solution);
    let evaluation = evaluate(&config);

    let report = evaluation.outcome.report().unwrap();
    // false_detection has weight 0 and does not move the score
    assert_relative_eq!(report.overall_score(), 1.0 / 3.4, epsilon = 1e-9);
    assert_eq!(report.category("false_detection").unwrap().metrics.true_positives, 1);

    assert!(evaluation.score_text.contains("Overall F-score : 0.294118"));
    assert!(evaluation
        .listing
        .contains(" * dam_0 _0 _1 \u{21d2} road_bridge"));
    assert!(evaluation.listing.contains("   airport_0 _0"));
}

#[test]
fn test_perfect_solution_scores_one() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);
    let expected = root.join("expected.txt");

    let mut config = RunConfig::new(root);
    config.expected_solution = Some(expected.clone());
    assert!(matches!(run(&config).unwrap(), RunOutcome::NoSolution { .. }));
    assert_eq!(
        fs::read_to_string(&expected).unwrap(),
        "1,airport\n2,dam\n3,false_detection\n"
    );

    config.expected_solution = None;
    config.solution = Some(expected);
    config.errors_only = true;
    let evaluation = evaluate(&config);
    assert_relative_eq!(evaluation.outcome.report().unwrap().overall_score(), 1.0);
    assert_eq!(evaluation.listing, "\n========\n Images\n========\n");
}

#[test]
fn test_missing_prediction_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);
    let solution = root.join("solution.txt");
    fs::write(&solution, "1,airport\n3,false_detection\n").unwrap();

    let mut config = RunConfig::new(root);
    config.solution = Some(solution);
    let err = run(&config).unwrap_err();
    assert!(matches!(err, ScoringError::MissingPrediction(2)));
}

#[test]
fn test_unknown_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);
    let solution = root.join("solution.txt");
    fs::write(&solution, "1,airport\n2,spaceport\n3,unknown\n").unwrap();

    let mut config = RunConfig::new(root);
    config.solution = Some(solution);
    let err = run(&config).unwrap_err();
    assert_eq!(err.to_string(), "Unknown category at line 2 : spaceport");
}

// =========================================================================
// Section 2: TOC cache
// =========================================================================

#[test]
fn test_toc_build_then_reuse() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);

    let mut config = RunConfig::new(root);
    config.build_toc = true;
    // Ignored while building the TOC
    config.scene_filter = Some("^airport".into());
    config.max_per_category = Some(0);

    let toc_path = match run(&config).unwrap() {
        RunOutcome::TocWritten(path) => path,
        other => panic!("expected a TOC, got {:?}", other),
    };
    assert_eq!(toc_path, root.join("toc.txt"));
    let toc = fs::read_to_string(&toc_path).unwrap();
    assert_eq!(toc.lines().count(), 3);
    assert!(toc.contains("dam_0\tdam/dam_0\t0;1;\t2;dam\n"));

    // Metadata is no longer needed once the TOC exists
    fs::remove_dir_all(root.join("airport")).unwrap();

    let solution = root.join("solution.txt");
    fs::write(&solution, "1,airport\n2,dam\n3,false_detection\n").unwrap();
    let mut config = RunConfig::new(root);
    config.solution = Some(solution);
    let evaluation = evaluate(&config);

    assert_eq!(evaluation.truth.scene_count(), 3);
    assert_eq!(
        evaluation.truth.scene("airport_0").unwrap().dir,
        root.join("airport").join("airport_0")
    );
    assert_relative_eq!(evaluation.outcome.report().unwrap().overall_score(), 1.0);
}

#[test]
fn test_scene_filter_narrows_truth() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);
    let solution = root.join("solution.txt");
    fs::write(&solution, "2,dam\n").unwrap();

    let mut config = RunConfig::new(root);
    config.solution = Some(solution);
    config.scene_filter = Some("^dam_0$".into());
    let evaluation = evaluate(&config);

    assert_eq!(evaluation.truth.scene_count(), 1);
    assert_eq!(evaluation.truth.box_count(), 1);
}

// =========================================================================
// Section 3: Configuration errors
// =========================================================================

#[test]
fn test_missing_data_dir() {
    let config = RunConfig::new("/no/such/fmow/root");
    assert!(matches!(run(&config), Err(ScoringError::MissingDataDir(_))));
}

#[test]
fn test_rgb_imagery_ignores_msrgb_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_dataset(root);

    let mut config = RunConfig::new(root);
    config.imagery = Imagery::Rgb;
    match run(&config).unwrap() {
        RunOutcome::NoSolution { truth } => assert_eq!(truth.scene_count(), 0),
        other => panic!("expected no solution, got {:?}", other),
    }
}
