//! Evaluation pipeline
//!
//! Runs one evaluation end to end: vocabulary, truth ingestion, optional TOC
//! build, solution loading, scoring and report rendering.

use crate::categories::CategoryRegistry;
use crate::config::RunConfig;
use crate::data::TruthData;
use crate::error::{Result, ScoringError};
use crate::ingest::{self, IngestOptions};
use crate::report;
use crate::scorer::{ScoreOutcome, ScoringEngine};
use crate::solution::{self, SolutionLoader};
use crate::toc_cache;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// TOC cache written; the caller should re-run without `--toc`
    TocWritten(PathBuf),

    /// Truth loaded but no solution given
    NoSolution { truth: TruthData },

    Evaluated(Evaluation),
}

/// Scored run with its rendered reports
#[derive(Debug)]
pub struct Evaluation {
    pub truth: TruthData,
    pub outcome: ScoreOutcome,
    /// Overall and per-category scores
    pub score_text: String,
    pub listing: String,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let config = config.effective();
    let scene_filter = config.validate()?;
    let registry = CategoryRegistry::standard()?;

    let opts = IngestOptions {
        data_dir: config.data_dir(),
        imagery: config.imagery,
        scene_filter: scene_filter.as_ref(),
        max_per_category: config.max_per_category,
        force_scan: config.build_toc,
    };
    let mut truth = ingest::load_truth(&opts, &registry)?;

    if config.build_toc {
        let path = toc_cache::write_toc_file(&truth, config.data_dir())?;
        tracing::info!("TOC file created, re-run application without the --toc setting.");
        return Ok(RunOutcome::TocWritten(path));
    }

    if let Some(path) = &config.expected_solution {
        write_expected_solution_file(&truth, path)?;
    }

    let Some(solution_path) = &config.solution else {
        tracing::info!("No solution file given, skipping scoring");
        return Ok(RunOutcome::NoSolution { truth });
    };

    let predictions = SolutionLoader::new(&registry).load_file(solution_path, &truth)?;
    let outcome = ScoringEngine::new(&registry).score(&mut truth, &predictions)?;

    let score_text = report::format_score_text(&outcome);
    let listing = report::format_scene_listing(&truth, config.errors_only);

    Ok(RunOutcome::Evaluated(Evaluation {
        truth,
        outcome,
        score_text,
        listing,
    }))
}

fn write_expected_solution_file(truth: &TruthData, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ScoringError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    solution::write_expected_solution(truth, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ScoringError::io(path, e))?;
    tracing::info!("Expected solution written to {}", path.display());
    Ok(())
}
