//! fMoW scorer CLI
//!
//! ```bash
//! # Build the TOC cache once
//! fmow_scorer --data-dir /data/fmow/val --toc
//!
//! # Score a solution, listing only misclassified scenes
//! fmow_scorer --data-dir /data/fmow/val --solution solution.txt --errors-only
//! ```

use anyhow::Context;
use clap::Parser;
use fmow_scorer::{Imagery, RunConfig, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Score fMoW bounding-box classifications against ground truth.
#[derive(Parser)]
#[command(name = "fmow_scorer", version, about)]
struct Cli {
    /// Root folder of the truth data
    #[arg(long, env = "FMOW_DATA_DIR")]
    data_dir: PathBuf,

    /// Solution file with one `boxId,category` line per box
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Scan the data folder, write toc.txt and exit
    #[arg(long)]
    toc: bool,

    /// Load at most this many scenes per category
    #[arg(long = "max-per-cat")]
    max_per_cat: Option<usize>,

    /// Only load scenes whose ID matches this regex
    #[arg(long)]
    scene_filter: Option<String>,

    /// Use RGB imagery instead of multispectral
    #[arg(long)]
    no_ms: bool,

    /// List misclassified scenes only
    #[arg(long)]
    errors_only: bool,

    /// Write the perfect solution for the loaded truth to this file
    #[arg(long, value_name = "PATH")]
    write_expected_solution: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            data_dir: self.data_dir.clone(),
            solution: self.solution.clone(),
            build_toc: self.toc,
            max_per_category: self.max_per_cat,
            scene_filter: self.scene_filter.clone(),
            imagery: if self.no_ms {
                Imagery::Rgb
            } else {
                Imagery::Multispectral
            },
            errors_only: self.errors_only,
            expected_solution: self.write_expected_solution.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "fmow_scorer=debug,warn"
    } else {
        "fmow_scorer=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.to_config();
    let outcome = fmow_scorer::run(&config)
        .with_context(|| format!("Evaluation failed for {}", config.data_dir.display()))?;

    match outcome {
        RunOutcome::TocWritten(path) => {
            println!("TOC written to {}", path.display());
        }
        RunOutcome::NoSolution { truth } => {
            println!(
                "Loaded {} scenes with {} truth boxes, no solution to score",
                truth.scene_count(),
                truth.box_count()
            );
        }
        RunOutcome::Evaluated(evaluation) => {
            print!("{}", evaluation.score_text);
            print!("{}", evaluation.listing);
        }
    }
    Ok(())
}
