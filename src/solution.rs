//! Solution Loading
//!
//! Reads a submitted prediction file (`boxId,category` per line) and checks it
//! against the category vocabulary and the truth set. Any violation aborts the
//! run: a partial solution would produce silently wrong scores.

use crate::categories::CategoryRegistry;
use crate::data::TruthData;
use crate::error::{Result, ScoringError};
use crate::BoxId;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Box ID → predicted category (normalized)
#[derive(Debug, Clone, Default)]
pub struct Predictions {
    guesses: FxHashMap<BoxId, String>,
}

impl Predictions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, box_id: BoxId, category: impl Into<String>) {
        self.guesses.insert(box_id, category.into());
    }

    pub fn get(&self, box_id: BoxId) -> Option<&str> {
        self.guesses.get(&box_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }
}

impl FromIterator<(BoxId, String)> for Predictions {
    fn from_iter<I: IntoIterator<Item = (BoxId, String)>>(iter: I) -> Self {
        Self {
            guesses: iter.into_iter().collect(),
        }
    }
}

pub struct SolutionLoader<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> SolutionLoader<'a> {
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Load and validate a solution file
    pub fn load_file(&self, path: &Path, truth: &TruthData) -> Result<Predictions> {
        tracing::info!("Reading solution data from {} ...", path.display());
        let file = File::open(path).map_err(|e| ScoringError::io(path, e))?;

        let mut predictions = Predictions::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| ScoringError::io(path, e))?;
            self.add_line(&mut predictions, idx + 1, &line)?;
        }
        check_complete(&predictions, truth)?;

        tracing::info!("  {} predictions", predictions.len());
        Ok(predictions)
    }

    /// Load and validate in-memory solution lines
    pub fn load_lines<I, S>(&self, lines: I, truth: &TruthData) -> Result<Predictions>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut predictions = Predictions::new();
        for (idx, line) in lines.into_iter().enumerate() {
            self.add_line(&mut predictions, idx + 1, line.as_ref())?;
        }
        check_complete(&predictions, truth)?;
        Ok(predictions)
    }

    fn add_line(&self, predictions: &mut Predictions, line_no: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        let malformed = || ScoringError::MalformedSolutionLine {
            line_no,
            line: line.to_string(),
        };

        let fields: Vec<&str> = line.split(',').collect();
        let [id, category] = fields.as_slice() else {
            return Err(malformed());
        };
        let box_id: BoxId = id.trim().parse().map_err(|_| malformed())?;

        let guess = self.registry.normalize(category.trim());
        if !self.registry.is_valid(guess) {
            return Err(ScoringError::UnknownCategory {
                line_no,
                category: category.trim().to_string(),
            });
        }

        predictions.insert(box_id, guess);
        Ok(())
    }
}

/// Every truth box needs a prediction; the lowest missing ID is reported
pub fn check_complete(predictions: &Predictions, truth: &TruthData) -> Result<()> {
    match truth.boxes().find(|(id, _)| predictions.get(*id).is_none()) {
        Some((id, _)) => Err(ScoringError::MissingPrediction(id)),
        None => Ok(()),
    }
}

/// Write the perfect solution for `truth`, one `id,category` line per box
pub fn write_expected_solution<W: Write>(truth: &TruthData, writer: &mut W) -> std::io::Result<()> {
    for (id, truth_box) in truth.boxes() {
        writeln!(writer, "{},{}", id, truth_box.category)?;
    }
    Ok(())
}
