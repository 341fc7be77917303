//! Run configuration
//!
//! Plain settings for one evaluation run. The binary fills this from its
//! command line; tests build it directly.

use crate::error::{Result, ScoringError};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Which imagery product the per-image metadata belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Imagery {
    /// Pan-sharpened multispectral RGB (`*_msrgb.json` / `*_msrgb.jpg`)
    #[default]
    Multispectral,
    /// Plain RGB (`*_rgb.json` / `*_rgb.jpg`)
    Rgb,
}

impl Imagery {
    /// Product tag that ends every capture file name, before the extension
    pub fn tag(self) -> &'static str {
        match self {
            Imagery::Multispectral => "msrgb",
            Imagery::Rgb => "rgb",
        }
    }

    /// File name suffix of per-image metadata files
    pub fn metadata_suffix(self) -> &'static str {
        match self {
            Imagery::Multispectral => "_msrgb.json",
            Imagery::Rgb => "_rgb.json",
        }
    }

    pub fn metadata_file_name(self, scene_id: &str, temporal_index: u32) -> String {
        format!("{}_{}_{}.json", scene_id, temporal_index, self.tag())
    }

    pub fn image_file_name(self, scene_id: &str, temporal_index: u32) -> String {
        format!("{}_{}_{}.jpg", scene_id, temporal_index, self.tag())
    }
}

/// Settings for one evaluation run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Root of the truth data tree (required)
    pub data_dir: PathBuf,

    /// Prediction file; scoring is skipped without one
    pub solution: Option<PathBuf>,

    /// Scan the data tree, write the TOC and stop
    pub build_toc: bool,

    /// Per-category sample cap (unbounded when `None`)
    pub max_per_category: Option<usize>,

    /// Only scenes whose ID matches this regex are ingested
    pub scene_filter: Option<String>,

    pub imagery: Imagery,

    /// Scene listing shows flagged scenes only
    pub errors_only: bool,

    /// Debug output: write the perfect solution for the ingested truth here
    pub expected_solution: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Settings actually used for the run
    ///
    /// Building the TOC ignores the solution, the cap and the scene filter so
    /// the cache always covers the whole tree.
    pub fn effective(&self) -> RunConfig {
        let mut config = self.clone();
        if config.build_toc {
            config.solution = None;
            config.max_per_category = None;
            config.scene_filter = None;
            config.expected_solution = None;
        }
        config
    }

    /// Check the data folder and compile the scene filter
    pub fn validate(&self) -> Result<Option<Regex>> {
        if !self.data_dir.is_dir() {
            return Err(ScoringError::MissingDataDir(self.data_dir.clone()));
        }
        compile_scene_filter(self.scene_filter.as_deref())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub fn compile_scene_filter(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|source| ScoringError::InvalidSceneFilter {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()
}
