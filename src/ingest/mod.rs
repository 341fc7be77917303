//! Truth ingestion
//!
//! Discovers scenes and ground-truth boxes either from the TOC cache or by a
//! full scan of the data tree. Both paths yield the same [`TruthData`].

pub mod cap;
pub mod metadata;
pub mod scan;

pub use cap::CategoryCap;
pub use metadata::{ImageMetadata, MetadataBox, PixelRect};
pub use scan::scan_truth_dir;

use crate::categories::CategoryRegistry;
use crate::config::Imagery;
use crate::data::TruthData;
use crate::error::Result;
use crate::toc_cache::{self, TOC_FILE_NAME};
use regex::Regex;
use std::path::Path;

/// Where and how to look for truth data
#[derive(Debug, Clone)]
pub struct IngestOptions<'a> {
    pub data_dir: &'a Path,
    pub imagery: Imagery,
    pub scene_filter: Option<&'a Regex>,
    pub max_per_category: Option<usize>,
    /// Scan the tree even when a TOC file exists
    pub force_scan: bool,
}

/// Load truth data, preferring the TOC cache when one exists
pub fn load_truth(opts: &IngestOptions, registry: &CategoryRegistry) -> Result<TruthData> {
    tracing::info!("Reading truth data from {} ...", opts.data_dir.display());

    let toc_path = opts.data_dir.join(TOC_FILE_NAME);
    let truth = if !opts.force_scan && toc_path.is_file() {
        tracing::info!("  using TOC file");
        toc_cache::read_toc_file(&toc_path, opts)?
    } else {
        scan_truth_dir(opts, registry)?
    };

    tracing::info!(
        "  {} scenes, {} truth boxes",
        truth.scene_count(),
        truth.box_count()
    );
    Ok(truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_capture;

    #[test]
    fn test_prefers_toc_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_capture(root, "dam", "dam_1", 0, &[(1, Some("dam"))], true);
        // TOC knows a scene that is not on disk
        std::fs::write(root.join(TOC_FILE_NAME), "zoo_9\tzoo/zoo_9\t0;\t9;zoo\n").unwrap();

        let registry = CategoryRegistry::standard().unwrap();
        let mut opts = IngestOptions {
            data_dir: root,
            imagery: Imagery::Multispectral,
            scene_filter: None,
            max_per_category: None,
            force_scan: false,
        };

        let from_toc = load_truth(&opts, &registry).unwrap();
        assert!(from_toc.scene("zoo_9").is_some());
        assert!(from_toc.scene("dam_1").is_none());

        opts.force_scan = true;
        let scanned = load_truth(&opts, &registry).unwrap();
        assert!(scanned.scene("dam_1").is_some());
        assert!(scanned.scene("zoo_9").is_none());
    }
}
