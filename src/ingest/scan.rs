//! Full scan of the truth directory tree
//!
//! Walks the data root in file-name order and ingests every per-image
//! metadata file that has its companion image. The walk is iterative; the
//! category cap governs the child directories picked out by [`cap_key`], and
//! a child only takes a slot once it ingests a capture.

use super::cap::CategoryCap;
use super::metadata::{scene_id_from_file_name, temporal_index_from_file_name, ImageMetadata};
use super::IngestOptions;
use crate::categories::CategoryRegistry;
use crate::data::TruthData;
use crate::error::{Result, ScoringError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened to one metadata file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Ingested,
    /// Scene ID rejected by the scene filter
    Filtered,
    /// Companion image missing
    MissingImage,
}

pub fn scan_truth_dir(opts: &IngestOptions, registry: &CategoryRegistry) -> Result<TruthData> {
    let suffix = opts.imagery.metadata_suffix();
    let mut truth = TruthData::new();
    let mut cap = CategoryCap::new(opts.max_per_category);
    let mut slots: Vec<CapSlot> = Vec::new();
    let mut missing_images = 0usize;

    let mut walker = WalkDir::new(opts.data_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry?;
        // Slots stay open only while the walk is inside their directory
        slots.retain(|slot| entry.path().starts_with(&slot.dir));

        if entry.file_type().is_dir() {
            if entry.depth() == 0 || !cap.is_bounded() {
                continue;
            }
            if let Some(key) = cap_key(entry.path(), registry) {
                if cap.is_full(&key) {
                    tracing::debug!("Category cap reached, skipping {:?}", entry.path());
                    walker.skip_current_dir();
                } else {
                    slots.push(CapSlot {
                        dir: entry.path().to_path_buf(),
                        key,
                        counted: false,
                    });
                }
            }
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !file_name.ends_with(suffix) {
            continue;
        }

        match ingest_capture(&mut truth, entry.path(), file_name, opts)? {
            CaptureStatus::Ingested => {
                for slot in slots.iter_mut().filter(|slot| !slot.counted) {
                    cap.admit(&slot.key);
                    slot.counted = true;
                }
            }
            CaptureStatus::MissingImage => missing_images += 1,
            CaptureStatus::Filtered => {}
        }
    }

    if missing_images > 0 {
        tracing::warn!("{} metadata files skipped for missing images", missing_images);
    }

    Ok(truth)
}

/// A capped directory the walk is currently inside
struct CapSlot {
    dir: PathBuf,
    key: String,
    /// Set once the directory ingested its first capture
    counted: bool,
}

/// Cap key of `dir`: its parent's path when the parent is named after a
/// known category, `None` for directories the cap does not govern
pub fn cap_key(dir: &Path, registry: &CategoryRegistry) -> Option<String> {
    let parent = dir.parent()?;
    let name = parent.file_name()?.to_str()?;
    registry
        .is_valid(name)
        .then(|| parent.to_string_lossy().into_owned())
}

/// Ingest one metadata file into `truth`
pub fn ingest_capture(
    truth: &mut TruthData,
    path: &Path,
    file_name: &str,
    opts: &IngestOptions,
) -> Result<CaptureStatus> {
    let scene_id = scene_id_from_file_name(file_name).ok_or_else(|| ScoringError::Metadata {
        path: path.to_path_buf(),
        reason: "file name is not <scene>_<temporal index>_<product>.json".to_string(),
    })?;

    if let Some(filter) = opts.scene_filter {
        if !filter.is_match(&scene_id) {
            tracing::trace!("Scene {} excluded by filter", scene_id);
            return Ok(CaptureStatus::Filtered);
        }
    }

    let temporal_index = temporal_index_from_file_name(file_name).ok_or_else(|| {
        ScoringError::Metadata {
            path: path.to_path_buf(),
            reason: "temporal index is not an integer".to_string(),
        }
    })?;

    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    let image_path = path.with_file_name(format!("{}.jpg", stem));
    if !image_path.exists() {
        tracing::warn!("Image file {} not found", image_path.display());
        return Ok(CaptureStatus::MissingImage);
    }

    let dir = path.parent().unwrap_or(opts.data_dir);
    truth
        .scene_entry(&scene_id, dir)
        .add_temporal_index(temporal_index);

    let metadata = ImageMetadata::load(path)?;
    tracing::trace!("{}: {} boxes", file_name, metadata.bounding_boxes.len());
    for b in &metadata.bounding_boxes {
        truth.insert_box(b.id, b.category.as_deref(), &scene_id);
    }

    Ok(CaptureStatus::Ingested)
}
