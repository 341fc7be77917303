//! Per-image metadata files
//!
//! One JSON object per captured image. `gsd` and `bounding_boxes` are
//! required; the remaining fields feed the display layer and are optional.

use crate::categories::normalize_category;
use crate::error::{Result, ScoringError};
use crate::BoxId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Pixel rectangle of a box, stored as `[x, y, width, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl From<[i64; 4]> for PixelRect {
    fn from([x, y, width, height]: [i64; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<PixelRect> for [i64; 4] {
    fn from(r: PixelRect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataBox {
    #[serde(rename = "ID")]
    pub id: BoxId,

    /// Raw category; `null` marks a false detection
    #[serde(default)]
    pub category: Option<String>,

    #[serde(rename = "box")]
    pub rect: PixelRect,
}

impl MetadataBox {
    pub fn normalized_category(&self) -> &str {
        normalize_category(self.category.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageMetadata {
    /// Ground sample distance in meters per pixel
    pub gsd: f64,

    pub country_code: Option<String>,
    pub timestamp: Option<String>,
    pub img_width: Option<u32>,
    pub img_height: Option<u32>,
    pub cloud_cover: Option<i64>,

    pub bounding_boxes: Vec<MetadataBox>,
}

impl ImageMetadata {
    /// Read and parse a metadata file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ScoringError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ScoringError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Scene ID of a capture file name: every `_` token but the last two
///
/// `airport_0_3_msrgb.json` → `airport_0`. Returns `None` when the name has
/// fewer than three tokens.
pub fn scene_id_from_file_name(file_name: &str) -> Option<String> {
    let parts: Vec<&str> = file_name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    Some(parts[..parts.len() - 2].join("_"))
}

/// Temporal index of a capture file name: the second-to-last `_` token
pub fn temporal_index_from_file_name(file_name: &str) -> Option<u32> {
    let parts: Vec<&str> = file_name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    parts[parts.len() - 2].parse().ok()
}
