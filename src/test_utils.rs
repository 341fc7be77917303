//! Fixtures for unit tests: a miniature fMoW directory tree on disk.

use crate::BoxId;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `<root>/<category>/<scene_id>/<scene_id>_<t>_msrgb.json` (and the
/// companion `.jpg` when `with_image` is set). Returns the metadata path.
pub fn write_capture(
    root: &Path,
    category: &str,
    scene_id: &str,
    temporal_index: u32,
    boxes: &[(BoxId, Option<&str>)],
    with_image: bool,
) -> PathBuf {
    write_capture_with_tag(root, category, scene_id, temporal_index, boxes, with_image, "msrgb")
}

pub fn write_capture_with_tag(
    root: &Path,
    category: &str,
    scene_id: &str,
    temporal_index: u32,
    boxes: &[(BoxId, Option<&str>)],
    with_image: bool,
    tag: &str,
) -> PathBuf {
    let dir = root.join(category).join(scene_id);
    fs::create_dir_all(&dir).unwrap();

    let bounding_boxes: Vec<serde_json::Value> = boxes
        .iter()
        .map(|(id, cat)| json!({"ID": id, "category": cat, "box": [1, 2, 30, 40]}))
        .collect();
    let metadata = json!({
        "gsd": 0.31,
        "country_code": "FRA",
        "img_width": 64,
        "img_height": 48,
        "bounding_boxes": bounding_boxes,
    });

    let stem = format!("{}_{}_{}", scene_id, temporal_index, tag);
    let path = dir.join(format!("{}.json", stem));
    fs::write(&path, serde_json::to_string_pretty(&metadata).unwrap()).unwrap();
    if with_image {
        fs::write(dir.join(format!("{}.jpg", stem)), b"jpeg").unwrap();
    }
    path
}
