//! Capture view
//!
//! Everything the display layer needs to draw one capture of a scene: the
//! image location, its metadata and each box paired with the prediction
//! made for it.

use crate::config::Imagery;
use crate::data::Scene;
use crate::error::{Result, ScoringError};
use crate::ingest::{ImageMetadata, PixelRect};
use crate::solution::Predictions;
use crate::BoxId;
use std::path::PathBuf;

/// A box as drawn over the image
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBox {
    pub id: BoxId,
    pub rect: PixelRect,
    /// Normalized truth category
    pub category: String,
    /// Predicted category, if a solution was loaded
    pub guess: Option<String>,
}

impl ViewBox {
    /// A guess exists and differs from the truth
    pub fn is_mismatch(&self) -> bool {
        self.guess.as_deref().is_some_and(|g| g != self.category)
    }
}

/// Display-only fields of the capture metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureDetails {
    pub country_code: Option<String>,
    pub timestamp: Option<String>,
    pub img_width: Option<u32>,
    pub img_height: Option<u32>,
    pub cloud_cover: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CaptureView {
    pub scene_id: String,
    pub temporal_index: u32,
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
    /// Meters per pixel
    pub gsd: f64,
    pub details: CaptureDetails,
    pub boxes: Vec<ViewBox>,
}

impl CaptureView {
    /// Load capture `temporal_index` of `scene`
    pub fn load(
        scene: &Scene,
        temporal_index: u32,
        imagery: Imagery,
        predictions: &Predictions,
    ) -> Result<Self> {
        if !scene.has_temporal_index(temporal_index) {
            return Err(ScoringError::UnknownCapture {
                scene_id: scene.id.clone(),
                temporal_index,
            });
        }

        let metadata_path = scene
            .dir
            .join(imagery.metadata_file_name(&scene.id, temporal_index));
        let image_path = scene
            .dir
            .join(imagery.image_file_name(&scene.id, temporal_index));
        tracing::debug!("Loading capture {}", metadata_path.display());

        let metadata = ImageMetadata::load(&metadata_path)?;
        let boxes = metadata
            .bounding_boxes
            .iter()
            .map(|b| ViewBox {
                id: b.id,
                rect: b.rect,
                category: b.normalized_category().to_string(),
                guess: predictions.get(b.id).map(str::to_string),
            })
            .collect();

        Ok(Self {
            scene_id: scene.id.clone(),
            temporal_index,
            image_path,
            metadata_path,
            gsd: metadata.gsd,
            details: CaptureDetails {
                country_code: metadata.country_code,
                timestamp: metadata.timestamp,
                img_width: metadata.img_width,
                img_height: metadata.img_height,
                cloud_cover: metadata.cloud_cover,
            },
            boxes,
        })
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &ViewBox> {
        self.boxes.iter().filter(|b| b.is_mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::FALSE_DETECTION;
    use crate::test_utils::write_capture;
    use approx::assert_relative_eq;

    #[test]
    fn test_load_capture() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_capture(root, "dam", "dam_3", 1, &[(7, Some("dam")), (8, None)], true);

        let mut scene = Scene::new("dam_3", root.join("dam").join("dam_3"));
        scene.add_temporal_index(1);
        let mut predictions = Predictions::new();
        predictions.insert(7, "zoo");

        let view = CaptureView::load(&scene, 1, Imagery::Multispectral, &predictions).unwrap();

        assert_relative_eq!(view.gsd, 0.31);
        assert_eq!(view.details.country_code.as_deref(), Some("FRA"));
        assert_eq!(view.details.img_width, Some(64));
        assert!(view.image_path.ends_with("dam_3_1_msrgb.jpg"));
        assert!(view.image_path.is_file());

        assert_eq!(view.boxes.len(), 2);
        assert_eq!(view.boxes[0].rect, PixelRect { x: 1, y: 2, width: 30, height: 40 });
        assert_eq!(view.boxes[0].guess.as_deref(), Some("zoo"));
        assert_eq!(view.boxes[1].category, FALSE_DETECTION);
        assert_eq!(view.boxes[1].guess, None);

        let mismatched: Vec<BoxId> = view.mismatches().map(|b| b.id).collect();
        assert_eq!(mismatched, vec![7]);
    }

    #[test]
    fn test_unknown_temporal_index() {
        let scene = Scene::new("dam_3", "/nowhere");
        let err = CaptureView::load(&scene, 4, Imagery::Rgb, &Predictions::new()).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::UnknownCapture { temporal_index: 4, .. }
        ));
    }

    #[test]
    fn test_missing_metadata_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new("dam_3", dir.path());
        scene.add_temporal_index(0);
        let err = CaptureView::load(&scene, 0, Imagery::Multispectral, &Predictions::new())
            .unwrap_err();
        assert!(matches!(err, ScoringError::Metadata { .. }));
    }
}
