//! Truth Data
//!
//! Scenes and ground-truth boxes discovered during ingestion. This is the
//! context object handed from ingestion to solution loading and scoring.
//! Scenes and boxes are built once; afterwards only the two scoring flags on
//! [`Scene`] change.

use crate::categories::normalize_category;
use crate::BoxId;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Temporal capture indices of a scene (most scenes have fewer than 8 captures)
pub type TemporalIndices = SmallVec<[u32; 8]>;

/// A geographic site observed at one or more points in time
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,

    /// Directory holding the scene's captures
    pub dir: PathBuf,

    /// Sorted, without duplicates
    pub temporal_indices: TemporalIndices,

    /// Set by scoring when any box of the scene was misclassified
    pub is_error: bool,

    /// Wrong guess of the last misclassified box
    pub mismatched_guess: Option<String>,
}

impl Scene {
    pub fn new(id: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            dir: dir.into(),
            temporal_indices: SmallVec::new(),
            is_error: false,
            mismatched_guess: None,
        }
    }

    /// Insert a temporal index, keeping the list sorted and unique
    pub fn add_temporal_index(&mut self, index: u32) {
        if let Err(pos) = self.temporal_indices.binary_search(&index) {
            self.temporal_indices.insert(pos, index);
        }
    }

    pub fn has_temporal_index(&self, index: u32) -> bool {
        self.temporal_indices.binary_search(&index).is_ok()
    }

    pub(crate) fn clear_flags(&mut self) {
        self.is_error = false;
        self.mismatched_guess = None;
    }
}

/// Truth category of a box and the scene that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct TruthBox {
    pub category: String,
    pub scene_id: String,
}

/// All scenes and truth boxes of a run
#[derive(Debug, Clone, Default)]
pub struct TruthData {
    /// Scene ID → Scene (ordered by scene ID)
    scenes: BTreeMap<String, Scene>,

    /// Box ID → truth category and owning scene
    boxes: BTreeMap<BoxId, TruthBox>,
}

impl TruthData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the scene, creating it with `dir` if it is not known yet
    pub fn scene_entry(&mut self, scene_id: &str, dir: &Path) -> &mut Scene {
        self.scenes
            .entry(scene_id.to_string())
            .or_insert_with(|| Scene::new(scene_id, dir))
    }

    /// Add a fully built scene, returning the scene it replaced
    pub fn insert_scene(&mut self, scene: Scene) -> Option<Scene> {
        self.scenes.insert(scene.id.clone(), scene)
    }

    /// Record a truth box
    ///
    /// The category is normalized. A box ID seen before is reassigned to the
    /// new scene (last write wins) and a warning is logged.
    pub fn insert_box(&mut self, box_id: BoxId, category: Option<&str>, scene_id: &str) {
        let truth_box = TruthBox {
            category: normalize_category(category).to_string(),
            scene_id: scene_id.to_string(),
        };
        if let Some(previous) = self.boxes.insert(box_id, truth_box) {
            if previous.scene_id != scene_id {
                tracing::warn!(
                    "Box {} appears in scenes '{}' and '{}', keeping '{}'",
                    box_id,
                    previous.scene_id,
                    scene_id,
                    scene_id
                );
            }
        }
    }

    /// Scenes in scene ID order
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    pub(crate) fn scenes_mut(&mut self) -> impl Iterator<Item = &mut Scene> {
        self.scenes.values_mut()
    }

    pub(crate) fn scene_mut(&mut self, scene_id: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(scene_id)
    }

    /// Truth boxes in ascending box ID order
    pub fn boxes(&self) -> impl Iterator<Item = (BoxId, &TruthBox)> {
        self.boxes.iter().map(|(id, b)| (*id, b))
    }

    pub fn truth_box(&self, box_id: BoxId) -> Option<&TruthBox> {
        self.boxes.get(&box_id)
    }

    pub fn category_of(&self, box_id: BoxId) -> Option<&str> {
        self.boxes.get(&box_id).map(|b| b.category.as_str())
    }

    /// Scene ID → (box ID, category) in ascending box ID order
    pub fn boxes_by_scene(&self) -> BTreeMap<&str, Vec<(BoxId, &str)>> {
        let mut grouped: BTreeMap<&str, Vec<(BoxId, &str)>> = BTreeMap::new();
        for (id, b) in &self.boxes {
            grouped
                .entry(b.scene_id.as_str())
                .or_default()
                .push((*id, b.category.as_str()));
        }
        grouped
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Scenes flagged by the last scoring pass
    pub fn error_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values().filter(|s| s.is_error)
    }
}
