//! Category Registry
//!
//! The closed vocabulary of fMoW categories and the weight each one carries in
//! the overall score. The vocabulary lives in a static table and is validated
//! once when the registry is built.

use crate::error::{Result, ScoringError};
use rustc_hash::FxHashMap;

/// Synthetic category for boxes that do not cover a real object of interest
pub const FALSE_DETECTION: &str = "false_detection";

/// Earlier name of [`FALSE_DETECTION`], still present in older truth files
pub const FALSE_DETECTION_ALIAS: &str = "unknown";

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const LOW_WEIGHT: f64 = 0.6;
pub const HIGH_WEIGHT: f64 = 1.4;

/// Category → weight
pub const CATEGORY_TABLE: &[(&str, f64)] = &[
    ("airport", DEFAULT_WEIGHT),
    ("airport_hangar", DEFAULT_WEIGHT),
    ("airport_terminal", DEFAULT_WEIGHT),
    ("amusement_park", DEFAULT_WEIGHT),
    ("aquaculture", DEFAULT_WEIGHT),
    ("archaeological_site", DEFAULT_WEIGHT),
    ("barn", DEFAULT_WEIGHT),
    ("border_checkpoint", HIGH_WEIGHT),
    ("burial_site", DEFAULT_WEIGHT),
    ("car_dealership", DEFAULT_WEIGHT),
    ("construction_site", HIGH_WEIGHT),
    ("crop_field", LOW_WEIGHT),
    ("dam", DEFAULT_WEIGHT),
    ("debris_or_rubble", LOW_WEIGHT),
    ("educational_institution", HIGH_WEIGHT),
    ("electric_substation", DEFAULT_WEIGHT),
    ("factory_or_powerplant", HIGH_WEIGHT),
    ("fire_station", HIGH_WEIGHT),
    ("flooded_road", LOW_WEIGHT),
    ("fountain", DEFAULT_WEIGHT),
    ("gas_station", HIGH_WEIGHT),
    ("golf_course", DEFAULT_WEIGHT),
    ("ground_transportation_station", DEFAULT_WEIGHT),
    ("helipad", DEFAULT_WEIGHT),
    ("hospital", DEFAULT_WEIGHT),
    ("impoverished_settlement", DEFAULT_WEIGHT),
    ("interchange", DEFAULT_WEIGHT),
    ("lake_or_pond", DEFAULT_WEIGHT),
    ("lighthouse", DEFAULT_WEIGHT),
    ("military_facility", LOW_WEIGHT),
    ("multi-unit_residential", DEFAULT_WEIGHT),
    ("nuclear_powerplant", LOW_WEIGHT),
    ("office_building", DEFAULT_WEIGHT),
    ("oil_or_gas_facility", DEFAULT_WEIGHT),
    ("park", DEFAULT_WEIGHT),
    ("parking_lot_or_garage", DEFAULT_WEIGHT),
    ("place_of_worship", DEFAULT_WEIGHT),
    ("police_station", HIGH_WEIGHT),
    ("port", DEFAULT_WEIGHT),
    ("prison", DEFAULT_WEIGHT),
    ("race_track", DEFAULT_WEIGHT),
    ("railway_bridge", DEFAULT_WEIGHT),
    ("recreational_facility", DEFAULT_WEIGHT),
    ("road_bridge", HIGH_WEIGHT),
    ("runway", DEFAULT_WEIGHT),
    ("shipyard", DEFAULT_WEIGHT),
    ("shopping_mall", DEFAULT_WEIGHT),
    ("single-unit_residential", LOW_WEIGHT),
    ("smokestack", HIGH_WEIGHT),
    ("solar_farm", LOW_WEIGHT),
    ("space_facility", DEFAULT_WEIGHT),
    ("stadium", DEFAULT_WEIGHT),
    ("storage_tank", DEFAULT_WEIGHT),
    ("surface_mine", DEFAULT_WEIGHT),
    ("swimming_pool", DEFAULT_WEIGHT),
    ("toll_booth", DEFAULT_WEIGHT),
    ("tower", HIGH_WEIGHT),
    ("tunnel_opening", LOW_WEIGHT),
    ("waste_disposal", DEFAULT_WEIGHT),
    ("water_treatment_facility", DEFAULT_WEIGHT),
    ("wind_farm", LOW_WEIGHT),
    ("zoo", DEFAULT_WEIGHT),
    (FALSE_DETECTION, 0.0),
];

/// Map an absent, empty or legacy category name to [`FALSE_DETECTION`]
pub fn normalize_category(category: Option<&str>) -> &str {
    match category {
        None => FALSE_DETECTION,
        Some(c) if c.is_empty() || c == FALSE_DETECTION_ALIAS => FALSE_DETECTION,
        Some(c) => c,
    }
}

/// Known categories and their scoring weights
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    weights: FxHashMap<String, f64>,
}

impl CategoryRegistry {
    /// Registry over the built-in [`CATEGORY_TABLE`]
    pub fn standard() -> Result<Self> {
        Self::from_table(CATEGORY_TABLE)
    }

    /// Build and validate a registry from a category → weight table
    ///
    /// Rejects duplicate entries, negative or non-finite weights, and tables
    /// where `false_detection` is absent or carries a non-zero weight.
    pub fn from_table(table: &[(&str, f64)]) -> Result<Self> {
        let mut weights = FxHashMap::default();

        for &(category, weight) in table {
            if category.is_empty() {
                return Err(ScoringError::InvalidCategoryTable(
                    "empty category name".to_string(),
                ));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidCategoryTable(format!(
                    "weight {} for '{}' must be finite and non-negative",
                    weight, category
                )));
            }
            if weights.insert(category.to_string(), weight).is_some() {
                return Err(ScoringError::InvalidCategoryTable(format!(
                    "duplicate category '{}'",
                    category
                )));
            }
        }

        match weights.get(FALSE_DETECTION) {
            Some(&w) if w == 0.0 => {}
            Some(&w) => {
                return Err(ScoringError::InvalidCategoryTable(format!(
                    "'{}' must have weight 0, found {}",
                    FALSE_DETECTION, w
                )))
            }
            None => {
                return Err(ScoringError::InvalidCategoryTable(format!(
                    "'{}' is missing",
                    FALSE_DETECTION
                )))
            }
        }

        Ok(Self { weights })
    }

    pub fn is_valid(&self, category: &str) -> bool {
        self.weights.contains_key(category)
    }

    /// Scoring weight, [`DEFAULT_WEIGHT`] for categories outside the vocabulary
    pub fn weight(&self, category: &str) -> f64 {
        self.weights.get(category).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn normalize<'a>(&self, category: &'a str) -> &'a str {
        normalize_category(Some(category))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.weights.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
