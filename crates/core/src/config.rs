//! Generation configuration: a plain value aggregate loaded from TOML or built in code.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides. Odd values are never rejected; [`GenerationConfig::sanitized`]
//! clamps them to the nearest usable setting before generation starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ResourceType, TerrainCategory};

/// Side length substituted for a zero or negative width or height.
pub const MIN_MAP_SIDE: i32 = 1;
pub const MAX_OCTAVES: u32 = 16;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

const DEFAULT_FREQUENCY: f64 = 0.06;
const MIN_FREQUENCY: f64 = 1.0e-4;
const DEFAULT_PERSISTENCE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: i32,
    pub height: i32,
    /// `0` asks the generator to pick a seed.
    pub seed: u64,
    /// Ceiling on generate-and-validate attempts before giving up.
    pub max_attempts: u32,
    pub noise: NoiseConfig,
    pub thresholds: TerrainThresholds,
    pub resources: ResourceConfig,
    pub validation: ValidationConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            noise: NoiseConfig::default(),
            thresholds: TerrainThresholds::default(),
            resources: ResourceConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl GenerationConfig {
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self { width, height, seed, ..Self::default() }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    /// Returns a copy with every field clamped into its usable range.
    pub fn sanitized(&self) -> Self {
        Self {
            width: self.width.max(MIN_MAP_SIDE),
            height: self.height.max(MIN_MAP_SIDE),
            seed: self.seed,
            max_attempts: self.max_attempts.max(1),
            noise: self.noise.sanitized(),
            thresholds: self.thresholds.sanitized(),
            resources: self.resources.sanitized(),
            validation: self.validation.sanitized(),
        }
    }

    /// Map dimensions; positive sides are kept as requested.
    pub fn dimensions(&self) -> (usize, usize) {
        let side = |value: i32| value.max(MIN_MAP_SIDE) as usize;
        (side(self.width), side(self.height))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub frequency: f64,
    pub octaves: u32,
    /// Amplitude multiplier applied per octave.
    pub persistence: f64,
    /// Frequency multiplier applied per octave.
    pub lacunarity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            octaves: 4,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl NoiseConfig {
    pub fn sanitized(&self) -> Self {
        let frequency = if self.frequency.is_finite() {
            self.frequency.abs().max(MIN_FREQUENCY)
        } else {
            DEFAULT_FREQUENCY
        };
        let persistence = if self.persistence.is_finite() && self.persistence > 0.0 {
            self.persistence.min(1.0)
        } else {
            DEFAULT_PERSISTENCE
        };
        let lacunarity = if self.lacunarity.is_finite() { self.lacunarity.max(1.0) } else { 2.0 };
        let finite_or_zero = |value: f64| if value.is_finite() { value } else { 0.0 };
        Self {
            frequency,
            octaves: self.octaves.clamp(1, MAX_OCTAVES),
            persistence,
            lacunarity,
            offset_x: finite_or_zero(self.offset_x),
            offset_y: finite_or_zero(self.offset_y),
        }
    }
}

/// Exclusive upper height bound of each category; heights at or above
/// `mountain` become rock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainThresholds {
    pub water: f32,
    pub sand: f32,
    pub grass: f32,
    pub forest: f32,
    pub mountain: f32,
}

impl Default for TerrainThresholds {
    fn default() -> Self {
        Self { water: 0.40, sand: 0.45, grass: 0.53, forest: 0.60, mountain: 0.85 }
    }
}

impl TerrainThresholds {
    /// Cut points in category order, water first.
    pub fn cut_points(&self) -> [f32; 5] {
        [self.water, self.sand, self.grass, self.forest, self.mountain]
    }

    pub fn sanitized(&self) -> Self {
        let mut floor = 0.0_f32;
        let mut next = |value: f32| {
            let value = if value.is_finite() { value.clamp(floor, 1.0) } else { floor };
            floor = value;
            value
        };
        Self {
            water: next(self.water),
            sand: next(self.sand),
            grass: next(self.grass),
            forest: next(self.forest),
            mountain: next(self.mountain),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: u32,
    pub max: u32,
}

impl AmountRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceRule {
    pub kind: ResourceType,
    /// Relative draw weight; weights need not sum to one.
    pub weight: f64,
    pub amount: AmountRange,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Target resource count per cell.
    pub density: f64,
    pub min_distance: f32,
    pub types: Vec<ResourceRule>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        let rule = |kind, weight, min, max| ResourceRule {
            kind,
            weight,
            amount: AmountRange::new(min, max),
        };
        Self {
            density: 0.004,
            min_distance: 4.0,
            types: vec![
                rule(ResourceType::Wood, 3.0, 50, 200),
                rule(ResourceType::Stone, 2.0, 40, 160),
                rule(ResourceType::Metal, 1.0, 20, 80),
                rule(ResourceType::Food, 3.0, 30, 120),
                rule(ResourceType::Water, 1.0, 60, 240),
            ],
        }
    }
}

impl ResourceConfig {
    pub fn weight_of(&self, kind: ResourceType) -> f64 {
        self.types.iter().filter(|rule| rule.kind == kind).map(|rule| rule.weight).sum()
    }

    pub fn amount_range_of(&self, kind: ResourceType) -> Option<AmountRange> {
        self.types.iter().find(|rule| rule.kind == kind).map(|rule| rule.amount)
    }

    pub fn total_weight(&self) -> f64 {
        self.types.iter().map(|rule| rule.weight).sum()
    }

    pub fn sanitized(&self) -> Self {
        let density = if self.density.is_finite() { self.density.clamp(0.0, 1.0) } else { 0.0 };
        let min_distance =
            if self.min_distance.is_finite() { self.min_distance.max(0.0) } else { 0.0 };
        let mut types: Vec<ResourceRule> = self
            .types
            .iter()
            .map(|rule| ResourceRule {
                kind: rule.kind,
                weight: if rule.weight.is_finite() { rule.weight.max(0.0) } else { 0.0 },
                amount: AmountRange::new(rule.amount.min, rule.amount.max),
            })
            .collect();
        if types.iter().all(|rule| rule.weight <= 0.0) {
            types = Self::default().types;
        }
        Self { density, min_distance, types }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enable_connectivity_check: bool,
    /// Share of walkable cells that must sit in the largest connected component.
    pub min_walkable_ratio: f64,
    pub min_categories: usize,
    pub min_category_share: f64,
    pub max_category_share: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enable_connectivity_check: true,
            min_walkable_ratio: 0.9,
            min_categories: 3,
            min_category_share: 0.05,
            max_category_share: 0.6,
        }
    }
}

impl ValidationConfig {
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let share = |value: f64, fallback: f64| {
            if value.is_finite() { value.clamp(0.0, 1.0) } else { fallback }
        };
        let min_category_share = share(self.min_category_share, defaults.min_category_share);
        let max_category_share =
            share(self.max_category_share, defaults.max_category_share).max(min_category_share);
        Self {
            enable_connectivity_check: self.enable_connectivity_check,
            min_walkable_ratio: share(self.min_walkable_ratio, defaults.min_walkable_ratio),
            min_categories: self.min_categories.min(TerrainCategory::COUNT),
            min_category_share,
            max_category_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_dimensions_and_octaves_are_clamped() {
        let mut config = GenerationConfig::new(-5, 0, 1);
        config.noise.octaves = 0;
        config.noise.frequency = 0.0;
        config.max_attempts = 0;

        let sanitized = config.sanitized();
        assert_eq!(sanitized.width, MIN_MAP_SIDE);
        assert_eq!(sanitized.height, MIN_MAP_SIDE);
        assert_eq!(sanitized.noise.octaves, 1);
        assert!(sanitized.noise.frequency > 0.0);
        assert_eq!(sanitized.max_attempts, 1);
    }

    #[test]
    fn positive_dimensions_are_kept_as_requested() {
        let sanitized = GenerationConfig::new(5, 5_000, 1).sanitized();
        assert_eq!((sanitized.width, sanitized.height), (5, 5_000));
        assert_eq!(GenerationConfig::new(5, 6, 1).dimensions(), (5, 6));
        assert_eq!(GenerationConfig::new(0, 6, 1).dimensions(), (1, 6));
    }

    #[test]
    fn thresholds_are_forced_into_ascending_order() {
        let thresholds =
            TerrainThresholds { water: 0.5, sand: 0.3, grass: 1.4, forest: f32::NAN, mountain: 0.9 };
        let cut_points = thresholds.sanitized().cut_points();
        assert_eq!(cut_points, [0.5, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn all_zero_weights_fall_back_to_default_table() {
        let mut resources = ResourceConfig::default();
        for rule in &mut resources.types {
            rule.weight = -1.0;
        }
        let sanitized = resources.sanitized();
        assert_eq!(sanitized.types, ResourceConfig::default().types);
    }

    #[test]
    fn reversed_amount_ranges_are_reordered() {
        let range = AmountRange::new(90, 10);
        assert_eq!(range, AmountRange { min: 10, max: 90 });
    }

    #[test]
    fn weight_and_amount_views_read_the_rule_table() {
        let resources = ResourceConfig::default();
        assert!((resources.weight_of(ResourceType::Wood) - 3.0).abs() < f64::EPSILON);
        assert_eq!(
            resources.amount_range_of(ResourceType::Metal),
            Some(AmountRange { min: 20, max: 80 })
        );
        assert!((resources.total_weight() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = GenerationConfig::from_toml_str(
            r#"
            width = 64
            seed = 7

            [noise]
            octaves = 6
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 100);
        assert_eq!(config.seed, 7);
        assert_eq!(config.noise.octaves, 6);
        assert_eq!(config.noise.lacunarity, 2.0);
        assert_eq!(config.resources, ResourceConfig::default());
    }

    #[test]
    fn resource_rules_parse_from_array_of_tables() {
        let config = GenerationConfig::from_toml_str(
            r#"
            [resources]
            density = 0.01
            min_distance = 3.0

            [[resources.types]]
            kind = "metal"
            weight = 2.5
            amount = { min = 5, max = 9 }
            "#,
        )
        .expect("resource table should parse");

        assert_eq!(config.resources.types.len(), 1);
        assert_eq!(config.resources.types[0].kind, ResourceType::Metal);
        assert_eq!(config.resources.types[0].amount, AmountRange { min: 5, max: 9 });
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let err = GenerationConfig::from_toml_str("width = \"wide\"").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
