//! Seeded 2-D game map generation: a normalized height field, a smoothed
//! terrain layer and spaced resource points, accepted only when the result
//! passes diversity, spacing and connectivity checks.

pub mod config;
pub mod error;
pub mod mapgen;
pub mod types;

pub use config::{
    AmountRange, GenerationConfig, NoiseConfig, ResourceConfig, ResourceRule, TerrainThresholds,
    ValidationConfig,
};
pub use error::{ConfigError, GenerationError};
pub use mapgen::{
    Grid, Map, MapGenerator, MapValidator, ResourcePoint, ValidationCheck, ValidationReport,
    generate_map,
};
pub use types::*;
