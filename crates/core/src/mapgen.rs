//! Procedural map generation domain split into coherent submodules.

pub mod grid;
pub mod model;
pub mod noise;
pub mod resources;
pub mod terrain;
pub mod validate;

mod generator;
mod seed;

use crate::config::GenerationConfig;
use crate::error::GenerationError;

pub use generator::MapGenerator;
pub use grid::Grid;
pub use model::{Map, ResourcePoint};
pub use noise::{NoiseField, PermutationTable};
pub use resources::{PLACEMENT_ATTEMPTS, place_resources};
pub use seed::entropy_seed;
pub use terrain::{classify, smooth};
pub use validate::{MapValidator, ValidationCheck, ValidationReport};

pub fn generate_map(config: &GenerationConfig) -> Result<Map, GenerationError> {
    MapGenerator::new(config).generate()
}
