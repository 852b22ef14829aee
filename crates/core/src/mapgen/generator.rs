//! High-level map generation orchestration: noise, terrain, resources, validation, retry.

use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::error::GenerationError;

use super::model::Map;
use super::noise::NoiseField;
use super::resources::place_resources;
use super::seed::{self, entropy_seed};
use super::terrain::{classify, smooth};
use super::validate::{MapValidator, ValidationReport};

pub struct MapGenerator {
    config: GenerationConfig,
    seed: u64,
    validator: MapValidator,
}

impl MapGenerator {
    /// Sanitises `config` and resolves a zero seed to a freshly picked one.
    pub fn new(config: &GenerationConfig) -> Self {
        let config = config.sanitized();
        let seed = if config.seed == 0 { entropy_seed() } else { config.seed };
        let validator = MapValidator::new(&config.validation, &config.resources);
        Self { config, seed, validator }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn validator(&self) -> &MapValidator {
        &self.validator
    }

    /// Seed used by the zero-based `attempt`.
    pub fn attempt_seed(&self, attempt: u32) -> u64 {
        seed::attempt_seed(self.seed, attempt)
    }

    /// Generates and validates maps, moving to a fresh attempt seed after each
    /// rejection, until one passes or `max_attempts` is spent.
    pub fn generate(&self) -> Result<Map, GenerationError> {
        let max_attempts = self.config.max_attempts;
        let mut last_report: Option<ValidationReport> = None;

        for attempt in 0..max_attempts {
            let attempt_seed = self.attempt_seed(attempt);
            let map = self.build_attempt(attempt_seed);
            let report = self.validator.validate(&map);

            if report.passed() {
                info!(
                    target: "playmap::mapgen",
                    seed = self.seed,
                    attempt_seed,
                    attempts = attempt + 1,
                    resources = map.resources().len(),
                    "map accepted"
                );
                return Ok(map.with_attempts(attempt + 1));
            }

            debug!(
                target: "playmap::mapgen",
                seed = self.seed,
                attempt_seed,
                attempt,
                failures = ?report.failures(),
                distinct_categories = report.diversity.distinct_categories,
                largest_component_share = report.connectivity.largest_share(),
                closest_resource_pair = ?report.spacing.closest_pair,
                "map rejected"
            );
            last_report = Some(report);
        }

        let failures = last_report.map(|report| report.failures()).unwrap_or_default();
        warn!(
            target: "playmap::mapgen",
            seed = self.seed,
            attempts = max_attempts,
            failures = ?failures,
            "map generation exhausted its attempts"
        );
        Err(GenerationError::RetriesExhausted { attempts: max_attempts, seed: self.seed, failures })
    }

    /// One unvalidated pass of the pipeline for a single attempt seed.
    pub fn build_attempt(&self, attempt_seed: u64) -> Map {
        let (width, height) = self.config.dimensions();
        let height_field = NoiseField::generate(width, height, attempt_seed, &self.config.noise);
        let terrain = smooth(&classify(&height_field, &self.config.thresholds));
        let resources = place_resources(&terrain, attempt_seed, &self.config.resources);
        Map::assemble(self.seed, attempt_seed, height_field, terrain, resources)
    }
}
