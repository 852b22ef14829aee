//! Error types surfaced by map generation and configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::mapgen::ValidationCheck;

/// The only way generation fails: every attempt up to the ceiling was rejected.
///
/// Sparse resource placement and noise variation are not errors; they either
/// pass validation or trigger another attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(
        "map generation failed after {attempts} attempts starting at seed {seed}; last attempt failed {failures:?}"
    )]
    RetriesExhausted {
        /// Number of attempts consumed.
        attempts: u32,
        /// Seed the caller asked for (after resolving seed 0).
        seed: u64,
        /// Checks that rejected the final attempt.
        failures: Vec<ValidationCheck>,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid generation config: {0}")]
    Parse(#[from] toml::de::Error),
}
