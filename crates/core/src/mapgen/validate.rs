//! Structural acceptance checks: terrain diversity, resource spacing, walkable connectivity.

use std::fmt;

use serde::Serialize;

use crate::config::{ResourceConfig, ValidationConfig};
use crate::types::TerrainCategory;

use super::grid::Grid;
use super::model::{Map, ResourcePoint, terrain_histogram};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCheck {
    TerrainDiversity,
    ResourceSpacing,
    Connectivity,
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerrainDiversity => write!(f, "terrain diversity"),
            Self::ResourceSpacing => write!(f, "resource spacing"),
            Self::Connectivity => write!(f, "connectivity"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiversityReport {
    pub passed: bool,
    pub distinct_categories: usize,
    /// Fraction of all cells per category, indexed by [`TerrainCategory::index`].
    pub shares: [f64; TerrainCategory::COUNT],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpacingReport {
    pub passed: bool,
    /// Distance between the closest pair of resources, if there are at least two.
    pub closest_pair: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    pub passed: bool,
    /// False when the check was disabled by configuration.
    pub evaluated: bool,
    pub walkable_cells: usize,
    pub largest_component: usize,
    pub components: usize,
}

impl ConnectivityReport {
    pub fn largest_share(&self) -> f64 {
        if self.walkable_cells == 0 {
            0.0
        } else {
            self.largest_component as f64 / self.walkable_cells as f64
        }
    }
}

/// Outcome of every check against one map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationReport {
    pub diversity: DiversityReport,
    pub spacing: SpacingReport,
    pub connectivity: ConnectivityReport,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.diversity.passed && self.spacing.passed && self.connectivity.passed
    }

    pub fn failures(&self) -> Vec<ValidationCheck> {
        let mut failures = Vec::new();
        if !self.diversity.passed {
            failures.push(ValidationCheck::TerrainDiversity);
        }
        if !self.spacing.passed {
            failures.push(ValidationCheck::ResourceSpacing);
        }
        if !self.connectivity.passed {
            failures.push(ValidationCheck::Connectivity);
        }
        failures
    }
}

/// Runs the three acceptance checks with the bounds from one generation config.
#[derive(Clone, Debug)]
pub struct MapValidator {
    validation: ValidationConfig,
    min_distance: f32,
}

impl MapValidator {
    pub fn new(validation: &ValidationConfig, resources: &ResourceConfig) -> Self {
        Self {
            validation: validation.sanitized(),
            min_distance: resources.sanitized().min_distance,
        }
    }

    pub fn validate(&self, map: &Map) -> ValidationReport {
        ValidationReport {
            diversity: check_diversity(map.terrain(), &self.validation),
            spacing: check_spacing(map.resources(), self.min_distance),
            connectivity: if self.validation.enable_connectivity_check {
                check_connectivity(map.terrain(), self.validation.min_walkable_ratio)
            } else {
                ConnectivityReport {
                    passed: true,
                    evaluated: false,
                    walkable_cells: 0,
                    largest_component: 0,
                    components: 0,
                }
            },
        }
    }

    pub fn is_valid(&self, map: &Map) -> bool {
        self.validate(map).passed()
    }
}

pub fn check_diversity(
    terrain: &Grid<TerrainCategory>,
    validation: &ValidationConfig,
) -> DiversityReport {
    let counts = terrain_histogram(terrain);
    let total = terrain.len().max(1) as f64;
    let mut shares = [0.0; TerrainCategory::COUNT];
    for (share, &count) in shares.iter_mut().zip(&counts) {
        *share = count as f64 / total;
    }

    let distinct_categories = counts.iter().filter(|&&count| count > 0).count();
    let shares_in_band = counts.iter().zip(&shares).filter(|&(&count, _)| count > 0).all(
        |(_, &share)| {
            share >= validation.min_category_share && share <= validation.max_category_share
        },
    );

    DiversityReport {
        passed: distinct_categories >= validation.min_categories && shares_in_band,
        distinct_categories,
        shares,
    }
}

pub fn check_spacing(resources: &[ResourcePoint], min_distance: f32) -> SpacingReport {
    let mut closest_pair: Option<f32> = None;
    for (i, a) in resources.iter().enumerate() {
        for b in &resources[i + 1..] {
            let distance = a.position().distance(b.position());
            closest_pair = Some(closest_pair.map_or(distance, |closest| closest.min(distance)));
        }
    }
    SpacingReport {
        passed: closest_pair.is_none_or(|closest| closest >= min_distance),
        closest_pair,
    }
}

/// Flood-fills every walkable component (4-connected, explicit stack) and
/// compares the largest against the walkable total. A map without walkable
/// cells fails.
pub fn check_connectivity(terrain: &Grid<TerrainCategory>, min_ratio: f64) -> ConnectivityReport {
    let width = terrain.width();
    let height = terrain.height();
    let mut visited = vec![false; terrain.len()];
    let mut stack = Vec::new();
    let mut walkable_cells = 0_usize;
    let mut largest_component = 0_usize;
    let mut components = 0_usize;

    for start in 0..terrain.len() {
        if visited[start] || !terrain.cells()[start].is_walkable() {
            continue;
        }
        components += 1;
        visited[start] = true;
        stack.push(start);
        let mut size = 0_usize;

        while let Some(index) = stack.pop() {
            size += 1;
            let x = index % width;
            let y = index / width;
            let neighbours = [
                (x > 0).then(|| index - 1),
                (x + 1 < width).then(|| index + 1),
                (y > 0).then(|| index - width),
                (y + 1 < height).then(|| index + width),
            ];
            for next in neighbours.into_iter().flatten() {
                if !visited[next] && terrain.cells()[next].is_walkable() {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        walkable_cells += size;
        largest_component = largest_component.max(size);
    }

    let passed = walkable_cells > 0 && largest_component as f64 >= min_ratio * walkable_cells as f64;
    ConnectivityReport { passed, evaluated: true, walkable_cells, largest_component, components }
}
