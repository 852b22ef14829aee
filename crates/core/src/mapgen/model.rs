//! Public data models for generated maps and their resource points.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Point2, ResourceType, TerrainCategory};

use super::grid::Grid;

/// One harvestable node.
///
/// Only `amount` changes after placement, and only through [`ResourcePoint::extract`];
/// a drained point stays in the map marked exhausted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourcePoint {
    position: Point2,
    kind: ResourceType,
    quality: f32,
    amount: u32,
    exhausted: bool,
}

impl ResourcePoint {
    pub fn new(position: Point2, kind: ResourceType, amount: u32, quality: f32) -> Self {
        Self { position, kind, quality, amount, exhausted: amount == 0 }
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Fixed at placement, in `[0, 1]`.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Removes up to `requested` units and returns how many were granted.
    pub fn extract(&mut self, requested: u32) -> u32 {
        let granted = requested.min(self.amount);
        self.amount -= granted;
        if self.amount == 0 {
            self.exhausted = true;
        }
        granted
    }
}

/// A generated map. Terrain and heights are fixed once built; a map that
/// fails validation is discarded and a new one built in its place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Map {
    width: usize,
    height: usize,
    seed: u64,
    generation_seed: u64,
    attempts: u32,
    height_field: Grid<f32>,
    terrain: Grid<TerrainCategory>,
    resources: Vec<ResourcePoint>,
}

impl Map {
    /// Assembles a map from layers that already share the same dimensions.
    pub(super) fn assemble(
        seed: u64,
        generation_seed: u64,
        height_field: Grid<f32>,
        terrain: Grid<TerrainCategory>,
        resources: Vec<ResourcePoint>,
    ) -> Self {
        debug_assert_eq!(height_field.width(), terrain.width());
        debug_assert_eq!(height_field.height(), terrain.height());
        Self {
            width: terrain.width(),
            height: terrain.height(),
            seed,
            generation_seed,
            attempts: 1,
            height_field,
            terrain,
            resources,
        }
    }

    pub(super) fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Seed that reproduces this map through the generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of the attempt that passed validation.
    pub fn generation_seed(&self) -> u64 {
        self.generation_seed
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn height_field(&self) -> &Grid<f32> {
        &self.height_field
    }

    pub fn terrain(&self) -> &Grid<TerrainCategory> {
        &self.terrain
    }

    pub fn terrain_at(&self, x: usize, y: usize) -> Option<TerrainCategory> {
        self.terrain.get(x, y).copied()
    }

    pub fn height_at(&self, x: usize, y: usize) -> Option<f32> {
        self.height_field.get(x, y).copied()
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.terrain_at(x, y).is_some_and(TerrainCategory::is_walkable)
    }

    pub fn resources(&self) -> &[ResourcePoint] {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut [ResourcePoint] {
        &mut self.resources
    }

    /// Cell count per category, indexed by [`TerrainCategory::index`].
    pub fn terrain_histogram(&self) -> [usize; TerrainCategory::COUNT] {
        terrain_histogram(&self.terrain)
    }

    /// Every field that takes part in equality, little-endian, layers in row-major order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(28 + self.height_field.len() * 5);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend(self.generation_seed.to_le_bytes());
        bytes.extend(self.attempts.to_le_bytes());
        for value in self.height_field.cells() {
            bytes.extend(value.to_bits().to_le_bytes());
        }
        for category in self.terrain.cells() {
            bytes.push(category.index() as u8);
        }

        bytes.extend((self.resources.len() as u32).to_le_bytes());
        for point in &self.resources {
            bytes.extend(point.position.x.to_bits().to_le_bytes());
            bytes.extend(point.position.y.to_bits().to_le_bytes());
            bytes.push(point.kind.code());
            bytes.extend(point.amount.to_le_bytes());
            bytes.extend(point.quality.to_bits().to_le_bytes());
            bytes.push(u8::from(point.exhausted));
        }
        bytes
    }

    /// XXH3 of [`Map::canonical_bytes`], stable across runs and machines.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

pub(super) fn terrain_histogram(terrain: &Grid<TerrainCategory>) -> [usize; TerrainCategory::COUNT] {
    let mut counts = [0_usize; TerrainCategory::COUNT];
    for category in terrain.cells() {
        counts[category.index()] += 1;
    }
    counts
}
