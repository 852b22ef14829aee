//! Height-to-terrain classification and the single smoothing pass over its result.

use crate::config::TerrainThresholds;
use crate::types::TerrainCategory;

use super::grid::Grid;

/// Category pairs that must not touch; listed once, checked in both directions.
const INCOMPATIBLE_PAIRS: [(TerrainCategory, TerrainCategory); 4] = [
    (TerrainCategory::Water, TerrainCategory::Mountain),
    (TerrainCategory::Water, TerrainCategory::Rock),
    (TerrainCategory::Sand, TerrainCategory::Forest),
    (TerrainCategory::Sand, TerrainCategory::Rock),
];

pub fn are_incompatible(a: TerrainCategory, b: TerrainCategory) -> bool {
    INCOMPATIBLE_PAIRS
        .iter()
        .any(|&(left, right)| (a == left && b == right) || (a == right && b == left))
}

/// Lowest-ordered category whose cut point exceeds `height`; rock above them all.
pub fn category_for_height(height: f32, thresholds: &TerrainThresholds) -> TerrainCategory {
    thresholds
        .cut_points()
        .iter()
        .zip(TerrainCategory::ALL)
        .find(|&(&cut, _)| height < cut)
        .map_or(TerrainCategory::Rock, |(_, category)| category)
}

pub fn classify(height_field: &Grid<f32>, thresholds: &TerrainThresholds) -> Grid<TerrainCategory> {
    let thresholds = thresholds.sanitized();
    Grid::from_fn(height_field.width(), height_field.height(), |x, y| {
        category_for_height(*height_field.at(x, y), &thresholds)
    })
}

/// Resolves incompatible neighbours in one pass.
///
/// Every interior cell is compared against the majority of its eight
/// neighbours as they were before the pass, and results land in a fresh grid,
/// so the outcome does not depend on visiting order. Border cells are copied
/// through untouched.
pub fn smooth(terrain: &Grid<TerrainCategory>) -> Grid<TerrainCategory> {
    let width = terrain.width();
    let height = terrain.height();
    let mut smoothed = terrain.clone();
    if width < 3 || height < 3 {
        return smoothed;
    }

    for y in 1..(height - 1) {
        for x in 1..(width - 1) {
            let current = *terrain.at(x, y);
            let majority = neighbourhood_majority(terrain, x, y);
            if are_incompatible(current, majority) {
                smoothed.set(x, y, majority);
            }
        }
    }
    smoothed
}

/// Most common category among the eight neighbours; ties go to the lower category.
fn neighbourhood_majority(terrain: &Grid<TerrainCategory>, x: usize, y: usize) -> TerrainCategory {
    let mut counts = [0_u8; TerrainCategory::COUNT];
    for ny in (y - 1)..=(y + 1) {
        for nx in (x - 1)..=(x + 1) {
            if nx == x && ny == y {
                continue;
            }
            counts[terrain.at(nx, ny).index()] += 1;
        }
    }

    let mut best = TerrainCategory::Water;
    for category in TerrainCategory::ALL {
        if counts[category.index()] > counts[best.index()] {
            best = category;
        }
    }
    best
}
