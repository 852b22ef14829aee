//! Resource scattering: rejection-sampled cells, weighted type draws, ranged amounts.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{ResourceConfig, ResourceRule};
use crate::types::{Point2, TerrainCategory};

use super::grid::Grid;
use super::model::ResourcePoint;
use super::seed::{RESOURCE_STREAM, random_below, random_range_inclusive, stream_rng, unit_f64};

/// Candidate draws per resource slot before the slot is dropped.
pub const PLACEMENT_ATTEMPTS: usize = 100;

pub fn target_resource_count(width: usize, height: usize, density: f64) -> usize {
    ((width * height) as f64 * density).floor() as usize
}

pub fn place_resources(
    terrain: &Grid<TerrainCategory>,
    seed: u64,
    config: &ResourceConfig,
) -> Vec<ResourcePoint> {
    let config = config.sanitized();
    let width = terrain.width();
    let height = terrain.height();
    let target = target_resource_count(width, height, config.density);
    let total_weight = config.total_weight();
    if target == 0 || terrain.is_empty() || total_weight <= 0.0 {
        return Vec::new();
    }

    let mut rng = stream_rng(seed, RESOURCE_STREAM);
    let mut placed: Vec<ResourcePoint> = Vec::with_capacity(target);
    let mut starved_slots = 0_usize;

    for _ in 0..target {
        let Some(position) = find_open_cell(&mut rng, terrain, &placed, config.min_distance)
        else {
            starved_slots += 1;
            continue;
        };
        let rule = pick_rule(&mut rng, &config.types, total_weight);
        let amount = random_range_inclusive(&mut rng, rule.amount.min, rule.amount.max);
        let quality = unit_f64(&mut rng) as f32;
        placed.push(ResourcePoint::new(position, rule.kind, amount, quality));
    }

    if starved_slots > 0 {
        debug!(
            target: "playmap::mapgen",
            seed,
            target_count = target,
            placed = placed.len(),
            starved_slots,
            "resource placement ran out of open cells"
        );
    }
    placed
}

fn find_open_cell(
    rng: &mut ChaCha8Rng,
    terrain: &Grid<TerrainCategory>,
    placed: &[ResourcePoint],
    min_distance: f32,
) -> Option<Point2> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = random_below(rng, terrain.width());
        let y = random_below(rng, terrain.height());
        if !terrain.at(x, y).is_resource_eligible() {
            continue;
        }
        let candidate = Point2::new(x as f32, y as f32);
        if placed.iter().all(|point| point.position().distance(candidate) >= min_distance) {
            return Some(candidate);
        }
    }
    None
}

/// Draws a rule with probability `weight / total_weight`.
fn pick_rule<'a>(
    rng: &mut ChaCha8Rng,
    rules: &'a [ResourceRule],
    total_weight: f64,
) -> &'a ResourceRule {
    let roll = unit_f64(rng) * total_weight;
    let mut cumulative = 0.0;
    let mut chosen = None;
    for rule in rules.iter().filter(|rule| rule.weight > 0.0) {
        cumulative += rule.weight;
        chosen = Some(rule);
        if roll < cumulative {
            break;
        }
    }
    // Rounding can leave `roll` a hair above the final cumulative sum; the
    // last positive-weight rule absorbs it.
    chosen.unwrap_or(&rules[0])
}
