use std::cell::Cell;
use std::collections::VecDeque;

use playmap::{
    GenerationConfig, GenerationError, Map, TerrainCategory, ValidationConfig, generate_map,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn largest_walkable_component(map: &Map) -> (usize, usize) {
    let (width, height) = (map.width(), map.height());
    let mut seen = vec![false; width * height];
    let mut walkable = 0;
    let mut largest = 0;

    for start_y in 0..height {
        for start_x in 0..width {
            if seen[start_y * width + start_x] || !map.is_walkable(start_x, start_y) {
                continue;
            }
            seen[start_y * width + start_x] = true;
            let mut queue = VecDeque::from([(start_x, start_y)]);
            let mut size = 0;
            while let Some((x, y)) = queue.pop_front() {
                size += 1;
                let candidates = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in candidates {
                    if nx < width && ny < height && !seen[ny * width + nx] && map.is_walkable(nx, ny)
                    {
                        seen[ny * width + nx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
            walkable += size;
            largest = largest.max(size);
        }
    }
    (walkable, largest)
}

fn check_invariants(map: &Map, config: &GenerationConfig) -> Result<(), String> {
    let validation = ValidationConfig::default();

    if map.width() != config.width as usize || map.height() != config.height as usize {
        return Err(format!("Invariant failed: dimensions on seed {}", config.seed));
    }
    if map.height_field().cells().iter().any(|value| !(0.0..=1.0).contains(value)) {
        return Err(format!("Invariant failed: height outside [0, 1] on seed {}", config.seed));
    }

    let histogram = map.terrain_histogram();
    let total = (map.width() * map.height()) as f64;
    let mut distinct = 0;
    for category in TerrainCategory::ALL {
        let count = histogram[category.index()];
        if count == 0 {
            continue;
        }
        distinct += 1;
        let share = count as f64 / total;
        if share < validation.min_category_share || share > validation.max_category_share {
            return Err(format!(
                "Invariant failed: {category:?} share {share:.3} on seed {}",
                config.seed
            ));
        }
    }
    if distinct < validation.min_categories {
        return Err(format!("Invariant failed: {distinct} categories on seed {}", config.seed));
    }

    let resources = map.resources();
    for (i, a) in resources.iter().enumerate() {
        for b in &resources[i + 1..] {
            if a.position().distance(b.position()) < config.resources.min_distance {
                return Err(format!("Invariant failed: resources too close on seed {}", config.seed));
            }
        }
    }

    let (walkable, largest) = largest_walkable_component(map);
    if walkable == 0 || (largest as f64) < validation.min_walkable_ratio * walkable as f64 {
        return Err(format!(
            "Invariant failed: largest component {largest}/{walkable} on seed {}",
            config.seed
        ));
    }
    Ok(())
}

#[test]
fn test_fuzz_accepted_maps_hold_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let inputs = (1..u64::MAX, 48_i32..112, 48_i32..112);
    let accepted = Cell::new(0_u32);

    runner
        .run(&inputs, |(seed, width, height)| {
            let config = GenerationConfig::new(width, height, seed);
            match generate_map(&config) {
                Ok(map) => {
                    check_invariants(&map, &config).map_err(TestCaseError::fail)?;
                    accepted.set(accepted.get() + 1);
                }
                Err(GenerationError::RetriesExhausted { attempts, .. }) => {
                    if attempts != config.max_attempts {
                        return Err(TestCaseError::fail(format!(
                            "gave up after {attempts} attempts on seed {seed}"
                        )));
                    }
                }
            }
            Ok(())
        })
        .expect("accepted maps should preserve invariants");
    assert!(accepted.get() > 0, "no generated map was accepted, so no invariant was checked");
}

#[test]
fn test_fuzz_generation_is_repeatable() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(8));

    runner
        .run(&any::<u64>(), |seed| {
            let config = GenerationConfig::new(48, 48, seed.max(1));
            let first = generate_map(&config).map(|map| map.fingerprint());
            let second = generate_map(&config).map(|map| map.fingerprint());
            if first != second {
                return Err(TestCaseError::fail(format!("seed {seed} is not repeatable")));
            }
            Ok(())
        })
        .expect("generation should be a pure function of its config");
}
