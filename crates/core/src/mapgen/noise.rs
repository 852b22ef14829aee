//! Seeded multi-octave gradient noise producing the normalized height field.
//!
//! The output is a pure function of the map size, the seed and the noise
//! parameters: no platform random source is consulted and every operation is
//! plain IEEE-754 `f64` arithmetic, so the same inputs give bit-identical
//! grids on every target.

use crate::config::NoiseConfig;

use super::grid::Grid;
use super::seed::{NOISE_STREAM, random_below, stream_rng};

/// Gradient directions indexed by the low three bits of a lattice hash.
const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Seed-keyed permutation of `0..=255`, stored twice so lattice hashing never wraps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    pub fn new(seed: u64) -> Self {
        let mut base = [0_u8; 256];
        for (slot, value) in base.iter_mut().zip(0_u8..=255) {
            *slot = value;
        }

        // Fisher-Yates over the explicit ChaCha8 noise stream.
        let mut rng = stream_rng(seed, NOISE_STREAM);
        for i in (1..256).rev() {
            let j = random_below(&mut rng, i + 1);
            base.swap(i, j);
        }

        let mut perm = [0_u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    /// The 256-entry permutation without the duplicated tail.
    pub fn values(&self) -> &[u8] {
        &self.perm[..256]
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn gradient_dot(hash: u8, x: f64, y: f64) -> f64 {
    let (gx, gy) = GRADIENTS[(hash & 7) as usize];
    gx * x + gy * y
}

/// Multi-octave gradient noise bound to one permutation table.
#[derive(Clone, Debug)]
pub struct NoiseField {
    table: PermutationTable,
    config: NoiseConfig,
}

impl NoiseField {
    /// Builds a field for `seed`; `config` is clamped so degenerate octave
    /// counts or frequencies never reach the sampler.
    pub fn new(seed: u64, config: &NoiseConfig) -> Self {
        Self { table: PermutationTable::new(seed), config: config.sanitized() }
    }

    /// Height field for a `width * height` map with every value in `[0, 1]`.
    pub fn generate(width: usize, height: usize, seed: u64, config: &NoiseConfig) -> Grid<f32> {
        Self::new(seed, config).sample_grid(width, height)
    }

    pub fn sample_grid(&self, width: usize, height: usize) -> Grid<f32> {
        Grid::from_fn(width, height, |x, y| self.sample(x as f64, y as f64) as f32)
    }

    /// Normalized fractal value at cell coordinates `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let NoiseConfig { frequency, octaves, persistence, lacunarity, offset_x, offset_y } =
            self.config;
        let sx = x + offset_x;
        let sy = y + offset_y;

        let mut amplitude = 1.0;
        let mut octave_frequency = frequency;
        let mut total = 0.0;
        let mut max_amplitude = 0.0;
        for _ in 0..octaves {
            total += self.gradient_noise(sx * octave_frequency, sy * octave_frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            octave_frequency *= lacunarity;
        }

        ((total / max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Single-octave gradient noise, roughly in `[-1, 1]`.
    fn gradient_noise(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;
        let u = fade(xf);
        let v = fade(yf);

        let aa = self.table.hash(xi, yi);
        let ab = self.table.hash(xi, yi + 1);
        let ba = self.table.hash(xi + 1, yi);
        let bb = self.table.hash(xi + 1, yi + 1);

        let bottom = lerp(gradient_dot(aa, xf, yf), gradient_dot(ba, xf - 1.0, yf), u);
        let top = lerp(gradient_dot(ab, xf, yf - 1.0), gradient_dot(bb, xf - 1.0, yf - 1.0), u);
        lerp(bottom, top, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_contains_every_byte_once() {
        let table = PermutationTable::new(1_234);
        let mut seen = [false; 256];
        for &value in table.values() {
            assert!(!seen[value as usize], "value {value} appeared twice");
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|&present| present));
    }

    #[test]
    fn permutation_is_reproducible_per_seed() {
        assert_eq!(PermutationTable::new(42), PermutationTable::new(42));
        assert_ne!(PermutationTable::new(42).values(), PermutationTable::new(43).values());
    }

    #[test]
    fn same_inputs_produce_bit_identical_fields() {
        let config = NoiseConfig::default();
        let a = NoiseField::generate(40, 30, 2_024, &config);
        let b = NoiseField::generate(40, 30, 2_024, &config);
        let bits = |grid: &Grid<f32>| grid.cells().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn every_value_is_normalized() {
        for seed in [1_u64, 7, 99, 123_456] {
            let field = NoiseField::generate(64, 48, seed, &NoiseConfig::default());
            assert!(field.cells().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn degenerate_config_is_clamped_instead_of_failing() {
        let config = NoiseConfig { frequency: 0.0, octaves: 0, ..NoiseConfig::default() };
        let field = NoiseField::generate(16, 16, 5, &config);
        assert_eq!(field.len(), 256);
        assert!(field.cells().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn negative_offsets_sample_without_panicking() {
        let config = NoiseConfig { offset_x: -1_000.5, offset_y: -37.25, ..NoiseConfig::default() };
        let field = NoiseField::generate(20, 20, 11, &config);
        assert!(field.cells().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn different_seeds_change_the_field() {
        let config = NoiseConfig::default();
        let a = NoiseField::generate(32, 32, 1, &config);
        let b = NoiseField::generate(32, 32, 2, &config);
        assert_ne!(a, b);
    }
}
