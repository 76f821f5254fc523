//! Coherent-noise fields sampled at integer grid coordinates.

use noise::{NoiseFn, Perlin};

const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

/// A noise field. Samples are total over `i32 x i32` and fall in `[0, 1]`.
pub trait NoiseSource {
    fn sample(&self, x: i32, y: i32) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(i32, i32) -> f64,
{
    fn sample(&self, x: i32, y: i32) -> f64 {
        self(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseParams {
    pub width: i32,
    pub height: i32,
    /// Lattice cells spanning the longer side of the field.
    pub resolution: u32,
    pub octaves: u32,
}

pub trait NoiseFactory {
    type Source: NoiseSource;

    fn build(&self, params: NoiseParams, seed: u32) -> Self::Source;
}

impl<F, S> NoiseFactory for F
where
    F: Fn(NoiseParams, u32) -> S,
    S: NoiseSource,
{
    type Source = S;

    fn build(&self, params: NoiseParams, seed: u32) -> S {
        self(params, seed)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PerlinNoiseFactory;

impl NoiseFactory for PerlinNoiseFactory {
    type Source = DiscretePerlin;

    fn build(&self, params: NoiseParams, seed: u32) -> DiscretePerlin {
        let span = params.width.max(params.height).max(1);
        let mut field = DiscretePerlin {
            perlin: Perlin::new(seed),
            frequency: f64::from(params.resolution.max(1)) / f64::from(span),
            octaves: params.octaves.max(1),
            low: -1.0,
            spread: 2.0,
        };

        let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
        for y in 0..params.height {
            for x in 0..params.width {
                let value = field.raw(x, y);
                low = low.min(value);
                high = high.max(value);
            }
        }
        if high > low {
            field.low = low;
            field.spread = high - low;
        }
        field
    }
}

/// Fractal Perlin noise stretched so that the field's own minimum and maximum over
/// `width x height` map to 0 and 1. Samples outside that grid are clamped into `[0, 1]`.
#[derive(Clone, Debug)]
pub struct DiscretePerlin {
    perlin: Perlin,
    frequency: f64,
    octaves: u32,
    low: f64,
    spread: f64,
}

impl DiscretePerlin {
    fn fbm(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.octaves {
            total += amplitude * self.perlin.get([x * frequency, y * frequency]);
            max_value += amplitude;
            amplitude *= PERSISTENCE;
            frequency *= LACUNARITY;
        }

        total / max_value
    }

    /// Offset by half a tile so samples never land exactly on lattice corners, where Perlin is 0.
    fn raw(&self, x: i32, y: i32) -> f64 {
        self.fbm(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }
}

impl NoiseSource for DiscretePerlin {
    fn sample(&self, x: i32, y: i32) -> f64 {
        ((self.raw(x, y) - self.low) / self.spread).clamp(0.0, 1.0)
    }
}

/// The same value everywhere. Also its own factory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _x: i32, _y: i32) -> f64 {
        self.0
    }
}

impl NoiseFactory for ConstantNoise {
    type Source = ConstantNoise;

    fn build(&self, _params: NoiseParams, _seed: u32) -> ConstantNoise {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NoiseParams {
        NoiseParams { width: 80, height: 24, resolution: 4, octaves: 2 }
    }

    #[test]
    fn perlin_samples_stay_in_unit_range() {
        let field = PerlinNoiseFactory.build(params(), 7);
        for y in -5..30 {
            for x in -5..90 {
                let value = field.sample(x, y);
                assert!((0.0..=1.0).contains(&value), "sample at ({x}, {y}) was {value}");
            }
        }
    }

    #[test]
    fn perlin_field_is_not_flat() {
        let field = PerlinNoiseFactory.build(params(), 7);
        let samples: Vec<f64> = (0..80).map(|x| field.sample(x, 10)).collect();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.01, "expected variation, got {min}..{max}");
    }

    #[test]
    fn perlin_field_spans_the_unit_range_over_its_grid() {
        let field = PerlinNoiseFactory.build(params(), 3);
        let samples: Vec<f64> = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| field.sample(x, y))
            .collect();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min.abs() < 1e-9, "minimum was {min}");
        assert!((max - 1.0).abs() < 1e-9, "maximum was {max}");
    }

    #[test]
    fn same_seed_gives_the_same_field() {
        let left = PerlinNoiseFactory.build(params(), 42);
        let right = PerlinNoiseFactory.build(params(), 42);
        for (x, y) in [(0, 0), (13, 7), (79, 23)] {
            assert_eq!(left.sample(x, y), right.sample(x, y));
        }
    }

    #[test]
    fn closures_are_noise_sources() {
        let diagonal = |x: i32, y: i32| if x == y { 1.0 } else { 0.0 };
        assert_eq!(diagonal.sample(3, 3), 1.0);
        assert_eq!(diagonal.sample(3, 4), 0.0);
        assert_eq!(ConstantNoise(0.25).build(params(), 1).sample(9, 9), 0.25);
    }
}
