//! Terrain from a noise field, bucketed into five walkable kinds.

use log::debug;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use super::Fractor;
use crate::canvas::Canvas;
use crate::entity::EntityKind;
use crate::error::GenerationError;
use crate::geometry::Rectangle;
use crate::noise_field::{NoiseFactory, NoiseParams, NoiseSource, PerlinNoiseFactory};

pub const DEFAULT_RESOLUTION: u32 = 4;
pub const DEFAULT_OCTAVES: u32 = 2;

/// Upper bounds (exclusive) of each bucket; anything at or above the last is a tree.
const BUCKETS: [(f64, EntityKind); 4] = [
    (0.2, EntityKind::Floor),
    (0.4, EntityKind::Dirt),
    (0.6, EntityKind::CutGrass),
    (0.8, EntityKind::Grass),
];

pub fn terrain_for_sample(value: f64) -> EntityKind {
    BUCKETS
        .iter()
        .find(|(limit, _)| value < *limit)
        .map_or(EntityKind::Tree, |&(_, kind)| kind)
}

#[derive(Clone, Copy, Debug)]
pub struct PerlinFractor<N = PerlinNoiseFactory> {
    resolution: u32,
    octaves: u32,
    factory: N,
}

impl PerlinFractor {
    pub fn new() -> Self {
        Self::with_factory(PerlinNoiseFactory)
    }
}

impl Default for PerlinFractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NoiseFactory> PerlinFractor<N> {
    pub fn with_factory(factory: N) -> Self {
        Self { resolution: DEFAULT_RESOLUTION, octaves: DEFAULT_OCTAVES, factory }
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }
}

impl<N: NoiseFactory> Fractor for PerlinFractor<N> {
    fn populate(
        &mut self,
        canvas: &mut Canvas,
        region: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError> {
        if !canvas.bounds().contains_rect(region) {
            return Err(GenerationError::BoundsViolation { rect: region, bounds: canvas.bounds() });
        }

        let params = NoiseParams {
            width: region.width(),
            height: region.height(),
            resolution: self.resolution,
            octaves: self.octaves,
        };
        // Only the low 32 bits seed the field.
        let seed = rng.next_u64() as u32;
        let field = self.factory.build(params, seed);
        debug!("noise terrain over {region} with seed {seed}");

        for point in region.iter_points() {
            let value = field.sample(point.x - region.left(), point.y - region.top());
            canvas.set_terrain(point, terrain_for_sample(value))?;
        }
        Ok(())
    }
}
