//! Generation runs: a fractor populates the canvas, then anchors and portals are placed and the
//! canvas is finalized into a [`Map`].

pub mod noise_terrain;
pub mod partition;

use log::{debug, info, warn};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::canvas::Canvas;
use crate::entity::{Entity, EntityKind};
use crate::error::GenerationError;
use crate::geometry::{Point, Rectangle, Size};
use crate::map::Map;
use crate::random::{choose, random_in_range, sample_distinct};

pub use noise_terrain::PerlinFractor;
pub use partition::BinaryPartitionFractor;

/// Something that knows how to fill a region of a canvas with terrain.
pub trait Fractor {
    fn populate(
        &mut self,
        canvas: &mut Canvas,
        region: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError>;
}

impl<F: Fractor + ?Sized> Fractor for Box<F> {
    fn populate(
        &mut self,
        canvas: &mut Canvas,
        region: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError> {
        (**self).populate(canvas, region, rng)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub place_player: bool,
    pub up: Option<String>,
    pub down: Option<String>,
}

impl GenerationOptions {
    pub fn with_player(mut self) -> Self {
        self.place_player = true;
        self
    }

    pub fn with_up(mut self, destination: &str) -> Self {
        self.up = Some(destination.to_owned());
        self
    }

    pub fn with_down(mut self, destination: &str) -> Self {
        self.down = Some(destination.to_owned());
        self
    }
}

/// Where anchor placement put the player, the companion, and the starting item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchors {
    pub player: Point,
    pub companion: Point,
    pub item: Point,
}

impl Anchors {
    fn contains(&self, point: Point) -> bool {
        [self.player, self.companion, self.item].contains(&point)
    }
}

pub struct MapGenerator<F> {
    canvas: Canvas,
    region: Rectangle,
    fractor: F,
    rng: ChaCha8Rng,
}

impl<F: Fractor> MapGenerator<F> {
    pub fn new(map_size: Size, fractor: F, seed: u64) -> Self {
        let canvas = Canvas::with_size(map_size);
        let region = canvas.bounds();
        Self { canvas, region, fractor, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Restricts the fractor to part of the canvas.
    pub fn with_region(mut self, region: Rectangle) -> Result<Self, GenerationError> {
        let bounds = self.canvas.bounds();
        if !bounds.contains_rect(region) {
            return Err(GenerationError::BoundsViolation { rect: region, bounds });
        }
        self.region = region;
        Ok(self)
    }

    pub fn with_rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn region(&self) -> Rectangle {
        self.region
    }

    pub fn run(mut self, options: &GenerationOptions) -> Result<Map, GenerationError> {
        self.prepare(options)?;
        self.finish()
    }

    /// Everything `run` does short of finalizing, so the canvas can be inspected.
    pub fn prepare(&mut self, options: &GenerationOptions) -> Result<(), GenerationError> {
        self.populate()?;

        let anchors = if options.place_player { Some(self.place_player()?) } else { None };

        let portals =
            [(EntityKind::StairsUp, &options.up), (EntityKind::StairsDown, &options.down)];
        for (kind, destination) in portals {
            let Some(destination) = destination else {
                continue;
            };
            let point = self.place_portal(kind, destination)?;
            // Portals may land on an anchor point; this is kept as-is and only reported.
            if anchors.is_some_and(|anchors| anchors.contains(point)) {
                warn!("{kind:?} to {destination} overwrote the terrain under an anchor at {point}");
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Map, GenerationError> {
        let map = self.canvas.into_map()?;
        info!("finalized {} map with {} entities", map.size(), map.entity_count());
        Ok(map)
    }

    pub fn populate(&mut self) -> Result<(), GenerationError> {
        debug!("populating region {}", self.region);
        self.fractor.populate(&mut self.canvas, self.region, &mut self.rng)
    }

    /// Puts the player, a companion, and a piece of armor on three distinct floor points.
    pub fn place_player(&mut self) -> Result<Anchors, GenerationError> {
        let floor_points: Vec<Point> = self.canvas.floor_points().collect();
        let Some(points) = sample_distinct(&mut self.rng, &floor_points, 3) else {
            return Err(GenerationError::NotEnoughFloorPoints {
                purpose: "player",
                needed: 3,
                available: floor_points.len(),
            });
        };

        let anchors = Anchors { player: points[0], companion: points[1], item: points[2] };
        self.canvas.set_occupant(anchors.player, EntityKind::Player)?;
        self.canvas.set_occupant(anchors.companion, EntityKind::Salamango)?;
        self.canvas.push_item(anchors.item, EntityKind::Armor)?;
        debug!("placed anchors {anchors:?}");
        Ok(anchors)
    }

    /// Replaces the terrain of one random floor point with a portal to `destination`.
    pub fn place_portal(
        &mut self,
        kind: EntityKind,
        destination: &str,
    ) -> Result<Point, GenerationError> {
        let portal = Entity::portal(kind, destination)?;

        let floor_points: Vec<Point> = self.canvas.floor_points().collect();
        let Some(&point) = choose(&mut self.rng, &floor_points) else {
            return Err(GenerationError::NotEnoughFloorPoints {
                purpose: "portal",
                needed: 1,
                available: 0,
            });
        };

        self.canvas.set_terrain(point, portal)?;
        debug!("placed {kind:?} to {destination} at {point}");
        Ok(point)
    }
}

/// A `size` rectangle placed uniformly at random so that it stays inside `area`.
pub(crate) fn random_rect_in_rect(
    area: Rectangle,
    size: Size,
    rng: &mut ChaCha8Rng,
) -> Result<Rectangle, GenerationError> {
    if size.width > area.width() || size.height > area.height() {
        return Err(GenerationError::BoundsViolation {
            rect: size.to_rect(area.origin),
            bounds: area,
        });
    }
    let top = random_in_range(rng, area.top(), area.bottom() - size.height + 1);
    let left = random_in_range(rng, area.left(), area.right() - size.width + 1);
    Ok(Rectangle::new(Point::new(left, top), size))
}
