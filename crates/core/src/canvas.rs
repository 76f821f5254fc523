//! The three-layer grid a generation run draws on before it becomes a concrete map.

use log::debug;
use rand_chacha::ChaCha8Rng;

use crate::entity::{Descriptor, EntityKind};
use crate::error::GenerationError;
use crate::geometry::{Point, Rectangle, Size};
use crate::map::{Map, MapSink};
use crate::random::choose;

/// Terrain every cell starts with.
pub const DEFAULT_TERRAIN: EntityKind = EntityKind::CaveWall;

/// Room interiors draw from this list uniformly, so cut grass is twice as likely.
const ROOM_FLOOR_CHOICES: [EntityKind; 4] =
    [EntityKind::Floor, EntityKind::CutGrass, EntityKind::CutGrass, EntityKind::Grass];

#[derive(Clone, Debug)]
pub struct Canvas {
    bounds: Rectangle,
    terrain: Vec<Descriptor>,
    items: Vec<Vec<Descriptor>>,
    occupants: Vec<Option<Descriptor>>,
}

impl Canvas {
    pub fn new(bounds: Rectangle) -> Self {
        let cells = bounds.area();
        Self {
            bounds,
            terrain: vec![Descriptor::Kind(DEFAULT_TERRAIN); cells],
            items: vec![Vec::new(); cells],
            occupants: vec![None; cells],
        }
    }

    /// A canvas whose top-left corner is the origin.
    pub fn with_size(size: Size) -> Self {
        Self::new(size.to_rect(Point::origin()))
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn terrain(&self, point: Point) -> Option<&Descriptor> {
        self.bounds.index_of(point).map(|index| &self.terrain[index])
    }

    pub fn items(&self, point: Point) -> Option<&[Descriptor]> {
        self.bounds.index_of(point).map(|index| self.items[index].as_slice())
    }

    pub fn occupant(&self, point: Point) -> Option<&Descriptor> {
        self.bounds.index_of(point).and_then(|index| self.occupants[index].as_ref())
    }

    pub fn set_terrain(
        &mut self,
        point: Point,
        terrain: impl Into<Descriptor>,
    ) -> Result<(), GenerationError> {
        let index = self.checked_index(point)?;
        self.terrain[index] = terrain.into();
        Ok(())
    }

    pub fn push_item(
        &mut self,
        point: Point,
        item: impl Into<Descriptor>,
    ) -> Result<(), GenerationError> {
        let index = self.checked_index(point)?;
        self.items[index].push(item.into());
        Ok(())
    }

    /// Puts `occupant` on `point`, replacing whatever stood there.
    pub fn set_occupant(
        &mut self,
        point: Point,
        occupant: impl Into<Descriptor>,
    ) -> Result<(), GenerationError> {
        let index = self.checked_index(point)?;
        self.occupants[index] = Some(occupant.into());
        Ok(())
    }

    /// Fills `rect` with walkable terrain, then frames its border with walls.
    pub fn draw_room(
        &mut self,
        rect: Rectangle,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError> {
        if !self.bounds.contains_rect(rect) {
            return Err(GenerationError::BoundsViolation { rect, bounds: self.bounds });
        }

        for point in rect.iter_points() {
            let kind = choose(rng, &ROOM_FLOOR_CHOICES).copied().unwrap_or(EntityKind::Floor);
            self.set_terrain(point, kind)?;
        }

        for x in rect.range_width() {
            self.set_terrain(Point::new(x, rect.top()), EntityKind::Wall)?;
            self.set_terrain(Point::new(x, rect.bottom()), EntityKind::Wall)?;
        }
        // Corners get written a second time here.
        for y in rect.range_height() {
            self.set_terrain(Point::new(rect.left(), y), EntityKind::Wall)?;
            self.set_terrain(Point::new(rect.right(), y), EntityKind::Wall)?;
        }

        debug!("drew room {rect}");
        Ok(())
    }

    /// Points whose terrain is exactly plain floor, in scan order. Occupied points are included.
    pub fn floor_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.bounds
            .iter_points()
            .zip(self.terrain.iter())
            .filter(|(_, terrain)| terrain.is_kind(EntityKind::Floor))
            .map(|(point, _)| point)
    }

    /// Materializes every descriptor into `sink`: terrain, then items in order, then the occupant.
    pub fn finalize(self, sink: &mut impl MapSink) -> Result<(), GenerationError> {
        let cells = self
            .bounds
            .iter_points()
            .zip(self.terrain)
            .zip(self.items)
            .zip(self.occupants);

        for (((point, terrain), items), occupant) in cells {
            sink.place(terrain.materialize(), point)?;
            for item in items {
                sink.place(item.materialize(), point)?;
            }
            if let Some(occupant) = occupant {
                sink.place(occupant.materialize(), point)?;
            }
        }
        Ok(())
    }

    pub fn into_map(self) -> Result<Map, GenerationError> {
        let mut map = Map::with_bounds(self.bounds);
        self.finalize(&mut map)?;
        Ok(map)
    }

    fn checked_index(&self, point: Point) -> Result<usize, GenerationError> {
        self.bounds
            .index_of(point)
            .ok_or_else(|| GenerationError::out_of_bounds(point, self.bounds))
    }
}
