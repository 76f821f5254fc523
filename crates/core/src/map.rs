//! The finished map that a canvas is finalized into.
//!
//! Entities are owned by a slot map; tiles and relations only hold [`EntityId`] handles, so a
//! handle to a removed entity simply resolves to nothing.

use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::entity::{Entity, EntityKind, Layer};
use crate::error::GenerationError;
use crate::geometry::{Point, Rectangle, Size};
use crate::relation::{Relation, RelationId, RelationKind, Relations};

new_key_type! {
    pub struct EntityId;
}

/// Receives concrete entities from [`Canvas::finalize`](crate::canvas::Canvas::finalize).
pub trait MapSink {
    fn place(&mut self, entity: Entity, point: Point) -> Result<(), GenerationError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub architecture: Option<EntityId>,
    pub items: Vec<EntityId>,
    pub creature: Option<EntityId>,
}

impl Tile {
    /// Architecture first, then items in placement order, then the creature.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.architecture.into_iter().chain(self.items.iter().copied()).chain(self.creature)
    }
}

#[derive(Clone, Debug)]
pub struct Map {
    bounds: Rectangle,
    entities: SlotMap<EntityId, Entity>,
    positions: SecondaryMap<EntityId, Point>,
    tiles: Vec<Tile>,
    relations: Relations,
}

impl Map {
    pub fn new(size: Size) -> Self {
        Self::with_bounds(size.to_rect(Point::origin()))
    }

    pub fn with_bounds(bounds: Rectangle) -> Self {
        Self {
            bounds,
            entities: SlotMap::with_key(),
            positions: SecondaryMap::new(),
            tiles: vec![Tile::default(); bounds.area()],
            relations: Relations::default(),
        }
    }

    pub fn size(&self) -> Size {
        self.bounds.size
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains_point(point)
    }

    pub fn tile(&self, point: Point) -> Option<&Tile> {
        self.bounds.index_of(point).map(|index| &self.tiles[index])
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn find(&self, id: EntityId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn architecture_at(&self, point: Point) -> Option<&Entity> {
        self.tile(point).and_then(|tile| tile.architecture).and_then(|id| self.entity(id))
    }

    pub fn creature_at(&self, point: Point) -> Option<&Entity> {
        self.tile(point).and_then(|tile| tile.creature).and_then(|id| self.entity(id))
    }

    pub fn items_at(&self, point: Point) -> impl Iterator<Item = &Entity> + '_ {
        self.tile(point)
            .into_iter()
            .flat_map(|tile| tile.items.iter())
            .filter_map(|&id| self.entity(id))
    }

    /// Handles of every entity of `kind`, in scan order.
    pub fn find_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.tiles
            .iter()
            .flat_map(Tile::entity_ids)
            .filter(|&id| self.entities.get(id).is_some_and(|entity| entity.kind() == kind))
            .collect()
    }

    pub fn player(&self) -> Option<EntityId> {
        self.find_kind(EntityKind::Player).into_iter().next()
    }

    /// Portal architecture in scan order.
    pub fn portals(&self) -> Vec<(Point, &Entity)> {
        self.bounds
            .iter_points()
            .filter_map(|point| {
                self.architecture_at(point)
                    .filter(|entity| entity.kind().is_portal())
                    .map(|entity| (point, entity))
            })
            .collect()
    }

    pub fn insert(&mut self, entity: Entity, point: Point) -> Result<EntityId, GenerationError> {
        let index = self
            .bounds
            .index_of(point)
            .ok_or_else(|| GenerationError::out_of_bounds(point, self.bounds))?;

        let layer = entity.kind().layer();
        if layer == Layer::Creature && self.tiles[index].creature.is_some() {
            return Err(GenerationError::OccupiedTile { point });
        }

        let id = self.entities.insert(entity);
        self.positions.insert(id, point);
        let tile = &mut self.tiles[index];
        match layer {
            Layer::Architecture => {
                if let Some(previous) = tile.architecture.replace(id) {
                    self.entities.remove(previous);
                    self.positions.remove(previous);
                    self.relations.forget(previous);
                }
            }
            Layer::Item => tile.items.push(id),
            Layer::Creature => tile.creature = Some(id),
        }
        Ok(id)
    }

    /// Takes an entity off the map and drops every relation that names it.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let point = self.positions.remove(id)?;
        if let Some(index) = self.bounds.index_of(point) {
            let tile = &mut self.tiles[index];
            if tile.architecture == Some(id) {
                tile.architecture = None;
            }
            if tile.creature == Some(id) {
                tile.creature = None;
            }
            tile.items.retain(|&item| item != id);
        }
        self.relations.forget(id);
        self.entities.remove(id)
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Records a relation between two entities that are both on the map.
    pub fn relate(
        &mut self,
        kind: RelationKind,
        from: EntityId,
        to: EntityId,
    ) -> Result<RelationId, GenerationError> {
        self.relations.attach(kind, from, to, &self.entities)
    }

    pub fn unrelate(&mut self, id: RelationId) -> Option<Relation> {
        self.relations.detach(id)
    }

    /// Stable byte encoding of every tile, for fingerprinting.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.bounds.width() as u32).to_le_bytes());
        bytes.extend((self.bounds.height() as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(u8::from(tile.architecture.is_some()));
            bytes.extend((tile.items.len() as u32).to_le_bytes());
            bytes.push(u8::from(tile.creature.is_some()));
            for id in tile.entity_ids() {
                let Some(entity) = self.entities.get(id) else {
                    continue;
                };
                bytes.push(entity.kind().code());
                let destination = entity.destination().unwrap_or_default();
                bytes.extend((destination.len() as u32).to_le_bytes());
                bytes.extend(destination.as_bytes());
            }
        }
        bytes
    }

    /// One line per row; creatures draw over items, items over architecture.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.bounds.area() + self.bounds.height() as usize);
        for y in self.bounds.range_height() {
            for x in self.bounds.range_width() {
                let point = Point::new(x, y);
                let glyph = self
                    .creature_at(point)
                    .or_else(|| self.items_at(point).last())
                    .or_else(|| self.architecture_at(point))
                    .map_or(' ', |entity| entity.kind().glyph());
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

impl MapSink for Map {
    fn place(&mut self, entity: Entity, point: Point) -> Result<(), GenerationError> {
        self.insert(entity, point).map(|_| ())
    }
}
