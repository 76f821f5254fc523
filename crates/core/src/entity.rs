//! Entity kinds, concrete entities, and the lazy descriptors stored in canvas cells.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Which slot of a tile an entity occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Architecture,
    Item,
    Creature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    CaveWall,
    Wall,
    Floor,
    Dirt,
    CutGrass,
    Grass,
    Tree,
    StairsUp,
    StairsDown,
    Player,
    Salamango,
    Armor,
}

impl EntityKind {
    pub const fn layer(self) -> Layer {
        match self {
            EntityKind::CaveWall
            | EntityKind::Wall
            | EntityKind::Floor
            | EntityKind::Dirt
            | EntityKind::CutGrass
            | EntityKind::Grass
            | EntityKind::Tree
            | EntityKind::StairsUp
            | EntityKind::StairsDown => Layer::Architecture,
            EntityKind::Armor => Layer::Item,
            EntityKind::Player | EntityKind::Salamango => Layer::Creature,
        }
    }

    pub const fn is_portal(self) -> bool {
        matches!(self, EntityKind::StairsUp | EntityKind::StairsDown)
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, EntityKind::CaveWall | EntityKind::Wall)
    }

    pub const fn glyph(self) -> char {
        match self {
            EntityKind::CaveWall => '#',
            EntityKind::Wall => '#',
            EntityKind::Floor => '.',
            EntityKind::Dirt => ':',
            EntityKind::CutGrass => ',',
            EntityKind::Grass => '"',
            EntityKind::Tree => 'T',
            EntityKind::StairsUp => '<',
            EntityKind::StairsDown => '>',
            EntityKind::Player => '@',
            EntityKind::Salamango => 's',
            EntityKind::Armor => '[',
        }
    }

    /// Stable byte used when fingerprinting maps. Never reorder.
    pub const fn code(self) -> u8 {
        match self {
            EntityKind::CaveWall => 0,
            EntityKind::Wall => 1,
            EntityKind::Floor => 2,
            EntityKind::Dirt => 3,
            EntityKind::CutGrass => 4,
            EntityKind::Grass => 5,
            EntityKind::Tree => 6,
            EntityKind::StairsUp => 7,
            EntityKind::StairsDown => 8,
            EntityKind::Player => 9,
            EntityKind::Salamango => 10,
            EntityKind::Armor => 11,
        }
    }

    pub fn instantiate(self) -> Entity {
        Entity { kind: self, destination: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    destination: Option<String>,
}

impl Entity {
    /// Builds a portal that already knows which map it leads to.
    pub fn portal(kind: EntityKind, destination: &str) -> Result<Self, GenerationError> {
        let mut entity = kind.instantiate();
        entity.set_destination(destination)?;
        Ok(entity)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn set_destination(&mut self, destination: &str) -> Result<(), GenerationError> {
        if !self.kind.is_portal() {
            return Err(GenerationError::NotAPortal { kind: self.kind });
        }
        self.destination = Some(destination.to_owned());
        Ok(())
    }
}

/// What a canvas cell holds until the canvas is finalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    /// Instantiated fresh at finalize time.
    Kind(EntityKind),
    /// Placed verbatim at finalize time.
    Instance(Entity),
}

impl Descriptor {
    pub fn kind(&self) -> EntityKind {
        match self {
            Descriptor::Kind(kind) => *kind,
            Descriptor::Instance(entity) => entity.kind(),
        }
    }

    pub fn is_kind(&self, kind: EntityKind) -> bool {
        matches!(self, Descriptor::Kind(own) if *own == kind)
    }

    pub fn materialize(self) -> Entity {
        match self {
            Descriptor::Kind(kind) => kind.instantiate(),
            Descriptor::Instance(entity) => entity,
        }
    }
}

impl From<EntityKind> for Descriptor {
    fn from(kind: EntityKind) -> Self {
        Descriptor::Kind(kind)
    }
}

impl From<Entity> for Descriptor {
    fn from(entity: Entity) -> Self {
        Descriptor::Instance(entity)
    }
}
