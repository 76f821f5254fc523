//! Failure conditions that abort a generation run or reject a floor-plan configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::{de, ser};

use crate::entity::EntityKind;
use crate::geometry::{Point, Rectangle, Size};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("rectangle {rect} is not contained in {bounds}")]
    BoundsViolation { rect: Rectangle, bounds: Rectangle },
    #[error("can't place {purpose}: needed {needed} floor points, found {available}")]
    NotEnoughFloorPoints { purpose: &'static str, needed: usize, available: usize },
    #[error("tile {point} already has a creature")]
    OccupiedTile { point: Point },
    #[error("relation endpoint is not on the map")]
    MissingEntity,
    #[error("{kind:?} can't carry a destination")]
    NotAPortal { kind: EntityKind },
}

impl GenerationError {
    pub(crate) fn out_of_bounds(point: Point, bounds: Rectangle) -> Self {
        GenerationError::BoundsViolation {
            rect: Rectangle::new(point, Size::new(1, 1)),
            bounds,
        }
    }
}

/// A floor-plan configuration that could not be read or does not describe a usable plan.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML floor plan")]
    Toml(#[from] de::Error),
    #[error("failed to write floor plan as TOML")]
    Serialize(#[from] ser::Error),
    #[error("invalid JSON floor plan")]
    Json(#[from] serde_json::Error),
    #[error("invalid floor plan: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FloorPlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to generate map {map}")]
    Generation {
        map: String,
        #[source]
        source: GenerationError,
    },
}
