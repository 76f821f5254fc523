pub mod canvas;
pub mod entity;
pub mod error;
pub mod floor_plan;
pub mod fractor;
pub mod geometry;
pub mod map;
pub mod noise_field;
pub mod random;
pub mod relation;

pub use canvas::Canvas;
pub use entity::{Descriptor, Entity, EntityKind, Layer};
pub use error::{ConfigError, FloorPlanError, GenerationError};
pub use floor_plan::{FloorPlan, FloorPlanConfig, MapConfig, StrategyConfig};
pub use fractor::{
    Anchors, BinaryPartitionFractor, Fractor, GenerationOptions, MapGenerator, PerlinFractor,
};
pub use geometry::{Direction, Edge, Point, Rectangle, Size};
pub use map::{EntityId, Map, MapSink, Tile};
pub use random::derive_map_seed;
pub use relation::{Relation, RelationId, RelationKind, Relations};
