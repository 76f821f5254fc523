//! A floor plan: a set of named maps generated from one run seed.
//!
//! [`FloorPlanConfig`] describes each map and the strategy that builds it. It round-trips through
//! TOML and JSON. [`FloorPlan::generate`] turns a validated config into finished maps, each seeded
//! from the run seed and its own name so that editing one map never reshuffles another.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FloorPlanError};
use crate::fractor::noise_terrain::{DEFAULT_OCTAVES, DEFAULT_RESOLUTION};
use crate::fractor::partition::DEFAULT_ROOM_SIZE;
use crate::fractor::{
    BinaryPartitionFractor, Fractor, GenerationOptions, MapGenerator, PerlinFractor,
};
use crate::geometry::Size;
use crate::map::Map;
use crate::random::derive_map_seed;

pub const DEFAULT_MAP_WIDTH: i32 = 80;
pub const DEFAULT_MAP_HEIGHT: i32 = 24;
const DEFAULT_MINIMUM_PARTITION: i32 = 10;

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

fn default_octaves() -> u32 {
    DEFAULT_OCTAVES
}

fn default_minimum_partition() -> i32 {
    DEFAULT_MINIMUM_PARTITION
}

fn default_room_width() -> i32 {
    DEFAULT_ROOM_SIZE.width
}

fn default_room_height() -> i32 {
    DEFAULT_ROOM_SIZE.height
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Perlin {
        #[serde(default = "default_resolution")]
        resolution: u32,
        #[serde(default = "default_octaves")]
        octaves: u32,
    },
    BinaryPartition {
        #[serde(default = "default_minimum_partition")]
        minimum_width: i32,
        #[serde(default = "default_minimum_partition")]
        minimum_height: i32,
        #[serde(default = "default_room_width")]
        room_width: i32,
        #[serde(default = "default_room_height")]
        room_height: i32,
    },
}

impl StrategyConfig {
    pub fn perlin() -> Self {
        StrategyConfig::Perlin { resolution: DEFAULT_RESOLUTION, octaves: DEFAULT_OCTAVES }
    }

    pub fn binary_partition() -> Self {
        StrategyConfig::BinaryPartition {
            minimum_width: DEFAULT_MINIMUM_PARTITION,
            minimum_height: DEFAULT_MINIMUM_PARTITION,
            room_width: DEFAULT_ROOM_SIZE.width,
            room_height: DEFAULT_ROOM_SIZE.height,
        }
    }

    /// Assumes the config has been validated.
    fn build(&self) -> Box<dyn Fractor> {
        match *self {
            StrategyConfig::Perlin { resolution, octaves } => Box::new(
                PerlinFractor::new().with_resolution(resolution).with_octaves(octaves),
            ),
            StrategyConfig::BinaryPartition {
                minimum_width,
                minimum_height,
                room_width,
                room_height,
            } => Box::new(
                BinaryPartitionFractor::new(Size::new(minimum_width, minimum_height))
                    .with_room_size(Size::new(room_width, room_height)),
            ),
        }
    }

    fn validate(&self, map: &str) -> Result<(), ConfigError> {
        match *self {
            StrategyConfig::Perlin { resolution, octaves } => {
                if resolution == 0 || octaves == 0 {
                    return Err(invalid(format!(
                        "map {map}: noise resolution and octaves must be at least 1"
                    )));
                }
            }
            StrategyConfig::BinaryPartition {
                minimum_width,
                minimum_height,
                room_width,
                room_height,
            } => {
                if minimum_width <= 0 || minimum_height <= 0 || room_width <= 0 || room_height <= 0
                {
                    return Err(invalid(format!(
                        "map {map}: partition and room dimensions must be positive"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub place_player: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
    pub strategy: StrategyConfig,
}

impl MapConfig {
    pub fn new(name: &str, strategy: StrategyConfig) -> Self {
        Self {
            name: name.to_owned(),
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            place_player: false,
            up: None,
            down: None,
            strategy,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            place_player: self.place_player,
            up: self.up.clone(),
            down: self.down.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlanConfig {
    pub starting_map: String,
    pub maps: Vec<MapConfig>,
}

impl Default for FloorPlanConfig {
    /// A noise-terrain surface with the player on it, above a partitioned dungeon level.
    fn default() -> Self {
        let surface = MapConfig {
            place_player: true,
            down: Some("map1".to_owned()),
            ..MapConfig::new("map0", StrategyConfig::perlin())
        };
        let dungeon = MapConfig {
            up: Some("map0".to_owned()),
            ..MapConfig::new("map1", StrategyConfig::binary_partition())
        };
        Self { starting_map: "map0".to_owned(), maps: vec![surface, dungeon] }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

impl FloorPlanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a `.json` file as JSON and anything else as TOML. The result is not validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let is_json = path.extension().is_some_and(|extension| extension == "json");
        if is_json { Self::from_json_str(&content) } else { Self::from_toml_str(&content) }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn map(&self, name: &str) -> Option<&MapConfig> {
        self.maps.iter().find(|map| map.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maps.is_empty() {
            return Err(invalid("floor plan has no maps".to_owned()));
        }

        let mut names = BTreeSet::new();
        for map in &self.maps {
            if !names.insert(map.name.as_str()) {
                return Err(invalid(format!("map {} is defined more than once", map.name)));
            }
        }

        if !names.contains(self.starting_map.as_str()) {
            return Err(invalid(format!("starting map {} is not defined", self.starting_map)));
        }

        for map in &self.maps {
            if map.width <= 0 || map.height <= 0 {
                return Err(invalid(format!(
                    "map {} has non-positive size {}x{}",
                    map.name, map.width, map.height
                )));
            }
            for destination in [&map.up, &map.down].into_iter().flatten() {
                if !names.contains(destination.as_str()) {
                    return Err(invalid(format!(
                        "map {} has a portal to undefined map {destination}",
                        map.name
                    )));
                }
            }
            map.strategy.validate(&map.name)?;
        }
        Ok(())
    }
}

/// Every map of a floor plan, in configuration order.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    starting_map: String,
    maps: Vec<(String, Map)>,
}

impl FloorPlan {
    pub fn generate(config: &FloorPlanConfig, run_seed: u64) -> Result<Self, FloorPlanError> {
        config.validate()?;

        let mut maps = Vec::with_capacity(config.maps.len());
        for map_config in &config.maps {
            let seed = derive_map_seed(run_seed, &map_config.name);
            debug!("generating map {} with seed {seed}", map_config.name);
            let map = MapGenerator::new(map_config.size(), map_config.strategy.build(), seed)
                .run(&map_config.options())
                .map_err(|source| FloorPlanError::Generation {
                    map: map_config.name.clone(),
                    source,
                })?;
            maps.push((map_config.name.clone(), map));
        }

        info!("generated floor plan of {} maps from run seed {run_seed}", maps.len());
        Ok(Self { starting_map: config.starting_map.clone(), maps })
    }

    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|(map_name, _)| map_name == name).map(|(_, map)| map)
    }

    pub fn starting_map_name(&self) -> &str {
        &self.starting_map
    }

    pub fn starting_map(&self) -> Option<&Map> {
        self.map(&self.starting_map)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.maps.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
