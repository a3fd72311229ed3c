//! Map catalog served through [`tactics_core::MapOracle`].
use std::collections::BTreeMap;

use tactics_core::{BoardMap, MapOracle};

/// MapOracle implementation with static map data.
///
/// Maps are copied into each battle at creation; later catalog changes never
/// affect a running battle.
pub struct MapOracleImpl {
    maps: BTreeMap<String, BoardMap>,
    default_map: String,
}

impl MapOracleImpl {
    pub fn new(maps: impl IntoIterator<Item = BoardMap>, default_map: impl Into<String>) -> Self {
        Self {
            maps: maps.into_iter().map(|map| (map.id.clone(), map)).collect(),
            default_map: default_map.into(),
        }
    }

    /// Creates a catalog holding one open map, used by tests.
    pub fn test_map(width: u32, height: u32) -> Self {
        Self::new([BoardMap::open("test", width, height)], "test")
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }
}

impl MapOracle for MapOracleImpl {
    fn map(&self, id: &str) -> Option<BoardMap> {
        self.maps.get(id).cloned()
    }

    fn default_map_id(&self) -> &str {
        &self.default_map
    }
}
