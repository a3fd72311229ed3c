//! Map data loader.
//!
//! Map files list only the tiles that differ from plain floor; the loader
//! fills the rest of the grid and validates the result.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{BoardMap, Tile, TileKind};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    /// Defaults to the file stem.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    dimensions: (u32, u32),
    #[serde(default)]
    tiles: Vec<TileRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TileRon {
    x: i32,
    y: i32,
    kind: TileKind,
    #[serde(default)]
    height: Option<i32>,
    #[serde(default)]
    damage_per_turn: Option<u32>,
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load one map from a RON file.
    pub fn load(path: &Path) -> LoadResult<BoardMap> {
        let content = read_file(path)?;
        let fallback_id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("map");
        Self::parse(&content, fallback_id)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Load every `*.ron` map in a directory, sorted by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<BoardMap>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read map directory {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let maps = paths
            .iter()
            .map(|path| Self::load(path))
            .collect::<LoadResult<Vec<_>>>()?;
        super::ensure_unique("map", maps.iter().map(|m| m.id.as_str()))?;
        Ok(maps)
    }

    pub fn parse(content: &str, fallback_id: &str) -> LoadResult<BoardMap> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let id = data.id.unwrap_or_else(|| fallback_id.to_owned());
        let (width, height) = data.dimensions;
        let (cols, rows, _) = BoardMap::check_dimensions(&id, width, height)
            .map_err(|e| anyhow::anyhow!("Invalid map: {}", e))?;

        // Fill entire map with default Floor tiles first
        let mut tiles: Vec<Tile> = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| Tile::new(x, y, TileKind::Floor)))
            .collect();

        // Then override with explicitly defined tiles
        for entry in data.tiles {
            let mut tile = Tile::new(entry.x, entry.y, entry.kind);
            tile.height = entry.height;
            tile.damage_per_turn = entry.damage_per_turn;
            match tiles.iter_mut().find(|t| t.x == entry.x && t.y == entry.y) {
                Some(slot) => *slot = tile,
                None => tiles.push(tile),
            }
        }

        let name = data.name.unwrap_or_else(|| id.clone());
        BoardMap::new(id, name, width, height, tiles)
            .map_err(|e| anyhow::anyhow!("Invalid map: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::Position;

    const PIT: &str = r#"(
        name: Some("The Pit"),
        dimensions: (6, 4),
        tiles: [
            (x: 0, y: 0, kind: spawn),
            (x: 5, y: 3, kind: spawn),
            (x: 2, y: 1, kind: wall),
            (x: 3, y: 2, kind: floor, damage_per_turn: Some(1)),
        ],
    )"#;

    #[test]
    fn unlisted_tiles_are_floor() {
        let map = MapLoader::parse(PIT, "pit").expect("valid map");
        assert_eq!(map.id, "pit");
        assert_eq!(map.name, "The Pit");
        assert_eq!(map.tiles().len(), 24);
        assert!(!map.is_walkable(Position::new(2, 1)));
        assert!(map.is_walkable(Position::new(4, 1)));
        assert_eq!(map.spawn_tiles().count(), 2);
        assert!(map.has_hazards());
    }

    #[test]
    fn tiles_outside_the_grid_are_rejected() {
        let content = "(dimensions: (2, 2), tiles: [(x: 5, y: 0, kind: wall)])";
        let err = MapLoader::parse(content, "broken").expect_err("out of bounds");
        assert!(err.to_string().contains("Invalid map"));
    }

    #[test]
    fn huge_dimensions_are_rejected_before_filling() {
        let content = "(dimensions: (4000000000, 4000000000))";
        let err = MapLoader::parse(content, "vast").expect_err("too large");
        assert!(err.to_string().contains("sides are limited to 256"));
    }

    #[test]
    fn directory_loading_uses_file_stems() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pit.ron"), PIT).expect("write");
        std::fs::write(dir.path().join("small.ron"), "(dimensions: (3, 3))").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let maps = MapLoader::load_dir(dir.path()).expect("maps load");
        let ids: Vec<_> = maps.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["pit", "small"]);
    }
}
