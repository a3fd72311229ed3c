use std::collections::BTreeSet;

use strum::IntoStaticStr;

use crate::config::BattleConfig;
use crate::state::Position;

/// Static map repository keyed by map id.
pub trait MapOracle: Send + Sync {
    fn map(&self, id: &str) -> Option<BoardMap>;

    /// Id used when a battle is created without an explicit map.
    fn default_map_id(&self) -> &str {
        "default"
    }
}

/// Canonical terrain classes for board tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    Floor,
    Wall,
    Spawn,
    Cover,
    Hole,
}

impl TileKind {
    pub const fn default_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Spawn | TileKind::Cover)
    }

    pub const fn default_bullet_passable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Spawn | TileKind::Hole)
    }
}

/// Immutable descriptor for one board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub walkable: bool,
    pub bullet_passable: bool,
    pub kind: TileKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_turn: Option<u32>,
}

impl Tile {
    /// Tile with walkability derived from its kind.
    pub fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self {
            id: format!("tile-{x}-{y}"),
            x,
            y,
            walkable: kind.default_walkable(),
            bullet_passable: kind.default_bullet_passable(),
            kind,
            height: None,
            damage_per_turn: None,
        }
    }

    pub fn with_damage_per_turn(mut self, damage: u32) -> Self {
        self.damage_per_turn = Some(damage);
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn hazard_damage(&self) -> u32 {
        self.damage_per_turn.unwrap_or(0)
    }
}

/// Errors raised when a map violates its layout invariants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map {id} has {actual} tiles, expected {expected}")]
    TileCount {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("map {id} has a tile outside its bounds at ({x}, {y})")]
    OutOfBounds { id: String, x: i32, y: i32 },

    #[error("map {id} has more than one tile at ({x}, {y})")]
    DuplicateTile { id: String, x: i32, y: i32 },

    #[error("map {id} has zero width or height")]
    Empty { id: String },

    #[error("map {id} is {width}x{height}, sides are limited to {max}")]
    TooLarge {
        id: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Grid of tiles. Built once per battle and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardMap {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major: index `y * width + x`.
    tiles: Vec<Tile>,
}

impl BoardMap {
    /// Longest accepted side, in tiles.
    pub const MAX_SIDE: u32 = 256;

    /// Checks `width` and `height` and returns them as coordinates together
    /// with the tile count they imply.
    pub fn check_dimensions(
        id: &str,
        width: u32,
        height: u32,
    ) -> Result<(i32, i32, usize), MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty { id: id.to_owned() });
        }
        let too_large = || MapError::TooLarge {
            id: id.to_owned(),
            width,
            height,
            max: Self::MAX_SIDE,
        };
        if width > Self::MAX_SIDE || height > Self::MAX_SIDE {
            return Err(too_large());
        }
        let w = i32::try_from(width).map_err(|_| too_large())?;
        let h = i32::try_from(height).map_err(|_| too_large())?;
        let count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or_else(too_large)?;
        Ok((w, h, count))
    }

    /// Validates and normalizes a tile list into row-major order.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        tiles: Vec<Tile>,
    ) -> Result<Self, MapError> {
        let id = id.into();
        let (cols, rows, expected) = Self::check_dimensions(&id, width, height)?;
        if tiles.len() != expected {
            return Err(MapError::TileCount {
                id,
                expected,
                actual: tiles.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for tile in &tiles {
            if tile.x < 0 || tile.y < 0 || tile.x >= cols || tile.y >= rows {
                return Err(MapError::OutOfBounds {
                    id,
                    x: tile.x,
                    y: tile.y,
                });
            }
            if !seen.insert((tile.y, tile.x)) {
                return Err(MapError::DuplicateTile {
                    id,
                    x: tile.x,
                    y: tile.y,
                });
            }
        }

        let mut tiles = tiles;
        tiles.sort_by_key(|t| (t.y, t.x));

        Ok(Self {
            id,
            name: name.into(),
            width,
            height,
            tiles,
        })
    }

    /// All-floor map.
    pub fn open(id: impl Into<String>, width: u32, height: u32) -> Self {
        let tiles = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Tile::new(x, y, TileKind::Floor)))
            .collect();
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            width,
            height,
            tiles,
        }
    }

    /// Generated map used when the requested map cannot be found.
    pub fn fallback() -> Self {
        let mut map = Self::open(
            "fallback",
            BattleConfig::FALLBACK_MAP_WIDTH,
            BattleConfig::FALLBACK_MAP_HEIGHT,
        );
        map.name = "Fallback Field".to_owned();
        map
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        if !self.contains(position) {
            return None;
        }
        let index = position.y as usize * self.width as usize + position.x as usize;
        self.tiles.get(index)
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(|t| t.walkable)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn spawn_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.kind == TileKind::Spawn)
    }

    pub fn has_hazards(&self) -> bool {
        self.tiles.iter().any(|t| t.hazard_damage() > 0)
    }

    /// Orthogonal neighbours inside the map.
    pub fn neighbours(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        [(0, 1), (0, -1), (1, 0), (-1, 0)]
            .into_iter()
            .map(move |(dx, dy)| Position::new(position.x + dx, position.y + dy))
            .filter(|p| self.contains(*p))
    }

    /// Replaces one tile, keeping the layout invariants.
    pub fn with_tile(mut self, tile: Tile) -> Self {
        if let Some(slot) = self
            .tiles
            .iter_mut()
            .find(|t| t.x == tile.x && t.y == tile.y)
        {
            *slot = tile;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_tile_count() {
        let tiles = vec![Tile::new(0, 0, TileKind::Floor)];
        let err = BoardMap::new("m", "m", 2, 1, tiles).unwrap_err();
        assert!(matches!(err, MapError::TileCount { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_coordinates() {
        let tiles = vec![Tile::new(0, 0, TileKind::Floor), Tile::new(0, 0, TileKind::Wall)];
        let err = BoardMap::new("m", "m", 2, 1, tiles).unwrap_err();
        assert!(matches!(err, MapError::DuplicateTile { x: 0, y: 0, .. }));
    }

    #[test]
    fn tiles_are_indexed_row_major_after_normalization() {
        let tiles = vec![
            Tile::new(1, 1, TileKind::Wall),
            Tile::new(0, 1, TileKind::Floor),
            Tile::new(1, 0, TileKind::Spawn),
            Tile::new(0, 0, TileKind::Floor),
        ];
        let map = BoardMap::new("m", "m", 2, 2, tiles).unwrap();
        assert_eq!(map.tile(Position::new(1, 1)).unwrap().kind, TileKind::Wall);
        assert!(!map.is_walkable(Position::new(1, 1)));
        assert!(map.is_walkable(Position::new(1, 0)));
        assert!(map.tile(Position::new(2, 0)).is_none());
        assert_eq!(map.spawn_tiles().count(), 1);
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_counting() {
        let err = BoardMap::new("m", "m", u32::MAX, u32::MAX, Vec::new()).unwrap_err();
        assert!(matches!(err, MapError::TooLarge { max: 256, .. }));

        let err = BoardMap::new("m", "m", 300, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, MapError::TooLarge { width: 300, height: 2, .. }));

        assert_eq!(BoardMap::check_dimensions("m", 8, 6), Ok((8, 6, 48)));
    }

    #[test]
    fn fallback_map_is_fully_walkable() {
        let map = BoardMap::fallback();
        assert_eq!(map.tiles().len(), 48);
        assert!(map.tiles().iter().all(|t| t.walkable));
    }
}
