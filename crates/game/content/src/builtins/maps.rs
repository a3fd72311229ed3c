use tactics_core::{BoardMap, Tile, TileKind};

use super::DEFAULT_MAP_ID;

pub(super) fn all() -> Vec<BoardMap> {
    vec![training_grounds(), lava_rift()]
}

/// 8x6 field with two walls and some cover in the middle rows.
fn training_grounds() -> BoardMap {
    let mut map = BoardMap::open(DEFAULT_MAP_ID, 8, 6);
    map.name = "Training Grounds".to_owned();
    let map = (1..=6).fold(map, |map, x| {
        map.with_tile(Tile::new(x, 0, TileKind::Spawn))
            .with_tile(Tile::new(x, 5, TileKind::Spawn))
    });
    map.with_tile(Tile::new(3, 2, TileKind::Wall))
        .with_tile(Tile::new(4, 3, TileKind::Wall))
        .with_tile(Tile::new(1, 2, TileKind::Cover))
        .with_tile(Tile::new(6, 3, TileKind::Cover))
}

/// 8x8 map split by a chasm, with burning ground on both flanks.
fn lava_rift() -> BoardMap {
    let mut map = BoardMap::open("lava_rift", 8, 8);
    map.name = "Lava Rift".to_owned();
    let map = (2..=5).fold(map, |map, x| {
        map.with_tile(Tile::new(x, 0, TileKind::Spawn))
            .with_tile(Tile::new(x, 7, TileKind::Spawn))
            .with_tile(Tile::new(x, 3, TileKind::Hole))
            .with_tile(Tile::new(x, 4, TileKind::Hole))
    });
    [(0, 3), (0, 4), (7, 3), (7, 4)]
        .into_iter()
        .fold(map, |map, (x, y)| {
            map.with_tile(Tile::new(x, y, TileKind::Floor).with_damage_per_turn(2))
        })
}
