//! Content shipped with the game.
//!
//! The built-in catalog is complete on its own: every template references
//! skills defined here, and every handler-backed skill or rule names a
//! handler registered by [`default_handlers`].
mod handlers;
mod maps;
mod pieces;
mod skills;

pub use handlers::default_handlers;

use std::collections::BTreeSet;

use tactics_core::{BattleConfig, BoardMap, PieceTemplate, SkillDefinition, SkillId};

/// Id of the map used when a battle does not name one.
pub const DEFAULT_MAP_ID: &str = "training_grounds";

/// A complete set of battle content.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBundle {
    pub maps: Vec<BoardMap>,
    pub pieces: Vec<PieceTemplate>,
    pub skills: Vec<SkillDefinition>,
    pub config: BattleConfig,
    pub default_map: String,
}

impl ContentBundle {
    pub fn builtin() -> Self {
        Self {
            maps: maps::all(),
            pieces: pieces::all(),
            skills: skills::all(),
            config: BattleConfig::default(),
            default_map: DEFAULT_MAP_ID.to_owned(),
        }
    }

    pub fn map(&self, id: &str) -> Option<&BoardMap> {
        self.maps.iter().find(|map| map.id == id)
    }

    pub fn piece(&self, id: &str) -> Option<&PieceTemplate> {
        self.pieces.iter().find(|template| template.id == id)
    }

    pub fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills.iter().find(|skill| &skill.id == id)
    }

    /// Ids of selectable templates, in catalog order.
    pub fn selectable_piece_ids(&self) -> Vec<String> {
        self.pieces
            .iter()
            .filter(|template| template.selectable)
            .map(|template| template.id.clone())
            .collect()
    }

    /// Skill ids referenced by templates but not defined in the catalog.
    pub fn missing_skills(&self) -> BTreeSet<SkillId> {
        self.pieces
            .iter()
            .flat_map(|template| template.skills.iter())
            .map(|skill| skill.skill_id.clone())
            .filter(|id| self.skill(id).is_none())
            .collect()
    }

    /// Replaces entries with the same id and appends new ones.
    pub fn merge(&mut self, other: ContentBundle) {
        for map in other.maps {
            upsert(&mut self.maps, map, |a, b| a.id == b.id);
        }
        for piece in other.pieces {
            upsert(&mut self.pieces, piece, |a, b| a.id == b.id);
        }
        for skill in other.skills {
            upsert(&mut self.skills, skill, |a, b| a.id == b.id);
        }
        self.config = other.config;
        self.default_map = other.default_map;
    }
}

impl Default for ContentBundle {
    fn default() -> Self {
        Self::builtin()
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}
