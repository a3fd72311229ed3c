//! Piece template definitions and oracle interface.
//!
//! Templates are design-time, read-only descriptions of a piece type. The
//! `PieceOracle` trait lets the bootstrap resolve the templates players picked.

use strum::IntoStaticStr;

use crate::state::SkillId;

/// Side a piece fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Faction {
    Red,
    Blue,
    Neutral,
}

impl Faction {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Faction assigned to the player at `index` in the battle's player list.
    pub fn for_player_index(index: usize) -> Self {
        if index == 0 { Faction::Red } else { Faction::Blue }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceStats {
    pub max_hp: u32,
    pub attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: i32,
    /// `0` means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub move_range: u32,
}

/// Skill granted by a template, with the charges it starts with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateSkill {
    pub skill_id: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_charges: u32,
}

impl TemplateSkill {
    pub fn new(skill_id: impl Into<SkillId>) -> Self {
        Self {
            skill_id: skill_id.into(),
            initial_charges: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceTemplate {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    pub stats: PieceStats,
    pub skills: Vec<TemplateSkill>,
    #[cfg_attr(feature = "serde", serde(default = "default_selectable"))]
    pub selectable: bool,
}

#[cfg(feature = "serde")]
fn default_selectable() -> bool {
    true
}

impl PieceTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction,
            stats: PieceStats {
                max_hp: 100,
                attack: 10,
                defense: 0,
                move_range: 0,
            },
            skills: Vec::new(),
            selectable: true,
        }
    }

    pub fn with_stats(mut self, max_hp: u32, attack: i32, defense: i32, move_range: u32) -> Self {
        self.stats = PieceStats {
            max_hp,
            attack,
            defense,
            move_range,
        };
        self
    }

    pub fn with_skill(mut self, skill_id: impl Into<SkillId>) -> Self {
        self.skills.push(TemplateSkill::new(skill_id));
        self
    }
}

/// Read-only piece template repository.
pub trait PieceOracle: Send + Sync {
    fn all_pieces(&self) -> Vec<PieceTemplate>;

    fn piece(&self, id: &str) -> Option<PieceTemplate> {
        self.all_pieces().into_iter().find(|t| t.id == id)
    }
}
