//! Skill definitions and oracle interface.
//!
//! A definition is shared, read-only data. Its behaviour is a
//! [`SkillLogic`] value: an interpreted program, the name of a statically
//! compiled handler, or the default attack. Definitions therefore survive any
//! serialization round trip and are re-resolved by id.

use strum::IntoStaticStr;

use crate::rules::RuleTemplate;
use crate::skill::SkillLogic;
use crate::state::SkillId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkillKind {
    Active,
    Passive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkillType {
    Normal,
    Super,
    Ultimate,
}

impl SkillType {
    /// Super and ultimate skills are paid with charge points.
    pub const fn is_charge(self) -> bool {
        matches!(self, SkillType::Super | SkillType::Ultimate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkillRange {
    Single,
    Area,
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    #[strum(serialize = "self")]
    SelfOnly,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub kind: SkillKind,
    pub skill_type: SkillType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_charges: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge_cost: Option<u32>,
    pub power_multiplier: f64,
    pub range: SkillRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub area_size: Option<u32>,
    pub action_point_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub logic: SkillLogic,
    /// Logic used by previews instead of `logic`, when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preview_logic: Option<SkillLogic>,
    /// Rule attached to the owning piece at battle start (passive skills).
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive_rule: Option<RuleTemplate>,
}

impl SkillDefinition {
    /// Active normal skill running the default attack.
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind: SkillKind::Active,
            skill_type: SkillType::Normal,
            cooldown_turns: 0,
            max_charges: 0,
            charge_cost: None,
            power_multiplier: 1.0,
            range: SkillRange::Single,
            area_size: None,
            action_point_cost: 1,
            logic: SkillLogic::Default,
            preview_logic: None,
            passive_rule: None,
        }
    }

    /// Minimal stand-in for a definition that could not be found.
    pub fn fallback(id: impl Into<SkillId>) -> Self {
        let id = id.into();
        let mut definition = Self::new(id.clone(), id.to_string());
        definition.description = "Substituted for a missing skill definition".to_owned();
        definition
    }

    pub fn with_type(mut self, skill_type: SkillType) -> Self {
        self.skill_type = skill_type;
        self
    }

    pub fn with_kind(mut self, kind: SkillKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    /// Stocks up to `charges` uses, one restored at each of the owner's turn
    /// starts.
    pub fn with_max_charges(mut self, charges: u32) -> Self {
        self.max_charges = charges;
        self
    }

    pub fn with_cost(mut self, action_points: u32) -> Self {
        self.action_point_cost = action_points;
        self
    }

    pub fn with_charge_cost(mut self, charge_points: u32) -> Self {
        self.charge_cost = Some(charge_points);
        self
    }

    pub fn with_power(mut self, multiplier: f64) -> Self {
        self.power_multiplier = multiplier;
        self
    }

    pub fn with_range(mut self, range: SkillRange, area_size: Option<u32>) -> Self {
        self.range = range;
        self.area_size = area_size;
        self
    }

    pub fn with_logic(mut self, logic: SkillLogic) -> Self {
        self.logic = logic;
        self
    }

    pub fn with_passive_rule(mut self, rule: RuleTemplate) -> Self {
        self.kind = SkillKind::Passive;
        self.passive_rule = Some(rule);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Charge points required to activate, if this is a charge skill.
    pub fn effective_charge_cost(&self, default_cost: u32) -> u32 {
        if self.skill_type.is_charge() {
            self.charge_cost.unwrap_or(default_cost)
        } else {
            0
        }
    }
}

/// Read-only skill definition repository.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition>;

    /// Every definition the repository knows about.
    fn all_skills(&self) -> Vec<SkillDefinition>;
}
