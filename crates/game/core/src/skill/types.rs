use crate::combat::DamageType;
use crate::rules::RuleTemplate;
use crate::state::{PieceId, PieceInstance, Position, StatusEffectSpec};

/// Behaviour of a skill definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillLogic {
    /// Operations interpreted in order against the sandbox.
    Program(Vec<SkillOp>),
    /// Statically compiled handler looked up by name.
    Handler(String),
    /// Attack the nearest enemy for `attack × power_multiplier`.
    #[default]
    Default,
}

impl SkillLogic {
    pub fn handler_name(&self) -> Option<&str> {
        match self {
            SkillLogic::Handler(name) => Some(name),
            _ => None,
        }
    }
}

/// One step of an interpreted skill program.
///
/// Operations that act "on the target" use the target chosen by the most
/// recent `SelectTarget` or `Pick`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillOp {
    /// Uses the target supplied with the action, or asks the caller for one.
    SelectTarget(TargetRequest),

    /// Chooses a piece automatically. Ends the program unsuccessfully if no
    /// piece qualifies.
    Pick {
        selector: Selector,
        #[cfg_attr(feature = "serde", serde(default))]
        range: Option<u32>,
    },

    Damage {
        amount: Amount,
        #[cfg_attr(feature = "serde", serde(default))]
        damage_type: DamageType,
    },

    Heal { amount: Amount },

    /// Damages every enemy within `radius` of the target (or the caster when no
    /// target is selected).
    AreaDamage {
        amount: Amount,
        #[cfg_attr(feature = "serde", serde(default))]
        damage_type: DamageType,
        radius: u32,
    },

    /// Heals the caster and every ally within `radius` of the caster.
    AreaHeal { amount: Amount, radius: u32 },

    ApplyStatus {
        status: StatusEffectSpec,
        #[cfg_attr(feature = "serde", serde(default))]
        uses: Option<i32>,
    },

    ApplyStatusToSelf {
        status: StatusEffectSpec,
        #[cfg_attr(feature = "serde", serde(default))]
        uses: Option<i32>,
    },

    /// Removes every debuff from the target.
    Cleanse,

    /// Moves the caster to the selected cell.
    Teleport,

    /// Attaches a rule to the caster.
    AttachRule(RuleTemplate),

    /// Grants charge points to the caster's owner.
    GrantChargePoints(u32),

    Message(String),
}

/// Numeric formula for damage and healing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Amount {
    Flat(f64),
    /// Caster's effective attack × the skill's power multiplier × `factor`.
    CasterAttack { factor: f64 },
    TargetMaxHp { percent: f64 },
    TargetMissingHp { percent: f64 },
    Sum(Vec<Amount>),
}

impl Amount {
    /// Plain `attack × power_multiplier`.
    pub fn attack() -> Self {
        Amount::CasterAttack { factor: 1.0 }
    }

    /// Evaluates the formula. `caster_power` is attack × power multiplier.
    pub fn evaluate(&self, caster_power: f64, target: Option<&PieceInstance>) -> f64 {
        match self {
            Amount::Flat(value) => *value,
            Amount::CasterAttack { factor } => caster_power * factor,
            Amount::TargetMaxHp { percent } => {
                target.map_or(0.0, |t| f64::from(t.max_hp) * percent / 100.0)
            }
            Amount::TargetMissingHp { percent } => {
                target.map_or(0.0, |t| f64::from(t.missing_hp()) * percent / 100.0)
            }
            Amount::Sum(parts) => parts
                .iter()
                .map(|part| part.evaluate(caster_power, target))
                .sum(),
        }
    }
}

/// Automatic target choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Selector {
    Caster,
    /// The piece supplied with the action.
    Supplied,
    NearestEnemy,
    LowestHpEnemy,
    HighestAttackEnemy,
    /// Excludes the caster.
    NearestAlly,
    /// Excludes the caster.
    LowestHpAlly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetKind {
    Piece,
    Grid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetFilter {
    Enemy,
    Ally,
    Any,
    EmptyCell,
}

/// What a skill needs the caller to pick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRequest {
    pub target_type: TargetKind,
    /// Maximum Manhattan distance from the caster.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: Option<u32>,
    pub filter: TargetFilter,
}

impl TargetRequest {
    pub fn enemy(range: Option<u32>) -> Self {
        Self {
            target_type: TargetKind::Piece,
            range,
            filter: TargetFilter::Enemy,
        }
    }

    pub fn ally(range: Option<u32>) -> Self {
        Self {
            target_type: TargetKind::Piece,
            range,
            filter: TargetFilter::Ally,
        }
    }

    pub fn empty_cell(range: Option<u32>) -> Self {
        Self {
            target_type: TargetKind::Grid,
            range,
            filter: TargetFilter::EmptyCell,
        }
    }
}

/// A resolved target: a piece or a board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillTarget {
    Piece(PieceId),
    Cell(Position),
}
