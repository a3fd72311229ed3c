use std::collections::BTreeMap;

use strum::{EnumIter, IntoStaticStr};

use crate::state::{PieceId, RuleId, SkillId, StatusEffectSpec, StatusId};

/// Named integer parameters handed to a native rule handler.
pub type RuleParams = BTreeMap<String, i64>;

/// Battle events rules can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum TriggerType {
    BeginTurn,
    EndTurn,
    AfterMove,
    BeforeSkillUsed,
    AfterSkillUsed,
    /// Source is the victim, target the attacker.
    BeforeDamageTaken,
    /// Source is the attacker, target the victim.
    AfterDamageDealt,
    /// Source is the victim, target the attacker.
    AfterDamageTaken,
    /// Source is the killer, target the victim.
    AfterPieceKilled,
    AfterHealDealt,
    AfterStatusApplied,
    AfterStatusRemoved,
}

impl TriggerType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Cooldown, use-count and lifetime limits of a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleLimits {
    pub max_uses: Option<u32>,
    pub cooldown_turns: u32,
    pub current_cooldown: u32,
    pub uses: u32,
    /// Lifetime in `beginTurn` steps; `None` lives for the whole battle.
    pub duration: Option<u32>,
    pub remaining_duration: Option<u32>,
}

impl RuleLimits {
    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    pub fn with_duration(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self.remaining_duration = Some(turns);
        self
    }

    /// Off cooldown, below its use cap and not expired.
    pub fn is_live(&self) -> bool {
        self.current_cooldown == 0
            && self.max_uses.is_none_or(|max| self.uses < max)
            && !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_duration == Some(0)
    }

    pub fn record_use(&mut self) {
        self.uses = self.uses.saturating_add(1);
        self.current_cooldown = self.cooldown_turns;
    }

    /// One `beginTurn` step: cooldown and remaining lifetime go down by one.
    pub fn tick(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
        if let Some(remaining) = self.remaining_duration.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

/// What a rule does when it fires. Pure data, interpreted by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleEffect {
    /// Drives one status effect on the rule's owner.
    StatusTick { status_id: StatusId },

    /// Nullifies the triggering damage or skill.
    BlockDamage {
        #[cfg_attr(feature = "serde", serde(default))]
        message: Option<String>,
    },

    /// Charge points for the owner of the rule's piece.
    GrantChargePoints { amount: u32 },

    /// Heals the context source.
    HealSource { amount: u32 },

    /// True damage from the context source to the context target.
    Thorns { damage: u32 },

    /// Attack modifier on the context source.
    EmpowerSource { amount: i32, duration: i32 },

    /// Status on the context target, credited to the context source.
    ApplyStatusToTarget { status: StatusEffectSpec },

    /// Damages the current player's pieces standing on hazardous tiles.
    TileHazard,

    /// Native handler resolved by name through the handler registry.
    Handler {
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        params: RuleParams,
    },
}

impl RuleEffect {
    pub fn handler_name(&self) -> Option<&str> {
        match self {
            RuleEffect::Handler { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Where a rule came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleSource {
    Map,
    Status(StatusId),
    Passive(SkillId),
    Skill(SkillId),
    Custom,
}

/// An event binding with its limits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRule {
    pub id: RuleId,
    pub name: String,
    pub trigger: TriggerType,
    pub effect: RuleEffect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: RuleLimits,
    /// Piece the rule is attached to; `None` for global rules.
    #[cfg_attr(feature = "serde", serde(default))]
    pub owner: Option<PieceId>,
    pub source: RuleSource,
}

impl TriggerRule {
    pub fn status_id(&self) -> Option<&StatusId> {
        match &self.effect {
            RuleEffect::StatusTick { status_id } => Some(status_id),
            _ => None,
        }
    }
}

/// Design-time description of a rule, instantiated with a fresh id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleTemplate {
    pub name: String,
    pub trigger: TriggerType,
    pub effect: RuleEffect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: RuleLimits,
}

impl RuleTemplate {
    pub fn new(name: impl Into<String>, trigger: TriggerType, effect: RuleEffect) -> Self {
        Self {
            name: name.into(),
            trigger,
            effect,
            limits: RuleLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: RuleLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instantiate(&self, id: RuleId, owner: Option<PieceId>, source: RuleSource) -> TriggerRule {
        TriggerRule {
            id,
            name: self.name.clone(),
            trigger: self.trigger,
            effect: self.effect.clone(),
            limits: self.limits.clone(),
            owner,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_gate_on_cooldown_and_uses() {
        let mut limits = RuleLimits::default().with_cooldown(2).with_max_uses(2);
        assert!(limits.is_live());

        limits.record_use();
        assert!(!limits.is_live());
        limits.tick();
        limits.tick();
        assert!(limits.is_live());

        limits.record_use();
        limits.tick();
        limits.tick();
        assert!(!limits.is_live(), "use cap reached");
    }

    #[test]
    fn duration_expires_rule() {
        let mut limits = RuleLimits::default().with_duration(1);
        assert!(!limits.is_expired());
        limits.tick();
        assert!(limits.is_expired());
        assert!(!limits.is_live());
    }
}
