//! Status effects attached to pieces.
//!
//! Status effects are timed, possibly stacking conditions. The list stored on
//! each piece is the authoritative record: the trigger rule synthesized for an
//! effect only carries the effect id and re-reads duration, stacks and uses
//! from here every time it fires, so the record survives serialization intact.
//!
//! # Durations
//!
//! `remaining_duration` and `remaining_uses` count the owner's `beginTurn`
//! firings. Either may be [`INFINITE`]. An effect whose counters both reached
//! zero stays attached (and keeps applying) until its next firing removes it,
//! so a one-turn effect covers exactly one of the owner's turns.

use arrayvec::ArrayVec;
use strum::{EnumIter, IntoStaticStr};

use super::common::{INFINITE, PieceId, RuleId, StatusId};
use crate::config::BattleConfig;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Bleeding,
    Poison,
    Burn,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot move or use skills.
    Stun,

    /// Cannot use skills.
    Silence,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    AttackUp,
    AttackDown,
    DefenseUp,
    DefenseDown,

    // ========================================================================
    // Recovery
    // ========================================================================
    Regeneration,
}

impl StatusEffectKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub const fn is_debuff(self) -> bool {
        matches!(
            self,
            Self::Bleeding
                | Self::Poison
                | Self::Burn
                | Self::Stun
                | Self::Silence
                | Self::AttackDown
                | Self::DefenseDown
        )
    }

    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Bleeding | Self::Poison | Self::Burn)
    }

    /// Display name used when a spec does not provide one.
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Bleeding => "Bleeding",
            Self::Poison => "Poison",
            Self::Burn => "Burn",
            Self::Stun => "Stun",
            Self::Silence => "Silence",
            Self::AttackUp => "Attack Up",
            Self::AttackDown => "Attack Down",
            Self::DefenseUp => "Defense Up",
            Self::DefenseDown => "Defense Down",
            Self::Regeneration => "Regeneration",
        }
    }
}

/// Blueprint used to create or stack a status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectSpec {
    pub kind: StatusEffectKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Number of `beginTurn` firings, or [`INFINITE`].
    pub duration: i32,
    pub intensity: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_stack: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

impl StatusEffectSpec {
    pub fn new(kind: StatusEffectKind, duration: i32, intensity: i32) -> Self {
        Self {
            kind,
            name: None,
            duration,
            intensity,
            can_stack: false,
            max_stacks: 1,
        }
    }

    pub fn stacking(mut self, max_stacks: u32) -> Self {
        self.can_stack = true;
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bleeding(damage: i32, duration: i32) -> Self {
        Self::new(StatusEffectKind::Bleeding, duration, damage).stacking(3)
    }

    pub fn poison(damage: i32, duration: i32) -> Self {
        Self::new(StatusEffectKind::Poison, duration, damage).stacking(5)
    }

    pub fn burn(damage: i32, duration: i32) -> Self {
        Self::new(StatusEffectKind::Burn, duration, damage)
    }

    pub fn stun(duration: i32) -> Self {
        Self::new(StatusEffectKind::Stun, duration, 0)
    }

    pub fn silence(duration: i32) -> Self {
        Self::new(StatusEffectKind::Silence, duration, 0)
    }

    pub fn regeneration(heal: i32, duration: i32) -> Self {
        Self::new(StatusEffectKind::Regeneration, duration, heal)
    }

    /// Positive amounts buff attack, negative amounts debuff it.
    pub fn attack_modifier(amount: i32, duration: i32) -> Self {
        let kind = if amount >= 0 {
            StatusEffectKind::AttackUp
        } else {
            StatusEffectKind::AttackDown
        };
        Self::new(kind, duration, amount.abs())
    }

    /// Positive amounts buff defense, negative amounts debuff it.
    pub fn defense_modifier(amount: i32, duration: i32) -> Self {
        let kind = if amount >= 0 {
            StatusEffectKind::DefenseUp
        } else {
            StatusEffectKind::DefenseDown
        };
        Self::new(kind, duration, amount.abs())
    }
}

/// A status effect attached to a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: StatusId,
    pub kind: StatusEffectKind,
    pub name: String,
    pub remaining_duration: i32,
    pub remaining_uses: i32,
    pub intensity: i32,
    pub is_debuff: bool,
    pub can_stack: bool,
    pub max_stacks: u32,
    pub current_stacks: u32,
    /// Back-reference to the `beginTurn` rule that drives this effect.
    pub rule_id: RuleId,
    /// Piece credited with kills caused by this effect.
    pub applied_by: Option<PieceId>,
}

impl StatusEffect {
    pub fn is_infinite(&self) -> bool {
        self.remaining_duration == INFINITE || self.remaining_uses == INFINITE
    }

    pub fn is_expired(&self) -> bool {
        !self.is_infinite() && self.remaining_duration <= 0 && self.remaining_uses <= 0
    }

    /// Magnitude scaled by the current stack count.
    pub fn power(&self) -> i32 {
        self.intensity
            .saturating_mul(i32::try_from(self.current_stacks).unwrap_or(i32::MAX))
    }
}

/// Bounded list of status effects on a single piece.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, id: &StatusId) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &StatusId) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| &e.id == id)
    }

    pub fn find_kind_mut(&mut self, kind: StatusEffectKind) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    /// Pushes a new effect. Returns it back if the list is full.
    pub fn push(&mut self, effect: StatusEffect) -> Result<(), StatusEffect> {
        self.effects.try_push(effect).map_err(|e| e.element())
    }

    pub fn remove(&mut self, id: &StatusId) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| &e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Sum of `power()` across attached effects of a kind.
    pub fn total_power(&self, kind: StatusEffectKind) -> i32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(StatusEffect::power)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn ids(&self) -> Vec<StatusId> {
        self.effects.iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.effects.is_full()
    }
}
