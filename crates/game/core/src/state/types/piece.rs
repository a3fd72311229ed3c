//! Runtime piece instances owned by the battle state.

use super::common::{PieceId, PlayerId, Position, SkillId};
use super::status::{StatusEffect, StatusEffectKind, StatusEffects};
use crate::env::{Faction, PieceTemplate, SkillDefinition, SkillType};
use crate::rules::TriggerRule;

/// Uses value meaning "no per-battle limit".
pub const UNLIMITED_USES: i32 = -1;

/// Per-piece, per-skill runtime bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillState {
    pub skill_id: SkillId,
    pub current_cooldown: u32,
    pub current_charges: u32,
    pub unlocked: bool,
    /// `-1` unlimited, otherwise remaining activations this battle.
    pub uses_remaining: i32,
}

impl SkillState {
    pub fn new(skill_id: SkillId, initial_charges: u32) -> Self {
        Self {
            skill_id,
            current_cooldown: 0,
            current_charges: initial_charges,
            unlocked: true,
            uses_remaining: UNLIMITED_USES,
        }
    }

    /// Builds the state for a skill, making ultimates one-shot and capping
    /// stocked charges at `max_charges`.
    pub fn for_definition(definition: &SkillDefinition, initial_charges: u32) -> Self {
        let mut state = Self::new(definition.id.clone(), initial_charges);
        if definition.skill_type == SkillType::Ultimate {
            state.uses_remaining = 1;
        }
        if definition.max_charges > 0 {
            state.current_charges = initial_charges.min(definition.max_charges);
        }
        state
    }

    pub fn is_ready(&self) -> bool {
        self.unlocked && self.current_cooldown == 0 && self.uses_remaining != 0
    }

    pub fn tick_cooldown(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }

    // Charges only apply to skills whose definition sets `max_charges`.

    pub fn has_charge(&self, max_charges: u32) -> bool {
        max_charges == 0 || self.current_charges > 0
    }

    pub fn spend_charge(&mut self, max_charges: u32) {
        if max_charges > 0 {
            self.current_charges = self.current_charges.saturating_sub(1);
        }
    }

    /// Restores one charge up to `max_charges`. Returns whether one was added.
    pub fn recharge(&mut self, max_charges: u32) -> bool {
        if self.current_charges >= max_charges {
            return false;
        }
        self.current_charges += 1;
        true
    }
}

/// Runtime piece. Owned exclusively by [`BattleState`](crate::state::BattleState).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceInstance {
    pub instance_id: PieceId,
    pub template_id: String,
    pub name: String,
    pub owner_player_id: PlayerId,
    pub faction: Faction,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    /// Maximum Manhattan distance per move; `0` means unlimited.
    pub move_range: u32,
    /// `None` when the piece is off the board.
    pub position: Option<Position>,
    pub skills: Vec<SkillState>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: StatusEffects,
    /// Rules scoped to this piece (passives, attached effects, status ticks).
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Vec<TriggerRule>,
}

impl PieceInstance {
    /// Spawns an instance from a template for the given owner.
    pub fn from_template(
        instance_id: PieceId,
        template: &PieceTemplate,
        owner: PlayerId,
        faction: Faction,
        position: Option<Position>,
        skills: Vec<SkillState>,
    ) -> Self {
        Self {
            instance_id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            owner_player_id: owner,
            faction,
            current_hp: template.stats.max_hp,
            max_hp: template.stats.max_hp,
            attack: template.stats.attack,
            defense: template.stats.defense,
            move_range: template.stats.move_range,
            position,
            skills,
            statuses: StatusEffects::empty(),
            rules: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Alive and on the board.
    pub fn is_active(&self) -> bool {
        self.is_alive() && self.position.is_some()
    }

    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        &self.owner_player_id == player
    }

    pub fn skill(&self, skill_id: &SkillId) -> Option<&SkillState> {
        self.skills.iter().find(|s| &s.skill_id == skill_id)
    }

    pub fn skill_mut(&mut self, skill_id: &SkillId) -> Option<&mut SkillState> {
        self.skills.iter_mut().find(|s| &s.skill_id == skill_id)
    }

    /// Attack including status modifiers, floored at zero.
    pub fn effective_attack(&self) -> i32 {
        let up = self.statuses.total_power(StatusEffectKind::AttackUp);
        let down = self.statuses.total_power(StatusEffectKind::AttackDown);
        (self.attack + up - down).max(0)
    }

    /// Defense including status modifiers, floored at zero.
    pub fn effective_defense(&self) -> i32 {
        let up = self.statuses.total_power(StatusEffectKind::DefenseUp);
        let down = self.statuses.total_power(StatusEffectKind::DefenseDown);
        (self.defense + up - down).max(0)
    }

    pub fn is_stunned(&self) -> bool {
        self.statuses.has(StatusEffectKind::Stun)
    }

    pub fn is_silenced(&self) -> bool {
        self.statuses.has(StatusEffectKind::Silence)
    }

    pub fn buffs(&self) -> impl Iterator<Item = &StatusEffect> {
        self.statuses.iter().filter(|e| !e.is_debuff)
    }

    pub fn debuffs(&self) -> impl Iterator<Item = &StatusEffect> {
        self.statuses.iter().filter(|e| e.is_debuff)
    }

    /// Names of the attached effects, in attachment order.
    pub fn status_tags(&self) -> Vec<&str> {
        self.statuses.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn missing_hp(&self) -> u32 {
        self.max_hp.saturating_sub(self.current_hp)
    }
}
