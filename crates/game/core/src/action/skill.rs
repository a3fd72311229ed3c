use std::borrow::Cow;

use tracing::{debug, warn};

use super::{ActionTransition, BattleRuleError, acting_piece, ensure_acting, ensure_action_points};
use crate::env::{BattleEnv, SkillDefinition, SkillKind, SkillType};
use crate::skill::{SkillContext, SkillTarget, execute_skill_function};
use crate::state::{ActionLogKind, BattleState, PendingTargetSelection, PieceId, PlayerId, SkillId};

/// Which once-per-turn skill flag an activation consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillSlot {
    /// `normal` skills, paid with action points.
    Basic,
    /// `super`/`ultimate` skills, additionally paid with charge points.
    Charge,
}

impl SkillSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillSlot::Basic => "basic",
            SkillSlot::Charge => "charge",
        }
    }

    fn accepts(self, skill_type: SkillType) -> bool {
        match self {
            SkillSlot::Basic => !skill_type.is_charge(),
            SkillSlot::Charge => skill_type.is_charge(),
        }
    }

    fn log_kind(self) -> ActionLogKind {
        match self {
            SkillSlot::Basic => ActionLogKind::UseBasicSkill,
            SkillSlot::Charge => ActionLogKind::UseChargeSkill,
        }
    }
}

/// Activates one of a piece's skills.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseSkillAction {
    pub player_id: PlayerId,
    pub piece_id: PieceId,
    pub skill_id: SkillId,
    pub slot: SkillSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<SkillTarget>,
}

impl UseSkillAction {
    pub fn basic(
        player_id: impl Into<PlayerId>,
        piece_id: impl Into<PieceId>,
        skill_id: impl Into<SkillId>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            piece_id: piece_id.into(),
            skill_id: skill_id.into(),
            slot: SkillSlot::Basic,
            target: None,
        }
    }

    pub fn charge(
        player_id: impl Into<PlayerId>,
        piece_id: impl Into<PieceId>,
        skill_id: impl Into<SkillId>,
    ) -> Self {
        Self {
            slot: SkillSlot::Charge,
            ..Self::basic(player_id, piece_id, skill_id)
        }
    }

    pub fn with_target(mut self, target: SkillTarget) -> Self {
        self.target = Some(target);
        self
    }

    fn flag_used(&self, state: &BattleState) -> bool {
        match self.slot {
            SkillSlot::Basic => state.turn.actions.has_used_basic_skill,
            SkillSlot::Charge => state.turn.actions.has_used_charge_skill,
        }
    }

    /// Looks the definition up in the battle, substituting a fallback unless
    /// content is strict.
    fn definition<'s>(
        &self,
        state: &'s BattleState,
        env: &BattleEnv<'_>,
    ) -> Result<Cow<'s, SkillDefinition>, BattleRuleError> {
        if let Some(definition) = state.skill_definition(&self.skill_id) {
            return Ok(Cow::Borrowed(definition));
        }
        if env.config().strict_content {
            return Err(BattleRuleError::SkillNotFound(self.skill_id.clone()));
        }
        warn!(
            target: "tactics::engine",
            skill = %self.skill_id,
            "skill definition missing, substituting fallback"
        );
        Ok(Cow::Owned(SkillDefinition::fallback(self.skill_id.clone())))
    }

    fn charge_cost(&self, definition: &SkillDefinition, env: &BattleEnv<'_>) -> u32 {
        match self.slot {
            SkillSlot::Basic => 0,
            SkillSlot::Charge => definition.effective_charge_cost(env.config().default_charge_cost),
        }
    }
}

impl ActionTransition for UseSkillAction {
    fn player(&self) -> &PlayerId {
        &self.player_id
    }

    fn pre_validate(&self, state: &BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        ensure_acting(state, &self.player_id)?;
        if self.flag_used(state) {
            return Err(match self.slot {
                SkillSlot::Basic => BattleRuleError::BasicSkillAlreadyUsed,
                SkillSlot::Charge => BattleRuleError::ChargeSkillAlreadyUsed,
            });
        }

        let piece = acting_piece(state, &self.player_id, &self.piece_id)?;
        if piece.is_silenced() {
            return Err(BattleRuleError::PieceSilenced(self.piece_id.clone()));
        }
        let skill_state = piece
            .skill(&self.skill_id)
            .ok_or_else(|| BattleRuleError::SkillNotFound(self.skill_id.clone()))?;
        if !skill_state.unlocked {
            return Err(BattleRuleError::SkillLocked(self.skill_id.clone()));
        }

        let definition = self.definition(state, env)?;
        if definition.kind == SkillKind::Passive {
            return Err(BattleRuleError::SkillPassive(self.skill_id.clone()));
        }
        if !self.slot.accepts(definition.skill_type) {
            return Err(BattleRuleError::WrongSkillSlot {
                skill: self.skill_id.clone(),
                slot: self.slot,
            });
        }

        ensure_action_points(state, &self.player_id, definition.action_point_cost)?;
        let charge_cost = self.charge_cost(&definition, env);
        let charge_points = state.player(&self.player_id).map_or(0, |p| p.charge_points);
        if charge_points < charge_cost {
            return Err(BattleRuleError::InsufficientChargePoints {
                required: charge_cost,
                available: charge_points,
            });
        }

        if skill_state.current_cooldown > 0 {
            return Err(BattleRuleError::SkillOnCooldown {
                skill: self.skill_id.clone(),
                turns: skill_state.current_cooldown,
            });
        }
        if skill_state.uses_remaining == 0 {
            return Err(BattleRuleError::UltimateAlreadyUsed(self.skill_id.clone()));
        }
        if !skill_state.has_charge(definition.max_charges) {
            return Err(BattleRuleError::NoChargesLeft(self.skill_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        let definition = self.definition(state, env)?.into_owned();
        let ctx = SkillContext::new(&definition, self.piece_id.clone(), self.player_id.clone())
            .with_target(self.target.clone());

        let result = execute_skill_function(&definition, &ctx, state, env);

        if let Some(request) = result.needs_target {
            debug!(
                target: "tactics::engine",
                skill = %self.skill_id,
                piece = %self.piece_id,
                "skill awaiting target selection"
            );
            state.pending_target = Some(PendingTargetSelection {
                player_id: self.player_id.clone(),
                action: self.clone(),
                request,
                turn_number: state.turn.turn_number,
            });
            state.record(
                self.player_id.clone(),
                ActionLogKind::TargetRequested,
                Some(self.piece_id.clone()),
                Some(self.skill_id.clone()),
                vec![result.message],
            );
            return Ok(());
        }
        if !result.success {
            return Err(BattleRuleError::SkillFailed(result.message));
        }

        let action_cost = definition.action_point_cost;
        let charge_cost = self.charge_cost(&definition, env);
        let player = state
            .player_mut(&self.player_id)
            .ok_or_else(|| BattleRuleError::UnknownPlayer(self.player_id.clone()))?;
        if !player.spend_action_points(action_cost) {
            return Err(BattleRuleError::InsufficientActionPoints {
                required: action_cost,
                available: player.action_points,
            });
        }
        if !player.spend_charge_points(charge_cost) {
            return Err(BattleRuleError::InsufficientChargePoints {
                required: charge_cost,
                available: player.charge_points,
            });
        }

        // The caster may have died to a reaction; its bookkeeping goes with it.
        if let Some(skill_state) = state
            .piece_mut(&self.piece_id)
            .and_then(|piece| piece.skill_mut(&self.skill_id))
        {
            skill_state.current_cooldown = definition.cooldown_turns;
            skill_state.spend_charge(definition.max_charges);
            if skill_state.uses_remaining > 0 {
                skill_state.uses_remaining -= 1;
            }
        }

        match self.slot {
            SkillSlot::Basic => state.turn.actions.has_used_basic_skill = true,
            SkillSlot::Charge => state.turn.actions.has_used_charge_skill = true,
        }

        let mut messages = result.messages;
        if result.blocked || messages.is_empty() {
            messages.push(result.message);
        }
        state.record(
            self.player_id.clone(),
            self.slot.log_kind(),
            Some(self.piece_id.clone()),
            Some(self.skill_id.clone()),
            messages,
        );
        Ok(())
    }
}

/// Resumes the pending skill activation with the chosen target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveTargetAction {
    pub player_id: PlayerId,
    pub target: SkillTarget,
}

impl ResolveTargetAction {
    pub fn new(player_id: impl Into<PlayerId>, target: SkillTarget) -> Self {
        Self {
            player_id: player_id.into(),
            target,
        }
    }

    /// Rebuilds the original activation with the target filled in.
    ///
    /// The pending selection must belong to this player and to the current
    /// turn. The result goes through full validation again.
    pub fn resume(&self, state: &BattleState) -> Result<UseSkillAction, BattleRuleError> {
        let pending = state
            .pending_target
            .as_ref()
            .filter(|p| p.turn_number == state.turn.turn_number)
            .ok_or(BattleRuleError::NoPendingTarget)?;
        if pending.player_id != self.player_id {
            return Err(BattleRuleError::NotYourTurn(self.player_id.clone()));
        }
        Ok(pending.action.clone().with_target(self.target.clone()))
    }
}
