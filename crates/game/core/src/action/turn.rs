use super::{ActionTransition, BattleRuleError, ensure_acting, ensure_participant};
use crate::engine::begin_phase;
use crate::env::BattleEnv;
use crate::state::{ActionLogKind, BattleState, PlayerId, TurnPhase};

/// Ends the current turn and runs the next player's `start` phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnAction {
    pub player_id: PlayerId,
}

impl EndTurnAction {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
        }
    }
}

impl ActionTransition for EndTurnAction {
    fn player(&self) -> &PlayerId {
        &self.player_id
    }

    fn pre_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        ensure_acting(state, &self.player_id)
    }

    fn apply(&self, state: &mut BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        let ending = state.turn.turn_number;
        state.record(
            self.player_id.clone(),
            ActionLogKind::EndTurn,
            None,
            None,
            vec![format!("{} ends turn {ending}", self.player_id)],
        );

        // action -> end -> start(next) -> action
        let mut messages = Vec::new();
        loop {
            let change = begin_phase(state, env);
            messages.extend(change.messages);
            if change.to == TurnPhase::Action {
                break;
            }
        }
        if let Some(entry) = state.actions.last_mut() {
            entry.messages.extend(messages);
        }
        Ok(())
    }
}

/// Concedes the battle: every piece of the player drops to zero hp.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrenderAction {
    pub player_id: PlayerId,
}

impl SurrenderAction {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
        }
    }
}

impl ActionTransition for SurrenderAction {
    fn player(&self) -> &PlayerId {
        &self.player_id
    }

    fn pre_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        ensure_participant(state, &self.player_id)
    }

    fn apply(&self, state: &mut BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        let mut fallen = 0usize;
        for piece in state
            .pieces
            .iter_mut()
            .filter(|p| p.is_owned_by(&self.player_id))
        {
            if piece.is_alive() {
                fallen += 1;
            }
            piece.current_hp = 0;
        }
        state.record(
            self.player_id.clone(),
            ActionLogKind::Surrender,
            None,
            None,
            vec![format!("{} surrenders ({fallen} piece(s) fall)", self.player_id)],
        );
        Ok(())
    }
}

/// Debug path: credits charge points to the submitting player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantChargePointsAction {
    pub player_id: PlayerId,
    pub amount: u32,
}

impl GrantChargePointsAction {
    pub fn new(player_id: impl Into<PlayerId>, amount: u32) -> Self {
        Self {
            player_id: player_id.into(),
            amount,
        }
    }
}

impl ActionTransition for GrantChargePointsAction {
    fn player(&self) -> &PlayerId {
        &self.player_id
    }

    fn pre_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        ensure_participant(state, &self.player_id)?;
        if self.amount == 0 {
            return Err(BattleRuleError::InvalidAmount);
        }
        Ok(())
    }

    fn apply(&self, state: &mut BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        let player = state
            .player_mut(&self.player_id)
            .ok_or_else(|| BattleRuleError::UnknownPlayer(self.player_id.clone()))?;
        player.charge_points = player.charge_points.saturating_add(self.amount);
        let total = player.charge_points;
        state.record(
            self.player_id.clone(),
            ActionLogKind::GrantChargePoints,
            None,
            None,
            vec![format!(
                "{} gains {} charge point(s) ({total} total)",
                self.player_id, self.amount
            )],
        );
        Ok(())
    }
}
