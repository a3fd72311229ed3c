use tracing::debug;

use super::{ActionTransition, BattleRuleError, acting_piece, ensure_acting, ensure_action_points};
use crate::env::BattleEnv;
use crate::rules::{TriggerContext, TriggerType, check_triggers};
use crate::state::{ActionLogKind, BattleState, PieceId, PlayerId, Position};

/// Rook-style move of one piece along a row or column.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub player_id: PlayerId,
    pub piece_id: PieceId,
    pub to: Position,
}

impl MoveAction {
    pub fn new(player_id: impl Into<PlayerId>, piece_id: impl Into<PieceId>, to: Position) -> Self {
        Self {
            player_id: player_id.into(),
            piece_id: piece_id.into(),
            to,
        }
    }

    fn validate_geometry(
        &self,
        state: &BattleState,
        env: &BattleEnv<'_>,
        from: Position,
        move_range: u32,
    ) -> Result<(), BattleRuleError> {
        let to = self.to;
        if from == to {
            return Err(BattleRuleError::SamePosition(to));
        }
        if !from.is_orthogonal_to(to) {
            return Err(BattleRuleError::NotOrthogonal);
        }
        let distance = from.manhattan_distance(to);
        if move_range > 0 && distance > move_range {
            return Err(BattleRuleError::OutOfRange {
                distance,
                range: move_range,
            });
        }
        if !state.map.contains(to) {
            return Err(BattleRuleError::OutOfBounds(to));
        }
        if !state.map.is_walkable(to) {
            return Err(BattleRuleError::NotWalkable(to));
        }
        if state.is_occupied(to) {
            return Err(BattleRuleError::Occupied(to));
        }
        if env.config().enforce_move_path {
            if let Some(blocked) = from
                .path_between(to)
                .into_iter()
                .find(|cell| !state.map.is_walkable(*cell) || state.is_occupied(*cell))
            {
                return Err(BattleRuleError::PathBlocked(blocked));
            }
        }
        Ok(())
    }
}

impl ActionTransition for MoveAction {
    fn player(&self) -> &PlayerId {
        &self.player_id
    }

    fn pre_validate(&self, state: &BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        ensure_acting(state, &self.player_id)?;
        if state.turn.actions.has_moved {
            return Err(BattleRuleError::MoveAlreadyUsed);
        }
        let piece = acting_piece(state, &self.player_id, &self.piece_id)?;
        ensure_action_points(state, &self.player_id, env.config().move_cost)?;

        let from = piece
            .position
            .ok_or_else(|| BattleRuleError::PieceOffBoard(self.piece_id.clone()))?;
        self.validate_geometry(state, env, from, piece.move_range)
    }

    fn apply(&self, state: &mut BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        let cost = env.config().move_cost;
        let player = state
            .player_mut(&self.player_id)
            .ok_or_else(|| BattleRuleError::UnknownPlayer(self.player_id.clone()))?;
        if !player.spend_action_points(cost) {
            return Err(BattleRuleError::InsufficientActionPoints {
                required: cost,
                available: player.action_points,
            });
        }

        let piece = state
            .piece_mut(&self.piece_id)
            .ok_or_else(|| BattleRuleError::PieceNotFound(self.piece_id.clone()))?;
        let from = piece.position.replace(self.to);
        let name = piece.name.clone();
        state.turn.actions.has_moved = true;

        debug!(
            target: "tactics::engine",
            piece = %self.piece_id,
            from = ?from,
            to = %self.to,
            "piece moved"
        );

        let ctx = TriggerContext::new(TriggerType::AfterMove)
            .with_source(self.piece_id.clone())
            .with_player(self.player_id.clone())
            .with_position(self.to);
        let outcome = check_triggers(state, env, &ctx);

        let mut messages = vec![format!("{name} moves to {}", self.to)];
        messages.extend(outcome.messages);
        state.record(
            self.player_id.clone(),
            ActionLogKind::Move,
            Some(self.piece_id.clone()),
            None,
            messages,
        );
        Ok(())
    }
}
