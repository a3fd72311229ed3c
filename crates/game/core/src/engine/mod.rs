//! Turn state machine and action execution pipeline.
//!
//! [`apply_battle_action`] is the authoritative reducer for [`BattleState`]:
//! it never mutates its input, validates before cloning and returns either a
//! new battle or a typed error. [`begin_phase`] drives the
//! `start → action → end → start` cycle, and [`BattleEngine`] wraps both for
//! callers that own a mutable battle.

mod errors;
mod phase;
mod rehydrate;
mod setup;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use phase::{PhaseChange, begin_phase};
pub use rehydrate::{RehydrationError, RehydrationReport, rehydrate};
pub use setup::create_initial_battle_for_players;
pub use transition::apply_battle_action;

use crate::action::BattleAction;
use crate::env::BattleEnv;
use crate::state::BattleState;

/// Drives a battle owned by the caller.
///
/// All mutations flow through the same reducer used by
/// [`apply_battle_action`]; on error the battle is left exactly as it was.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Applies `action`, replacing the battle with the reducer's result.
    pub fn execute(&mut self, env: &BattleEnv<'_>, action: &BattleAction) -> Result<(), ExecuteError> {
        *self.state = apply_battle_action(self.state, action, env)?;
        Ok(())
    }

    /// Advances the turn state machine by one phase.
    pub fn begin_phase(&mut self, env: &BattleEnv<'_>) -> PhaseChange {
        begin_phase(self.state, env)
    }

    /// Runs phases until the current player is back in `action`.
    pub fn advance_to_next_turn(&mut self, env: &BattleEnv<'_>) -> Vec<PhaseChange> {
        let mut changes = vec![self.begin_phase(env)];
        while changes
            .last()
            .is_some_and(|change| change.to != crate::state::TurnPhase::Action)
        {
            changes.push(self.begin_phase(env));
        }
        changes
    }
}
