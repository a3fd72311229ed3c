//! Action transition dispatch and execution logic.

use tracing::debug;

use crate::action::{ActionTransition, BattleAction};
use crate::env::BattleEnv;
use crate::state::BattleState;

use super::errors::{ExecuteError, TransitionPhase};

/// Runs a transition through the three-phase pipeline on a copy of `state`.
///
/// Phases:
/// 1. `pre_validate` - checked against the untouched input, before cloning
/// 2. `apply` - mutates the copy; any pending target selection is discarded
///    first
/// 3. `post_validate` - structural invariants of the copy
fn drive_transition<T>(
    transition: &T,
    state: &BattleState,
    env: &BattleEnv<'_>,
) -> Result<BattleState, ExecuteError>
where
    T: ActionTransition,
{
    transition.pre_validate(state, env)?;

    let mut next = state.clone();
    next.pending_target = None;
    transition.apply(&mut next, env)?;

    transition
        .post_validate(&next, env)
        .map_err(|violation| ExecuteError::invariant(TransitionPhase::PostValidate, violation))?;

    Ok(next)
}

/// Validates and applies `action`, returning the resulting battle.
///
/// Pure with respect to `state`: on error the caller keeps the previous value
/// unchanged, on success it receives a new one. A skill that needs a target
/// succeeds with [`BattleState::pending_target`] set and nothing spent.
pub fn apply_battle_action(
    state: &BattleState,
    action: &BattleAction,
    env: &BattleEnv<'_>,
) -> Result<BattleState, ExecuteError> {
    let next = match action {
        BattleAction::Move(transition) => drive_transition(transition, state, env),
        BattleAction::UseSkill(transition) => drive_transition(transition, state, env),
        BattleAction::ResolveTarget(resolve) => {
            let resumed = resolve.resume(state)?;
            drive_transition(&resumed, state, env)
        }
        BattleAction::EndTurn(transition) => drive_transition(transition, state, env),
        BattleAction::Surrender(transition) => drive_transition(transition, state, env),
        BattleAction::GrantChargePoints(transition) => drive_transition(transition, state, env),
    }?;

    debug!(
        target: "tactics::engine",
        action = action.as_str(),
        player = %action.player(),
        turn = next.turn.turn_number,
        phase = next.turn.phase.as_str(),
        pending_target = next.pending_target.is_some(),
        "action accepted"
    );
    Ok(next)
}
