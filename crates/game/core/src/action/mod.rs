//! Player actions and their validation rules.
//!
//! Every action a participant can submit is a plain data struct implementing
//! [`ActionTransition`]. The reducer in [`crate::engine`] drives the three
//! hooks in order and guarantees that a failed hook leaves the caller's state
//! untouched.
//!
//! # Validation order
//!
//! Checks run fail-fast in a fixed order so the first violated rule is the one
//! reported: turn ownership, phase, per-turn flag, piece, resources,
//! cooldown/ultimate, then geometry.

mod error;
mod movement;
mod skill;
mod turn;

pub use error::BattleRuleError;
pub use movement::MoveAction;
pub use skill::{ResolveTargetAction, SkillSlot, UseSkillAction};
pub use turn::{EndTurnAction, GrantChargePointsAction, SurrenderAction};

use crate::env::BattleEnv;
use crate::state::{BattleState, InvariantViolation, PieceId, PieceInstance, PlayerId, TurnPhase};

/// Defines how a concrete action mutates battle state.
///
/// `pre_validate` sees the state **before** mutation and must reject every
/// invalid action; `apply` may then assume the checks held. `post_validate`
/// guards structural invariants on the result.
pub trait ActionTransition {
    /// Participant submitting the action.
    fn player(&self) -> &PlayerId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), BattleRuleError> {
        Ok(())
    }

    /// Applies the action by mutating the (already cloned) battle state.
    fn apply(&self, state: &mut BattleState, env: &BattleEnv<'_>) -> Result<(), BattleRuleError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &BattleState, _env: &BattleEnv<'_>) -> Result<(), InvariantViolation> {
        state.check_invariants()
    }
}

/// Everything a participant can submit to a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    Move(MoveAction),
    UseSkill(UseSkillAction),
    /// Resumes a pending two-phase skill activation.
    ResolveTarget(ResolveTargetAction),
    EndTurn(EndTurnAction),
    Surrender(SurrenderAction),
    /// Debug path: grants charge points to the submitting player.
    GrantChargePoints(GrantChargePointsAction),
}

impl BattleAction {
    pub fn player(&self) -> &PlayerId {
        match self {
            BattleAction::Move(action) => action.player(),
            BattleAction::UseSkill(action) => action.player(),
            BattleAction::ResolveTarget(action) => &action.player_id,
            BattleAction::EndTurn(action) => action.player(),
            BattleAction::Surrender(action) => action.player(),
            BattleAction::GrantChargePoints(action) => action.player(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleAction::Move(_) => "move",
            BattleAction::UseSkill(action) => match action.slot {
                SkillSlot::Basic => "useBasicSkill",
                SkillSlot::Charge => "useChargeSkill",
            },
            BattleAction::ResolveTarget(_) => "resolveTarget",
            BattleAction::EndTurn(_) => "endTurn",
            BattleAction::Surrender(_) => "surrender",
            BattleAction::GrantChargePoints(_) => "grantChargePoints",
        }
    }
}

impl From<MoveAction> for BattleAction {
    fn from(action: MoveAction) -> Self {
        BattleAction::Move(action)
    }
}

impl From<UseSkillAction> for BattleAction {
    fn from(action: UseSkillAction) -> Self {
        BattleAction::UseSkill(action)
    }
}

impl From<ResolveTargetAction> for BattleAction {
    fn from(action: ResolveTargetAction) -> Self {
        BattleAction::ResolveTarget(action)
    }
}

impl From<EndTurnAction> for BattleAction {
    fn from(action: EndTurnAction) -> Self {
        BattleAction::EndTurn(action)
    }
}

impl From<SurrenderAction> for BattleAction {
    fn from(action: SurrenderAction) -> Self {
        BattleAction::Surrender(action)
    }
}

impl From<GrantChargePointsAction> for BattleAction {
    fn from(action: GrantChargePointsAction) -> Self {
        BattleAction::GrantChargePoints(action)
    }
}

// ============================================================================
// Shared validation
// ============================================================================

fn ensure_participant(state: &BattleState, player: &PlayerId) -> Result<(), BattleRuleError> {
    if state.is_participant(player) {
        Ok(())
    } else {
        Err(BattleRuleError::UnknownPlayer(player.clone()))
    }
}

/// The submitting player must own the turn and the turn must be in `action`.
fn ensure_acting(state: &BattleState, player: &PlayerId) -> Result<(), BattleRuleError> {
    ensure_participant(state, player)?;
    if !state.turn.is_current(player) {
        return Err(BattleRuleError::NotYourTurn(player.clone()));
    }
    if state.turn.phase != TurnPhase::Action {
        return Err(BattleRuleError::WrongPhase(state.turn.phase));
    }
    Ok(())
}

/// Living, on-board piece owned by `player`.
fn acting_piece<'s>(
    state: &'s BattleState,
    player: &PlayerId,
    piece_id: &PieceId,
) -> Result<&'s PieceInstance, BattleRuleError> {
    let piece = state
        .find_piece(piece_id)
        .ok_or_else(|| BattleRuleError::PieceNotFound(piece_id.clone()))?;
    if !piece.is_owned_by(player) {
        return Err(BattleRuleError::NotYourPiece(piece_id.clone()));
    }
    if !piece.is_alive() {
        return Err(BattleRuleError::PieceDead(piece_id.clone()));
    }
    if piece.position.is_none() {
        return Err(BattleRuleError::PieceOffBoard(piece_id.clone()));
    }
    if piece.is_stunned() {
        return Err(BattleRuleError::PieceStunned(piece_id.clone()));
    }
    Ok(piece)
}

fn ensure_action_points(
    state: &BattleState,
    player: &PlayerId,
    required: u32,
) -> Result<(), BattleRuleError> {
    let available = state
        .player(player)
        .map(|meta| meta.action_points)
        .ok_or_else(|| BattleRuleError::UnknownPlayer(player.clone()))?;
    if available < required {
        return Err(BattleRuleError::InsufficientActionPoints {
            required,
            available,
        });
    }
    Ok(())
}
