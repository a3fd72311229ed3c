//! Battle state invariants.
//!
//! Violations are internal faults: a correct reducer never produces them, so
//! they surface as 5xx-class errors at the boundary.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{PieceId, PlayerId, Position};

/// A structural invariant of [`BattleState`](super::BattleState) that no longer holds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("battle must have exactly two players, found {0}")]
    PlayerCount(usize),

    #[error("piece {piece} has {hp} hp, above its maximum of {max}")]
    HpAboveMax { piece: PieceId, hp: u32, max: u32 },

    #[error("piece id {0} is used more than once")]
    DuplicatePieceId(PieceId),

    #[error("piece {piece} stands outside the map at {position}")]
    PieceOutOfBounds { piece: PieceId, position: Position },

    #[error("more than one living piece stands at {0}")]
    SharedPosition(Position),

    #[error("player {player} holds {points} action points, above the cap of {cap}")]
    ActionPointsAboveCap {
        player: PlayerId,
        points: u32,
        cap: u32,
    },

    #[error("current player {0} is not part of the battle")]
    UnknownCurrentPlayer(PlayerId),
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use InvariantViolation::*;
        match self {
            PlayerCount(_) => "STATE_PLAYER_COUNT",
            HpAboveMax { .. } => "STATE_HP_ABOVE_MAX",
            DuplicatePieceId(_) => "STATE_DUPLICATE_PIECE_ID",
            PieceOutOfBounds { .. } => "STATE_PIECE_OUT_OF_BOUNDS",
            SharedPosition(_) => "STATE_SHARED_POSITION",
            ActionPointsAboveCap { .. } => "STATE_ACTION_POINTS_ABOVE_CAP",
            UnknownCurrentPlayer(_) => "STATE_UNKNOWN_CURRENT_PLAYER",
        }
    }
}
