//! Rule violations raised while validating or applying a battle action.
//!
//! Messages are stable: boundary layers surface them verbatim to players.

use super::skill::SkillSlot;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{PieceId, PlayerId, Position, SkillId, TurnPhase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleRuleError {
    // ========================================================================
    // Turn ownership and phase
    // ========================================================================
    #[error("It is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("Player {0} is not part of this battle")]
    UnknownPlayer(PlayerId),

    #[error("Action not allowed during the {} phase", .0.as_str())]
    WrongPhase(TurnPhase),

    #[error("Move action already used this turn")]
    MoveAlreadyUsed,

    #[error("Basic skill already used this turn")]
    BasicSkillAlreadyUsed,

    #[error("Charge skill already used this turn")]
    ChargeSkillAlreadyUsed,

    // ========================================================================
    // Pieces
    // ========================================================================
    #[error("Piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("Piece {0} does not belong to you")]
    NotYourPiece(PieceId),

    #[error("Piece {0} is dead")]
    PieceDead(PieceId),

    #[error("Piece {0} is not on the board")]
    PieceOffBoard(PieceId),

    #[error("Piece {0} is stunned")]
    PieceStunned(PieceId),

    #[error("Piece {0} is silenced")]
    PieceSilenced(PieceId),

    // ========================================================================
    // Resources
    // ========================================================================
    #[error("Not enough action points: need {required}, have {available}")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("Not enough charge points: need {required}, have {available}")]
    InsufficientChargePoints { required: u32, available: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    // ========================================================================
    // Skills
    // ========================================================================
    #[error("Skill {0} not found")]
    SkillNotFound(SkillId),

    #[error("Skill {0} is locked")]
    SkillLocked(SkillId),

    #[error("Skill {0} is passive and cannot be activated")]
    SkillPassive(SkillId),

    #[error("Skill {skill} cannot be used as a {} skill", .slot.as_str())]
    WrongSkillSlot { skill: SkillId, slot: SkillSlot },

    #[error("Skill {skill} is on cooldown for {turns} more turn(s)")]
    SkillOnCooldown { skill: SkillId, turns: u32 },

    #[error("Ultimate skill {0} has already been used")]
    UltimateAlreadyUsed(SkillId),

    #[error("Skill {0} has no charges left")]
    NoChargesLeft(SkillId),

    #[error("Skill failed: {0}")]
    SkillFailed(String),

    #[error("No target selection is pending")]
    NoPendingTarget,

    // ========================================================================
    // Movement geometry
    // ========================================================================
    #[error("Moves must follow a straight row or column")]
    NotOrthogonal,

    #[error("Piece is already at {0}")]
    SamePosition(Position),

    #[error("Destination is {distance} tiles away, move range is {range}")]
    OutOfRange { distance: u32, range: u32 },

    #[error("Destination {0} is outside the map")]
    OutOfBounds(Position),

    #[error("Destination {0} is not walkable")]
    NotWalkable(Position),

    #[error("Destination {0} is occupied")]
    Occupied(Position),

    #[error("Path is blocked at {0}")]
    PathBlocked(Position),
}

impl GameError for BattleRuleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BattleRuleError::InsufficientActionPoints { .. }
            | BattleRuleError::InsufficientChargePoints { .. }
            | BattleRuleError::SkillOnCooldown { .. }
            | BattleRuleError::NoChargesLeft(_)
            | BattleRuleError::Occupied(_)
            | BattleRuleError::PathBlocked(_)
            | BattleRuleError::SkillFailed(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BattleRuleError::NotYourTurn(_) => "RULE_NOT_YOUR_TURN",
            BattleRuleError::UnknownPlayer(_) => "RULE_UNKNOWN_PLAYER",
            BattleRuleError::WrongPhase(_) => "RULE_WRONG_PHASE",
            BattleRuleError::MoveAlreadyUsed => "RULE_MOVE_ALREADY_USED",
            BattleRuleError::BasicSkillAlreadyUsed => "RULE_BASIC_SKILL_ALREADY_USED",
            BattleRuleError::ChargeSkillAlreadyUsed => "RULE_CHARGE_SKILL_ALREADY_USED",
            BattleRuleError::PieceNotFound(_) => "RULE_PIECE_NOT_FOUND",
            BattleRuleError::NotYourPiece(_) => "RULE_NOT_YOUR_PIECE",
            BattleRuleError::PieceDead(_) => "RULE_PIECE_DEAD",
            BattleRuleError::PieceOffBoard(_) => "RULE_PIECE_OFF_BOARD",
            BattleRuleError::PieceStunned(_) => "RULE_PIECE_STUNNED",
            BattleRuleError::PieceSilenced(_) => "RULE_PIECE_SILENCED",
            BattleRuleError::InsufficientActionPoints { .. } => "RULE_INSUFFICIENT_ACTION_POINTS",
            BattleRuleError::InsufficientChargePoints { .. } => "RULE_INSUFFICIENT_CHARGE_POINTS",
            BattleRuleError::InvalidAmount => "RULE_INVALID_AMOUNT",
            BattleRuleError::SkillNotFound(_) => "RULE_SKILL_NOT_FOUND",
            BattleRuleError::SkillLocked(_) => "RULE_SKILL_LOCKED",
            BattleRuleError::SkillPassive(_) => "RULE_SKILL_PASSIVE",
            BattleRuleError::WrongSkillSlot { .. } => "RULE_WRONG_SKILL_SLOT",
            BattleRuleError::SkillOnCooldown { .. } => "RULE_SKILL_ON_COOLDOWN",
            BattleRuleError::UltimateAlreadyUsed(_) => "RULE_ULTIMATE_ALREADY_USED",
            BattleRuleError::NoChargesLeft(_) => "RULE_NO_CHARGES_LEFT",
            BattleRuleError::SkillFailed(_) => "RULE_SKILL_FAILED",
            BattleRuleError::NoPendingTarget => "RULE_NO_PENDING_TARGET",
            BattleRuleError::NotOrthogonal => "RULE_NOT_ORTHOGONAL",
            BattleRuleError::SamePosition(_) => "RULE_SAME_POSITION",
            BattleRuleError::OutOfRange { .. } => "RULE_OUT_OF_RANGE",
            BattleRuleError::OutOfBounds(_) => "RULE_OUT_OF_BOUNDS",
            BattleRuleError::NotWalkable(_) => "RULE_NOT_WALKABLE",
            BattleRuleError::Occupied(_) => "RULE_OCCUPIED",
            BattleRuleError::PathBlocked(_) => "RULE_PATH_BLOCKED",
        }
    }
}
