use crate::combat::CombatError;
use crate::env::OracleError;
use crate::state::{PieceId, PlayerId, Position, RuleId, SkillId, StatusId};
use crate::status::StatusError;

use super::types::{RuleParams, TriggerType};

/// Who caused an effect and how deep in the trigger chain it happens.
///
/// Threaded through damage, healing and status application so nested rule
/// evaluation can be bounded by `max_trigger_depth`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub piece: Option<PieceId>,
    pub depth: u8,
}

impl Origin {
    /// Effect with no responsible piece (map hazards, debug grants).
    pub fn system() -> Self {
        Self::default()
    }

    pub fn piece(piece: PieceId) -> Self {
        Self {
            piece: Some(piece),
            depth: 0,
        }
    }

    pub fn at_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Same responsible piece, one level deeper.
    pub fn nested(&self) -> Self {
        Self {
            piece: self.piece.clone(),
            depth: self.depth.saturating_add(1),
        }
    }
}

/// Event payload handed to every matching rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerContext {
    pub trigger: TriggerType,
    pub source_piece: Option<PieceId>,
    pub target_piece: Option<PieceId>,
    pub player_id: Option<PlayerId>,
    pub skill_id: Option<SkillId>,
    pub status_id: Option<StatusId>,
    pub damage: Option<u32>,
    pub heal: Option<u32>,
    pub position: Option<Position>,
    pub depth: u8,
    /// Skips the global registry and only scans the source piece's rules.
    pub piece_rules_only: bool,
}

impl TriggerContext {
    pub fn new(trigger: TriggerType) -> Self {
        Self {
            trigger,
            source_piece: None,
            target_piece: None,
            player_id: None,
            skill_id: None,
            status_id: None,
            damage: None,
            heal: None,
            position: None,
            depth: 0,
            piece_rules_only: false,
        }
    }

    pub fn with_source(mut self, piece: impl Into<Option<PieceId>>) -> Self {
        self.source_piece = piece.into();
        self
    }

    pub fn with_target(mut self, piece: impl Into<Option<PieceId>>) -> Self {
        self.target_piece = piece.into();
        self
    }

    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player_id = Some(player);
        self
    }

    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skill_id = Some(skill);
        self
    }

    pub fn with_status(mut self, status: StatusId) -> Self {
        self.status_id = Some(status);
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_heal(mut self, heal: u32) -> Self {
        self.heal = Some(heal);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn at_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn piece_rules_only(mut self) -> Self {
        self.piece_rules_only = true;
        self
    }

    /// Origin for effects a rule causes on behalf of the context source.
    pub fn source_origin(&self) -> Origin {
        Origin {
            piece: self.source_piece.clone(),
            depth: self.depth.saturating_add(1),
        }
    }
}

/// Result of a single rule evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub blocked: bool,
}

impl RuleOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            blocked: false,
        }
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            blocked: true,
        }
    }

    /// The rule matched but had nothing to do; it does not count as a use.
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Aggregated result of [`check_triggers`](super::check_triggers).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerOutcome {
    /// False when at least one rule faulted.
    pub success: bool,
    pub messages: Vec<String>,
    pub blocked: bool,
}

impl Default for TriggerOutcome {
    fn default() -> Self {
        Self {
            success: true,
            messages: Vec::new(),
            blocked: false,
        }
    }
}

impl TriggerOutcome {
    pub fn merge(&mut self, other: TriggerOutcome) {
        self.success &= other.success;
        self.blocked |= other.blocked;
        self.messages.extend(other.messages);
    }
}

/// Identity and parameters of the rule a native handler runs for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleInvocation {
    pub rule_id: RuleId,
    pub owner: Option<PieceId>,
    pub params: RuleParams,
}

impl RuleInvocation {
    pub fn param(&self, key: &str) -> Option<i64> {
        self.params.get(key).copied()
    }

    pub fn param_or(&self, key: &str, default: i64) -> i64 {
        self.param(key).unwrap_or(default)
    }
}

/// Fault raised while evaluating a rule. Caught and logged by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleFault {
    #[error("piece {0} not found")]
    MissingPiece(PieceId),

    #[error("rule has no owning piece")]
    NoOwner,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("handler failed: {0}")]
    Handler(String),
}
