//! Error types for the action execution pipeline.

use crate::action::BattleRuleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::InvariantViolation;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced by [`apply_battle_action`](super::apply_battle_action).
///
/// The input state is untouched in every case.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    /// Expected, user-facing rejection.
    #[error(transparent)]
    Rule(#[from] BattleRuleError),

    /// The action produced a structurally invalid battle.
    #[error("battle invariant violated: {0}")]
    Invariant(TransitionPhaseError<InvariantViolation>),
}

impl ExecuteError {
    pub fn invariant(phase: TransitionPhase, violation: InvariantViolation) -> Self {
        ExecuteError::Invariant(TransitionPhaseError::new(phase, violation))
    }

    pub fn rule(&self) -> Option<&BattleRuleError> {
        match self {
            ExecuteError::Rule(error) => Some(error),
            ExecuteError::Invariant(_) => None,
        }
    }

    pub fn is_rule_violation(&self) -> bool {
        matches!(self, ExecuteError::Rule(_))
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Rule(error) => error.severity(),
            ExecuteError::Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Rule(error) => error.error_code(),
            ExecuteError::Invariant(inner) => inner.error.error_code(),
        }
    }
}
