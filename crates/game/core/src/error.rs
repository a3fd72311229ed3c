//! Error classification shared by every tactics-core error.
//!
//! Concrete errors live next to the code that raises them
//! ([`BattleRuleError`](crate::action::BattleRuleError),
//! [`MapError`](crate::env::MapError), [`InvariantViolation`](crate::state::InvariantViolation)).
//! Each implements [`GameError`] so boundary layers can tell a rejected action
//! from a broken battle.

/// How the caller should treat a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same intent may succeed with different parameters or later in the
    /// turn (occupied destination, not enough action points).
    Recoverable,
    /// The action can never be legal as submitted (wrong turn, unknown piece).
    Validation,
    /// The engine produced an inconsistent battle.
    Internal,
    /// The battle cannot continue (corrupted persisted state).
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }

    /// 4xx class: the caller was at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }
}

/// Severity and a stable machine-readable code.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier such as `RULE_NOT_YOUR_TURN`. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
