//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle means the caller built the environment for a narrower job
/// than the one it is now asking for, so those are treated as fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("MapOracle not available")]
    MapsNotAvailable,

    #[error("PieceOracle not available")]
    PiecesNotAvailable,

    #[error("SkillOracle not available")]
    SkillsNotAvailable,

    #[error("HandlerRegistry not available")]
    HandlersNotAvailable,

    #[error("piece template '{0}' not found")]
    PieceTemplateNotFound(String),

    #[error("skill definition '{0}' not found")]
    SkillNotFound(String),

    #[error("handler '{0}' is not registered")]
    HandlerNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            MapsNotAvailable | PiecesNotAvailable | SkillsNotAvailable | HandlersNotAvailable => {
                ErrorSeverity::Fatal
            }
            PieceTemplateNotFound(_) | SkillNotFound(_) | HandlerNotFound(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            MapsNotAvailable => "ORACLE_MAPS_NOT_AVAILABLE",
            PiecesNotAvailable => "ORACLE_PIECES_NOT_AVAILABLE",
            SkillsNotAvailable => "ORACLE_SKILLS_NOT_AVAILABLE",
            HandlersNotAvailable => "ORACLE_HANDLERS_NOT_AVAILABLE",
            PieceTemplateNotFound(_) => "ORACLE_PIECE_TEMPLATE_NOT_FOUND",
            SkillNotFound(_) => "ORACLE_SKILL_NOT_FOUND",
            HandlerNotFound(_) => "ORACLE_HANDLER_NOT_FOUND",
        }
    }
}
