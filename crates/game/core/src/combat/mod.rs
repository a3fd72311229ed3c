//! Combat resolution.
//!
//! Damage and healing are the only ways hp changes during a battle. Both run
//! the relevant trigger chain, so shields, thorns, lifesteal and on-kill
//! rewards all compose through the rule system.
//!
//! # Core Functions
//!
//! - `compute_damage`: defense mitigation and the one-damage floor
//! - `deal_damage`: hp reduction, kill removal, kill reward, damage triggers
//! - `heal_damage`: capped healing and heal triggers

mod damage;
mod heal;

pub use damage::{DamageReport, DamageType, compute_damage, deal_damage};
pub use heal::{HealReport, heal_damage};

use crate::error::{ErrorSeverity, GameError};
use crate::state::PieceId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("piece {0} is already dead")]
    PieceDead(PieceId),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::PieceNotFound(_) => "COMBAT_PIECE_NOT_FOUND",
            CombatError::PieceDead(_) => "COMBAT_PIECE_DEAD",
        }
    }
}
