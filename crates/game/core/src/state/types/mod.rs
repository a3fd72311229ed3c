pub mod common;
pub mod log;
pub mod pending;
pub mod piece;
pub mod player;
pub mod status;
pub mod turn;

pub use common::{INFINITE, PieceId, PlayerId, Position, RuleId, SkillId, StatusId};
pub use log::{ActionLogKind, BattleActionLog};
pub use pending::PendingTargetSelection;
pub use piece::{PieceInstance, SkillState, UNLIMITED_USES};
pub use player::PlayerTurnMeta;
pub use status::{StatusEffect, StatusEffectKind, StatusEffectSpec, StatusEffects};
pub use turn::{TurnActions, TurnPhase, TurnState};

pub(crate) use common::tick_down;
