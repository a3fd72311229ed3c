//! Runtime orchestration for tactics battles.
//!
//! This crate wires the rules engine to loaded content and to storage.
//! Consumers build an [`OracleManager`] from a content bundle, hand it to a
//! [`SessionManager`], and drive battles by id.
//!
//! Modules are organized by responsibility:
//! - [`oracle`] adapts static content to the engine's oracle traits
//! - [`session`] owns live battles and serializes writers per battle
//! - [`outcome`] decides when a battle is over
//! - [`repository`] persists rooms as JSON snapshots with an integrity digest
//! - [`error`] maps every failure to a client or server fault
pub mod error;
pub mod oracle;
pub mod outcome;
pub mod repository;
pub mod session;

pub use error::{Result, RuntimeError};
pub use oracle::{MapOracleImpl, OracleManager, PieceOracleImpl, SkillOracleImpl};
pub use outcome::{BattleOutcome, battle_outcome};
pub use repository::{
    FileRoomRepository, InMemoryRoomRepository, RepositoryError, RoomRepository, RoomSnapshot,
    RoomStatus,
};
pub use session::{ActionReceipt, BattleSession, BattleSetup, SessionManager, state_digest};
