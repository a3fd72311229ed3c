//! Repository layer for room snapshots.
//!
//! Repositories handle data that CHANGES during play: one snapshot per room,
//! holding the serialized battle, its action history and an integrity digest.
//! Static content (maps, pieces, skills) is served by oracles, not here.

mod error;
mod file;
mod memory;
mod room;

pub use error::RepositoryError;
pub use file::FileRoomRepository;
pub use memory::InMemoryRoomRepository;
pub use room::{RoomSnapshot, RoomStatus};

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Storage for room snapshots, keyed by room id.
pub trait RoomRepository: Send + Sync {
    fn save(&self, room: &RoomSnapshot) -> Result<()>;

    /// `Ok(None)` when the room was never saved.
    fn load(&self, id: &str) -> Result<Option<RoomSnapshot>>;

    fn exists(&self, id: &str) -> bool;

    /// Deleting an unknown room is not an error.
    fn delete(&self, id: &str) -> Result<()>;

    /// Room ids in ascending order.
    fn list(&self) -> Result<Vec<String>>;
}
