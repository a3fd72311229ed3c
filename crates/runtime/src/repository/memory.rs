use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, RoomRepository, RoomSnapshot};

/// Keeps snapshots in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<BTreeMap<String, RoomSnapshot>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomRepository for InMemoryRoomRepository {
    fn save(&self, room: &RoomSnapshot) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| RepositoryError::LockPoisoned)?;
        rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<RoomSnapshot>> {
        let rooms = self.rooms.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(rooms.get(id).cloned())
    }

    fn exists(&self, id: &str) -> bool {
        self.rooms
            .read()
            .map(|rooms| rooms.contains_key(id))
            .unwrap_or(false)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut rooms = self.rooms.write().map_err(|_| RepositoryError::LockPoisoned)?;
        rooms.remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let rooms = self.rooms.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(rooms.keys().cloned().collect())
    }
}
