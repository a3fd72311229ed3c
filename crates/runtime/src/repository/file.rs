//! File-based [`RoomRepository`] implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, RoomRepository, RoomSnapshot};

/// Stores each room as `{id}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash never leaves a half-written room behind.
#[derive(Debug, Clone)]
pub struct FileRoomRepository {
    base_dir: PathBuf,
}

impl FileRoomRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn room_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidId(id.to_owned()));
        }
        Ok(self.base_dir.join(format!("{id}.json")))
    }
}

impl RoomRepository for FileRoomRepository {
    fn save(&self, room: &RoomSnapshot) -> Result<()> {
        let path = self.room_path(&room.id)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, room.to_json()?)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(target: "tactics::runtime", room = %room.id, path = %path.display(), "saved room");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<RoomSnapshot>> {
        let path = self.room_path(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let room = RoomSnapshot::from_json(&json)?;

        tracing::debug!(target: "tactics::runtime", room = %id, path = %path.display(), "loaded room");
        Ok(Some(room))
    }

    fn exists(&self, id: &str) -> bool {
        self.room_path(id).map(|path| path.exists()).unwrap_or(false)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.room_path(id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(target: "tactics::runtime", room = %id, "deleted room");
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_owned());
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
