//! Persisted room layout.

use serde::{Deserialize, Serialize};
use tactics_core::{BattleAction, BattleState, PlayerId};

use super::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    InProgress,
    Finished,
}

/// One JSON document per room.
///
/// `digest` is the hex-encoded SHA-256 of the battle state and is checked
/// before a stored battle is resumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub id: String,
    pub status: RoomStatus,
    pub players: Vec<PlayerId>,
    pub battle_state: BattleState,
    pub actions: Vec<BattleAction>,
    pub digest: String,
}

impl RoomSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
