//! Scripted action lists.
//!
//! A script is a RON list of [`BattleAction`]s, replayed in order:
//!
//! ```ron
//! [
//!     Move((player_id: "alice", piece_id: "red-1", to: (x: 1, y: 1))),
//!     EndTurn((player_id: "alice")),
//! ]
//! ```
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tactics_core::BattleAction;

/// The bundled opening skirmish.
pub const DEMO_SCRIPT: &str = include_str!("../demos/duel.ron");

pub fn parse_script(content: &str) -> Result<Vec<BattleAction>> {
    ron::from_str(content).context("Failed to parse action script")
}

pub fn load_script(path: &Path) -> Result<Vec<BattleAction>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read action script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("In {}", path.display()))
}

pub fn demo_script() -> Result<Vec<BattleAction>> {
    parse_script(DEMO_SCRIPT)
}
