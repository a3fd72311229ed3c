//! Headless tactics client.
//!
//! Loads content, seats two players, replays a scripted action list through a
//! [`SessionManager`] and reports the outcome. The binary in `main.rs` wires
//! this to the environment; tests call [`run`] directly.
pub mod config;
pub mod replay;
pub mod script;

use std::sync::Arc;

use anyhow::{Context, Result};
use tactics_content::{ContentBundle, ContentFactory};
use tactics_runtime::{BattleSetup, FileRoomRepository, OracleManager, SessionManager};

pub use config::ClientConfig;
pub use replay::{ReplaySummary, replay};

/// Loads the configured content, or the built-ins when no directory is set.
pub fn load_content(config: &ClientConfig) -> Result<ContentBundle> {
    match &config.content_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_bundle()
            .with_context(|| format!("Failed to load content from {}", dir.display())),
        None => Ok(ContentBundle::builtin()),
    }
}

/// Plays one scripted battle end to end.
pub async fn run(config: &ClientConfig) -> Result<ReplaySummary> {
    let bundle = load_content(config)?;
    tracing::info!(
        maps = bundle.maps.len(),
        pieces = bundle.pieces.len(),
        skills = bundle.skills.len(),
        default_map = %bundle.default_map,
        "content loaded"
    );

    let mut sessions = SessionManager::new(OracleManager::from_bundle(bundle));
    if let Some(dir) = &config.rooms_dir {
        let repository = FileRoomRepository::new(dir)
            .with_context(|| format!("Failed to open room directory {}", dir.display()))?;
        sessions = sessions.with_repository(Arc::new(repository));
    }

    let actions = match &config.script {
        Some(path) => script::load_script(path)?,
        None => script::demo_script()?,
    };

    let [first, second] = &config.players;
    let mut setup = BattleSetup::new(first.as_str(), second.as_str());
    if let Some(map) = &config.map_id {
        setup = setup.on_map(map.as_str());
    }
    let state = sessions
        .create_battle(config.battle_id.as_str(), setup)
        .await
        .context("Failed to create battle")?;
    tracing::info!(
        battle = %config.battle_id,
        map = %state.map.name,
        pieces = state.pieces.len(),
        actions = actions.len(),
        "battle started"
    );

    let summary = replay(&sessions, &config.battle_id, actions)
        .await
        .context("Replay aborted")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_runtime::{BattleOutcome, RoomRepository};

    #[tokio::test]
    async fn demo_ends_with_alice_winning() {
        let summary = run(&ClientConfig::default()).await.expect("demo runs");

        assert_eq!(
            summary.outcome,
            BattleOutcome::Victory {
                winner: "alice".into()
            }
        );
        assert_eq!(summary.skipped, 0);
        assert!(summary.rejected.iter().any(|(step, _)| *step == 1));
    }

    #[tokio::test]
    async fn finished_room_is_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ClientConfig {
            rooms_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        };

        run(&config).await.expect("demo runs");

        let repository = FileRoomRepository::new(dir.path()).expect("repository");
        let room = repository.load("demo").expect("readable").expect("saved");
        assert_eq!(room.status, tactics_runtime::RoomStatus::Finished);
    }

    #[test]
    fn missing_content_dir_is_an_error() {
        let config = ClientConfig {
            content_dir: Some("/definitely/not/here".into()),
            ..ClientConfig::default()
        };
        let err = load_content(&config).expect_err("missing dir");
        assert!(format!("{err:#}").contains("does not exist"));
    }
}
