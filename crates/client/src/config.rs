//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Where content, the action script and saved rooms come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory overlaying the built-in content. `None` plays the built-ins.
    pub content_dir: Option<PathBuf>,
    /// Map to fight on. `None` uses the content's default map.
    pub map_id: Option<String>,
    /// RON action list to replay. `None` replays the bundled demo.
    pub script: Option<PathBuf>,
    /// Directory receiving the final room snapshot.
    pub rooms_dir: Option<PathBuf>,
    pub players: [String; 2],
    pub battle_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            map_id: None,
            script: None,
            rooms_dir: None,
            players: ["alice".to_owned(), "bob".to_owned()],
            battle_id: "demo".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_CONTENT_DIR` - Content directory (default: built-in content)
    /// - `TACTICS_MAP` - Map id (default: the content's default map)
    /// - `TACTICS_SCRIPT` - Action script (default: bundled demo)
    /// - `TACTICS_ROOMS_DIR` - Save the finished room as JSON here (default: off)
    /// - `TACTICS_PLAYERS` - Two comma-separated player ids (default: alice,bob)
    /// - `TACTICS_BATTLE_ID` - Room id (default: demo)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.content_dir = read_env::<PathBuf>("TACTICS_CONTENT_DIR");
        config.map_id = read_env::<String>("TACTICS_MAP");
        config.script = read_env::<PathBuf>("TACTICS_SCRIPT");
        config.rooms_dir = read_env::<PathBuf>("TACTICS_ROOMS_DIR");

        if let Some(players) = read_env::<String>("TACTICS_PLAYERS") {
            if let Some((first, second)) = players.split_once(',') {
                config.players = [first.trim().to_owned(), second.trim().to_owned()];
            } else {
                tracing::warn!(%players, "TACTICS_PLAYERS needs two comma-separated ids, keeping defaults");
            }
        }
        if let Some(id) = read_env::<String>("TACTICS_BATTLE_ID") {
            config.battle_id = id;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())?
        .parse()
        .ok()
}
