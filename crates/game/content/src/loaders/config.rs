//! Battle configuration loader.

use std::path::Path;

use tactics_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys that are absent keep their default values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_action_points == 0 {
            anyhow::bail!("max_action_points must be positive");
        }
        if config.initial_action_points > config.max_action_points {
            anyhow::bail!(
                "initial_action_points ({}) exceeds max_action_points ({})",
                config.initial_action_points,
                config.max_action_points
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("max_action_points = 6\nstrict_content = true\n")
            .expect("valid config");
        assert_eq!(config.max_action_points, 6);
        assert!(config.strict_content);
        assert_eq!(config.move_cost, BattleConfig::DEFAULT_MOVE_COST);
        assert!(config.enforce_move_path);
    }

    #[test]
    fn inconsistent_action_points_are_rejected() {
        let err = ConfigLoader::parse("max_action_points = 2\ninitial_action_points = 3\n")
            .expect_err("invalid config");
        assert!(err.to_string().contains("exceeds"));
    }
}
