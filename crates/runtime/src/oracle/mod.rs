//! Runtime wrappers around static battle content.
//!
//! These implementations expose `tactics-core` oracle traits and bundle them
//! into an [`OracleManager`] so sessions can build [`BattleEnv`] views on
//! demand. The data is immutable at runtime; dynamic state lives in each
//! session's [`tactics_core::BattleState`].
mod map;
mod pieces;
mod skills;

use std::sync::Arc;

use tactics_content::{ContentBundle, default_handlers};
use tactics_core::{BattleConfig, BattleEnv, HandlerRegistry};

pub use map::MapOracleImpl;
pub use pieces::PieceOracleImpl;
pub use skills::SkillOracleImpl;

/// Manages all oracle implementations and provides unified access.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) maps: Arc<MapOracleImpl>,
    pub(crate) pieces: Arc<PieceOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) handlers: Arc<HandlerRegistry>,
    pub(crate) config: BattleConfig,
}

impl OracleManager {
    pub fn new(
        maps: Arc<MapOracleImpl>,
        pieces: Arc<PieceOracleImpl>,
        skills: Arc<SkillOracleImpl>,
        handlers: Arc<HandlerRegistry>,
        config: BattleConfig,
    ) -> Self {
        Self {
            maps,
            pieces,
            skills,
            handlers,
            config,
        }
    }

    /// Oracles over a loaded bundle, with the default native handlers.
    pub fn from_bundle(bundle: ContentBundle) -> Self {
        Self::new(
            Arc::new(MapOracleImpl::new(bundle.maps, bundle.default_map)),
            Arc::new(PieceOracleImpl::new(bundle.pieces)),
            Arc::new(SkillOracleImpl::new(bundle.skills)),
            Arc::new(default_handlers()),
            bundle.config,
        )
    }

    /// Oracles over the built-in catalog.
    pub fn builtin() -> Self {
        Self::from_bundle(ContentBundle::builtin())
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Borrows every oracle as a [`BattleEnv`] for the engine.
    pub fn as_battle_env(&self) -> BattleEnv<'_> {
        BattleEnv::with_all(
            self.maps.as_ref(),
            self.pieces.as_ref(),
            self.skills.as_ref(),
            self.handlers.as_ref(),
            &self.config,
        )
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn maps(&self) -> &MapOracleImpl {
        &self.maps
    }

    pub fn pieces(&self) -> &PieceOracleImpl {
        &self.pieces
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for OracleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleManager")
            .field("maps", &self.maps.ids().collect::<Vec<_>>())
            .field("handlers", &self.handlers)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{MapOracle, PieceOracle, SkillId, SkillOracle};

    #[test]
    fn builtin_env_resolves_every_oracle() {
        let oracles = OracleManager::builtin();
        let env = oracles.as_battle_env();

        let maps = env.maps().expect("map oracle");
        assert!(maps.map(maps.default_map_id()).is_some());
        let pieces = env.pieces().expect("piece oracle");
        assert!(pieces.piece("knight").is_some());
        let skills = env.skills().expect("skill oracle");
        assert!(skills.skill(&SkillId::new("basic_attack")).is_some());
        assert!(env.handlers().expect("handlers").has_skill("execute"));
    }

    #[test]
    fn config_override_reaches_the_env() {
        let config = BattleConfig::default().strict();
        let oracles = OracleManager::builtin().with_config(config);
        assert_eq!(oracles.as_battle_env().config(), &config);
    }

    #[test]
    fn training_dummy_is_not_offered() {
        let oracles = OracleManager::builtin();
        let ids = oracles.pieces().selectable_ids();
        assert!(ids.contains(&"knight".to_owned()));
        assert!(!ids.contains(&"training_dummy".to_owned()));
    }
}
