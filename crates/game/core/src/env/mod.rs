//! Traits describing read-only battle data.
//!
//! Oracles expose static maps, piece templates and skill definitions. The
//! [`BattleEnv`] aggregate bundles them together with the handler registry and
//! the battle configuration so the engine can reach everything it needs without
//! hard coupling to concrete implementations.
mod error;
mod handlers;
mod map;
mod pieces;
mod skills;

pub use error::OracleError;
pub use handlers::{HandlerRegistry, RuleHandler, SkillHandler};
pub use map::{BoardMap, MapError, MapOracle, Tile, TileKind};
pub use pieces::{Faction, PieceOracle, PieceStats, PieceTemplate, TemplateSkill};
pub use skills::{SkillDefinition, SkillKind, SkillOracle, SkillRange, SkillType};

use std::fmt;

use crate::config::{BattleConfig, DEFAULT_CONFIG};

/// Aggregates read-only oracles required by the reducer and skill engine.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    maps: Option<&'a dyn MapOracle>,
    pieces: Option<&'a dyn PieceOracle>,
    skills: Option<&'a dyn SkillOracle>,
    handlers: Option<&'a HandlerRegistry>,
    config: &'a BattleConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        maps: Option<&'a dyn MapOracle>,
        pieces: Option<&'a dyn PieceOracle>,
        skills: Option<&'a dyn SkillOracle>,
        handlers: Option<&'a HandlerRegistry>,
        config: &'a BattleConfig,
    ) -> Self {
        Self {
            maps,
            pieces,
            skills,
            handlers,
            config,
        }
    }

    pub fn with_all(
        maps: &'a dyn MapOracle,
        pieces: &'a dyn PieceOracle,
        skills: &'a dyn SkillOracle,
        handlers: &'a HandlerRegistry,
        config: &'a BattleConfig,
    ) -> Self {
        Self::new(
            Some(maps),
            Some(pieces),
            Some(skills),
            Some(handlers),
            config,
        )
    }

    /// Environment without oracles, using the default configuration.
    ///
    /// Sufficient for applying actions to an existing battle whose skills only
    /// use interpreted programs.
    pub fn empty() -> Self {
        Self {
            maps: None,
            pieces: None,
            skills: None,
            handlers: None,
            config: &DEFAULT_CONFIG,
        }
    }

    pub fn with_config(mut self, config: &'a BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_handlers(mut self, handlers: &'a HandlerRegistry) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Returns the MapOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::MapsNotAvailable` if no map oracle was provided.
    pub fn maps(&self) -> Result<&'a dyn MapOracle, OracleError> {
        self.maps.ok_or(OracleError::MapsNotAvailable)
    }

    /// Returns the PieceOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::PiecesNotAvailable` if no piece oracle was provided.
    pub fn pieces(&self) -> Result<&'a dyn PieceOracle, OracleError> {
        self.pieces.ok_or(OracleError::PiecesNotAvailable)
    }

    /// Returns the SkillOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SkillsNotAvailable` if no skill oracle was provided.
    pub fn skills(&self) -> Result<&'a dyn SkillOracle, OracleError> {
        self.skills.ok_or(OracleError::SkillsNotAvailable)
    }

    /// Returns the handler registry, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::HandlersNotAvailable` if no registry was provided.
    pub fn handlers(&self) -> Result<&'a HandlerRegistry, OracleError> {
        self.handlers.ok_or(OracleError::HandlersNotAvailable)
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }
}

impl fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleEnv")
            .field("maps", &self.maps.is_some())
            .field("pieces", &self.pieces.is_some())
            .field("skills", &self.skills.is_some())
            .field("handlers", &self.handlers)
            .field("config", self.config)
            .finish()
    }
}
