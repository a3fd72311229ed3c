//! Data-driven content definitions and loaders.
//!
//! This crate houses the static battle content and the loaders for RON/TOML
//! data files:
//! - Built-in skills, piece templates and maps
//! - Native skill and rule handlers referenced by name from definitions
//! - Skill, piece and map catalogs (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! Content is consumed by runtime oracles and never appears in battle state
//! except as value copies taken at battle creation.

pub mod builtins;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use builtins::{ContentBundle, default_handlers};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, MapLoader, PieceLoader, SkillLoader};
