//! Content loaders for reading battle data from files.
//!
//! Skills, pieces and maps are RON files, the battle configuration is TOML.
//! Every loader returns plain `tactics-core` values; [`ContentFactory`]
//! overlays them on the built-in catalog.

pub mod config;
pub mod factory;
pub mod map;
pub mod pieces;
pub mod skills;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use pieces::PieceLoader;
pub use skills::SkillLoader;

use std::collections::BTreeSet;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique<'a>(
    what: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", what, id);
        }
    }
    Ok(())
}
