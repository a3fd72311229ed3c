//! Content factory for building a content bundle from data files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::builtins::ContentBundle;
use crate::loaders::{ConfigLoader, LoadResult, MapLoader, PieceLoader, SkillLoader};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── pieces.ron
/// ├── skills.ron
/// └── maps/
///     ├── training_grounds.ron
///     └── lava_rift.ron
/// ```
///
/// Every entry is optional. Whatever is present is overlaid on the built-in
/// catalog, replacing entries with the same id.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<tactics_core::BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load piece templates from `pieces.ron`.
    pub fn load_pieces(&self) -> LoadResult<Vec<tactics_core::PieceTemplate>> {
        PieceLoader::load(&self.data_dir.join("pieces.ron"))
    }

    /// Load skill definitions from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<tactics_core::SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<tactics_core::BoardMap> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load every map in `maps/`.
    pub fn load_maps(&self) -> LoadResult<Vec<tactics_core::BoardMap>> {
        MapLoader::load_dir(&self.data_dir.join("maps"))
    }

    /// Built-in catalog overlaid with every data file that exists.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        if !self.data_dir.is_dir() {
            anyhow::bail!("Content directory {} does not exist", self.data_dir.display());
        }
        let mut bundle = ContentBundle::builtin();
        let mut overlay = ContentBundle {
            maps: Vec::new(),
            pieces: Vec::new(),
            skills: Vec::new(),
            config: bundle.config,
            default_map: bundle.default_map.clone(),
        };

        if self.data_dir.join("config.toml").is_file() {
            overlay.config = self.load_config()?;
        }
        if self.data_dir.join("pieces.ron").is_file() {
            overlay.pieces = self.load_pieces()?;
        }
        if self.data_dir.join("skills.ron").is_file() {
            overlay.skills = self.load_skills()?;
        }
        if self.data_dir.join("maps").is_dir() {
            overlay.maps = self.load_maps()?;
        }
        debug!(
            target: "tactics::content",
            dir = %self.data_dir.display(),
            maps = overlay.maps.len(),
            pieces = overlay.pieces.len(),
            skills = overlay.skills.len(),
            "content files loaded"
        );

        bundle.merge(overlay);
        let missing = bundle.missing_skills();
        if !missing.is_empty() {
            warn!(target: "tactics::content", ?missing, "templates reference undefined skills");
        }
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::SkillId;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn empty_directory_yields_builtins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bundle = ContentFactory::new(dir.path()).load_bundle().expect("bundle");
        assert_eq!(bundle, ContentBundle::builtin());
    }

    #[test]
    fn files_overlay_the_builtin_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "kill_charge_reward = 2\n").expect("write");
        std::fs::write(
            dir.path().join("skills.ron"),
            r#"[(
                id: "basic_attack", name: "Heavy Attack", kind: active, skill_type: normal,
                power_multiplier: 1.25, range: single, action_point_cost: 1,
            )]"#,
        )
        .expect("write");
        std::fs::create_dir(dir.path().join("maps")).expect("mkdir");
        std::fs::write(dir.path().join("maps").join("pit.ron"), "(dimensions: (4, 4))").expect("write");

        let bundle = ContentFactory::new(dir.path()).load_bundle().expect("bundle");

        assert_eq!(bundle.config.kill_charge_reward, 2);
        let attack = bundle.skill(&SkillId::new("basic_attack")).expect("skill");
        assert_eq!(attack.name, "Heavy Attack");
        assert!(bundle.map("pit").is_some());
        assert!(bundle.map("training_grounds").is_some());
        assert_eq!(bundle.pieces, ContentBundle::builtin().pieces);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pieces.ron"), "[(id: ").expect("write");
        let err = ContentFactory::new(dir.path()).load_bundle().expect_err("broken");
        assert!(err.to_string().contains("piece catalog"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = ContentFactory::new("/definitely/not/here").load_bundle().expect_err("missing");
        assert!(err.to_string().contains("does not exist"));
    }
}
