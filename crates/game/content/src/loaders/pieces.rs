//! Piece template catalog loader.

use std::path::Path;

use tactics_core::PieceTemplate;

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for piece templates from RON files.
///
/// RON format: `Vec<PieceTemplate>`.
pub struct PieceLoader;

impl PieceLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<PieceTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<PieceTemplate>> {
        let templates: Vec<PieceTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse piece catalog RON: {}", e))?;

        ensure_unique("piece", templates.iter().map(|t| t.id.as_str()))?;
        for template in &templates {
            if template.stats.max_hp == 0 {
                anyhow::bail!("Piece '{}' has zero max_hp", template.id);
            }
        }
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::Faction;

    #[test]
    fn templates_default_to_selectable() {
        let content = r#"[
            (
                id: "guard",
                name: "Guard",
                faction: red,
                stats: (max_hp: 30, attack: 6, defense: 2, move_range: 2),
                skills: [(skill_id: "jab")],
            ),
            (
                id: "lurker",
                name: "Lurker",
                faction: blue,
                stats: (max_hp: 18, attack: 9),
                skills: [],
                selectable: false,
            ),
        ]"#;

        let templates = PieceLoader::parse(content).expect("valid catalog");
        assert_eq!(templates.len(), 2);
        assert!(templates[0].selectable);
        assert_eq!(templates[0].skills[0].initial_charges, 0);
        assert_eq!(templates[1].faction, Faction::Blue);
        assert_eq!(templates[1].stats.move_range, 0);
        assert!(!templates[1].selectable);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let entry = r#"(id: "guard", name: "Guard", faction: red, stats: (max_hp: 1, attack: 1), skills: [])"#;
        let content = format!("[{entry}, {entry}]");
        let err = PieceLoader::parse(&content).expect_err("duplicate");
        assert!(err.to_string().contains("Duplicate piece id 'guard'"));
    }
}
