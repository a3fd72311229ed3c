//! Skill definitions implementing [`tactics_core::SkillOracle`].
use std::collections::BTreeMap;

use tactics_core::{SkillDefinition, SkillId, SkillOracle};

/// SkillOracle implementation keyed by skill id.
pub struct SkillOracleImpl {
    skills: BTreeMap<SkillId, SkillDefinition>,
}

impl SkillOracleImpl {
    pub fn new(skills: impl IntoIterator<Item = SkillDefinition>) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition> {
        self.skills.get(id).cloned()
    }

    fn all_skills(&self) -> Vec<SkillDefinition> {
        self.skills.values().cloned().collect()
    }
}
