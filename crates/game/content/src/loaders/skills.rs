//! Skill definition catalog loader.

use std::path::Path;

use tactics_core::SkillDefinition;

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for skill definitions from RON files.
///
/// RON format: `Vec<SkillDefinition>`. Skill behaviour is data: an
/// interpreted `Program`, the name of a native `Handler`, or `Default`.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let skills: Vec<SkillDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        ensure_unique("skill", skills.iter().map(|s| s.id.as_str()))?;
        for skill in &skills {
            if !skill.power_multiplier.is_finite() || skill.power_multiplier < 0.0 {
                anyhow::bail!(
                    "Skill '{}' has an invalid power multiplier {}",
                    skill.id,
                    skill.power_multiplier
                );
            }
        }
        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{Amount, DamageType, Selector, SkillLogic, SkillOp, SkillType};

    #[test]
    fn programs_and_handlers_parse() {
        let content = r#"[
            (
                id: "jab",
                name: "Jab",
                kind: active,
                skill_type: normal,
                power_multiplier: 0.5,
                range: single,
                action_point_cost: 1,
                logic: Program([
                    Pick(selector: nearest_enemy, range: Some(1)),
                    Damage(amount: Flat(3.0), damage_type: physical),
                ]),
            ),
            (
                id: "finisher",
                name: "Finisher",
                kind: active,
                skill_type: ultimate,
                charge_cost: Some(2),
                power_multiplier: 2.0,
                range: single,
                action_point_cost: 2,
                logic: Handler("execute"),
            ),
        ]"#;

        let skills = SkillLoader::parse(content).expect("valid catalog");
        assert_eq!(
            skills[0].logic,
            SkillLogic::Program(vec![
                SkillOp::Pick {
                    selector: Selector::NearestEnemy,
                    range: Some(1),
                },
                SkillOp::Damage {
                    amount: Amount::Flat(3.0),
                    damage_type: DamageType::Physical,
                },
            ])
        );
        assert_eq!(skills[0].cooldown_turns, 0);
        assert_eq!(skills[1].skill_type, SkillType::Ultimate);
        assert_eq!(skills[1].logic.handler_name(), Some("execute"));
        assert_eq!(skills[1].effective_charge_cost(1), 2);
    }

    #[test]
    fn negative_power_is_rejected() {
        let content = r#"[(
            id: "odd", name: "Odd", kind: active, skill_type: normal,
            power_multiplier: -1.0, range: single, action_point_cost: 1,
        )]"#;
        let err = SkillLoader::parse(content).expect_err("invalid power");
        assert!(err.to_string().contains("invalid power multiplier"));
    }
}
