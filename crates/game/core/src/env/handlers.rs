//! Registry of statically compiled skill and rule handlers.
//!
//! Definitions and rules refer to handlers by name only. The registry is built
//! once at startup and lent to the engine through [`BattleEnv`](super::BattleEnv),
//! so persisted battles never carry executable values.

use std::collections::BTreeMap;
use std::fmt;

use crate::env::BattleEnv;
use crate::rules::{RuleFault, RuleInvocation, RuleOutcome, TriggerContext};
use crate::skill::{SkillInterrupt, SkillOutcome, SkillSandbox};
use crate::state::BattleState;

/// Native skill logic.
pub type SkillHandler = fn(&mut SkillSandbox<'_>) -> Result<SkillOutcome, SkillInterrupt>;

/// Native rule effect.
pub type RuleHandler = fn(
    &mut BattleState,
    &BattleEnv<'_>,
    &TriggerContext,
    &RuleInvocation,
) -> Result<RuleOutcome, RuleFault>;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    skills: BTreeMap<String, SkillHandler>,
    rules: BTreeMap<String, RuleHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_skill(&mut self, name: impl Into<String>, handler: SkillHandler) -> &mut Self {
        self.skills.insert(name.into(), handler);
        self
    }

    pub fn register_rule(&mut self, name: impl Into<String>, handler: RuleHandler) -> &mut Self {
        self.rules.insert(name.into(), handler);
        self
    }

    pub fn skill(&self, name: &str) -> Option<SkillHandler> {
        self.skills.get(name).copied()
    }

    pub fn rule(&self, name: &str) -> Option<RuleHandler> {
        self.rules.get(name).copied()
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("skills", &self.skills.keys().collect::<Vec<_>>())
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
