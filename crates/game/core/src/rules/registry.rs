use crate::state::RuleId;

use super::types::{TriggerRule, TriggerType};

/// Ordered collection of rules owned by one battle.
///
/// Backs [`BattleState::rules`](crate::state::BattleState::rules). Piece-scoped
/// rules live on the pieces themselves. Evaluation order is insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleRegistry {
    rules: Vec<TriggerRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any rule with the same id.
    pub fn register(&mut self, rule: TriggerRule) {
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn unregister(&mut self, id: &RuleId) -> Option<TriggerRule> {
        let index = self.rules.iter().position(|r| &r.id == id)?;
        Some(self.rules.remove(index))
    }

    pub fn get(&self, id: &RuleId) -> Option<&TriggerRule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    pub fn get_mut(&mut self, id: &RuleId) -> Option<&mut TriggerRule> {
        self.rules.iter_mut().find(|r| &r.id == id)
    }

    /// Ids of live rules bound to `trigger`, in evaluation order.
    pub fn matching(&self, trigger: TriggerType) -> Vec<RuleId> {
        matching_ids(&self.rules, trigger)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerRule> {
        self.rules.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TriggerRule> {
        self.rules.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ticks every rule and drops the expired ones. Returns the removed ids.
    pub fn update_cooldowns(&mut self) -> Vec<RuleId> {
        tick_rules(&mut self.rules)
    }
}

pub(crate) fn matching_ids(rules: &[TriggerRule], trigger: TriggerType) -> Vec<RuleId> {
    rules
        .iter()
        .filter(|r| r.trigger == trigger && r.limits.is_live())
        .map(|r| r.id.clone())
        .collect()
}

pub(crate) fn tick_rules(rules: &mut Vec<TriggerRule>) -> Vec<RuleId> {
    for rule in rules.iter_mut() {
        rule.limits.tick();
    }
    let expired = rules
        .iter()
        .filter(|r| r.limits.is_expired())
        .map(|r| r.id.clone())
        .collect();
    rules.retain(|r| !r.limits.is_expired());
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleEffect, RuleLimits, RuleSource};

    fn rule(id: &str, trigger: TriggerType, limits: RuleLimits) -> TriggerRule {
        TriggerRule {
            id: RuleId::from(id),
            name: id.to_owned(),
            trigger,
            effect: RuleEffect::GrantChargePoints { amount: 1 },
            limits,
            owner: None,
            source: RuleSource::Custom,
        }
    }

    #[test]
    fn matching_filters_by_type_and_liveness() {
        let mut registry = RuleRegistry::new();
        registry.register(rule("a", TriggerType::BeginTurn, RuleLimits::default()));
        registry.register(rule("b", TriggerType::EndTurn, RuleLimits::default()));
        let mut cooling = RuleLimits::default().with_cooldown(1);
        cooling.record_use();
        registry.register(rule("c", TriggerType::BeginTurn, cooling));

        assert_eq!(registry.matching(TriggerType::BeginTurn), vec![RuleId::from("a")]);
    }

    #[test]
    fn update_cooldowns_removes_expired_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(rule(
            "short",
            TriggerType::BeginTurn,
            RuleLimits::default().with_duration(1),
        ));
        registry.register(rule("forever", TriggerType::BeginTurn, RuleLimits::default()));

        let removed = registry.update_cooldowns();
        assert_eq!(removed, vec![RuleId::from("short")]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&RuleId::from("forever")).is_some());
    }
}
