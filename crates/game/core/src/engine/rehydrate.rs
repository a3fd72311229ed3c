//! Restores executable bindings on a battle loaded from storage.
//!
//! Persisted battles carry only data: skill logic and rule effects reference
//! native handlers by name. Before a loaded battle accepts actions again every
//! name must resolve, skill definitions are refreshed from the repository, and
//! status rules are reconciled with the authoritative status lists.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::env::{BattleEnv, OracleError, SkillDefinition};
use crate::error::{ErrorSeverity, GameError};
use crate::rules::{RuleEffect, TriggerRule};
use crate::skill::{SkillLogic, SkillOp};
use crate::state::{BattleState, RuleId, SkillId, StatusId};
use crate::status::status_rule;

/// What [`rehydrate`] changed or could not resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RehydrationReport {
    /// Definitions replaced with the repository's current version.
    pub refreshed_skills: Vec<SkillId>,
    /// Skills referenced by pieces that neither the battle nor the repository knows.
    pub missing_skills: Vec<SkillId>,
    /// Handler names that the registry cannot resolve.
    pub unresolved_handlers: Vec<String>,
    /// Status effects whose tick rule had to be re-synthesized.
    pub restored_status_rules: Vec<StatusId>,
    /// Status rules removed because their effect no longer exists.
    pub dropped_rules: Vec<RuleId>,
}

impl RehydrationReport {
    /// True when every reference resolved.
    pub fn is_clean(&self) -> bool {
        self.missing_skills.is_empty() && self.unresolved_handlers.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RehydrationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("skill definitions missing: {0:?}")]
    MissingSkills(Vec<SkillId>),

    #[error("handlers not registered: {0:?}")]
    UnresolvedHandlers(Vec<String>),
}

impl GameError for RehydrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            RehydrationError::Oracle(_) => "REHYDRATE_ORACLE",
            RehydrationError::MissingSkills(_) => "REHYDRATE_MISSING_SKILLS",
            RehydrationError::UnresolvedHandlers(_) => "REHYDRATE_UNRESOLVED_HANDLERS",
        }
    }
}

/// Re-resolves every by-name reference in `state`.
///
/// With lenient content, unresolved references are reported and logged; the
/// engine falls back to the default attack for skills and skips rules at
/// runtime. With strict content they are errors and `state` is left as the
/// caller passed it.
pub fn rehydrate(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
) -> Result<RehydrationReport, RehydrationError> {
    let strict = env.config().strict_content;
    let mut next = state.clone();
    let mut report = RehydrationReport::default();

    refresh_skills(&mut next, env, strict, &mut report)?;
    check_handlers(&next, env, strict, &mut report)?;
    reconcile_status_rules(&mut next, &mut report);

    if !report.is_clean() {
        warn!(
            target: "tactics::engine",
            missing_skills = report.missing_skills.len(),
            unresolved_handlers = report.unresolved_handlers.len(),
            "battle rehydrated with unresolved references"
        );
    }
    debug!(
        target: "tactics::engine",
        refreshed = report.refreshed_skills.len(),
        restored = report.restored_status_rules.len(),
        dropped = report.dropped_rules.len(),
        "battle rehydrated"
    );
    *state = next;
    Ok(report)
}

fn refresh_skills(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    strict: bool,
    report: &mut RehydrationReport,
) -> Result<(), RehydrationError> {
    let referenced: BTreeSet<SkillId> = state
        .pieces
        .iter()
        .chain(&state.graveyard)
        .flat_map(|piece| piece.skills.iter().map(|s| s.skill_id.clone()))
        .chain(state.skills_by_id.keys().cloned())
        .collect();

    let oracle = match env.skills() {
        Ok(oracle) => Some(oracle),
        Err(error) if strict => return Err(error.into()),
        Err(error) => {
            warn!(target: "tactics::engine", %error, "skill definitions not refreshed");
            None
        }
    };

    for id in referenced {
        match oracle.and_then(|o| o.skill(&id)) {
            Some(definition) => {
                state.skills_by_id.insert(id.clone(), definition);
                report.refreshed_skills.push(id);
            }
            None if state.skills_by_id.contains_key(&id) => {}
            None => report.missing_skills.push(id),
        }
    }

    if strict && !report.missing_skills.is_empty() {
        return Err(RehydrationError::MissingSkills(report.missing_skills.clone()));
    }
    Ok(())
}

fn check_handlers(
    state: &BattleState,
    env: &BattleEnv<'_>,
    strict: bool,
    report: &mut RehydrationReport,
) -> Result<(), RehydrationError> {
    let mut skill_names = BTreeSet::new();
    let mut rule_names = BTreeSet::new();
    for definition in state.skills_by_id.values() {
        collect_skill_handlers(definition, &mut skill_names, &mut rule_names);
    }
    let rules = state
        .rules
        .iter()
        .chain(state.pieces.iter().flat_map(|p| p.rules.iter()));
    for rule in rules {
        collect_rule_handler(rule, &mut rule_names);
    }
    if skill_names.is_empty() && rule_names.is_empty() {
        return Ok(());
    }

    let registry = match env.handlers() {
        Ok(registry) => Some(registry),
        Err(error) if strict => return Err(error.into()),
        Err(_) => None,
    };
    let unresolved = skill_names
        .into_iter()
        .filter(|name| !registry.is_some_and(|r| r.has_skill(name)))
        .chain(
            rule_names
                .into_iter()
                .filter(|name| !registry.is_some_and(|r| r.has_rule(name))),
        );
    report.unresolved_handlers.extend(unresolved);

    if strict && !report.unresolved_handlers.is_empty() {
        return Err(RehydrationError::UnresolvedHandlers(
            report.unresolved_handlers.clone(),
        ));
    }
    Ok(())
}

fn collect_skill_handlers(
    definition: &SkillDefinition,
    skills: &mut BTreeSet<String>,
    rules: &mut BTreeSet<String>,
) {
    for logic in std::iter::once(&definition.logic).chain(definition.preview_logic.as_ref()) {
        match logic {
            SkillLogic::Handler(name) => {
                skills.insert(name.clone());
            }
            SkillLogic::Program(ops) => {
                for op in ops {
                    if let SkillOp::AttachRule(template) = op {
                        if let Some(name) = template.effect.handler_name() {
                            rules.insert(name.to_owned());
                        }
                    }
                }
            }
            SkillLogic::Default => {}
        }
    }
    if let Some(name) = definition
        .passive_rule
        .as_ref()
        .and_then(|rule| rule.effect.handler_name())
    {
        rules.insert(name.to_owned());
    }
}

fn collect_rule_handler(rule: &TriggerRule, names: &mut BTreeSet<String>) {
    if let RuleEffect::Handler { name, .. } = &rule.effect {
        names.insert(name.clone());
    }
}

/// Makes piece rules agree with the status lists: every effect gets its tick
/// rule back, every tick rule without an effect is removed.
fn reconcile_status_rules(state: &mut BattleState, report: &mut RehydrationReport) {
    for piece in &mut state.pieces {
        let statuses = &piece.statuses;
        let mut dropped = Vec::new();
        piece.rules.retain(|rule| match rule.status_id() {
            Some(status) if statuses.get(status).is_none() => {
                dropped.push(rule.id.clone());
                false
            }
            _ => true,
        });
        report.dropped_rules.extend(dropped);

        let missing: Vec<_> = piece
            .statuses
            .iter()
            .filter(|effect| {
                !piece
                    .rules
                    .iter()
                    .any(|rule| rule.status_id() == Some(&effect.id))
            })
            .map(|effect| status_rule(effect, &piece.instance_id))
            .collect();
        for rule in missing {
            if let Some(status) = rule.status_id() {
                report.restored_status_rules.push(status.clone());
            }
            piece.rules.push(rule);
        }
    }
}
