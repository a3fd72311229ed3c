use tracing::{debug, warn};

use crate::env::{BattleEnv, SkillDefinition};
use crate::rules::{TriggerContext, TriggerType, check_triggers};
use crate::state::{BattleState, PieceId};

use super::program::{default_attack, run_program};
use super::sandbox::{SkillContext, SkillFault, SkillInterrupt, SkillOutcome, SkillSandbox};
use super::types::{SkillLogic, TargetRequest};

/// Result of running a skill against a battle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillResult {
    pub success: bool,
    pub message: String,
    /// Everything that happened, in order (damage lines, trigger messages).
    pub messages: Vec<String>,
    /// Set when the skill stopped to ask for a target.
    pub needs_target: Option<TargetRequest>,
    /// A `BeforeSkillUsed` rule cancelled the effect.
    pub blocked: bool,
    /// The skill's own logic faulted and the default attack ran instead.
    pub used_fallback: bool,
}

impl SkillResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Runs `definition` for the caster in `ctx`.
///
/// Work happens on a scratch copy of `state` which is committed only when the
/// skill succeeds. A request for a target or an invalid supplied target leaves
/// `state` untouched. When the skill's logic faults, the fault is logged and
/// the default attack runs on a fresh copy instead.
pub fn execute_skill_function(
    definition: &SkillDefinition,
    ctx: &SkillContext,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
) -> SkillResult {
    let mut scratch = state.clone();

    let before = TriggerContext::new(TriggerType::BeforeSkillUsed)
        .with_source(ctx.caster.clone())
        .with_player(ctx.player_id.clone())
        .with_skill(ctx.skill_id.clone());
    let gate = check_triggers(&mut scratch, env, &before);
    if gate.blocked {
        debug!(
            target: "tactics::skills",
            skill = %ctx.skill_id,
            caster = %ctx.caster,
            "skill blocked before use"
        );
        let message = gate
            .messages
            .last()
            .cloned()
            .unwrap_or_else(|| format!("{} was blocked", definition.name));
        *state = scratch;
        return SkillResult {
            success: true,
            message,
            messages: gate.messages,
            blocked: true,
            ..SkillResult::default()
        };
    }

    match run_logic(&definition.logic, definition, ctx, &mut scratch, env) {
        Ok((outcome, messages)) => {
            let result = finish(outcome, messages, gate.messages, ctx, &mut scratch, env);
            if result.success {
                *state = scratch;
            }
            result
        }
        Err(SkillInterrupt::NeedsTarget(request)) => SkillResult {
            message: format!("{} needs a target", definition.name),
            needs_target: Some(request),
            ..SkillResult::default()
        },
        Err(SkillInterrupt::InvalidTarget(reason)) => SkillResult::failed(reason),
        Err(SkillInterrupt::Fault(fault)) => {
            warn!(
                target: "tactics::skills",
                skill = %ctx.skill_id,
                caster = %ctx.caster,
                error = %fault,
                "skill logic faulted, running default attack"
            );
            fallback(definition, ctx, state, env, gate.messages)
        }
    }
}

fn fallback(
    definition: &SkillDefinition,
    ctx: &SkillContext,
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    gate_messages: Vec<String>,
) -> SkillResult {
    let mut scratch = state.clone();
    // The gate already ran once; replay its side effects on the fresh copy.
    let before = TriggerContext::new(TriggerType::BeforeSkillUsed)
        .with_source(ctx.caster.clone())
        .with_player(ctx.player_id.clone())
        .with_skill(ctx.skill_id.clone());
    check_triggers(&mut scratch, env, &before);

    match run_logic(&SkillLogic::Default, definition, ctx, &mut scratch, env) {
        Ok((outcome, messages)) => {
            let mut result = finish(outcome, messages, gate_messages, ctx, &mut scratch, env);
            if result.success {
                *state = scratch;
            }
            result.used_fallback = true;
            result
        }
        Err(interrupt) => {
            warn!(
                target: "tactics::skills",
                skill = %ctx.skill_id,
                error = %interrupt,
                "default attack failed"
            );
            SkillResult {
                used_fallback: true,
                ..SkillResult::failed(format!("{} failed: {interrupt}", definition.name))
            }
        }
    }
}

fn run_logic(
    logic: &SkillLogic,
    definition: &SkillDefinition,
    ctx: &SkillContext,
    scratch: &mut BattleState,
    env: &BattleEnv<'_>,
) -> Result<(SkillOutcome, Vec<String>), SkillInterrupt> {
    let mut sandbox = SkillSandbox::new(scratch, *env, ctx, definition);
    let outcome = match logic {
        SkillLogic::Program(ops) => run_program(&mut sandbox, ops)?,
        SkillLogic::Handler(name) => {
            let handler = env
                .handlers()?
                .skill(name)
                .ok_or_else(|| SkillFault::Handler(format!("handler '{name}' is not registered")))?;
            handler(&mut sandbox)?
        }
        SkillLogic::Default => default_attack(&mut sandbox)?,
    };
    Ok((outcome, sandbox.into_messages()))
}

fn finish(
    outcome: SkillOutcome,
    mut messages: Vec<String>,
    gate_messages: Vec<String>,
    ctx: &SkillContext,
    scratch: &mut BattleState,
    env: &BattleEnv<'_>,
) -> SkillResult {
    let mut all = gate_messages;
    all.append(&mut messages);

    if outcome.success {
        let after = TriggerContext::new(TriggerType::AfterSkillUsed)
            .with_source(ctx.caster.clone())
            .with_player(ctx.player_id.clone())
            .with_skill(ctx.skill_id.clone());
        all.extend(check_triggers(scratch, env, &after).messages);
    }

    SkillResult {
        success: outcome.success,
        message: outcome.message,
        messages: all,
        ..SkillResult::default()
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Predicted hp change for one piece.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewChange {
    pub piece_id: PieceId,
    pub name: String,
    pub hp_before: u32,
    pub hp_after: u32,
    pub killed: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillPreview {
    pub success: bool,
    pub message: String,
    pub needs_target: Option<TargetRequest>,
    pub changes: Vec<PreviewChange>,
    pub messages: Vec<String>,
}

/// Dry-runs a skill and reports predicted hp changes. `state` is not modified.
///
/// Uses the definition's preview logic when present.
pub fn calculate_skill_preview(
    definition: &SkillDefinition,
    ctx: &SkillContext,
    state: &BattleState,
    env: &BattleEnv<'_>,
) -> SkillPreview {
    let previewed;
    let definition = match &definition.preview_logic {
        Some(logic) => {
            previewed = SkillDefinition {
                logic: logic.clone(),
                ..definition.clone()
            };
            &previewed
        }
        None => definition,
    };

    let mut scratch = state.clone();
    let result = execute_skill_function(definition, ctx, &mut scratch, env);

    let changes = state
        .pieces
        .iter()
        .filter_map(|before| {
            let after = scratch.find_piece(&before.instance_id)?;
            let killed = before.is_alive() && !after.is_alive();
            (after.current_hp != before.current_hp || killed).then(|| PreviewChange {
                piece_id: before.instance_id.clone(),
                name: before.name.clone(),
                hp_before: before.current_hp,
                hp_after: after.current_hp,
                killed,
            })
        })
        .collect();

    SkillPreview {
        success: result.success,
        message: result.message,
        needs_target: result.needs_target,
        changes,
        messages: result.messages,
    }
}
