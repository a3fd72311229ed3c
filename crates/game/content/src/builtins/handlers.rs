//! Native skill and rule handlers referenced by name from the catalog.

use tactics_core::rules::{RuleFault, RuleInvocation, RuleOutcome, TriggerContext};
use tactics_core::skill::SkillFault;
use tactics_core::{
    BattleEnv, BattleState, DamageType, HandlerRegistry, SkillInterrupt, SkillOutcome,
    SkillSandbox, TargetRequest, status,
};
use tracing::debug;

pub(super) const EXECUTE: &str = "execute";
pub(super) const BLOODLUST: &str = "bloodlust";

/// Registry holding every handler the built-in catalog names.
pub fn default_handlers() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register_skill(EXECUTE, execute)
        .register_rule(BLOODLUST, bloodlust);
    registry
}

/// Hits an adjacent enemy for attack damage, doubled when the enemy is at
/// half health or less.
fn execute(sandbox: &mut SkillSandbox<'_>) -> Result<SkillOutcome, SkillInterrupt> {
    sandbox.select_target(&TargetRequest::enemy(Some(1)))?;
    let target = sandbox.current_piece().ok_or(SkillFault::NoTarget)?;
    let wounded = sandbox
        .piece(&target)
        .is_some_and(|p| p.current_hp.saturating_mul(2) <= p.max_hp);

    let power = sandbox.caster_power()?;
    let base = if wounded { power * 2.0 } else { power };
    let report = sandbox.deal_damage(&target, base, DamageType::Physical)?;
    if wounded {
        sandbox.say("Execution!");
    }
    Ok(SkillOutcome::success(report.describe()))
}

/// On a kill, the rule's owner gains `amount` attack for `duration` turns.
fn bloodlust(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    ctx: &TriggerContext,
    invocation: &RuleInvocation,
) -> Result<RuleOutcome, RuleFault> {
    let owner = invocation.owner.clone().ok_or(RuleFault::NoOwner)?;
    if ctx.source_piece.as_ref() != Some(&owner) {
        return Ok(RuleOutcome::skipped());
    }
    let amount = param_i32(invocation, "amount", 3)?;
    let duration = param_i32(invocation, "duration", 2)?;

    let effect = status::add_attack_modifier(state, env, &owner, amount, duration, &ctx.source_origin())?;
    debug!(target: "tactics::rules", piece = %owner, status = %effect.id, amount, "bloodlust");
    Ok(RuleOutcome::message(format!("{owner} is driven by bloodlust")))
}

fn param_i32(invocation: &RuleInvocation, key: &str, default: i32) -> Result<i32, RuleFault> {
    let value = invocation.param_or(key, i64::from(default));
    i32::try_from(value).map_err(|_| RuleFault::Handler(format!("parameter {key} out of range: {value}")))
}
