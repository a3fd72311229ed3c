use tracing::{debug, warn};

use crate::combat::{self, DamageType};
use crate::env::{BattleEnv, OracleError};
use crate::state::{BattleState, PieceId, RuleId, StatusEffectSpec};
use crate::status;

use super::context::{Origin, RuleFault, RuleInvocation, RuleOutcome, TriggerContext, TriggerOutcome};
use super::registry::{matching_ids, tick_rules};
use super::types::{RuleEffect, RuleSource, RuleTemplate, TriggerRule};

#[derive(Clone, Debug)]
enum Scope {
    Global,
    Piece(PieceId),
}

fn rule_ref<'s>(state: &'s BattleState, scope: &Scope, id: &RuleId) -> Option<&'s TriggerRule> {
    match scope {
        Scope::Global => state.rules.get(id),
        Scope::Piece(piece) => state.piece(piece)?.rules.iter().find(|r| &r.id == id),
    }
}

fn rule_mut<'s>(
    state: &'s mut BattleState,
    scope: &Scope,
    id: &RuleId,
) -> Option<&'s mut TriggerRule> {
    match scope {
        Scope::Global => state.rules.get_mut(id),
        Scope::Piece(piece) => state
            .piece_mut(piece)?
            .rules
            .iter_mut()
            .find(|r| &r.id == id),
    }
}

/// Fires every live rule bound to `ctx.trigger`.
///
/// Global rules are evaluated first, then the rules attached to the source
/// piece. Candidates are collected up front; a rule removed by an earlier rule
/// in the same pass is skipped. A faulting rule is logged and skipped without
/// affecting the others.
pub fn check_triggers(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    ctx: &TriggerContext,
) -> TriggerOutcome {
    let mut outcome = TriggerOutcome::default();
    if ctx.depth >= env.config().max_trigger_depth {
        warn!(
            target: "tactics::rules",
            trigger = ctx.trigger.as_str(),
            depth = ctx.depth,
            "trigger depth limit reached, nested rules not evaluated"
        );
        return outcome;
    }

    let mut candidates: Vec<(Scope, RuleId)> = Vec::new();
    if !ctx.piece_rules_only {
        candidates.extend(
            state
                .rules
                .matching(ctx.trigger)
                .into_iter()
                .map(|id| (Scope::Global, id)),
        );
    }
    if let Some(source) = &ctx.source_piece {
        if let Some(piece) = state.piece(source) {
            candidates.extend(
                matching_ids(&piece.rules, ctx.trigger)
                    .into_iter()
                    .map(|id| (Scope::Piece(source.clone()), id)),
            );
        }
    }

    for (scope, id) in candidates {
        let Some(rule) = rule_ref(state, &scope, &id) else {
            continue;
        };
        if !rule.limits.is_live() {
            continue;
        }
        let rule = rule.clone();

        match evaluate(state, env, &rule, ctx) {
            Ok(result) => {
                if result.success {
                    if let Some(live) = rule_mut(state, &scope, &id) {
                        live.limits.record_use();
                    }
                }
                debug!(
                    target: "tactics::rules",
                    rule = %rule.id,
                    trigger = ctx.trigger.as_str(),
                    success = result.success,
                    blocked = result.blocked,
                    "rule evaluated"
                );
                outcome.blocked |= result.blocked;
                outcome.messages.extend(result.message);
            }
            Err(fault) => {
                warn!(
                    target: "tactics::rules",
                    rule = %rule.id,
                    name = %rule.name,
                    trigger = ctx.trigger.as_str(),
                    %fault,
                    "rule effect failed"
                );
                outcome.success = false;
            }
        }
    }
    outcome
}

/// One `beginTurn` step for every rule in the battle, global and per piece.
///
/// Returns the ids of rules whose lifetime ran out.
pub fn update_cooldowns(state: &mut BattleState) -> Vec<RuleId> {
    let mut expired = state.rules.update_cooldowns();
    for piece in &mut state.pieces {
        expired.extend(tick_rules(&mut piece.rules));
    }
    expired
}

/// Instantiates a template on a piece. Returns `None` if the piece is gone.
pub fn attach_rule(
    state: &mut BattleState,
    piece_id: &PieceId,
    template: &RuleTemplate,
    source: RuleSource,
) -> Option<RuleId> {
    state.piece(piece_id)?;
    let id = state.ids.next_rule_id();
    let rule = template.instantiate(id.clone(), Some(piece_id.clone()), source);
    state.piece_mut(piece_id)?.rules.push(rule);
    Some(id)
}

fn evaluate(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    rule: &TriggerRule,
    ctx: &TriggerContext,
) -> Result<RuleOutcome, RuleFault> {
    match &rule.effect {
        RuleEffect::StatusTick { status_id } => {
            let owner = rule.owner.as_ref().ok_or(RuleFault::NoOwner)?;
            status::tick_status(state, env, owner, status_id, ctx.depth)
        }

        RuleEffect::BlockDamage { message } => Ok(RuleOutcome::blocked(
            message
                .clone()
                .unwrap_or_else(|| format!("{} blocks the effect", rule.name)),
        )),

        RuleEffect::GrantChargePoints { amount } => {
            let piece_id = rule
                .owner
                .as_ref()
                .or(ctx.source_piece.as_ref())
                .ok_or(RuleFault::NoOwner)?;
            let owner = state
                .find_piece(piece_id)
                .map(|p| p.owner_player_id.clone())
                .ok_or_else(|| RuleFault::MissingPiece(piece_id.clone()))?;
            let Some(player) = state.player_mut(&owner) else {
                return Ok(RuleOutcome::skipped());
            };
            player.charge_points = player.charge_points.saturating_add(*amount);
            Ok(RuleOutcome::message(format!(
                "{owner} gains {amount} charge point(s)"
            )))
        }

        RuleEffect::HealSource { amount } => {
            let Some(source) = live_piece(state, ctx.source_piece.as_ref()) else {
                return Ok(RuleOutcome::skipped());
            };
            let report =
                combat::heal_damage(state, env, &source, f64::from(*amount), &ctx.source_origin())?;
            Ok(RuleOutcome::message(report.describe()))
        }

        RuleEffect::Thorns { damage } => {
            let Some(target) = live_piece(state, ctx.target_piece.as_ref()) else {
                return Ok(RuleOutcome::skipped());
            };
            let report = combat::deal_damage(
                state,
                env,
                &target,
                f64::from(*damage),
                DamageType::True,
                &ctx.source_origin(),
            )?;
            Ok(RuleOutcome::message(report.describe()))
        }

        RuleEffect::EmpowerSource { amount, duration } => {
            let Some(source) = live_piece(state, ctx.source_piece.as_ref()) else {
                return Ok(RuleOutcome::skipped());
            };
            let spec = StatusEffectSpec::attack_modifier(*amount, *duration);
            let effect =
                status::add_status_effect(state, env, &source, &spec, None, &ctx.source_origin())?;
            Ok(RuleOutcome::message(format!("{source} gains {}", effect.name)))
        }

        RuleEffect::ApplyStatusToTarget { status: spec } => {
            let Some(target) = live_piece(state, ctx.target_piece.as_ref()) else {
                return Ok(RuleOutcome::skipped());
            };
            let effect =
                status::add_status_effect(state, env, &target, spec, None, &ctx.source_origin())?;
            Ok(RuleOutcome::message(format!("{target} suffers {}", effect.name)))
        }

        RuleEffect::TileHazard => apply_tile_hazards(state, env, ctx),

        RuleEffect::Handler { name, params } => {
            let handler = env
                .handlers()?
                .rule(name)
                .ok_or_else(|| OracleError::HandlerNotFound(name.clone()))?;
            let invocation = RuleInvocation {
                rule_id: rule.id.clone(),
                owner: rule.owner.clone(),
                params: params.clone(),
            };
            handler(state, env, ctx, &invocation)
        }
    }
}

fn live_piece(state: &BattleState, id: Option<&PieceId>) -> Option<PieceId> {
    let id = id?;
    state
        .piece(id)
        .filter(|p| p.is_alive())
        .map(|p| p.instance_id.clone())
}

fn apply_tile_hazards(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    ctx: &TriggerContext,
) -> Result<RuleOutcome, RuleFault> {
    let Some(player) = ctx.player_id.as_ref() else {
        return Ok(RuleOutcome::skipped());
    };
    let victims: Vec<(PieceId, u32)> = state
        .living_pieces_of(player)
        .filter_map(|piece| {
            let tile = state.map.tile(piece.position?)?;
            let damage = tile.hazard_damage();
            (damage > 0).then(|| (piece.instance_id.clone(), damage))
        })
        .collect();
    if victims.is_empty() {
        return Ok(RuleOutcome::skipped());
    }

    let origin = Origin::system().at_depth(ctx.depth.saturating_add(1));
    let mut messages = Vec::with_capacity(victims.len());
    for (piece, damage) in victims {
        let report =
            combat::deal_damage(state, env, &piece, f64::from(damage), DamageType::True, &origin)?;
        messages.push(report.describe());
    }
    Ok(RuleOutcome::message(messages.join("; ")))
}
