use crate::combat::DamageType;
use crate::state::PieceId;

use super::sandbox::{SkillFault, SkillInterrupt, SkillOutcome, SkillSandbox};
use super::types::{Amount, SkillOp, SkillTarget};

const NO_TARGET: &str = "No valid target";

/// Runs an interpreted program to completion.
///
/// A targeted op with nothing to act on fails the skill unless an earlier op
/// already hit something. A follow-up on a target that fell, or on the empty
/// center of an area that did hit, is skipped.
pub fn run_program(
    sandbox: &mut SkillSandbox<'_>,
    ops: &[SkillOp],
) -> Result<SkillOutcome, SkillInterrupt> {
    let mut hits = 0usize;
    let mut landed = false;
    for op in ops {
        match op {
            SkillOp::SelectTarget(request) => {
                sandbox.select_target(request)?;
            }
            SkillOp::Pick { selector, range } => match sandbox.select(*selector, *range)? {
                Some(id) => sandbox.set_target(SkillTarget::Piece(id)),
                None => return Ok(SkillOutcome::failure(NO_TARGET)),
            },
            SkillOp::Damage {
                amount,
                damage_type,
            } => {
                let Some(target) = sandbox.current_piece() else {
                    if landed {
                        continue;
                    }
                    return Ok(SkillOutcome::failure(NO_TARGET));
                };
                let base = evaluate(sandbox, amount, Some(&target))?;
                sandbox.deal_damage(&target, base, *damage_type)?;
                hits += 1;
                landed = true;
            }
            SkillOp::Heal { amount } => {
                let Some(target) = sandbox.current_piece() else {
                    if landed {
                        continue;
                    }
                    return Ok(SkillOutcome::failure(NO_TARGET));
                };
                let value = evaluate(sandbox, amount, Some(&target))?;
                sandbox.heal(&target, value)?;
                hits += 1;
                landed = true;
            }
            SkillOp::AreaDamage {
                amount,
                damage_type,
                radius,
            } => {
                let center = match sandbox.current_position() {
                    Some(position) => position,
                    None => sandbox.caster_position()?,
                };
                for target in sandbox.enemies_within(center, *radius)? {
                    // An earlier hit may have triggered a kill chain.
                    if !sandbox.piece(&target).is_some_and(|p| p.is_alive()) {
                        continue;
                    }
                    let base = evaluate(sandbox, amount, Some(&target))?;
                    sandbox.deal_damage(&target, base, *damage_type)?;
                    hits += 1;
                    landed = true;
                }
            }
            SkillOp::AreaHeal { amount, radius } => {
                let center = sandbox.caster_position()?;
                for target in sandbox.allies_within(center, *radius)? {
                    let value = evaluate(sandbox, amount, Some(&target))?;
                    sandbox.heal(&target, value)?;
                    hits += 1;
                    landed = true;
                }
            }
            SkillOp::ApplyStatus { status, uses } => {
                let Some(target) = sandbox.current_piece() else {
                    if landed {
                        continue;
                    }
                    return Ok(SkillOutcome::failure(NO_TARGET));
                };
                sandbox.add_status(&target, status, *uses)?;
                landed = true;
            }
            SkillOp::ApplyStatusToSelf { status, uses } => {
                let caster = sandbox.context().caster.clone();
                sandbox.add_status(&caster, status, *uses)?;
            }
            SkillOp::Cleanse => {
                if let Some(target) = sandbox.current_piece() {
                    sandbox.cleanse(&target);
                }
            }
            SkillOp::Teleport => {
                let to = sandbox.current_position().ok_or(SkillFault::NoTarget)?;
                sandbox.teleport(to)?;
            }
            SkillOp::AttachRule(template) => {
                sandbox.attach_rule(template)?;
            }
            SkillOp::GrantChargePoints(amount) => {
                sandbox.grant_charge_points(*amount)?;
            }
            SkillOp::Message(text) => sandbox.say(text.clone()),
        }
    }

    let name = sandbox.definition().name.clone();
    Ok(match hits {
        0 => SkillOutcome::success(format!("{name} resolved")),
        n => SkillOutcome::success(format!("{name} resolved ({n} hit(s))")),
    })
}

/// Attacks the supplied enemy, or the nearest one, for `attack × power`.
pub fn default_attack(sandbox: &mut SkillSandbox<'_>) -> Result<SkillOutcome, SkillInterrupt> {
    let owner = sandbox.caster()?.owner_player_id.clone();
    let supplied = match &sandbox.context().target {
        Some(SkillTarget::Piece(id)) => sandbox
            .piece(id)
            .filter(|p| p.is_active() && p.owner_player_id != owner)
            .map(|p| p.instance_id.clone()),
        Some(SkillTarget::Cell(position)) => sandbox
            .piece_at(*position)
            .filter(|p| p.owner_player_id != owner)
            .map(|p| p.instance_id.clone()),
        None => None,
    };
    let target = match supplied {
        Some(id) => id,
        None => match sandbox.select(super::types::Selector::NearestEnemy, None)? {
            Some(id) => id,
            None => return Ok(SkillOutcome::failure("No enemy to attack")),
        },
    };

    let power = sandbox.caster_power()?;
    let report = sandbox.deal_damage(&target, power, DamageType::Physical)?;
    Ok(SkillOutcome::success(report.describe()))
}

fn evaluate(
    sandbox: &SkillSandbox<'_>,
    amount: &Amount,
    target: Option<&PieceId>,
) -> Result<f64, SkillInterrupt> {
    let power = sandbox.caster_power()?;
    let target = target.and_then(|id| sandbox.piece(id));
    Ok(amount.evaluate(power, target))
}
