//! Status-effect lifecycle.
//!
//! Adding an effect records it on the piece and synthesizes a `BeginTurn` rule
//! ([`RuleEffect::StatusTick`]) attached to the same piece. The rule holds only
//! the status id: every firing re-reads the effect from the piece, applies it,
//! counts it down and removes it once exhausted. Removing an effect removes its
//! rule as well.
//!
//! Damage over time is true damage of `intensity × stacks`, credited to the
//! piece that applied the effect. Stat modifiers and crowd control have no
//! tick logic; they are read from the piece whenever stats are evaluated.

use tracing::debug;

use crate::combat::{self, DamageType};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::rules::{
    Origin, RuleEffect, RuleFault, RuleLimits, RuleOutcome, RuleSource, TriggerContext,
    TriggerRule, TriggerType, check_triggers,
};
use crate::state::{
    BattleState, PieceId, StatusEffect, StatusEffectKind, StatusEffectSpec, StatusId, tick_down,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("piece {0} is dead")]
    PieceDead(PieceId),

    #[error("piece {piece} already carries {max} status effects")]
    TooManyEffects { piece: PieceId, max: usize },
}

impl GameError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StatusError::PieceNotFound(_) | StatusError::PieceDead(_) => ErrorSeverity::Validation,
            StatusError::TooManyEffects { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StatusError::PieceNotFound(_) => "STATUS_PIECE_NOT_FOUND",
            StatusError::PieceDead(_) => "STATUS_PIECE_DEAD",
            StatusError::TooManyEffects { .. } => "STATUS_TOO_MANY_EFFECTS",
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Attaches (or stacks) a status effect and returns the resulting record.
///
/// A stackable effect whose kind is already present gains a stack (up to
/// `max_stacks`) and has its duration and uses refreshed. Anything else creates
/// a new effect with its own tick rule. `uses` defaults to the duration.
pub fn add_status_effect(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    spec: &StatusEffectSpec,
    uses: Option<i32>,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    let piece = state
        .piece_mut(target)
        .ok_or_else(|| StatusError::PieceNotFound(target.clone()))?;
    if !piece.is_alive() {
        return Err(StatusError::PieceDead(target.clone()));
    }
    let uses = uses.unwrap_or(spec.duration);

    let stacked = if spec.can_stack {
        piece.statuses.find_kind_mut(spec.kind).map(|existing| {
            existing.current_stacks = (existing.current_stacks + 1).min(existing.max_stacks);
            existing.remaining_duration = spec.duration;
            existing.remaining_uses = uses;
            if origin.piece.is_some() {
                existing.applied_by = origin.piece.clone();
            }
            existing.clone()
        })
    } else {
        None
    };

    let effect = match stacked {
        Some(effect) => effect,
        None => {
            if piece.statuses.is_full() {
                return Err(StatusError::TooManyEffects {
                    piece: target.clone(),
                    max: BattleConfig::MAX_STATUS_EFFECTS,
                });
            }
            let id = state.ids.next_status_id();
            let rule_id = state.ids.next_rule_id();
            let name = spec
                .name
                .clone()
                .unwrap_or_else(|| spec.kind.default_name().to_owned());
            let effect = StatusEffect {
                id: id.clone(),
                kind: spec.kind,
                name: name.clone(),
                remaining_duration: spec.duration,
                remaining_uses: uses,
                intensity: spec.intensity,
                is_debuff: spec.kind.is_debuff(),
                can_stack: spec.can_stack,
                max_stacks: spec.max_stacks.max(1),
                current_stacks: 1,
                rule_id: rule_id.clone(),
                applied_by: origin.piece.clone(),
            };
            let rule = status_rule(&effect, target);
            let piece = state
                .piece_mut(target)
                .ok_or_else(|| StatusError::PieceNotFound(target.clone()))?;
            piece
                .statuses
                .push(effect.clone())
                .map_err(|_| StatusError::TooManyEffects {
                    piece: target.clone(),
                    max: BattleConfig::MAX_STATUS_EFFECTS,
                })?;
            piece.rules.push(rule);
            effect
        }
    };

    debug!(
        target: "tactics::rules",
        piece = %target,
        status = %effect.id,
        kind = effect.kind.as_str(),
        stacks = effect.current_stacks,
        "status applied"
    );
    let ctx = TriggerContext::new(TriggerType::AfterStatusApplied)
        .with_source(target.clone())
        .with_target(origin.piece.clone())
        .with_status(effect.id.clone())
        .at_depth(origin.depth);
    check_triggers(state, env, &ctx);

    Ok(effect)
}

/// The `BeginTurn` rule driving `effect` on `owner`.
pub(crate) fn status_rule(effect: &StatusEffect, owner: &PieceId) -> TriggerRule {
    TriggerRule {
        id: effect.rule_id.clone(),
        name: format!("{} tick", effect.name),
        trigger: TriggerType::BeginTurn,
        effect: RuleEffect::StatusTick {
            status_id: effect.id.clone(),
        },
        limits: RuleLimits::default(),
        owner: Some(owner.clone()),
        source: RuleSource::Status(effect.id.clone()),
    }
}

/// Detaches one effect and its rule. Returns `None` if either is missing.
pub fn remove_status_effect(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    piece_id: &PieceId,
    status_id: &StatusId,
    origin: &Origin,
) -> Option<StatusEffect> {
    let piece = state.piece_mut(piece_id)?;
    let effect = piece.statuses.remove(status_id)?;
    piece
        .rules
        .retain(|r| r.id != effect.rule_id && r.status_id() != Some(status_id));

    debug!(
        target: "tactics::rules",
        piece = %piece_id,
        status = %status_id,
        "status removed"
    );
    let ctx = TriggerContext::new(TriggerType::AfterStatusRemoved)
        .with_source(piece_id.clone())
        .with_target(origin.piece.clone())
        .with_status(status_id.clone())
        .at_depth(origin.depth);
    check_triggers(state, env, &ctx);

    Some(effect)
}

pub fn remove_all_status_effects(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    piece_id: &PieceId,
    origin: &Origin,
) -> Vec<StatusEffect> {
    remove_matching(state, env, piece_id, origin, |_| true)
}

/// Removes every debuff from a piece.
pub fn cleanse_debuffs(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    piece_id: &PieceId,
    origin: &Origin,
) -> Vec<StatusEffect> {
    remove_matching(state, env, piece_id, origin, |effect| effect.is_debuff)
}

fn remove_matching(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    piece_id: &PieceId,
    origin: &Origin,
    predicate: impl Fn(&StatusEffect) -> bool,
) -> Vec<StatusEffect> {
    let ids: Vec<StatusId> = state
        .piece(piece_id)
        .map(|p| {
            p.statuses
                .iter()
                .filter(|e| predicate(e))
                .map(|e| e.id.clone())
                .collect()
        })
        .unwrap_or_default();
    ids.iter()
        .filter_map(|id| remove_status_effect(state, env, piece_id, id, origin))
        .collect()
}

/// One firing of a status rule.
pub(crate) fn tick_status(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    owner: &PieceId,
    status_id: &StatusId,
    depth: u8,
) -> Result<RuleOutcome, RuleFault> {
    let piece = state
        .piece(owner)
        .ok_or_else(|| RuleFault::MissingPiece(owner.clone()))?;
    let piece_name = piece.name.clone();
    let Some(effect) = piece.statuses.get(status_id).cloned() else {
        // The effect was dropped without its rule.
        if let Some(piece) = state.piece_mut(owner) {
            piece.rules.retain(|r| r.status_id() != Some(status_id));
        }
        return Ok(RuleOutcome::skipped());
    };

    let nested = Origin {
        piece: effect.applied_by.clone(),
        depth: depth.saturating_add(1),
    };
    if effect.is_expired() {
        remove_status_effect(state, env, owner, status_id, &nested);
        return Ok(RuleOutcome::message(format!(
            "{} wears off from {piece_name}",
            effect.name
        )));
    }

    let power = f64::from(effect.power().max(0));
    let message = match effect.kind {
        kind if kind.deals_damage() => {
            let report =
                combat::deal_damage(state, env, owner, power, DamageType::True, &nested)?;
            Some(format!("{} ({})", report.describe(), effect.name))
        }
        StatusEffectKind::Regeneration => {
            let report = combat::heal_damage(state, env, owner, power, &nested)?;
            Some(format!("{} ({})", report.describe(), effect.name))
        }
        _ => None,
    };

    if let Some(live) = state
        .piece_mut(owner)
        .and_then(|p| p.statuses.get_mut(status_id))
    {
        live.remaining_duration = tick_down(live.remaining_duration);
        live.remaining_uses = tick_down(live.remaining_uses);
    }

    Ok(message.map_or_else(RuleOutcome::ok, RuleOutcome::message))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn add_bleeding(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    damage: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::bleeding(damage, duration), None, origin)
}

pub fn add_poison(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    damage: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::poison(damage, duration), None, origin)
}

pub fn add_burn(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    damage: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::burn(damage, duration), None, origin)
}

pub fn add_stun(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::stun(duration), None, origin)
}

pub fn add_silence(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::silence(duration), None, origin)
}

pub fn add_regeneration(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    heal: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    add_status_effect(state, env, target, &StatusEffectSpec::regeneration(heal, duration), None, origin)
}

/// Positive `amount` buffs attack, negative debuffs it.
pub fn add_attack_modifier(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    amount: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    let spec = StatusEffectSpec::attack_modifier(amount, duration);
    add_status_effect(state, env, target, &spec, None, origin)
}

/// Positive `amount` buffs defense, negative debuffs it.
pub fn add_defense_modifier(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    amount: i32,
    duration: i32,
    origin: &Origin,
) -> Result<StatusEffect, StatusError> {
    let spec = StatusEffectSpec::defense_modifier(amount, duration);
    add_status_effect(state, env, target, &spec, None, origin)
}
