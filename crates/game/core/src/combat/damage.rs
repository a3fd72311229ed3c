//! Damage calculation and application.

use tracing::debug;

use crate::env::BattleEnv;
use crate::rules::{Origin, TriggerContext, TriggerType, check_triggers};
use crate::state::{BattleState, PieceId};

use super::CombatError;

// ============================================================================
// Damage Type
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageType {
    /// Reduced by the target's defense.
    #[default]
    Physical,
    /// Reduced by the target's defense.
    Magical,
    /// Ignores defense.
    True,
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Final damage for a hit.
///
/// # Formula
///
/// ```text
/// physical / magical: max(1, round(base - defense))
/// true:               max(1, round(base))
/// ```
pub fn compute_damage(base: f64, defense: i32, damage_type: DamageType) -> u32 {
    let raw = match damage_type {
        DamageType::Physical | DamageType::Magical => base - f64::from(defense.max(0)),
        DamageType::True => base,
    };
    // Float-to-int casts saturate; NaN has already been replaced by `max`.
    raw.round().max(1.0) as u32
}

/// What a call to [`deal_damage`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub target: PieceId,
    pub target_name: String,
    pub attacker: Option<PieceId>,
    pub damage_type: DamageType,
    pub amount: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    pub killed: bool,
    /// A `BeforeDamageTaken` rule nullified the hit.
    pub blocked: bool,
    /// Messages produced by the triggers this hit fired.
    pub messages: Vec<String>,
}

impl DamageReport {
    pub fn describe(&self) -> String {
        if self.blocked {
            format!("{} blocks the attack", self.target_name)
        } else if self.killed {
            format!(
                "{} takes {} damage and is defeated",
                self.target_name, self.amount
            )
        } else {
            format!(
                "{} takes {} damage ({} -> {})",
                self.target_name, self.amount, self.hp_before, self.hp_after
            )
        }
    }
}

// ============================================================================
// Damage Application
// ============================================================================

/// Damages a living piece and runs the damage trigger chain.
///
/// Order of events:
/// 1. `BeforeDamageTaken` (victim as source). A blocking rule nullifies the hit.
/// 2. HP reduction, floored at zero.
/// 3. `AfterDamageDealt` and `AfterDamageTaken`. A lethal hit leaves the
///    victim on the board at zero hp until both have fired, so its own rules
///    still see it.
/// 4. On a kill: the victim moves to the graveyard, the owner of
///    `origin.piece` receives `kill_charge_reward` charge points and
///    `AfterPieceKilled` fires.
pub fn deal_damage(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    base: f64,
    damage_type: DamageType,
    origin: &Origin,
) -> Result<DamageReport, CombatError> {
    let victim = state
        .piece(target)
        .ok_or_else(|| CombatError::PieceNotFound(target.clone()))?;
    if !victim.is_alive() {
        return Err(CombatError::PieceDead(target.clone()));
    }
    let amount = compute_damage(base, victim.effective_defense(), damage_type);
    let attacker = origin.piece.clone();
    let depth = origin.depth;
    let mut messages = Vec::new();

    let before = check_triggers(
        state,
        env,
        &TriggerContext::new(TriggerType::BeforeDamageTaken)
            .with_source(target.clone())
            .with_target(attacker.clone())
            .with_damage(amount)
            .at_depth(depth),
    );
    messages.extend(before.messages);

    let victim = state
        .piece_mut(target)
        .ok_or_else(|| CombatError::PieceNotFound(target.clone()))?;
    let target_name = victim.name.clone();
    let hp_before = victim.current_hp;
    if before.blocked || hp_before == 0 {
        return Ok(DamageReport {
            target: target.clone(),
            target_name,
            attacker,
            damage_type,
            amount: 0,
            hp_before,
            hp_after: hp_before,
            killed: false,
            blocked: before.blocked,
            messages,
        });
    }

    victim.current_hp = hp_before.saturating_sub(amount);
    let hp_after = victim.current_hp;
    let dealt = hp_before - hp_after;
    let killed = hp_after == 0;
    debug!(
        target: "tactics::engine",
        piece = %target,
        attacker = ?attacker,
        amount = dealt,
        hp_after,
        "damage applied"
    );

    if attacker.is_some() {
        let dealt_ctx = TriggerContext::new(TriggerType::AfterDamageDealt)
            .with_source(attacker.clone())
            .with_target(target.clone())
            .with_damage(dealt)
            .at_depth(depth);
        messages.extend(check_triggers(state, env, &dealt_ctx).messages);
    }
    let taken_ctx = TriggerContext::new(TriggerType::AfterDamageTaken)
        .with_source(target.clone())
        .with_target(attacker.clone())
        .with_damage(dealt)
        .at_depth(depth);
    messages.extend(check_triggers(state, env, &taken_ctx).messages);

    if killed {
        remove_dead_piece(state, env, target, attacker.as_ref());
        let killed_ctx = TriggerContext::new(TriggerType::AfterPieceKilled)
            .with_source(attacker.clone())
            .with_target(target.clone())
            .with_damage(dealt)
            .at_depth(depth);
        messages.extend(check_triggers(state, env, &killed_ctx).messages);
    }

    Ok(DamageReport {
        target: target.clone(),
        target_name,
        attacker,
        damage_type,
        amount: dealt,
        hp_before,
        hp_after,
        killed,
        blocked: false,
        messages,
    })
}

/// Moves a freshly killed piece to the graveyard and rewards the killer.
fn remove_dead_piece(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    killer: Option<&PieceId>,
) {
    if let Some(index) = state.pieces.iter().position(|p| &p.instance_id == target) {
        let dead = state.pieces.remove(index);
        state.graveyard.push(dead);
    }

    let Some(killer) = killer else {
        return;
    };
    let Some(owner) = state.find_piece(killer).map(|p| p.owner_player_id.clone()) else {
        return;
    };
    let reward = env.config().kill_charge_reward;
    if let Some(player) = state.player_mut(&owner) {
        player.charge_points = player.charge_points.saturating_add(reward);
    }
    debug!(
        target: "tactics::engine",
        piece = %target,
        killer = %killer,
        reward,
        "piece killed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_mitigates_physical_and_magical_damage() {
        assert_eq!(compute_damage(20.0, 5, DamageType::Physical), 15);
        assert_eq!(compute_damage(20.0, 5, DamageType::Magical), 15);
        assert_eq!(compute_damage(20.0, 5, DamageType::True), 20);
    }

    #[test]
    fn damage_is_at_least_one() {
        assert_eq!(compute_damage(3.0, 50, DamageType::Physical), 1);
        assert_eq!(compute_damage(0.2, 0, DamageType::True), 1);
    }

    #[test]
    fn damage_rounds_to_nearest() {
        assert_eq!(compute_damage(10.5, 0, DamageType::True), 11);
        assert_eq!(compute_damage(10.4, 0, DamageType::True), 10);
        assert_eq!(compute_damage(12.6, 2, DamageType::Physical), 11);
    }
}
