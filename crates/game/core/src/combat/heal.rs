use crate::env::BattleEnv;
use crate::rules::{Origin, TriggerContext, TriggerType, check_triggers};
use crate::state::{BattleState, PieceId};

use super::CombatError;

/// What a call to [`heal_damage`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealReport {
    pub target: PieceId,
    pub target_name: String,
    pub healer: Option<PieceId>,
    pub amount: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    pub messages: Vec<String>,
}

impl HealReport {
    pub fn describe(&self) -> String {
        format!(
            "{} recovers {} hp ({} -> {})",
            self.target_name, self.amount, self.hp_before, self.hp_after
        )
    }
}

/// Heals a living piece by `round(amount)`, floored at zero and capped at its
/// maximum hp, then fires `AfterHealDealt` (healer as source).
pub fn heal_damage(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    target: &PieceId,
    amount: f64,
    origin: &Origin,
) -> Result<HealReport, CombatError> {
    let piece = state
        .piece_mut(target)
        .ok_or_else(|| CombatError::PieceNotFound(target.clone()))?;
    if !piece.is_alive() {
        return Err(CombatError::PieceDead(target.clone()));
    }

    let requested = amount.round().max(0.0) as u32;
    let hp_before = piece.current_hp;
    piece.current_hp = hp_before.saturating_add(requested).min(piece.max_hp);
    let hp_after = piece.current_hp;
    let healed = hp_after - hp_before;
    let target_name = piece.name.clone();

    let ctx = TriggerContext::new(TriggerType::AfterHealDealt)
        .with_source(origin.piece.clone())
        .with_target(target.clone())
        .with_heal(healed)
        .at_depth(origin.depth);
    let messages = check_triggers(state, env, &ctx).messages;

    Ok(HealReport {
        target: target.clone(),
        target_name,
        healer: origin.piece.clone(),
        amount: healed,
        hp_before,
        hp_after,
        messages,
    })
}
