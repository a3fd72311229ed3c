use tracing::{debug, trace};

use crate::env::BattleEnv;
use crate::rules::{TriggerContext, TriggerType, check_triggers, update_cooldowns};
use crate::state::{BattleState, PieceId, PlayerId, RuleId, TurnPhase};

/// What one [`begin_phase`] step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: TurnPhase,
    pub to: TurnPhase,
    /// Player owning the turn after the step.
    pub player: PlayerId,
    pub turn_number: u32,
    /// Action points gained on a `start → action` step.
    pub regenerated: u32,
    /// Rules whose lifetime ran out on a `start → action` step.
    pub expired_rules: Vec<RuleId>,
    pub messages: Vec<String>,
}

/// Advances the turn state machine by one phase.
///
/// - `start → action`: fires `BeginTurn` (global rules once, then the rules of
///   each living piece of the current player), ticks every rule's cooldown and
///   lifetime, ticks the current player's skill cooldowns and restores one
///   stocked charge per skill, regenerates action points up to the cap and
///   resets the per-turn flags.
/// - `action → end`: fires `EndTurn` the same way.
/// - `end → start`: hands the turn to the other player, increments the turn
///   number and resets the per-turn flags.
pub fn begin_phase(state: &mut BattleState, env: &BattleEnv<'_>) -> PhaseChange {
    let from = state.turn.phase;
    let mut messages = Vec::new();
    let mut regenerated = 0;
    let mut expired_rules = Vec::new();

    match from {
        TurnPhase::Start => {
            messages = fire_turn_trigger(state, env, TriggerType::BeginTurn);
            expired_rules = update_cooldowns(state);

            let current = state.turn.current_player_id.clone();
            for piece in state.pieces.iter_mut().filter(|p| p.is_owned_by(&current)) {
                for skill in &mut piece.skills {
                    skill.tick_cooldown();
                    let max_charges = state
                        .skills_by_id
                        .get(&skill.skill_id)
                        .map_or(0, |definition| definition.max_charges);
                    skill.recharge(max_charges);
                }
            }

            let regen = env.config().action_point_regen;
            if let Some(player) = state.player_mut(&current) {
                regenerated = player.regenerate(regen);
            }
            state.turn.actions.reset();
            state.turn.phase = TurnPhase::Action;
        }
        TurnPhase::Action => {
            messages = fire_turn_trigger(state, env, TriggerType::EndTurn);
            state.turn.phase = TurnPhase::End;
        }
        TurnPhase::End => {
            let current = state.turn.current_player_id.clone();
            if let Some(next) = state.next_player(&current).cloned() {
                state.turn.current_player_id = next;
            }
            state.turn.turn_number += 1;
            state.turn.actions.reset();
            state.turn.phase = TurnPhase::Start;
        }
    }

    let change = PhaseChange {
        from,
        to: state.turn.phase,
        player: state.turn.current_player_id.clone(),
        turn_number: state.turn.turn_number,
        regenerated,
        expired_rules,
        messages,
    };
    if change.to == TurnPhase::Start {
        debug!(
            target: "tactics::engine",
            player = %change.player,
            turn = change.turn_number,
            "turn passed"
        );
    } else {
        trace!(
            target: "tactics::engine",
            from = from.as_str(),
            to = change.to.as_str(),
            player = %change.player,
            turn = change.turn_number,
            "phase advanced"
        );
    }
    change
}

fn fire_turn_trigger(
    state: &mut BattleState,
    env: &BattleEnv<'_>,
    trigger: TriggerType,
) -> Vec<String> {
    let player = state.turn.current_player_id.clone();
    let global = TriggerContext::new(trigger).with_player(player.clone());
    let mut messages = check_triggers(state, env, &global).messages;

    let owned: Vec<PieceId> = state
        .living_pieces_of(&player)
        .map(|p| p.instance_id.clone())
        .collect();
    for piece in owned {
        // An earlier tick may have killed it.
        if !state.piece(&piece).is_some_and(|p| p.is_alive()) {
            continue;
        }
        let ctx = TriggerContext::new(trigger)
            .with_source(piece)
            .with_player(player.clone())
            .piece_rules_only();
        messages.extend(check_triggers(state, env, &ctx).messages);
    }
    messages
}
