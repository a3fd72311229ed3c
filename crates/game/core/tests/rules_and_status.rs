//! Trigger rules and status effects driven through the turn cycle.

mod common;

use common::*;
use tactics_core::rules::{Origin, RuleLimits, attach_rule};
use tactics_core::{
    BattleEnv, BattleRuleError, BattleState, DamageType, EndTurnAction, PieceId, RuleEffect,
    RuleSource, RuleTemplate, SkillDefinition, TriggerType, UseSkillAction, deal_damage, status,
};

fn duel() -> BattleState {
    let mut state = arena();
    place(
        &mut state,
        Unit::new("r1", P1, (1, 1)).skill(SkillDefinition::new("strike", "Strike")),
    );
    place(&mut state, Unit::new("b1", P2, (1, 2)).hp(40));
    state
}

fn end_turns(mut state: BattleState, count: usize) -> BattleState {
    for _ in 0..count {
        let player = state.turn.current_player_id.clone();
        state = act(&state, EndTurnAction::new(player)).expect("turn passes");
    }
    state
}

fn attach(state: &mut BattleState, piece: &str, template: RuleTemplate) {
    attach_rule(state, &PieceId::new(piece), &template, RuleSource::Custom)
        .expect("piece exists");
}

// ============================================================================
// Status effects
// ============================================================================

#[test]
fn bleeding_ticks_on_its_owners_turns_then_wears_off() {
    let mut state = duel();
    let b1 = PieceId::new("b1");
    status::add_bleeding(&mut state, &BattleEnv::empty(), &b1, 3, 2, &Origin::piece(PieceId::new("r1")))
        .expect("bleeding applies");

    // p2's first turn
    let state = end_turns(state, 1);
    assert_eq!(hp(&state, "b1"), Some(37));

    // p2's second turn
    let state = end_turns(state, 2);
    assert_eq!(hp(&state, "b1"), Some(34));

    // p2's third turn: exhausted, removed without damage
    let state = end_turns(state, 2);
    assert_eq!(hp(&state, "b1"), Some(34));
    let piece = state.piece(&b1).expect("b1 alive");
    assert!(piece.statuses.is_empty());
    assert!(piece.rules.iter().all(|rule| rule.status_id().is_none()));
}

#[test]
fn lethal_bleed_credits_the_piece_that_applied_it() {
    let mut state = duel();
    let b1 = PieceId::new("b1");
    if let Some(piece) = state.piece_mut(&b1) {
        piece.current_hp = 3;
    }
    status::add_bleeding(&mut state, &BattleEnv::empty(), &b1, 5, 2, &Origin::piece(PieceId::new("r1")))
        .expect("bleeding applies");

    let state = end_turns(state, 1);

    assert!(state.piece(&b1).is_none());
    assert_eq!(hp(&state, "b1"), Some(0));
    assert_eq!(charge_points(&state, P1), 1);
}

#[test]
fn silenced_piece_cannot_cast() {
    let mut state = duel();
    status::add_silence(&mut state, &BattleEnv::empty(), &PieceId::new("r1"), 1, &Origin::system())
        .expect("silence applies");

    let err = act(&state, UseSkillAction::basic(P1, "r1", "strike"))
        .expect_err("silenced")
        .rule()
        .cloned();
    assert_eq!(err, Some(BattleRuleError::PieceSilenced(PieceId::new("r1"))));
}

#[test]
fn attack_modifier_raises_skill_damage() {
    let mut state = duel();
    status::add_attack_modifier(&mut state, &BattleEnv::empty(), &PieceId::new("r1"), 5, 2, &Origin::system())
        .expect("buff applies");

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike");
    assert_eq!(hp(&state, "b1"), Some(30));
}

#[test]
fn cleanse_removes_debuffs_and_their_rules() {
    let mut state = duel();
    let env = BattleEnv::empty();
    let b1 = PieceId::new("b1");
    status::add_poison(&mut state, &env, &b1, 2, 3, &Origin::system()).expect("poison");
    status::add_defense_modifier(&mut state, &env, &b1, 4, 3, &Origin::system()).expect("guard");

    let removed = status::cleanse_debuffs(&mut state, &env, &b1, &Origin::system());

    assert_eq!(removed.len(), 1);
    let piece = state.piece(&b1).expect("b1 alive");
    assert_eq!(piece.statuses.len(), 1);
    assert_eq!(piece.effective_defense(), 4);
    assert_eq!(piece.rules.len(), 1);
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn thorns_reflect_damage_to_the_attacker() {
    let mut state = duel();
    attach(
        &mut state,
        "b1",
        RuleTemplate::new("Spikes", TriggerType::AfterDamageTaken, RuleEffect::Thorns { damage: 4 }),
    );

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike");

    assert_eq!(hp(&state, "b1"), Some(35));
    assert_eq!(hp(&state, "r1"), Some(16));
}

#[test]
fn thorns_still_reflect_on_a_lethal_hit() {
    let mut state = duel();
    if let Some(piece) = state.piece_mut(&PieceId::new("b1")) {
        piece.current_hp = 3;
    }
    attach(
        &mut state,
        "b1",
        RuleTemplate::new("Spikes", TriggerType::AfterDamageTaken, RuleEffect::Thorns { damage: 4 }),
    );

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike");

    assert!(state.piece(&PieceId::new("b1")).is_none());
    assert_eq!(state.graveyard.len(), 1);
    assert_eq!(hp(&state, "b1"), Some(0));
    assert_eq!(hp(&state, "r1"), Some(16));
    assert_eq!(charge_points(&state, P1), 1);
}

#[test]
fn single_use_shield_blocks_only_the_first_hit() {
    let mut state = duel();
    let env = BattleEnv::empty();
    let b1 = PieceId::new("b1");
    attach(
        &mut state,
        "b1",
        RuleTemplate::new(
            "Barrier",
            TriggerType::BeforeDamageTaken,
            RuleEffect::BlockDamage { message: None },
        )
        .with_limits(RuleLimits::default().with_max_uses(1)),
    );

    let first = deal_damage(&mut state, &env, &b1, 10.0, DamageType::Physical, &Origin::system())
        .expect("first hit");
    assert!(first.blocked);
    assert_eq!(hp(&state, "b1"), Some(40));

    let second = deal_damage(&mut state, &env, &b1, 10.0, DamageType::Physical, &Origin::system())
        .expect("second hit");
    assert!(!second.blocked);
    assert_eq!(hp(&state, "b1"), Some(30));
}

#[test]
fn mutual_reactions_stop_at_the_depth_limit() {
    let mut state = arena();
    place(
        &mut state,
        Unit::new("r1", P1, (1, 1))
            .hp(100)
            .skill(SkillDefinition::new("strike", "Strike")),
    );
    place(&mut state, Unit::new("b1", P2, (1, 2)).hp(100));
    for piece in ["r1", "b1"] {
        attach(
            &mut state,
            piece,
            RuleTemplate::new("Spikes", TriggerType::AfterDamageTaken, RuleEffect::Thorns { damage: 4 }),
        );
    }

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike resolves");

    let r1 = hp(&state, "r1").expect("r1");
    let b1 = hp(&state, "b1").expect("b1");
    assert!(r1 < 100 && r1 > 50, "r1 at {r1}");
    assert!(b1 < 95 && b1 > 50, "b1 at {b1}");
}

#[test]
fn blocked_skill_still_consumes_the_activation() {
    let mut state = duel();
    attach(
        &mut state,
        "r1",
        RuleTemplate::new(
            "Seal",
            TriggerType::BeforeSkillUsed,
            RuleEffect::BlockDamage {
                message: Some("Sealed".into()),
            },
        ),
    );

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("accepted");

    assert_eq!(hp(&state, "b1"), Some(40));
    assert_eq!(action_points(&state, P1), 0);
    assert!(state.turn.actions.has_used_basic_skill);
    assert!(
        state
            .actions
            .last()
            .is_some_and(|entry| entry.messages.iter().any(|m| m.contains("Sealed")))
    );
}

#[test]
fn begin_turn_rule_with_duration_expires() {
    let mut state = duel();
    attach(
        &mut state,
        "b1",
        RuleTemplate::new(
            "Tithe",
            TriggerType::BeginTurn,
            RuleEffect::GrantChargePoints { amount: 1 },
        )
        .with_limits(RuleLimits::default().with_duration(3)),
    );

    // The lifetime counts every turn start, so only p2's turns 2 and 4 fire.
    let state = end_turns(state, 7);
    assert_eq!(charge_points(&state, P2), 2);
}
