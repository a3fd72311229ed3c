//! Skill activation: resources, cooldowns, ultimates, kills and two-phase
//! target selection.

mod common;

use common::*;
use tactics_core::{
    ActionLogKind, Amount, BattleRuleError, BattleState, DamageType, EndTurnAction, ExecuteError,
    GrantChargePointsAction, MoveAction, PieceId, Position, ResolveTargetAction, SkillDefinition,
    SkillLogic, SkillOp, SkillTarget, SkillType, TargetFilter, TargetKind, TargetRequest,
    UseSkillAction,
};

fn rule_error(result: Result<BattleState, ExecuteError>) -> BattleRuleError {
    result
        .expect_err("action should be rejected")
        .rule()
        .cloned()
        .expect("rejection should be a rule violation")
}

fn pass_round(state: &BattleState) -> BattleState {
    let state = act(state, EndTurnAction::new(P1)).expect("p1 ends turn");
    act(&state, EndTurnAction::new(P2)).expect("p2 ends turn")
}

fn snipe() -> SkillDefinition {
    SkillDefinition::new("snipe", "Snipe").with_logic(SkillLogic::Program(vec![
        SkillOp::SelectTarget(TargetRequest::enemy(Some(5))),
        SkillOp::Damage {
            amount: Amount::Flat(6.0),
            damage_type: DamageType::True,
        },
    ]))
}

// ============================================================================
// Cooldowns
// ============================================================================

#[test]
fn cooldown_blocks_reuse_until_two_owner_turns_pass() {
    let mut state = arena();
    let cleave = SkillDefinition::new("cleave", "Cleave").with_cooldown(2);
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(cleave));
    place(&mut state, Unit::new("b1", P2, (1, 3)).hp(60));

    let state = act(&state, UseSkillAction::basic(P1, "r1", "cleave")).expect("first cleave");
    assert_eq!(cooldown(&state, "r1", "cleave"), Some(2));

    // The opponent's start phase does not tick p1's skills.
    let opponent_turn = act(&state, EndTurnAction::new(P1)).expect("p1 ends turn");
    assert_eq!(cooldown(&opponent_turn, "r1", "cleave"), Some(2));

    let state = pass_round(&state);
    assert_eq!(cooldown(&state, "r1", "cleave"), Some(1));
    let err = rule_error(act(&state, UseSkillAction::basic(P1, "r1", "cleave")));
    assert_eq!(
        err,
        BattleRuleError::SkillOnCooldown {
            skill: "cleave".into(),
            turns: 1
        }
    );
    assert_eq!(err.to_string(), "Skill cleave is on cooldown for 1 more turn(s)");

    let state = pass_round(&state);
    assert_eq!(cooldown(&state, "r1", "cleave"), Some(0));
    let state = act(&state, UseSkillAction::basic(P1, "r1", "cleave")).expect("cleave again");
    assert_eq!(hp(&state, "b1"), Some(50));
}

#[test]
fn stocked_charges_are_spent_and_restored_on_owner_turns() {
    let charges = |state: &BattleState| {
        state
            .piece(&PieceId::new("r1"))
            .and_then(|piece| piece.skill(&"volley".into()))
            .map(|skill| skill.current_charges)
    };
    let mut state = arena();
    let volley = SkillDefinition::new("volley", "Volley").with_max_charges(1);
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(volley));
    place(&mut state, Unit::new("b1", P2, (1, 3)).hp(60));

    let err = rule_error(act(&state, UseSkillAction::basic(P1, "r1", "volley")));
    assert_eq!(err, BattleRuleError::NoChargesLeft("volley".into()));

    let state = pass_round(&state);
    assert_eq!(charges(&state), Some(1));
    let state = act(&state, UseSkillAction::basic(P1, "r1", "volley")).expect("charge spent");
    assert_eq!(charges(&state), Some(0));
    assert_eq!(hp(&state, "b1"), Some(50));

    let state = pass_round(&state);
    let state = pass_round(&state);
    assert_eq!(charges(&state), Some(1));
}

// ============================================================================
// Charge skills
// ============================================================================

#[test]
fn ultimate_can_only_be_used_once_per_battle() {
    let mut state = arena();
    let meteor = SkillDefinition::new("meteor", "Meteor").with_type(SkillType::Ultimate);
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(meteor));
    place(&mut state, Unit::new("b1", P2, (1, 3)).hp(60));

    let err = rule_error(act(&state, UseSkillAction::charge(P1, "r1", "meteor")));
    assert_eq!(
        err,
        BattleRuleError::InsufficientChargePoints {
            required: 1,
            available: 0
        }
    );

    let state = act(&state, GrantChargePointsAction::new(P1, 2)).expect("grant");
    assert_eq!(charge_points(&state, P1), 2);

    let state = act(&state, UseSkillAction::charge(P1, "r1", "meteor")).expect("meteor lands");
    assert_eq!(charge_points(&state, P1), 1);
    assert_eq!(hp(&state, "b1"), Some(55));
    assert_eq!(
        state.actions.last().map(|entry| entry.kind),
        Some(ActionLogKind::UseChargeSkill)
    );

    let state = pass_round(&state);
    let err = rule_error(act(&state, UseSkillAction::charge(P1, "r1", "meteor")));
    assert_eq!(err, BattleRuleError::UltimateAlreadyUsed("meteor".into()));
    assert!(err.to_string().contains("has already been used"));
}

#[test]
fn skill_must_match_its_slot() {
    let mut state = arena();
    let meteor = SkillDefinition::new("meteor", "Meteor").with_type(SkillType::Ultimate);
    place(
        &mut state,
        Unit::new("r1", P1, (1, 1))
            .skill(meteor)
            .skill(SkillDefinition::new("strike", "Strike")),
    );
    place(&mut state, Unit::new("b1", P2, (1, 3)));

    let err = rule_error(act(&state, UseSkillAction::basic(P1, "r1", "meteor")));
    assert!(matches!(err, BattleRuleError::WrongSkillSlot { .. }));

    let err = rule_error(act(&state, UseSkillAction::charge(P1, "r1", "strike")));
    assert!(matches!(err, BattleRuleError::WrongSkillSlot { .. }));
}

#[test]
fn grant_requires_positive_amount() {
    let state = arena();
    let err = rule_error(act(&state, GrantChargePointsAction::new(P1, 0)));
    assert_eq!(err, BattleRuleError::InvalidAmount);
}

// ============================================================================
// Kills
// ============================================================================

#[test]
fn killing_blow_buries_victim_and_rewards_charge_points() {
    let mut state = arena();
    place(
        &mut state,
        Unit::new("r1", P1, (1, 1))
            .attack(30)
            .skill(SkillDefinition::new("strike", "Strike")),
    );
    place(&mut state, Unit::new("b1", P2, (1, 2)).hp(10).defense(2));
    place(&mut state, Unit::new("b2", P2, (6, 5)));

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike");

    let victim = PieceId::new("b1");
    assert!(state.piece(&victim).is_none());
    assert!(state.graveyard.iter().any(|p| p.instance_id == victim));
    assert_eq!(hp(&state, "b1"), Some(0));
    assert_eq!(charge_points(&state, P1), 1);
    assert!(state.is_free(Position::new(1, 2)));
}

#[test]
fn armour_never_reduces_damage_below_one() {
    let mut state = arena();
    place(
        &mut state,
        Unit::new("r1", P1, (1, 1))
            .attack(3)
            .skill(SkillDefinition::new("strike", "Strike")),
    );
    place(&mut state, Unit::new("b1", P2, (1, 2)).hp(10).defense(50));

    let state = act(&state, UseSkillAction::basic(P1, "r1", "strike")).expect("strike");
    assert_eq!(hp(&state, "b1"), Some(9));
}

// ============================================================================
// Two-phase targeting
// ============================================================================

#[test]
fn targeted_skill_waits_for_selection_then_resolves() {
    let mut state = arena();
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(snipe()));
    place(&mut state, Unit::new("b1", P2, (1, 4)));

    let waiting = act(&state, UseSkillAction::basic(P1, "r1", "snipe")).expect("asks for target");
    let pending = waiting.pending_target.as_ref().expect("selection pending");
    assert_eq!(pending.request, TargetRequest::enemy(Some(5)));
    assert_eq!(action_points(&waiting, P1), 1);
    assert!(!waiting.turn.actions.has_used_basic_skill);
    assert_eq!(
        waiting.actions.last().map(|entry| entry.kind),
        Some(ActionLogKind::TargetRequested)
    );

    let resolved = act(
        &waiting,
        ResolveTargetAction::new(P1, SkillTarget::Piece(PieceId::new("b1"))),
    )
    .expect("target accepted");
    assert_eq!(hp(&resolved, "b1"), Some(14));
    assert_eq!(action_points(&resolved, P1), 0);
    assert!(resolved.pending_target.is_none());
    assert!(resolved.turn.actions.has_used_basic_skill);
}

#[test]
fn strike_on_an_empty_cell_is_rejected_without_cost() {
    let bombard = SkillDefinition::new("bombard", "Bombard")
        .with_cooldown(2)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::SelectTarget(TargetRequest {
                target_type: TargetKind::Grid,
                range: Some(5),
                filter: TargetFilter::Any,
            }),
            SkillOp::Damage {
                amount: Amount::Flat(6.0),
                damage_type: DamageType::True,
            },
        ]));
    let mut state = arena();
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(bombard));
    place(&mut state, Unit::new("b1", P2, (1, 4)));

    let cast = UseSkillAction::basic(P1, "r1", "bombard")
        .with_target(SkillTarget::Cell(Position::new(2, 3)));
    let err = rule_error(act(&state, cast));

    assert_eq!(err, BattleRuleError::SkillFailed("No valid target".into()));
    assert_eq!(action_points(&state, P1), 1);
    assert_eq!(cooldown(&state, "r1", "bombard"), Some(0));
    assert!(!state.turn.actions.has_used_basic_skill);
}

#[test]
fn invalid_selection_keeps_the_request_open() {
    let mut state = arena();
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(snipe()));
    place(&mut state, Unit::new("r2", P1, (2, 1)));
    place(&mut state, Unit::new("b1", P2, (1, 4)));

    let waiting = act(&state, UseSkillAction::basic(P1, "r1", "snipe")).expect("asks for target");
    let err = rule_error(act(
        &waiting,
        ResolveTargetAction::new(P1, SkillTarget::Piece(PieceId::new("r2"))),
    ));
    assert!(matches!(err, BattleRuleError::SkillFailed(_)));
    assert!(waiting.pending_target.is_some());
    assert_eq!(hp(&waiting, "r2"), Some(20));
}

#[test]
fn any_other_action_discards_the_pending_selection() {
    let mut state = arena();
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(snipe()));
    place(&mut state, Unit::new("b1", P2, (1, 4)));

    let waiting = act(&state, UseSkillAction::basic(P1, "r1", "snipe")).expect("asks for target");
    let moved = act(&waiting, MoveAction::new(P1, "r1", Position::new(2, 1))).expect("move");
    assert!(moved.pending_target.is_none());

    let err = rule_error(act(
        &moved,
        ResolveTargetAction::new(P1, SkillTarget::Piece(PieceId::new("b1"))),
    ));
    assert_eq!(err, BattleRuleError::NoPendingTarget);
}

#[test]
fn supplied_target_skips_the_selection_step() {
    let mut state = arena();
    place(&mut state, Unit::new("r1", P1, (1, 1)).skill(snipe()));
    place(&mut state, Unit::new("b1", P2, (1, 4)));

    let action = UseSkillAction::basic(P1, "r1", "snipe")
        .with_target(SkillTarget::Piece(PieceId::new("b1")));
    let state = act(&state, action).expect("snipe");

    assert!(state.pending_target.is_none());
    assert_eq!(hp(&state, "b1"), Some(14));
}
