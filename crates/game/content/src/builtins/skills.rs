use std::collections::BTreeMap;

use tactics_core::rules::RuleLimits;
use tactics_core::{
    Amount, DamageType, RuleEffect, RuleTemplate, Selector, SkillDefinition, SkillLogic, SkillOp,
    SkillRange, SkillType, StatusEffectSpec, TargetFilter, TargetKind, TargetRequest, TriggerType,
};

use super::handlers::{BLOODLUST, EXECUTE};

pub(super) fn all() -> Vec<SkillDefinition> {
    vec![
        basic_attack(),
        cleave(),
        lacerate(),
        venom_bolt(),
        mend(),
        blink(),
        war_cry(),
        execute(),
        meteor(),
        shield_wall(),
        thorn_hide(),
        vampiric_strikes(),
        bloodlust(),
    ]
}

// ============================================================================
// Basic skills
// ============================================================================

fn basic_attack() -> SkillDefinition {
    SkillDefinition::new("basic_attack", "Attack")
        .with_description("Strikes the nearest enemy for attack damage")
}

fn cleave() -> SkillDefinition {
    SkillDefinition::new("cleave", "Cleave")
        .with_cooldown(2)
        .with_range(SkillRange::Area, Some(1))
        .with_logic(SkillLogic::Program(vec![SkillOp::AreaDamage {
            amount: Amount::CasterAttack { factor: 0.8 },
            damage_type: DamageType::Physical,
            radius: 1,
        }]))
        .with_description("Hits every adjacent enemy")
}

fn lacerate() -> SkillDefinition {
    SkillDefinition::new("lacerate", "Lacerate")
        .with_cooldown(1)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::Pick {
                selector: Selector::NearestEnemy,
                range: Some(1),
            },
            SkillOp::Damage {
                amount: Amount::attack(),
                damage_type: DamageType::Physical,
            },
            SkillOp::ApplyStatus {
                status: StatusEffectSpec::bleeding(3, 2),
                uses: None,
            },
        ]))
        .with_description("Cuts an adjacent enemy and leaves it bleeding")
}

fn venom_bolt() -> SkillDefinition {
    SkillDefinition::new("venom_bolt", "Venom Bolt")
        .with_cooldown(2)
        .with_power(0.6)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::SelectTarget(TargetRequest::enemy(Some(4))),
            SkillOp::Damage {
                amount: Amount::attack(),
                damage_type: DamageType::Magical,
            },
            SkillOp::ApplyStatus {
                status: StatusEffectSpec::poison(2, 3),
                uses: None,
            },
        ]))
        .with_description("Poisons a chosen enemy within four tiles")
}

fn mend() -> SkillDefinition {
    SkillDefinition::new("mend", "Mend")
        .with_cooldown(1)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::SelectTarget(TargetRequest::ally(Some(3))),
            SkillOp::Heal {
                amount: Amount::Sum(vec![
                    Amount::Flat(6.0),
                    Amount::TargetMaxHp { percent: 10.0 },
                ]),
            },
            SkillOp::Cleanse,
        ]))
        .with_description("Heals a chosen ally and removes its debuffs")
}

fn blink() -> SkillDefinition {
    SkillDefinition::new("blink", "Blink")
        .with_cooldown(3)
        .with_range(SkillRange::SelfOnly, None)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::SelectTarget(TargetRequest::empty_cell(Some(3))),
            SkillOp::Teleport,
        ]))
        .with_description("Teleports to an empty cell within three tiles")
}

// ============================================================================
// Charge skills
// ============================================================================

fn war_cry() -> SkillDefinition {
    SkillDefinition::new("war_cry", "War Cry")
        .with_type(SkillType::Super)
        .with_charge_cost(1)
        .with_range(SkillRange::SelfOnly, None)
        .with_logic(SkillLogic::Program(vec![
            SkillOp::ApplyStatusToSelf {
                status: StatusEffectSpec::attack_modifier(4, 3),
                uses: None,
            },
            SkillOp::ApplyStatusToSelf {
                status: StatusEffectSpec::defense_modifier(2, 3),
                uses: None,
            },
            SkillOp::Message("A war cry echoes across the field".to_owned()),
        ]))
}

fn execute() -> SkillDefinition {
    SkillDefinition::new("execute", "Execute")
        .with_type(SkillType::Super)
        .with_charge_cost(1)
        .with_logic(SkillLogic::Handler(EXECUTE.to_owned()))
        .with_description("Doubles damage against an adjacent enemy at half health or less")
}

fn meteor() -> SkillDefinition {
    SkillDefinition::new("meteor", "Meteor")
        .with_type(SkillType::Ultimate)
        .with_charge_cost(2)
        .with_cost(2)
        .with_power(1.5)
        .with_range(SkillRange::Area, Some(1))
        .with_logic(SkillLogic::Program(vec![
            SkillOp::SelectTarget(TargetRequest {
                target_type: TargetKind::Grid,
                range: Some(5),
                filter: TargetFilter::Any,
            }),
            SkillOp::AreaDamage {
                amount: Amount::attack(),
                damage_type: DamageType::Magical,
                radius: 1,
            },
            SkillOp::ApplyStatus {
                status: StatusEffectSpec::burn(2, 2),
                uses: None,
            },
        ]))
        .with_description("Calls down fire on a chosen cell, once per battle")
}

// ============================================================================
// Passives
// ============================================================================

fn shield_wall() -> SkillDefinition {
    SkillDefinition::new("shield_wall", "Shield Wall").with_passive_rule(
        RuleTemplate::new(
            "Shield Wall",
            TriggerType::BeforeDamageTaken,
            RuleEffect::BlockDamage {
                message: Some("Shield wall absorbs the blow".to_owned()),
            },
        )
        .with_limits(RuleLimits::default().with_cooldown(3)),
    )
}

fn thorn_hide() -> SkillDefinition {
    SkillDefinition::new("thorn_hide", "Thorn Hide").with_passive_rule(RuleTemplate::new(
        "Thorn Hide",
        TriggerType::AfterDamageTaken,
        RuleEffect::Thorns { damage: 2 },
    ))
}

fn vampiric_strikes() -> SkillDefinition {
    SkillDefinition::new("vampiric_strikes", "Vampiric Strikes").with_passive_rule(
        RuleTemplate::new(
            "Vampiric Strikes",
            TriggerType::AfterDamageDealt,
            RuleEffect::HealSource { amount: 2 },
        ),
    )
}

fn bloodlust() -> SkillDefinition {
    let params = BTreeMap::from([("amount".to_owned(), 3), ("duration".to_owned(), 2)]);
    SkillDefinition::new("bloodlust", "Bloodlust").with_passive_rule(RuleTemplate::new(
        "Bloodlust",
        TriggerType::AfterPieceKilled,
        RuleEffect::Handler {
            name: BLOODLUST.to_owned(),
            params,
        },
    ))
}
