//! Deterministic battle rules for a 1v1 turn-based tactics game.
//!
//! `tactics-core` defines the canonical rules (actions, turn state machine,
//! skills, triggers, status effects) and exposes pure APIs reused by the
//! runtime and offline tools. All state changes flow through
//! [`engine::apply_battle_action`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod rules;
pub mod skill;
pub mod state;
pub mod status;

pub use action::{
    ActionTransition, BattleAction, BattleRuleError, EndTurnAction, GrantChargePointsAction,
    MoveAction, ResolveTargetAction, SkillSlot, SurrenderAction, UseSkillAction,
};
pub use combat::{DamageReport, DamageType, HealReport, compute_damage, deal_damage, heal_damage};
pub use config::BattleConfig;
pub use engine::{
    BattleEngine, ExecuteError, PhaseChange, RehydrationError, RehydrationReport, TransitionPhase,
    TransitionPhaseError, apply_battle_action, begin_phase, create_initial_battle_for_players,
    rehydrate,
};
pub use env::{
    BattleEnv, BoardMap, Faction, HandlerRegistry, MapError, MapOracle, OracleError, PieceOracle,
    PieceStats, PieceTemplate, RuleHandler, SkillDefinition, SkillHandler, SkillKind, SkillOracle,
    SkillRange, SkillType, TemplateSkill, Tile, TileKind,
};
pub use error::{ErrorSeverity, GameError};
pub use rules::{
    RuleEffect, RuleFault, RuleInvocation, RuleLimits, RuleOutcome, RuleRegistry, RuleSource,
    RuleTemplate, TriggerContext, TriggerOutcome, TriggerRule, TriggerType, check_triggers,
};
pub use skill::{
    Amount, Selector, SkillContext, SkillInterrupt, SkillLogic, SkillOp, SkillOutcome,
    SkillPreview, SkillResult, SkillSandbox, SkillTarget, TargetFilter, TargetKind, TargetRequest,
    calculate_skill_preview, execute_skill_function,
};
pub use state::{
    ActionLogKind, BattleActionLog, BattleState, IdGenerator, InvariantViolation,
    PendingTargetSelection, PieceId, PieceInstance, PlayerId, PlayerTurnMeta, Position, RuleId,
    SkillId, SkillState, StatusEffect, StatusEffectKind, StatusEffectSpec, StatusId, TurnPhase,
    TurnState,
};
pub use status::{StatusError, add_status_effect, remove_status_effect};
