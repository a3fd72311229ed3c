//! Trigger/rule system.
//!
//! Rules bind a [`TriggerType`] to a [`RuleEffect`] with optional cooldown,
//! use-count and lifetime limits. They live either in the battle-wide
//! [`RuleRegistry`] or on a piece, and both scopes are scanned on every
//! matching event. Status effects, passives, map hazards and skill-attached
//! reactions all hook in here.
//!
//! # Design Principles
//!
//! - **Pure data**: effects are enum values interpreted by the engine; native
//!   logic is referenced by name and resolved through the
//!   [`HandlerRegistry`](crate::env::HandlerRegistry), so persisted rules never
//!   lose their behaviour.
//! - **Isolation**: a faulting rule is logged and skipped, the remaining rules
//!   still run.
//! - **Bounded re-entrancy**: rules may cause events that fire more rules, up
//!   to `max_trigger_depth` levels.
mod context;
mod dispatch;
mod registry;
mod types;

pub use context::{
    Origin, RuleFault, RuleInvocation, RuleOutcome, TriggerContext, TriggerOutcome,
};
pub use dispatch::{attach_rule, check_triggers, update_cooldowns};
pub use registry::RuleRegistry;
pub use types::{
    RuleEffect, RuleLimits, RuleParams, RuleSource, RuleTemplate, TriggerRule, TriggerType,
};
