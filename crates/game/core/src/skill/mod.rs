//! Skill execution.
//!
//! A skill's behaviour is one of: an interpreted [`SkillOp`] program, a named
//! native handler resolved through the
//! [`HandlerRegistry`](crate::env::HandlerRegistry), or the default attack.
//! All three run against a [`SkillSandbox`] wrapping a scratch copy of the
//! battle.
//!
//! # Design Principles
//!
//! - **Transactional**: the scratch copy is committed only on success, so a
//!   skill that asks for a target or rejects one leaves no trace.
//! - **Graceful degradation**: a faulting skill is logged and replaced by the
//!   default attack rather than aborting the turn.
//! - **Shared plumbing**: skills never touch hp directly; damage, healing and
//!   statuses go through the combat and status systems and their triggers.
mod execute;
mod program;
mod sandbox;
mod types;

pub use execute::{
    PreviewChange, SkillPreview, SkillResult, calculate_skill_preview, execute_skill_function,
};
pub use program::{default_attack, run_program};
pub use sandbox::{SkillContext, SkillFault, SkillInterrupt, SkillOutcome, SkillSandbox};
pub use types::{
    Amount, Selector, SkillLogic, SkillOp, SkillTarget, TargetFilter, TargetKind, TargetRequest,
};
