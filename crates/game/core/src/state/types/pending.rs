use super::common::PlayerId;
use crate::action::UseSkillAction;
use crate::skill::TargetRequest;

/// A skill activation waiting for the caller to pick a target.
///
/// Produced when a skill asks for a target that the action did not carry.
/// The caller resumes it with [`BattleAction::ResolveTarget`](crate::action::BattleAction::ResolveTarget)
/// or by resubmitting the original action with a target; any other accepted
/// action discards it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTargetSelection {
    pub player_id: PlayerId,
    pub action: UseSkillAction,
    pub request: TargetRequest,
    pub turn_number: u32,
}
