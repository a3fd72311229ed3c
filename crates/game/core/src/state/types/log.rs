use strum::IntoStaticStr;

use super::common::{PieceId, PlayerId, SkillId};

/// Discriminant recorded for every accepted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum ActionLogKind {
    Move,
    UseBasicSkill,
    UseChargeSkill,
    TargetRequested,
    EndTurn,
    Surrender,
    GrantChargePoints,
}

impl ActionLogKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Append-only record of an accepted action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActionLog {
    pub sequence: u64,
    pub turn_number: u32,
    pub player_id: PlayerId,
    pub kind: ActionLogKind,
    pub piece_id: Option<PieceId>,
    pub skill_id: Option<SkillId>,
    pub messages: Vec<String>,
}
