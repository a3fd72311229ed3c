use strum::IntoStaticStr;

use super::common::PlayerId;

/// Phases of a single player's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    Start,
    Action,
    End,
}

impl TurnPhase {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Once-per-turn action flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnActions {
    pub has_moved: bool,
    pub has_used_basic_skill: bool,
    pub has_used_charge_skill: bool,
}

impl TurnActions {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turn bookkeeping for the two-player rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub current_player_id: PlayerId,
    /// Starts at 1 and increments on every hand-over.
    pub turn_number: u32,
    pub phase: TurnPhase,
    pub actions: TurnActions,
}

impl TurnState {
    /// Turn 1 of the given player, before the start phase has run.
    pub fn new(first_player: PlayerId) -> Self {
        Self {
            current_player_id: first_player,
            turn_number: 1,
            phase: TurnPhase::Start,
            actions: TurnActions::default(),
        }
    }

    pub fn is_current(&self, player: &PlayerId) -> bool {
        &self.current_player_id == player
    }
}
