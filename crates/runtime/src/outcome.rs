//! Termination detection.
//!
//! The engine never ends a battle by itself; the runtime inspects each new
//! state and decides whether someone has won.

use serde::{Deserialize, Serialize};
use tactics_core::{BattleState, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BattleOutcome {
    Ongoing,
    Victory { winner: PlayerId },
    /// Neither side has a living piece left.
    Draw,
}

impl BattleOutcome {
    pub fn is_finished(&self) -> bool {
        !matches!(self, BattleOutcome::Ongoing)
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            BattleOutcome::Victory { winner } => Some(winner),
            _ => None,
        }
    }
}

/// Counts living pieces per player.
pub fn battle_outcome(state: &BattleState) -> BattleOutcome {
    let standing: Vec<&PlayerId> = state
        .players
        .iter()
        .map(|meta| &meta.player_id)
        .filter(|player| state.living_pieces_of(player).next().is_some())
        .collect();

    match standing.as_slice() {
        [] => BattleOutcome::Draw,
        [winner] => BattleOutcome::Victory {
            winner: (*winner).clone(),
        },
        _ => BattleOutcome::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{
        BattleConfig, BoardMap, Faction, PieceId, PieceInstance, PieceTemplate, Position,
    };

    fn state() -> BattleState {
        let mut state = BattleState::new(
            BoardMap::open("arena", 4, 4),
            [PlayerId::new("alice"), PlayerId::new("bob")],
            &BattleConfig::default(),
        );
        let template = PieceTemplate::new("grunt", "Grunt", Faction::Neutral).with_stats(10, 2, 0, 2);
        let sides = [
            ("red-1", "alice", Faction::Red, 0),
            ("blue-1", "bob", Faction::Blue, 3),
        ];
        for (id, owner, faction, x) in sides {
            let piece = PieceInstance::from_template(
                PieceId::new(id),
                &template,
                PlayerId::new(owner),
                faction,
                Some(Position::new(x, 0)),
                Vec::new(),
            );
            state.add_piece(piece);
        }
        state
    }

    fn kill(state: &mut BattleState, id: &str) {
        if let Some(piece) = state.piece_mut(&PieceId::new(id)) {
            piece.current_hp = 0;
        }
    }

    #[test]
    fn both_sides_standing_is_ongoing() {
        assert_eq!(battle_outcome(&state()), BattleOutcome::Ongoing);
    }

    #[test]
    fn last_side_standing_wins() {
        let mut state = state();
        kill(&mut state, "blue-1");
        let outcome = battle_outcome(&state);
        assert_eq!(outcome.winner(), Some(&PlayerId::new("alice")));
        assert!(outcome.is_finished());
    }

    #[test]
    fn no_survivors_is_a_draw() {
        let mut state = state();
        kill(&mut state, "blue-1");
        kill(&mut state, "red-1");
        assert_eq!(battle_outcome(&state), BattleOutcome::Draw);
    }
}
