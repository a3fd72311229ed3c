//! Authoritative battle state representation.
//!
//! [`BattleState`] is the aggregate root of one battle. It exclusively owns the
//! pieces, the turn bookkeeping, the player resources, the global rule
//! registry and the id allocator. Runtime layers clone or query it but mutate
//! it exclusively through the engine.
mod error;
mod ids;
pub mod types;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

pub use error::InvariantViolation;
pub use ids::IdGenerator;
pub use types::{
    ActionLogKind, BattleActionLog, INFINITE, PendingTargetSelection, PieceId, PieceInstance,
    PlayerId, PlayerTurnMeta, Position, RuleId, SkillId, SkillState, StatusEffect,
    StatusEffectKind, StatusEffectSpec, StatusEffects, StatusId, TurnActions, TurnPhase,
    TurnState, UNLIMITED_USES,
};

pub(crate) use types::tick_down;

use crate::config::BattleConfig;
use crate::env::{BoardMap, PieceStats, SkillDefinition};
use crate::rules::RuleRegistry;

/// Canonical snapshot of one battle.
///
/// Every accepted action produces a new value; the input of
/// [`apply_battle_action`](crate::engine::apply_battle_action) is never mutated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub map: BoardMap,
    /// Pieces still in play, including zero-hp pieces left by a surrender.
    pub pieces: Vec<PieceInstance>,
    /// Pieces removed by a killing blow, in order of death.
    pub graveyard: Vec<PieceInstance>,
    pub piece_stats_by_template_id: BTreeMap<String, PieceStats>,
    pub skills_by_id: BTreeMap<SkillId, SkillDefinition>,
    /// Exactly two entries; the order fixes the turn rotation.
    pub players: Vec<PlayerTurnMeta>,
    pub turn: TurnState,
    pub actions: Vec<BattleActionLog>,
    /// Global rules (map hazards and other battle-wide effects).
    pub rules: RuleRegistry,
    pub ids: IdGenerator,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pending_target: Option<PendingTargetSelection>,
}

impl BattleState {
    /// Empty battle on `map` for two players, in turn 1 of the first player.
    pub fn new(map: BoardMap, players: [PlayerId; 2], config: &BattleConfig) -> Self {
        let turn = TurnState::new(players[0].clone());
        let players = players
            .into_iter()
            .map(|id| {
                PlayerTurnMeta::new(id, config.initial_action_points, config.max_action_points)
            })
            .collect();
        Self {
            map,
            pieces: Vec::new(),
            graveyard: Vec::new(),
            piece_stats_by_template_id: BTreeMap::new(),
            skills_by_id: BTreeMap::new(),
            players,
            turn,
            actions: Vec::new(),
            rules: RuleRegistry::new(),
            ids: IdGenerator::new(),
            pending_target: None,
        }
    }

    // ========================================================================
    // Pieces
    // ========================================================================

    pub fn piece(&self, id: &PieceId) -> Option<&PieceInstance> {
        self.pieces.iter().find(|p| &p.instance_id == id)
    }

    pub fn piece_mut(&mut self, id: &PieceId) -> Option<&mut PieceInstance> {
        self.pieces.iter_mut().find(|p| &p.instance_id == id)
    }

    /// Looks in play first, then in the graveyard.
    pub fn find_piece(&self, id: &PieceId) -> Option<&PieceInstance> {
        self.piece(id)
            .or_else(|| self.graveyard.iter().find(|p| &p.instance_id == id))
    }

    /// Living piece standing on `position`.
    pub fn piece_at(&self, position: Position) -> Option<&PieceInstance> {
        self.pieces
            .iter()
            .find(|p| p.is_alive() && p.position == Some(position))
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }

    /// Walkable, inside the map and free of living pieces.
    pub fn is_free(&self, position: Position) -> bool {
        self.map.is_walkable(position) && !self.is_occupied(position)
    }

    pub fn living_pieces_of<'s>(
        &'s self,
        player: &'s PlayerId,
    ) -> impl Iterator<Item = &'s PieceInstance> + 's {
        self.pieces
            .iter()
            .filter(move |p| p.is_alive() && p.is_owned_by(player))
    }

    /// Adds a piece, registering its template stats.
    pub fn add_piece(&mut self, piece: PieceInstance) {
        self.piece_stats_by_template_id
            .entry(piece.template_id.clone())
            .or_insert_with(|| PieceStats {
                max_hp: piece.max_hp,
                attack: piece.attack,
                defense: piece.defense,
                move_range: piece.move_range,
            });
        self.pieces.push(piece);
    }

    pub fn skill_definition(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills_by_id.get(id)
    }

    // ========================================================================
    // Players
    // ========================================================================

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerTurnMeta> {
        self.players.iter().find(|p| &p.player_id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerTurnMeta> {
        self.players.iter_mut().find(|p| &p.player_id == id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.player_id)
    }

    pub fn is_participant(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Player who moves after `id` in the fixed rotation.
    pub fn next_player(&self, id: &PlayerId) -> Option<&PlayerId> {
        let index = self.players.iter().position(|p| &p.player_id == id)?;
        self.players
            .get((index + 1) % self.players.len())
            .map(|p| &p.player_id)
    }

    pub fn current_player(&self) -> Option<&PlayerTurnMeta> {
        self.player(&self.turn.current_player_id)
    }

    // ========================================================================
    // Action log
    // ========================================================================

    pub fn next_sequence(&self) -> u64 {
        self.actions.last().map_or(1, |entry| entry.sequence + 1)
    }

    /// Appends an entry to the action log for the current turn.
    pub fn record(
        &mut self,
        player_id: PlayerId,
        kind: ActionLogKind,
        piece_id: Option<PieceId>,
        skill_id: Option<SkillId>,
        messages: Vec<String>,
    ) {
        let entry = BattleActionLog {
            sequence: self.next_sequence(),
            turn_number: self.turn.turn_number,
            player_id,
            kind,
            piece_id,
            skill_id,
            messages,
        };
        self.actions.push(entry);
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Checks the structural invariants every accepted action must preserve.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.players.len() != BattleConfig::PLAYER_COUNT {
            return Err(InvariantViolation::PlayerCount(self.players.len()));
        }
        if !self.is_participant(&self.turn.current_player_id) {
            return Err(InvariantViolation::UnknownCurrentPlayer(
                self.turn.current_player_id.clone(),
            ));
        }
        for player in &self.players {
            if player.action_points > player.max_action_points {
                return Err(InvariantViolation::ActionPointsAboveCap {
                    player: player.player_id.clone(),
                    points: player.action_points,
                    cap: player.max_action_points,
                });
            }
        }

        let mut ids = BTreeSet::new();
        let mut occupied = BTreeSet::new();
        for piece in self.pieces.iter().chain(&self.graveyard) {
            if !ids.insert(&piece.instance_id) {
                return Err(InvariantViolation::DuplicatePieceId(
                    piece.instance_id.clone(),
                ));
            }
            if piece.current_hp > piece.max_hp {
                return Err(InvariantViolation::HpAboveMax {
                    piece: piece.instance_id.clone(),
                    hp: piece.current_hp,
                    max: piece.max_hp,
                });
            }
        }
        for piece in self.pieces.iter().filter(|p| p.is_alive()) {
            let Some(position) = piece.position else {
                continue;
            };
            if !self.map.contains(position) {
                return Err(InvariantViolation::PieceOutOfBounds {
                    piece: piece.instance_id.clone(),
                    position,
                });
            }
            if !occupied.insert(position) {
                return Err(InvariantViolation::SharedPosition(position));
            }
        }
        Ok(())
    }

    /// SHA-256 of the canonical binary encoding.
    ///
    /// All keyed collections are ordered, so equal states always hash equally.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Faction, PieceTemplate};

    fn battle() -> BattleState {
        BattleState::new(
            BoardMap::open("test", 4, 4),
            [PlayerId::from("alice"), PlayerId::from("bob")],
            &BattleConfig::default(),
        )
    }

    fn piece(state: &mut BattleState, owner: &str, position: Position) -> PieceId {
        let template = PieceTemplate::new("knight", "Knight", Faction::Red);
        let id = state.ids.next_piece_id(Faction::Red);
        state.add_piece(PieceInstance::from_template(
            id.clone(),
            &template,
            PlayerId::from(owner),
            Faction::Red,
            Some(position),
            Vec::new(),
        ));
        id
    }

    #[test]
    fn next_player_rotates_between_both_players() {
        let state = battle();
        let alice = PlayerId::from("alice");
        let bob = PlayerId::from("bob");
        assert_eq!(state.next_player(&alice), Some(&bob));
        assert_eq!(state.next_player(&bob), Some(&alice));
    }

    #[test]
    fn dead_pieces_do_not_occupy_tiles() {
        let mut state = battle();
        let id = piece(&mut state, "alice", Position::new(1, 1));
        assert!(state.is_occupied(Position::new(1, 1)));

        state.piece_mut(&id).unwrap().current_hp = 0;
        assert!(!state.is_occupied(Position::new(1, 1)));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn shared_living_position_is_an_invariant_violation() {
        let mut state = battle();
        piece(&mut state, "alice", Position::new(2, 2));
        piece(&mut state, "bob", Position::new(2, 2));
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::SharedPosition(Position::new(2, 2)))
        );
    }

    #[test]
    fn log_sequence_is_monotonic() {
        let mut state = battle();
        let alice = PlayerId::from("alice");
        state.record(alice.clone(), ActionLogKind::EndTurn, None, None, Vec::new());
        state.record(alice, ActionLogKind::Surrender, None, None, Vec::new());
        let sequences: Vec<_> = state.actions.iter().map(|a| a.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_survives_a_json_round_trip() {
        let mut state = battle();
        piece(&mut state, "alice", Position::new(0, 0));
        piece(&mut state, "bob", Position::new(3, 3));
        let digest = state.digest().expect("digest");

        let json = serde_json::to_string(&state).expect("serialize");
        let restored: BattleState = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, state);
        assert_eq!(restored.digest().expect("digest"), digest);
        assert_eq!(hex::encode(digest).len(), 64);

        state.players[0].charge_points += 1;
        assert_ne!(state.digest().expect("digest"), digest);
    }
}
