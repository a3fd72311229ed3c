//! Session lifecycle against the built-in content.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tactics_core::{
    BattleAction, BattleRuleError, EndTurnAction, MoveAction, PieceId, PlayerId, Position,
    SurrenderAction,
};
use tactics_runtime::{
    BattleOutcome, BattleSetup, FileRoomRepository, InMemoryRoomRepository, OracleManager,
    RepositoryError, RoomRepository, RoomSnapshot, RoomStatus, RuntimeError, SessionManager,
};

const BATTLE: &str = "duel";

fn manager() -> SessionManager {
    SessionManager::new(OracleManager::builtin())
}

async fn started() -> SessionManager {
    let manager = manager();
    manager
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect("battle created");
    manager
}

fn step_knight() -> BattleAction {
    MoveAction::new("alice", "red-1", Position::new(1, 1)).into()
}

fn position(state: &tactics_core::BattleState, id: &str) -> Option<Position> {
    state.piece(&PieceId::new(id)).and_then(|piece| piece.position)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn create_seats_both_sides_on_the_default_map() {
    let manager = manager();
    let state = manager
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect("battle created");

    assert_eq!(state.map.id, "training_grounds");
    assert_eq!(state.pieces.len(), 6);
    assert_eq!(position(&state, "red-1"), Some(Position::new(1, 0)));
    assert_eq!(position(&state, "blue-1"), Some(Position::new(1, 5)));
    assert_eq!(state.turn.current_player_id, PlayerId::new("alice"));
    assert_eq!(manager.battle_ids().await, vec![BATTLE.to_owned()]);
    assert_eq!(manager.outcome(BATTLE).await.expect("outcome"), BattleOutcome::Ongoing);

    let err = manager
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect_err("duplicate id");
    assert!(matches!(err, RuntimeError::BattleExists(_)));
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn invalid_setup_is_a_client_error() {
    let manager = manager();
    let err = manager
        .create_battle(BATTLE, BattleSetup::new("alice", "alice"))
        .await
        .expect_err("same player twice");

    assert!(matches!(err, RuntimeError::InvalidSetup(_)));
    assert_eq!(err.http_status(), 400);
    assert!(manager.battle_ids().await.is_empty());
}

#[tokio::test]
async fn unknown_battle_is_not_found() {
    let manager = manager();
    let err = manager.snapshot("nowhere").await.expect_err("no such battle");
    assert_eq!(err.http_status(), 404);

    let err = manager.remove("nowhere").await.expect_err("no such battle");
    assert!(matches!(err, RuntimeError::BattleNotFound(_)));
}

// ============================================================================
// Actions
// ============================================================================

#[tokio::test]
async fn accepted_action_updates_state_and_history() {
    let manager = started().await;

    let receipt = manager.apply(BATTLE, step_knight()).await.expect("move accepted");
    assert_eq!(receipt.turn_number, 1);
    assert_eq!(receipt.current_player, PlayerId::new("alice"));
    assert!(!receipt.awaiting_target);
    assert_eq!(receipt.outcome, BattleOutcome::Ongoing);

    let session = manager.session(BATTLE).await.expect("session");
    assert_eq!(position(&session.state, "red-1"), Some(Position::new(1, 1)));
    assert_eq!(session.history, vec![step_knight()]);
}

#[tokio::test]
async fn rejected_action_leaves_the_battle_untouched() {
    let manager = started().await;
    manager.apply(BATTLE, step_knight()).await.expect("first move");
    let before = manager.snapshot(BATTLE).await.expect("snapshot");

    let second = MoveAction::new("alice", "red-1", Position::new(1, 2)).into();
    let err = manager.apply(BATTLE, second).await.expect_err("second move");

    assert_eq!(err.rule(), Some(&BattleRuleError::MoveAlreadyUsed));
    assert!(err.is_client_error());
    assert_eq!(err.http_status(), 400);
    assert_eq!(manager.snapshot(BATTLE).await.expect("snapshot"), before);
    let session = manager.session(BATTLE).await.expect("session");
    assert_eq!(session.history.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_are_serialized() {
    let manager = Arc::new(started().await);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        tasks.push(tokio::spawn(async move {
            manager
                .apply(BATTLE, EndTurnAction::new("alice").into())
                .await
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        match task.await.expect("task completes") {
            Ok(_) => accepted += 1,
            Err(err) => assert_eq!(
                err.rule(),
                Some(&BattleRuleError::NotYourTurn(PlayerId::new("alice")))
            ),
        }
    }

    assert_eq!(accepted, 1);
    let session = manager.session(BATTLE).await.expect("session");
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.state.turn.turn_number, 2);
    assert_eq!(session.state.turn.current_player_id, PlayerId::new("bob"));
}

#[tokio::test]
async fn surrender_ends_the_battle() {
    let manager = started().await;

    let receipt = manager
        .apply(BATTLE, SurrenderAction::new("bob").into())
        .await
        .expect("surrender accepted");

    assert_eq!(
        receipt.outcome,
        BattleOutcome::Victory {
            winner: PlayerId::new("alice")
        }
    );
    let session = manager.session(BATTLE).await.expect("session");
    assert_eq!(session.status, RoomStatus::Finished);

    let err = manager
        .apply(BATTLE, EndTurnAction::new("alice").into())
        .await
        .expect_err("battle is over");
    assert!(matches!(err, RuntimeError::BattleFinished(_)));
    assert_eq!(err.http_status(), 409);
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn exported_room_resumes_in_another_manager() {
    let source = started().await;
    source.apply(BATTLE, step_knight()).await.expect("move");
    let json = source
        .export_room(BATTLE)
        .await
        .expect("export")
        .to_json()
        .expect("json");

    let target = manager();
    let report = target.import_room_json(&json).await.expect("import");

    assert!(report.is_clean());
    let session = target.session(BATTLE).await.expect("session");
    assert_eq!(session.status, RoomStatus::InProgress);
    assert_eq!(session.players, vec![PlayerId::new("alice"), PlayerId::new("bob")]);
    assert_eq!(session.history, vec![step_knight()]);
    assert_eq!(position(&session.state, "red-1"), Some(Position::new(1, 1)));

    let receipt = target
        .apply(BATTLE, EndTurnAction::new("alice").into())
        .await
        .expect("play continues");
    assert_eq!(receipt.current_player, PlayerId::new("bob"));
}

#[tokio::test]
async fn tampered_room_is_refused() {
    let source = started().await;
    let mut room = source.export_room(BATTLE).await.expect("export");
    if let Some(piece) = room.battle_state.piece_mut(&PieceId::new("blue-1")) {
        piece.current_hp = 1;
    }

    let target = manager();
    let err = target.import_room(room).await.expect_err("digest mismatch");

    assert!(matches!(err, RuntimeError::DigestMismatch { .. }));
    assert!(!err.is_client_error());
    assert_eq!(err.http_status(), 500);
    assert!(target.battle_ids().await.is_empty());
}

#[tokio::test]
async fn importing_over_a_live_battle_is_rejected() {
    let manager = started().await;
    let room = manager.export_room(BATTLE).await.expect("export");

    let err = manager.import_room(room).await.expect_err("already live");
    assert!(matches!(err, RuntimeError::BattleExists(_)));
}

#[tokio::test]
async fn file_repository_keeps_rooms_across_managers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = Arc::new(FileRoomRepository::new(dir.path()).expect("repository"));

    let first = manager().with_repository(repository.clone());
    first
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect("battle created");
    first.apply(BATTLE, step_knight()).await.expect("move");
    assert_eq!(repository.list().expect("list"), vec![BATTLE.to_owned()]);

    let second = manager().with_repository(repository.clone());
    second.restore(BATTLE).await.expect("restored");
    let state = second.snapshot(BATTLE).await.expect("snapshot");
    assert_eq!(position(&state, "red-1"), Some(Position::new(1, 1)));

    second.remove(BATTLE).await.expect("removed");
    assert!(!repository.exists(BATTLE));

    let err = second.restore(BATTLE).await.expect_err("gone");
    assert_eq!(err.http_status(), 404);
}

/// In-memory storage whose writes can be switched off.
#[derive(Default)]
struct ReadOnlySwitch {
    rooms: InMemoryRoomRepository,
    read_only: AtomicBool,
}

impl ReadOnlySwitch {
    fn lock_writes(&self) {
        self.read_only.store(true, Ordering::SeqCst);
    }
}

impl RoomRepository for ReadOnlySwitch {
    fn save(&self, room: &RoomSnapshot) -> Result<(), RepositoryError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            )));
        }
        self.rooms.save(room)
    }

    fn load(&self, id: &str) -> Result<Option<RoomSnapshot>, RepositoryError> {
        self.rooms.load(id)
    }

    fn exists(&self, id: &str) -> bool {
        self.rooms.exists(id)
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.rooms.delete(id)
    }

    fn list(&self) -> Result<Vec<String>, RepositoryError> {
        self.rooms.list()
    }
}

#[tokio::test]
async fn failed_save_keeps_the_previous_state() {
    let repository = Arc::new(ReadOnlySwitch::default());
    let manager = manager().with_repository(repository.clone());
    manager
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect("battle created");
    let before = manager.session(BATTLE).await.expect("session");
    repository.lock_writes();

    let err = manager
        .apply(BATTLE, EndTurnAction::new("alice").into())
        .await
        .expect_err("save fails");

    assert!(matches!(err, RuntimeError::Repository(RepositoryError::Io(_))));
    assert_eq!(err.http_status(), 500);
    let after = manager.session(BATTLE).await.expect("session");
    assert_eq!(after, before);
    assert_eq!(after.state.turn.current_player_id, PlayerId::new("alice"));
    assert!(after.history.is_empty());

    let stored = repository.load(BATTLE).expect("load").expect("stored room");
    assert_eq!(stored.battle_state, before.state);
}

#[tokio::test]
async fn failed_first_save_does_not_leave_a_battle_behind() {
    let repository = Arc::new(ReadOnlySwitch::default());
    repository.lock_writes();
    let manager = manager().with_repository(repository.clone());

    let err = manager
        .create_battle(BATTLE, BattleSetup::new("alice", "bob"))
        .await
        .expect_err("save fails");

    assert!(matches!(err, RuntimeError::Repository(_)));
    assert!(manager.battle_ids().await.is_empty());
    assert!(!repository.exists(BATTLE));
}
