//! Battle sessions and the per-battle writer lock.
//!
//! The engine assumes a single writer per battle. [`SessionManager`] keeps
//! every live battle behind its own `tokio::sync::Mutex`, so concurrent
//! requests for the same battle queue up while different battles proceed in
//! parallel.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use tactics_core::{
    BattleAction, BattleState, GameError, PlayerId, RehydrationReport, apply_battle_action,
    create_initial_battle_for_players, rehydrate,
};

use crate::error::{Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::outcome::{BattleOutcome, battle_outcome};
use crate::repository::{
    RepositoryError, Result as RepositoryResult, RoomRepository, RoomSnapshot, RoomStatus,
};

/// Parameters for a new battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleSetup {
    pub players: [PlayerId; 2],
    /// Template ids offered to both sides; empty means every selectable piece.
    pub roster: Vec<String>,
    pub selections: Option<BTreeMap<PlayerId, Vec<String>>>,
    pub map_id: Option<String>,
}

impl BattleSetup {
    pub fn new(first: impl Into<PlayerId>, second: impl Into<PlayerId>) -> Self {
        Self {
            players: [first.into(), second.into()],
            roster: Vec::new(),
            selections: None,
            map_id: None,
        }
    }

    pub fn with_roster<I, S>(mut self, roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster = roster.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_selection<I, S>(mut self, player: impl Into<PlayerId>, pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .get_or_insert_with(BTreeMap::new)
            .insert(player.into(), pieces.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_map(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }
}

/// One live battle.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleSession {
    pub id: String,
    pub players: Vec<PlayerId>,
    pub status: RoomStatus,
    pub state: BattleState,
    /// Every accepted action, in order.
    pub history: Vec<BattleAction>,
}

impl BattleSession {
    pub fn outcome(&self) -> BattleOutcome {
        battle_outcome(&self.state)
    }

    /// Serializable room with a fresh digest of the current state.
    pub fn to_room(&self) -> Result<RoomSnapshot> {
        Ok(RoomSnapshot {
            id: self.id.clone(),
            status: self.status,
            players: self.players.clone(),
            battle_state: self.state.clone(),
            actions: self.history.clone(),
            digest: state_digest(&self.state)?,
        })
    }
}

/// Result of an accepted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionReceipt {
    pub turn_number: u32,
    pub current_player: PlayerId,
    /// The skill is waiting for a target selection.
    pub awaiting_target: bool,
    pub outcome: BattleOutcome,
}

/// Owns every live battle and the content they are played with.
pub struct SessionManager {
    oracles: OracleManager,
    sessions: RwLock<BTreeMap<String, Arc<Mutex<BattleSession>>>>,
    repository: Option<Arc<dyn RoomRepository>>,
}

impl SessionManager {
    pub fn new(oracles: OracleManager) -> Self {
        Self {
            oracles,
            sessions: RwLock::new(BTreeMap::new()),
            repository: None,
        }
    }

    /// Persists every room after creation and after each accepted action.
    pub fn with_repository(mut self, repository: Arc<dyn RoomRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub async fn battle_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub async fn create_battle(
        &self,
        id: impl Into<String>,
        setup: BattleSetup,
    ) -> Result<BattleState> {
        let id = id.into();
        if self.sessions.read().await.contains_key(&id) {
            return Err(RuntimeError::BattleExists(id));
        }
        let roster = if setup.roster.is_empty() {
            self.oracles.pieces().selectable_ids()
        } else {
            setup.roster
        };

        let state = {
            let env = self.oracles.as_battle_env();
            create_initial_battle_for_players(
                &setup.players,
                &roster,
                setup.selections.as_ref(),
                setup.map_id.as_deref(),
                &env,
            )
        }
        .ok_or_else(|| {
            RuntimeError::InvalidSetup(format!(
                "players {} and {} could not be seated",
                setup.players[0], setup.players[1]
            ))
        })?;

        let session = BattleSession {
            id: id.clone(),
            players: setup.players.to_vec(),
            status: RoomStatus::InProgress,
            state: state.clone(),
            history: Vec::new(),
        };
        self.insert(session.clone()).await?;
        if let Err(error) = self.persist(&session).await {
            self.sessions.write().await.remove(&id);
            return Err(error);
        }

        tracing::info!(
            target: "tactics::runtime",
            battle = %id,
            map = %state.map.id,
            pieces = state.pieces.len(),
            "battle created"
        );
        Ok(state)
    }

    /// Applies `action` under the battle's writer lock.
    ///
    /// A rejected action, or one whose room fails to save, leaves the battle
    /// unchanged.
    pub async fn apply(&self, id: &str, action: BattleAction) -> Result<ActionReceipt> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        if session.status == RoomStatus::Finished {
            return Err(RuntimeError::BattleFinished(id.to_owned()));
        }

        let next = {
            let env = self.oracles.as_battle_env();
            apply_battle_action(&session.state, &action, &env)
        };
        let next = match next {
            Ok(next) => next,
            Err(error) => {
                if error.is_rule_violation() {
                    tracing::debug!(
                        target: "tactics::runtime",
                        battle = %id,
                        action = action.as_str(),
                        code = error.error_code(),
                        %error,
                        "action rejected"
                    );
                } else {
                    tracing::error!(
                        target: "tactics::runtime",
                        battle = %id,
                        action = action.as_str(),
                        %error,
                        "action broke a battle invariant"
                    );
                }
                return Err(error.into());
            }
        };

        tracing::debug!(
            target: "tactics::runtime",
            battle = %id,
            action = action.as_str(),
            player = %action.player(),
            "action accepted"
        );
        let mut history = session.history.clone();
        history.push(action);
        let mut candidate = BattleSession {
            id: session.id.clone(),
            players: session.players.clone(),
            status: session.status,
            state: next,
            history,
        };
        let outcome = candidate.outcome();
        if outcome.is_finished() {
            candidate.status = RoomStatus::Finished;
        }
        // The live session only advances once the room is stored.
        self.persist(&candidate).await?;
        *session = candidate;
        if outcome.is_finished() {
            tracing::info!(target: "tactics::runtime", battle = %id, ?outcome, "battle finished");
        }

        Ok(ActionReceipt {
            turn_number: session.state.turn.turn_number,
            current_player: session.state.turn.current_player_id.clone(),
            awaiting_target: session.state.pending_target.is_some(),
            outcome,
        })
    }

    /// Copy of the current battle state.
    pub async fn snapshot(&self, id: &str) -> Result<BattleState> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.state.clone())
    }

    pub async fn session(&self, id: &str) -> Result<BattleSession> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    pub async fn outcome(&self, id: &str) -> Result<BattleOutcome> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.outcome())
    }

    /// Drops the battle from memory and from the repository.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_none() {
            return Err(RuntimeError::BattleNotFound(id.to_owned()));
        }
        let owned = id.to_owned();
        self.storage(move |repository| repository.delete(&owned))
            .await?;
        tracing::info!(target: "tactics::runtime", battle = %id, "battle removed");
        Ok(())
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    pub async fn export_room(&self, id: &str) -> Result<RoomSnapshot> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        session.to_room()
    }

    /// Resumes a stored room.
    ///
    /// The digest must match the stored battle state, and the state is
    /// rehydrated against the current content before it accepts actions.
    pub async fn import_room(&self, room: RoomSnapshot) -> Result<RehydrationReport> {
        if self.sessions.read().await.contains_key(&room.id) {
            return Err(RuntimeError::BattleExists(room.id));
        }

        let computed = state_digest(&room.battle_state)?;
        if computed != room.digest {
            tracing::warn!(
                target: "tactics::runtime",
                room = %room.id,
                stored = %room.digest,
                %computed,
                "room digest mismatch"
            );
            return Err(RuntimeError::DigestMismatch {
                room: room.id,
                stored: room.digest,
                computed,
            });
        }

        let mut state = room.battle_state;
        let report = {
            let env = self.oracles.as_battle_env();
            rehydrate(&mut state, &env)?
        };
        if !report.is_clean() {
            tracing::warn!(
                target: "tactics::runtime",
                room = %room.id,
                missing_skills = ?report.missing_skills,
                unresolved_handlers = ?report.unresolved_handlers,
                "room restored with unresolved content"
            );
        }

        let session = BattleSession {
            id: room.id.clone(),
            players: room.players,
            status: room.status,
            state,
            history: room.actions,
        };
        self.insert(session).await?;

        tracing::info!(target: "tactics::runtime", room = %room.id, "room restored");
        Ok(report)
    }

    pub async fn import_room_json(&self, json: &str) -> Result<RehydrationReport> {
        let room = RoomSnapshot::from_json(json)?;
        self.import_room(room).await
    }

    /// Loads a room from the configured repository and resumes it.
    pub async fn restore(&self, id: &str) -> Result<RehydrationReport> {
        if self.repository.is_none() {
            return Err(RuntimeError::BattleNotFound(id.to_owned()));
        }
        let owned = id.to_owned();
        let room = self
            .storage(move |repository| repository.load(&owned))
            .await?
            .flatten()
            .ok_or_else(|| RepositoryError::NotFound(id.to_owned()))?;
        self.import_room(room).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn handle(&self, id: &str) -> Result<Arc<Mutex<BattleSession>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RuntimeError::BattleNotFound(id.to_owned()))
    }

    async fn insert(&self, session: BattleSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(RuntimeError::BattleExists(session.id));
        }
        sessions.insert(session.id.clone(), Arc::new(Mutex::new(session)));
        Ok(())
    }

    async fn persist(&self, session: &BattleSession) -> Result<()> {
        if self.repository.is_none() {
            return Ok(());
        }
        let room = session.to_room()?;
        self.storage(move |repository| repository.save(&room))
            .await
            .map(drop)
    }

    /// Runs a repository call on the blocking pool. `Ok(None)` without a
    /// repository.
    async fn storage<T, F>(&self, call: F) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RoomRepository) -> RepositoryResult<T> + Send + 'static,
    {
        let Some(repository) = self.repository.clone() else {
            return Ok(None);
        };
        let result = tokio::task::spawn_blocking(move || call(repository.as_ref())).await?;
        Ok(Some(result?))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("oracles", &self.oracles)
            .field("persistent", &self.repository.is_some())
            .finish_non_exhaustive()
    }
}

/// Hex-encoded SHA-256 of the state's canonical encoding.
pub fn state_digest(state: &BattleState) -> Result<String> {
    state
        .digest()
        .map(hex::encode)
        .map_err(|error| RuntimeError::Serialization(error.to_string()))
}
