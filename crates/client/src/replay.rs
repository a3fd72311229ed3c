//! Drives a battle through a scripted action list.
use tactics_core::BattleAction;
use tactics_runtime::{BattleOutcome, RuntimeError, SessionManager};

/// What happened during a replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaySummary {
    pub accepted: usize,
    /// Script index and message of every rejected action.
    pub rejected: Vec<(usize, String)>,
    /// Actions left unplayed because the battle ended first.
    pub skipped: usize,
    pub outcome: BattleOutcome,
}

/// Submits every action in order.
///
/// Rule violations are logged and the replay moves on. Server faults abort
/// the replay.
pub async fn replay(
    sessions: &SessionManager,
    battle_id: &str,
    actions: Vec<BattleAction>,
) -> Result<ReplaySummary, RuntimeError> {
    let total = actions.len();
    let mut accepted = 0;
    let mut rejected = Vec::new();
    let mut outcome = sessions.outcome(battle_id).await?;

    for (index, action) in actions.into_iter().enumerate() {
        if outcome.is_finished() {
            let skipped = total - index;
            tracing::info!(skipped, "battle already decided, ignoring the rest of the script");
            return Ok(ReplaySummary {
                accepted,
                rejected,
                skipped,
                outcome,
            });
        }

        let label = action.as_str();
        let player = action.player().clone();
        match sessions.apply(battle_id, action).await {
            Ok(receipt) => {
                accepted += 1;
                tracing::info!(
                    step = index,
                    %player,
                    action = label,
                    turn = receipt.turn_number,
                    next = %receipt.current_player,
                    awaiting_target = receipt.awaiting_target,
                    "accepted"
                );
                outcome = receipt.outcome;
            }
            Err(error) if error.is_client_error() => {
                tracing::warn!(step = index, %player, action = label, %error, "rejected");
                rejected.push((index, error.to_string()));
            }
            Err(error) => return Err(error),
        }
    }

    Ok(ReplaySummary {
        accepted,
        rejected,
        skipped: 0,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{EndTurnAction, MoveAction, PlayerId, Position, SurrenderAction};
    use tactics_runtime::{BattleSetup, OracleManager};

    async fn battle() -> SessionManager {
        let sessions = SessionManager::new(OracleManager::builtin());
        sessions
            .create_battle("replay", BattleSetup::new("alice", "bob"))
            .await
            .expect("battle created");
        sessions
    }

    #[tokio::test]
    async fn rejections_are_collected_and_play_continues() {
        let sessions = battle().await;
        let actions = vec![
            MoveAction::new("alice", "red-1", Position::new(1, 1)).into(),
            MoveAction::new("alice", "red-1", Position::new(1, 2)).into(),
            EndTurnAction::new("alice").into(),
        ];

        let summary = replay(&sessions, "replay", actions).await.expect("replayed");

        assert_eq!(summary.accepted, 2);
        assert_eq!(
            summary.rejected,
            vec![(1, "Move action already used this turn".to_owned())]
        );
        assert_eq!(summary.outcome, BattleOutcome::Ongoing);
    }

    #[tokio::test]
    async fn actions_after_the_end_are_skipped() {
        let sessions = battle().await;
        let actions = vec![
            SurrenderAction::new("alice").into(),
            EndTurnAction::new("alice").into(),
            EndTurnAction::new("bob").into(),
        ];

        let summary = replay(&sessions, "replay", actions).await.expect("replayed");

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.outcome.winner(), Some(&PlayerId::new("bob")));
    }

    #[tokio::test]
    async fn unknown_battle_aborts() {
        let sessions = SessionManager::new(OracleManager::builtin());
        let err = replay(&sessions, "nowhere", Vec::new()).await.expect_err("no battle");
        assert_eq!(err.http_status(), 404);
    }
}
