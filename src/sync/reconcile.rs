//! Bringing the session's snapshot back in line with the service.
//!
//! Two protocols live here. After a move that hands the position to the
//! engine, [`await_computation`] re-fetches the game at a fixed interval until
//! it stops being `pending` or the attempt ceiling is hit. [`long_poll`] makes
//! one held request and installs the result only if new moves arrived.

use super::outcome::Outcome;
use crate::api::{ApiError, GameState, MoveInfo};
use crate::session::Session;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_POLL_ATTEMPTS: u32 = 50;

/// Fixed-delay, fixed-ceiling polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Worst-case time spent sleeping before giving up
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no active game")]
    NoActiveGame,

    /// The engine did not finish within the polling budget. The move itself
    /// may already have been accepted by the service.
    #[error("timed out waiting for computer move after {attempts} attempts ({waited:?})")]
    Timeout { attempts: u32, waited: Duration },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a move-producing call once the snapshot is installed.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    /// Move that was appended, when the service reported one
    pub last_move: Option<MoveInfo>,
    pub move_count: usize,
    /// Classified from the installed snapshot
    pub outcome: Outcome,
    /// Number of re-fetches it took; zero when no polling was needed
    pub attempts: u32,
}

impl MoveReport {
    fn from_snapshot(game: &GameState, attempts: u32) -> Self {
        Self {
            last_move: game.last_move.clone(),
            move_count: game.move_count(),
            outcome: Outcome::classify(game),
            attempts,
        }
    }
}

/// Outcome of a single long-poll round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Updated {
        previous_count: usize,
        move_count: usize,
        last_move: Option<MoveInfo>,
        outcome: Outcome,
    },
    /// The service's wait budget ran out without new moves.
    NoChange { move_count: usize },
}

/// Install the response to a move submission, polling first when the service
/// answered `pending`.
///
/// A pending response is never installed; the session keeps its previous
/// snapshot until a settled one arrives.
pub async fn settle_move(
    session: &mut Session,
    response: GameState,
    policy: &PollPolicy,
) -> Result<MoveReport, SyncError> {
    if response.is_pending() {
        return await_computation(session, policy).await;
    }
    let report = MoveReport::from_snapshot(&response, 0);
    if !session.replace_snapshot(response) {
        return Err(SyncError::NoActiveGame);
    }
    Ok(report)
}

/// Re-fetch the active game until it is no longer pending.
///
/// Sleeps `policy.interval` before every fetch and makes at most
/// `policy.max_attempts` fetches. The first settled snapshot wins and replaces
/// the session's snapshot wholesale. A failed fetch uses up an attempt.
pub async fn await_computation(
    session: &mut Session,
    policy: &PollPolicy,
) -> Result<MoveReport, SyncError> {
    let game_id = session
        .current_game_id()
        .ok_or(SyncError::NoActiveGame)?
        .to_string();

    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match session.api().get_game(&game_id).await {
            Ok(game) if !game.is_pending() => {
                info!(
                    "Game {} settled after {} attempt(s) with {} moves",
                    game_id,
                    attempt,
                    game.move_count()
                );
                let report = MoveReport::from_snapshot(&game, attempt);
                session.replace_snapshot(game);
                return Ok(report);
            }
            Ok(_) => debug!("Game {} still pending (attempt {})", game_id, attempt),
            Err(e) => warn!("Poll attempt {} for game {} failed: {}", attempt, game_id, e),
        }
    }

    warn!(
        "Gave up on game {} after {} attempts",
        game_id, policy.max_attempts
    );
    Err(SyncError::Timeout {
        attempts: policy.max_attempts,
        waited: policy.budget(),
    })
}

/// One long-poll round trip against the active game.
///
/// Sends the session's move-count watermark. Only a response with more moves
/// than that watermark is installed; anything else leaves the session as is.
pub async fn long_poll(session: &mut Session) -> Result<PollOutcome, SyncError> {
    let game_id = session
        .current_game_id()
        .ok_or(SyncError::NoActiveGame)?
        .to_string();
    let baseline = session.last_move_count();

    debug!("Long-polling game {} from move count {}", game_id, baseline);
    let game = session.api().wait_for_update(&game_id, baseline).await?;

    if game.move_count() <= baseline {
        debug!("Long-poll for game {} returned without new moves", game_id);
        return Ok(PollOutcome::NoChange {
            move_count: baseline,
        });
    }

    let outcome = PollOutcome::Updated {
        previous_count: baseline,
        move_count: game.move_count(),
        last_move: game.last_move.clone(),
        outcome: Outcome::classify(&game),
    };
    session.replace_snapshot(game);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_budget() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 50);
        assert_eq!(policy.interval, Duration::from_millis(200));
        assert_eq!(policy.budget(), Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_message_mentions_attempts() {
        let err = SyncError::Timeout {
            attempts: 50,
            waited: Duration::from_secs(10),
        };
        assert!(err.to_string().contains("50 attempts"));
    }
}
