mod common;

use common::*;
use gambit::api::{Color, GameStatus};
use gambit::sync::{await_computation, long_poll, settle_move, Outcome, PollOutcome, SyncError};
use tokio_test::{assert_err, assert_ok};

fn joined_session(service: &FakeService, moves: &[&str], turn: Color) -> gambit::Session {
    let mut session = session_with(service);
    session.enter_game(GAME_ID, game(moves, GameStatus::Ongoing, turn));
    session
}

#[tokio::test]
async fn test_settled_response_is_installed_without_polling() {
    let service = FakeService::new();
    let mut session = joined_session(&service, &[], Color::White);

    let response = game(&["e2e4"], GameStatus::Ongoing, Color::Black);
    let report = settle_move(&mut session, response, &fast_policy())
        .await
        .unwrap();

    assert_eq!(report.attempts, 0);
    assert_eq!(report.move_count, 1);
    assert_eq!(session.last_move_count(), 1);
    assert_eq!(service.count_calls("get_game"), 0);
}

#[tokio::test]
async fn test_pending_resolves_to_first_settled_snapshot() {
    let service = FakeService::new();
    {
        let mut state = service.state();
        for _ in 0..3 {
            state
                .get_script
                .push_back(Ok(game(&["e2e4"], GameStatus::Pending, Color::Black)));
        }
        state
            .get_script
            .push_back(Ok(game(&["e2e4", "e7e5"], GameStatus::Ongoing, Color::White)));
        // Would be returned by a fifth fetch; must never be reached
        state
            .get_script
            .push_back(Ok(game(&["e2e4", "e7e5", "g1f3"], GameStatus::Ongoing, Color::Black)));
    }
    let mut session = joined_session(&service, &[], Color::White);

    let pending = game(&["e2e4"], GameStatus::Pending, Color::Black);
    let report = settle_move(&mut session, pending, &fast_policy())
        .await
        .unwrap();

    assert_eq!(report.attempts, 4);
    assert_eq!(report.move_count, 2);
    assert_eq!(report.last_move.unwrap().token, "e7e5");
    assert_eq!(service.count_calls("get_game"), 4);
    assert_eq!(session.last_move_count(), 2);
    assert_eq!(session.snapshot().unwrap().state, GameStatus::Ongoing);
}

#[tokio::test]
async fn test_always_pending_times_out_after_exact_attempts() {
    let service =
        FakeService::new().with_game(game(&["e2e4"], GameStatus::Pending, Color::Black));
    let mut session = joined_session(&service, &[], Color::White);
    let before = session.snapshot().cloned();

    let err = await_computation(&mut session, &fast_policy())
        .await
        .unwrap_err();

    match err {
        SyncError::Timeout { attempts, .. } => assert_eq!(attempts, 50),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(service.count_calls("get_game"), 50);
    // The session never shows the pending position
    assert_eq!(session.snapshot().cloned(), before);
    assert_eq!(session.last_move_count(), 0);
}

#[tokio::test]
async fn test_fetch_errors_consume_attempts() {
    let service = FakeService::new();
    {
        let mut state = service.state();
        state.get_script.push_back(Err(503));
        state.get_script.push_back(Err(503));
        state
            .get_script
            .push_back(Ok(game(&["e2e4", "e7e5"], GameStatus::Ongoing, Color::White)));
    }
    let mut session = joined_session(&service, &["e2e4"], Color::Black);

    let report = assert_ok!(await_computation(&mut session, &fast_policy()).await);
    assert_eq!(report.attempts, 3);
    assert_eq!(session.last_move_count(), 2);
}

#[tokio::test]
async fn test_polling_without_game_fails_before_network() {
    let service = FakeService::new();
    let mut session = session_with(&service);

    let err = await_computation(&mut session, &fast_policy())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::NoActiveGame));

    let err = long_poll(&mut session).await.unwrap_err();
    assert!(matches!(err, SyncError::NoActiveGame));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_checkmate_winner_is_side_that_just_moved() {
    let service = FakeService::new();
    service.state().get_script.push_back(Ok(game(
        &["f2f3", "e7e5", "g2g4", "d8h4"],
        GameStatus::Checkmate,
        Color::White,
    )));
    let mut session = joined_session(&service, &["f2f3", "e7e5", "g2g4"], Color::Black);

    let report = await_computation(&mut session, &fast_policy()).await.unwrap();
    assert_eq!(
        report.outcome,
        Outcome::Checkmate {
            winner: Color::Black
        }
    );
    assert!(report.outcome.is_terminal());
}

#[tokio::test]
async fn test_long_poll_without_new_moves_changes_nothing() {
    let service = FakeService::new();
    // Same move count, different FEN: still not an update
    let mut same_count = game(&["e2e4"], GameStatus::Ongoing, Color::Black);
    same_count.fen = "changed".to_string();
    service.state().wait_response = Some(Ok(same_count));
    let mut session = joined_session(&service, &["e2e4"], Color::Black);
    let before = session.snapshot().cloned();

    let outcome = long_poll(&mut session).await.unwrap();
    assert_eq!(outcome, PollOutcome::NoChange { move_count: 1 });
    assert_eq!(session.snapshot().cloned(), before);
    assert_eq!(service.calls(), vec![format!("wait_for_update:{}:1", GAME_ID)]);
}

#[tokio::test]
async fn test_long_poll_installs_newer_snapshot() {
    let service = FakeService::new();
    service.state().wait_response = Some(Ok(game(
        &["e2e4", "e7e5"],
        GameStatus::Ongoing,
        Color::White,
    )));
    let mut session = joined_session(&service, &["e2e4"], Color::Black);

    let outcome = long_poll(&mut session).await.unwrap();
    match outcome {
        PollOutcome::Updated {
            previous_count,
            move_count,
            last_move,
            ..
        } => {
            assert_eq!(previous_count, 1);
            assert_eq!(move_count, 2);
            assert_eq!(last_move.unwrap().token, "e7e5");
        }
        other => panic!("expected update, got {:?}", other),
    }
    assert_eq!(session.last_move_count(), 2);
}

#[tokio::test]
async fn test_long_poll_failure_keeps_session() {
    let service = FakeService::new();
    service.state().wait_response = Some(Err(500));
    let mut session = joined_session(&service, &["e2e4"], Color::Black);

    let err = assert_err!(long_poll(&mut session).await);
    assert!(matches!(err, SyncError::Api(_)));
    assert_eq!(session.last_move_count(), 1);
    assert_eq!(session.current_game_id(), Some(GAME_ID));
}
