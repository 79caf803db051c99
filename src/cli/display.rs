use crate::api::{BoardResponse, GameState, HealthResponse, MoveInfo, UserResponse};
use crate::session::{PlayerColor, Session};
use crate::sync::{MoveReport, PollOutcome};

/// Build the REPL prompt from session state.
///
/// Example: `chess [alice - 0f5c2a9e] White - Turn:Black(c)> `
pub fn build_prompt(session: &Session) -> String {
    let mut prompt = String::from("chess");

    let game_id = session.current_game_id().map(short_id);
    match (session.username(), game_id) {
        (Some(user), Some(game)) => prompt.push_str(&format!(" [{} - {}]", user, game)),
        (Some(user), None) => prompt.push_str(&format!(" [{}]", user)),
        (None, Some(game)) => prompt.push_str(&format!(" [{}]", game)),
        (None, None) => {}
    }

    if let Some(game) = session.snapshot() {
        if session.player_color() != PlayerColor::Unset {
            prompt.push_str(&format!(" {}", session.player_color()));
        }
        prompt.push_str(&format!(
            " - Turn:{}({})",
            game.turn,
            game.side_to_move().kind.short()
        ));
    }

    prompt.push_str("> ");
    prompt
}

/// First 8 characters of a game id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Numbered move list: `1.e2e4 e7e5 2.g1f3`
pub fn format_history(moves: &[String]) -> String {
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}.{} {}", i + 1, white, black),
            [white] => format!("{}.{}", i + 1, white),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_last_move(info: &MoveInfo) -> String {
    let mut line = format!("{} by {}", info.token, info.color);
    if let Some(summary) = info.engine_summary() {
        line.push_str(&format!(" ({})", summary));
    }
    line
}

/// Board, FEN, status line, history and last move
pub fn display_game(game: &GameState, board: &BoardResponse) {
    println!();
    println!("{}", board.board.trim_end());
    println!();
    println!("FEN: {}", game.fen);
    println!(
        "Turn: {} | State: {} | Moves: {}",
        game.turn,
        game.state,
        game.move_count()
    );
    if !game.moves.is_empty() {
        println!();
        println!("History: {}", format_history(&game.moves));
    }
    if let Some(last) = &game.last_move {
        println!("Last move: {}", format_last_move(last));
    }
}

pub fn display_game_summary(game: &GameState) {
    println!(
        "Turn: {} | State: {} | Moves: {}",
        game.turn,
        game.state,
        game.move_count()
    );
}

/// Report the result of a move-producing command
pub fn display_move_report(report: &MoveReport, computer: bool) {
    if let Some(last) = &report.last_move {
        if computer {
            println!("Computer played: {}", format_last_move(last));
        } else {
            println!("Move accepted: {}", format_last_move(last));
        }
    } else {
        println!("Move accepted");
    }
    if let Some(note) = report.outcome.notification() {
        println!();
        println!("{}", note);
    }
}

pub fn display_poll_outcome(outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Updated {
            previous_count,
            move_count,
            last_move,
            outcome,
        } => {
            println!(
                "Game updated! {} new move(s)",
                move_count.saturating_sub(*previous_count)
            );
            if let Some(last) = last_move {
                println!("Last move: {}", format_last_move(last));
            }
            if let Some(note) = outcome.notification() {
                println!("{}", note);
            }
        }
        PollOutcome::NoChange { move_count } => {
            println!("No updates (timeout) at move count {}", move_count);
        }
    }
}

pub fn display_health(health: &HealthResponse) {
    println!("Server Health:");
    println!("  Status:  {}", health.status);
    println!("  Time:    {} ({})", health.time, format_timestamp(health.time));
    if let Some(storage) = &health.storage {
        println!("  Storage: {}", storage);
    }
}

pub fn display_user(user: &UserResponse) {
    println!("Current User:");
    println!("  User ID:  {}", user.user_id);
    println!("  Username: {}", user.username);
    if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
        println!("  Email:    {}", email);
    }
    println!("  Created:  {}", user.created_at);
    if let Some(last) = &user.last_login_at {
        println!("  Last Login: {}", last);
    }
}

/// Format a Unix timestamp relative to now
pub fn format_timestamp(timestamp: i64) -> String {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    if timestamp < 0 {
        return "Unknown".to_string();
    }
    match UNIX_EPOCH.checked_add(Duration::from_secs(timestamp as u64)) {
        Some(time) => match SystemTime::now().duration_since(time) {
            Ok(elapsed) if elapsed.as_secs() < 60 => "just now".to_string(),
            Ok(elapsed) if elapsed.as_secs() < 3600 => {
                format!("{}m ago", elapsed.as_secs() / 60)
            }
            Ok(elapsed) if elapsed.as_secs() < 86400 => {
                format!("{}h ago", elapsed.as_secs() / 3600)
            }
            Ok(elapsed) => format!("{}d ago", elapsed.as_secs() / 86400),
            // Server clock ahead of ours
            Err(_) => "just now".to_string(),
        },
        None => "Unknown".to_string(),
    }
}
