use crate::api::{Color, GameState, GameStatus};
use std::fmt;

/// What a freshly installed snapshot means for the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move is mated; the other side won.
    Checkmate { winner: Color },
    Stalemate,
    Draw,
    /// Game continues and a computer seat is to move. Advisory only.
    ComputerToMove(Color),
    /// Game continues with a human to move
    HumanToMove(Color),
    /// Engine is still thinking
    Pending,
    Unknown,
}

impl Outcome {
    /// Classify a snapshot. Always pass the latest snapshot: the winner is read
    /// off the side to move, which has already flipped past the mating move.
    pub fn classify(game: &GameState) -> Self {
        match game.state {
            GameStatus::Checkmate => Outcome::Checkmate {
                winner: game.turn.opposite(),
            },
            GameStatus::Stalemate => Outcome::Stalemate,
            GameStatus::Draw => Outcome::Draw,
            GameStatus::Ongoing if game.side_to_move().is_computer() => {
                Outcome::ComputerToMove(game.turn)
            }
            GameStatus::Ongoing => Outcome::HumanToMove(game.turn),
            GameStatus::Pending => Outcome::Pending,
            GameStatus::Unknown => Outcome::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::Checkmate { .. } | Outcome::Stalemate | Outcome::Draw
        )
    }

    /// Line to show the user, if this outcome warrants one
    pub fn notification(&self) -> Option<String> {
        match self {
            Outcome::Checkmate { .. } | Outcome::Stalemate | Outcome::Draw => {
                Some(self.to_string())
            }
            Outcome::ComputerToMove(_) => {
                Some("Computer's turn. Use 'computer' or 'c' to trigger move.".to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "CHECKMATE! {} wins!", winner),
            Outcome::Stalemate => write!(f, "STALEMATE! Game drawn."),
            Outcome::Draw => write!(f, "DRAW! Game drawn."),
            Outcome::ComputerToMove(color) => write!(f, "{} (computer) to move", color),
            Outcome::HumanToMove(color) => write!(f, "{} to move", color),
            Outcome::Pending => write!(f, "Computer is thinking"),
            Outcome::Unknown => write!(f, "Unknown game state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PlayerInfo, PlayerKind, Players};

    fn game(state: GameStatus, turn: Color, black_kind: PlayerKind) -> GameState {
        let seat = |kind| PlayerInfo {
            id: None,
            kind,
            level: None,
            search_time_ms: None,
        };
        GameState {
            id: "g".to_string(),
            fen: String::new(),
            turn,
            state,
            moves: vec!["f2f3".into(), "e7e5".into(), "g2g4".into(), "d8h4".into()],
            players: Players {
                white: seat(PlayerKind::Human),
                black: seat(black_kind),
            },
            last_move: None,
        }
    }

    #[test]
    fn test_checkmate_black_to_move_means_white_won() {
        let g = game(GameStatus::Checkmate, Color::Black, PlayerKind::Human);
        assert_eq!(
            Outcome::classify(&g),
            Outcome::Checkmate {
                winner: Color::White
            }
        );
    }

    #[test]
    fn test_checkmate_white_to_move_means_black_won() {
        let g = game(GameStatus::Checkmate, Color::White, PlayerKind::Human);
        let outcome = Outcome::classify(&g);
        assert_eq!(
            outcome,
            Outcome::Checkmate {
                winner: Color::Black
            }
        );
        assert_eq!(outcome.notification().unwrap(), "CHECKMATE! Black wins!");
    }

    #[test]
    fn test_drawn_outcomes() {
        let stale = Outcome::classify(&game(GameStatus::Stalemate, Color::White, PlayerKind::Human));
        let draw = Outcome::classify(&game(GameStatus::Draw, Color::Black, PlayerKind::Human));
        assert_eq!(stale, Outcome::Stalemate);
        assert_eq!(draw, Outcome::Draw);
        assert!(stale.is_terminal() && draw.is_terminal());
    }

    #[test]
    fn test_computer_to_move_is_advisory() {
        let g = game(GameStatus::Ongoing, Color::Black, PlayerKind::Computer);
        let outcome = Outcome::classify(&g);
        assert_eq!(outcome, Outcome::ComputerToMove(Color::Black));
        assert!(!outcome.is_terminal());
        assert!(outcome.notification().unwrap().contains("computer"));
    }

    #[test]
    fn test_human_to_move_is_silent() {
        let g = game(GameStatus::Ongoing, Color::White, PlayerKind::Computer);
        assert_eq!(Outcome::classify(&g), Outcome::HumanToMove(Color::White));
        assert_eq!(Outcome::classify(&g).notification(), None);
    }
}
