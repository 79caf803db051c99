use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Move token the service treats as "let the computer move now".
pub const COMPUTER_MOVE: &str = "cccc";

/// Side of the board. The service sends `"w"`/`"b"`; long names are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w", alias = "white")]
    White,
    #[serde(rename = "b", alias = "black")]
    Black,
}

impl Color {
    /// Opposite color
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            other => Err(format!("'{}' is not a color (use white or black)", other)),
        }
    }
}

/// Who plays a side. Encoded on the wire as `1` (human) and `2` (computer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerKind {
    Human,
    Computer,
}

impl TryFrom<u8> for PlayerKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerKind::Human),
            2 => Ok(PlayerKind::Computer),
            other => Err(format!("unknown player type {}", other)),
        }
    }
}

impl From<PlayerKind> for u8 {
    fn from(kind: PlayerKind) -> Self {
        match kind {
            PlayerKind::Human => 1,
            PlayerKind::Computer => 2,
        }
    }
}

impl PlayerKind {
    /// Single-letter tag used in the prompt line
    pub fn short(&self) -> char {
        match self {
            PlayerKind::Human => 'h',
            PlayerKind::Computer => 'c',
        }
    }
}

/// Lifecycle state of a game as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    Draw,
    /// The service handed the position to the engine and has not answered yet
    Pending,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
            GameStatus::Pending => "pending",
            GameStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// Request types

/// Side configuration sent when creating a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(rename = "type")]
    pub kind: PlayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(
        rename = "searchTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub search_time_ms: Option<u32>,
}

impl PlayerConfig {
    pub fn human() -> Self {
        Self {
            kind: PlayerKind::Human,
            level: None,
            search_time_ms: None,
        }
    }

    pub fn computer(level: u8, search_time_ms: u32) -> Self {
        Self {
            kind: PlayerKind::Computer,
            level: Some(level),
            search_time_ms: Some(search_time_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateGameRequest {
    pub white: PlayerConfig,
    pub black: PlayerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UndoRequest {
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

// Response types

/// Full view of a game. Always replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(rename = "gameId", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub fen: String,
    pub turn: Color,
    pub state: GameStatus,
    /// The service sends `null` instead of `[]` for a game with no moves
    #[serde(default, deserialize_with = "null_as_default")]
    pub moves: Vec<String>,
    pub players: Players,
    #[serde(rename = "lastMove", default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<MoveInfo>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl GameState {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn is_pending(&self) -> bool {
        self.state == GameStatus::Pending
    }

    /// Player whose turn it is
    pub fn side_to_move(&self) -> &PlayerInfo {
        self.players.get(self.turn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Players {
    pub white: PlayerInfo,
    pub black: PlayerInfo,
}

impl Players {
    pub fn get(&self, color: Color) -> &PlayerInfo {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: PlayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(rename = "searchTime", default, skip_serializing_if = "Option::is_none")]
    pub search_time_ms: Option<u32>,
}

impl PlayerInfo {
    pub fn is_computer(&self) -> bool {
        self.kind == PlayerKind::Computer
    }

    /// True when this seat belongs to `user_id`. Empty ids never match.
    pub fn is_user(&self, user_id: &str) -> bool {
        matches!(self.id.as_deref(), Some(id) if !id.is_empty() && id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInfo {
    #[serde(rename = "move")]
    pub token: String,
    #[serde(rename = "playerColor")]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl MoveInfo {
    /// Search details reported by the engine, if any
    pub fn engine_summary(&self) -> Option<String> {
        match self.depth {
            Some(depth) if depth > 0 => Some(format!(
                "depth {}, score {}",
                depth,
                self.score.unwrap_or_default()
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardResponse {
    #[serde(default)]
    pub fen: String,
    pub board: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "lastLoginAt", default)]
    pub last_login_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: i64,
    #[serde(default)]
    pub storage: Option<String>,
}

/// Structured body the service attaches to every status >= 400
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub details: Option<String>,
}
