pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, GameApi, DEFAULT_API_PREFIX, DEFAULT_HTTP_TIMEOUT};
pub use error::ApiError;
pub use types::{
    AuthResponse, BoardResponse, Color, CreateGameRequest, ErrorResponse, GameState, GameStatus,
    HealthResponse, LoginRequest, MoveInfo, PlayerConfig, PlayerInfo, PlayerKind, Players,
    RegisterRequest, UserResponse, COMPUTER_MOVE,
};
