//! Shared fixtures: an in-memory game service and a one-shot HTTP stub.
#![allow(dead_code)]

use async_trait::async_trait;
use gambit::api::{
    ApiError, AuthResponse, BoardResponse, Color, CreateGameRequest, GameApi, GameState,
    GameStatus, HealthResponse, LoginRequest, MoveInfo, PlayerInfo, PlayerKind, Players,
    RegisterRequest, UserResponse,
};
use gambit::cli::{builtin_registry, CommandSettings, Registry, ScriptedInput};
use gambit::session::Session;
use gambit::sync::PollPolicy;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const GAME_ID: &str = "0f5c2a9e-1111-2222-3333-444455556666";

/// Scripted behavior and call log of the fake service
#[derive(Default)]
pub struct FakeState {
    /// Games served by `get_game` when nothing is scripted
    pub games: HashMap<String, GameState>,
    /// One-shot `get_game` answers, consumed before falling back to `games`.
    /// `Err(status)` produces a service error.
    pub get_script: VecDeque<Result<GameState, u16>>,
    pub move_responses: VecDeque<Result<GameState, u16>>,
    pub create_response: Option<GameState>,
    pub undo_response: Option<GameState>,
    pub wait_response: Option<Result<GameState, u16>>,
    pub auth_response: Option<Result<AuthResponse, u16>>,
    pub calls: Vec<String>,
    pub base_url: String,
    pub token: Option<String>,
    pub verbose: bool,
    /// Value of the verbose flag at the time of each network call
    pub verbose_at_call: Vec<bool>,
}

#[derive(Clone, Default)]
pub struct FakeService {
    state: Arc<Mutex<FakeState>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_game(self, game: GameState) -> Self {
        self.state().games.insert(game.id.clone(), game);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        let mut state = self.state();
        let verbose = state.verbose;
        state.verbose_at_call.push(verbose);
        state.calls.push(call);
    }
}

fn service_error(status: u16) -> ApiError {
    ApiError::from_status(
        status,
        format!(r#"{{"error":"fake failure","code":"E{}"}}"#, status),
    )
}

fn answer<T>(scripted: Option<Result<T, u16>>) -> Result<T, ApiError> {
    match scripted {
        Some(Ok(value)) => Ok(value),
        Some(Err(status)) => Err(service_error(status)),
        None => Err(service_error(500)),
    }
}

#[async_trait]
impl GameApi for FakeService {
    fn set_base_url(&mut self, url: &str) {
        self.state().base_url = url.to_string();
    }

    fn set_token(&mut self, token: Option<&str>) {
        self.state().token = token.map(str::to_string);
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.state().verbose = verbose;
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record("health".to_string());
        Ok(HealthResponse {
            status: "ok".to_string(),
            time: 1_700_000_000,
            storage: Some("memory".to_string()),
        })
    }

    async fn create_game(&self, req: &CreateGameRequest) -> Result<GameState, ApiError> {
        self.record(format!("create_game:{}", serde_json::to_string(req).unwrap()));
        let game = self.state().create_response.clone();
        match game {
            Some(game) => {
                self.state().games.insert(game.id.clone(), game.clone());
                Ok(game)
            }
            None => Err(service_error(500)),
        }
    }

    async fn get_game(&self, game_id: &str) -> Result<GameState, ApiError> {
        self.record(format!("get_game:{}", game_id));
        let mut state = self.state();
        if let Some(scripted) = state.get_script.pop_front() {
            return answer(Some(scripted));
        }
        state
            .games
            .get(game_id)
            .cloned()
            .ok_or_else(|| service_error(404))
    }

    async fn wait_for_update(
        &self,
        game_id: &str,
        move_count: usize,
    ) -> Result<GameState, ApiError> {
        self.record(format!("wait_for_update:{}:{}", game_id, move_count));
        let scripted = self.state().wait_response.take();
        answer(scripted)
    }

    async fn delete_game(&self, game_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_game:{}", game_id));
        match self.state().games.remove(game_id) {
            Some(_) => Ok(()),
            None => Err(service_error(404)),
        }
    }

    async fn make_move(&self, game_id: &str, token: &str) -> Result<GameState, ApiError> {
        self.record(format!("make_move:{}:{}", game_id, token));
        let scripted = self.state().move_responses.pop_front();
        answer(scripted)
    }

    async fn undo_moves(&self, game_id: &str, count: u32) -> Result<GameState, ApiError> {
        self.record(format!("undo_moves:{}:{}", game_id, count));
        let scripted = self.state().undo_response.clone().map(Ok);
        answer(scripted)
    }

    async fn get_board(&self, game_id: &str) -> Result<BoardResponse, ApiError> {
        self.record(format!("get_board:{}", game_id));
        Ok(BoardResponse {
            fen: String::new(),
            board: "8 r n b q k b n r\n...".to_string(),
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("register:{}", req.username));
        let scripted = self.state().auth_response.take();
        answer(scripted)
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("login:{}", req.identifier));
        let scripted = self.state().auth_response.take();
        answer(scripted)
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        self.record("current_user".to_string());
        Err(service_error(401))
    }

    async fn raw_request(
        &self,
        method: &str,
        path: &str,
        _body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        self.record(format!("raw:{}:{}", method, path));
        Ok(None)
    }
}

pub fn player(id: Option<&str>, kind: PlayerKind) -> PlayerInfo {
    PlayerInfo {
        id: id.map(str::to_string),
        kind,
        level: (kind == PlayerKind::Computer).then_some(10),
        search_time_ms: (kind == PlayerKind::Computer).then_some(1000),
    }
}

/// Human (white, id "alice") against computer (black)
pub fn game(moves: &[&str], state: GameStatus, turn: Color) -> GameState {
    let last_move = moves.last().map(|m| MoveInfo {
        token: m.to_string(),
        color: turn.opposite(),
        score: None,
        depth: None,
    });
    GameState {
        id: GAME_ID.to_string(),
        fen: "startpos".to_string(),
        turn,
        state,
        moves: moves.iter().map(|m| m.to_string()).collect(),
        players: Players {
            white: player(Some("alice"), PlayerKind::Human),
            black: player(None, PlayerKind::Computer),
        },
        last_move,
    }
}

pub fn auth(user_id: &str, username: &str) -> AuthResponse {
    AuthResponse {
        token: format!("token-{}", user_id),
        user_id: user_id.to_string(),
        username: username.to_string(),
    }
}

pub fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(1), 50)
}

pub fn fast_registry() -> Registry {
    builtin_registry(CommandSettings {
        poll: fast_policy(),
        ..CommandSettings::default()
    })
}

pub fn session_with(service: &FakeService) -> Session {
    Session::new("http://fake.local", Box::new(service.clone()))
}

pub fn no_input() -> ScriptedInput {
    ScriptedInput::default()
}

/// Serve exactly one HTTP request with a canned response.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub async fn http_stub(
    status_line: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });
    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}
