//! HTTP transport for the chess service.
//!
//! Every call is a single attempt: build the request, attach the bearer token,
//! send it, and classify the response. Retrying is the caller's business.

use super::error::ApiError;
use super::types::{
    AuthResponse, BoardResponse, CreateGameRequest, GameState, HealthResponse, LoginRequest,
    MoveRequest, RegisterRequest, UndoRequest, UserResponse, COMPUTER_MOVE,
};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the client needs from the game service.
///
/// `ApiClient` talks HTTP; tests substitute an in-memory fake. Connection
/// settings are pushed in by the session whenever it changes them.
#[async_trait]
pub trait GameApi: Send + Sync {
    fn set_base_url(&mut self, url: &str);
    fn set_token(&mut self, token: Option<&str>);
    fn set_verbose(&mut self, verbose: bool);

    async fn health(&self) -> Result<HealthResponse, ApiError>;
    async fn create_game(&self, req: &CreateGameRequest) -> Result<GameState, ApiError>;
    async fn get_game(&self, game_id: &str) -> Result<GameState, ApiError>;
    /// Long-poll: the service holds the response until the game has more than
    /// `move_count` moves or its own wait budget runs out.
    async fn wait_for_update(&self, game_id: &str, move_count: usize)
        -> Result<GameState, ApiError>;
    async fn delete_game(&self, game_id: &str) -> Result<(), ApiError>;
    async fn make_move(&self, game_id: &str, token: &str) -> Result<GameState, ApiError>;
    async fn undo_moves(&self, game_id: &str, count: u32) -> Result<GameState, ApiError>;
    async fn get_board(&self, game_id: &str) -> Result<BoardResponse, ApiError>;
    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn current_user(&self) -> Result<UserResponse, ApiError>;
    /// Free-form request; returns the JSON body, if the service sent one.
    async fn raw_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError>;

    /// Ask the service to play the computer's move for the side to move.
    async fn trigger_computer_move(&self, game_id: &str) -> Result<GameState, ApiError> {
        self.make_move(game_id, COMPUTER_MOVE).await
    }
}

/// reqwest-backed implementation of [`GameApi`]
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    prefix: String,
    token: Option<String>,
    verbose: bool,
}

impl ApiClient {
    /// Create a client with the default prefix and timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_options(base_url, DEFAULT_API_PREFIX, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_options(base_url: &str, prefix: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: prefix.trim_end_matches('/').to_string(),
            token: None,
            verbose: false,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Build a request URL from the base, the API prefix when `prefixed`,
    /// and `segments`. Each segment is percent-encoded, so an id containing
    /// `/`, `?` or `#` stays inside its own path segment.
    fn endpoint(&self, prefixed: bool, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::InvalidRequest(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidRequest(format!("'{}' cannot be a base URL", self.base_url))
            })?;
            path.pop_if_empty();
            if prefixed {
                path.extend(self.prefix.split('/').filter(|s| !s.is_empty()));
            }
            path.extend(segments);
        }
        Ok(url)
    }

    fn game_endpoint(&self, game_id: &str, tail: Option<&str>) -> Result<Url, ApiError> {
        match tail {
            Some(tail) => self.endpoint(true, &["games", game_id, tail]),
            None => self.endpoint(true, &["games", game_id]),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Option<T>, ApiError> {
        let body = match body {
            Some(b) => Some(serde_json::to_value(b).map_err(|e| {
                ApiError::InvalidRequest(format!("could not encode body: {}", e))
            })?),
            None => None,
        };
        let text = self.send(method, url, body).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| ApiError::Decode { source, raw: text })
    }

    async fn expect<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, ApiError> {
        match self.request(method, url, body).await? {
            Some(value) => Ok(value),
            None => Err(ApiError::Decode {
                source: <serde_json::Error as serde::de::Error>::custom("empty response body"),
                raw: String::new(),
            }),
        }
    }

    /// Send one request and return the raw success body.
    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<String, ApiError> {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        debug!("{} {}", method, url);

        if self.verbose {
            println!("[API] {} {}", method, target);
            if let Some(body) = &body {
                println!("Request Body:\n{}", pretty(body));
            }
        }

        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!("{} {} -> {}", method, url, status);

        if self.verbose {
            println!("[{}]", status);
            if !text.is_empty() {
                match serde_json::from_str::<Value>(&text) {
                    Ok(v) => println!("Response Body:\n{}", pretty(&v)),
                    Err(_) => println!("Response:\n{}", text),
                }
            }
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::from_status(status.as_u16(), text));
        }
        Ok(text)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[async_trait]
impl GameApi for ApiClient {
    fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim_end_matches('/').to_string();
    }

    fn set_token(&mut self, token: Option<&str>) {
        self.token = token.map(str::to_string);
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint(false, &["health"])?;
        self.expect(Method::GET, url, None::<&Value>).await
    }

    async fn create_game(&self, req: &CreateGameRequest) -> Result<GameState, ApiError> {
        let url = self.endpoint(true, &["games"])?;
        self.expect(Method::POST, url, Some(req)).await
    }

    async fn get_game(&self, game_id: &str) -> Result<GameState, ApiError> {
        let url = self.game_endpoint(game_id, None)?;
        self.expect(Method::GET, url, None::<&Value>).await
    }

    async fn wait_for_update(
        &self,
        game_id: &str,
        move_count: usize,
    ) -> Result<GameState, ApiError> {
        let mut url = self.game_endpoint(game_id, None)?;
        url.query_pairs_mut()
            .append_pair("wait", "true")
            .append_pair("moveCount", &move_count.to_string());
        self.expect(Method::GET, url, None::<&Value>).await
    }

    async fn delete_game(&self, game_id: &str) -> Result<(), ApiError> {
        let url = self.game_endpoint(game_id, None)?;
        self.send(Method::DELETE, url, None).await.map(|_| ())
    }

    async fn make_move(&self, game_id: &str, token: &str) -> Result<GameState, ApiError> {
        let url = self.game_endpoint(game_id, Some("moves"))?;
        let req = MoveRequest {
            token: token.to_string(),
        };
        self.expect(Method::POST, url, Some(&req)).await
    }

    async fn undo_moves(&self, game_id: &str, count: u32) -> Result<GameState, ApiError> {
        let url = self.game_endpoint(game_id, Some("undo"))?;
        self.expect(Method::POST, url, Some(&UndoRequest { count }))
            .await
    }

    async fn get_board(&self, game_id: &str) -> Result<BoardResponse, ApiError> {
        let url = self.game_endpoint(game_id, Some("board"))?;
        self.expect(Method::GET, url, None::<&Value>).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(true, &["auth", "register"])?;
        self.expect(Method::POST, url, Some(req)).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(true, &["auth", "login"])?;
        self.expect(Method::POST, url, Some(req)).await
    }

    async fn current_user(&self) -> Result<UserResponse, ApiError> {
        let url = self.endpoint(true, &["auth", "me"])?;
        self.expect(Method::GET, url, None::<&Value>).await
    }

    async fn raw_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| ApiError::InvalidRequest(format!("unknown HTTP method '{}'", method)))?;
        // Raw paths are taken as typed, query string included
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path '{}': {}", path, e)))?;
        let text = self.send(method, url, body).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        // Non-JSON success bodies are handed back as a string value
        Ok(Some(
            serde_json::from_str(&text).unwrap_or(Value::String(text)),
        ))
    }
}
