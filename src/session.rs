//! Client-side session state.
//!
//! The session is the only place that knows who is logged in and which game
//! is active. Related fields travel together: credentials are one value, the
//! active game is one value, and both are only ever replaced whole.

use crate::api::{Color, GameApi, GameState};
use std::fmt;

/// Authentication context. Replaced as a unit on login, register and logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl Credentials {
    pub fn authenticated(token: String, user_id: String, username: String) -> Self {
        Self {
            token: Some(token),
            user_id: Some(user_id),
            username: Some(username),
        }
    }

    /// Identity used only for seat matching; carries no token.
    pub fn user_only(user_id: String) -> Self {
        Self {
            token: None,
            user_id: Some(user_id),
            username: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Which seat the current user occupies in the active game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerColor {
    White,
    Black,
    #[default]
    Unset,
}

impl PlayerColor {
    /// Derive the seat from the user id and the game's player ids.
    ///
    /// White is checked before black; no user or no match gives `Unset`.
    pub fn derive(user_id: Option<&str>, snapshot: &GameState) -> Self {
        let user_id = match user_id {
            Some(id) if !id.is_empty() => id,
            _ => return PlayerColor::Unset,
        };
        if snapshot.players.white.is_user(user_id) {
            PlayerColor::White
        } else if snapshot.players.black.is_user(user_id) {
            PlayerColor::Black
        } else {
            PlayerColor::Unset
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PlayerColor::White => Some(Color::White),
            PlayerColor::Black => Some(Color::Black),
            PlayerColor::Unset => None,
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerColor::White => write!(f, "White"),
            PlayerColor::Black => write!(f, "Black"),
            PlayerColor::Unset => write!(f, "-"),
        }
    }
}

/// The active game: id, move-count watermark, snapshot and derived seat.
#[derive(Debug, Clone, PartialEq)]
pub struct GameContext {
    game_id: String,
    last_move_count: usize,
    snapshot: GameState,
    player_color: PlayerColor,
}

impl GameContext {
    fn new(game_id: String, snapshot: GameState, user_id: Option<&str>) -> Self {
        Self {
            game_id,
            last_move_count: snapshot.move_count(),
            player_color: PlayerColor::derive(user_id, &snapshot),
            snapshot,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn last_move_count(&self) -> usize {
        self.last_move_count
    }

    pub fn snapshot(&self) -> &GameState {
        &self.snapshot
    }

    pub fn player_color(&self) -> PlayerColor {
        self.player_color
    }
}

/// Mutable client context, owned by the REPL loop and lent to one handler at a time.
pub struct Session {
    base_url: String,
    credentials: Credentials,
    game: Option<GameContext>,
    verbose: bool,
    api: Box<dyn GameApi>,
}

impl Session {
    pub fn new(base_url: &str, mut api: Box<dyn GameApi>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        api.set_base_url(&base_url);
        api.set_token(None);
        Self {
            base_url,
            credentials: Credentials::default(),
            game: None,
            verbose: false,
            api,
        }
    }

    pub fn api(&self) -> &dyn GameApi {
        self.api.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the session, and its transport, at another service root.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim_end_matches('/').to_string();
        self.api.set_base_url(&self.base_url);
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn user_id(&self) -> Option<&str> {
        self.credentials.user_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Replace token, user id and username together, then re-derive the seat.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.api.set_token(credentials.token.as_deref());
        self.credentials = credentials;
        if let Some(game) = self.game.as_mut() {
            game.player_color = PlayerColor::derive(
                self.credentials.user_id.as_deref(),
                &game.snapshot,
            );
        }
    }

    pub fn clear_credentials(&mut self) {
        self.set_credentials(Credentials::default());
    }

    pub fn game(&self) -> Option<&GameContext> {
        self.game.as_ref()
    }

    pub fn current_game_id(&self) -> Option<&str> {
        self.game.as_ref().map(|g| g.game_id.as_str())
    }

    pub fn last_move_count(&self) -> usize {
        self.game.as_ref().map_or(0, |g| g.last_move_count)
    }

    pub fn snapshot(&self) -> Option<&GameState> {
        self.game.as_ref().map(|g| &g.snapshot)
    }

    pub fn player_color(&self) -> PlayerColor {
        self.game
            .as_ref()
            .map_or(PlayerColor::Unset, |g| g.player_color)
    }

    /// Make `snapshot` the active game (join / new).
    ///
    /// The id comes from the snapshot; `fallback_id` is used only when the
    /// service left it blank.
    pub fn enter_game(&mut self, fallback_id: &str, snapshot: GameState) {
        let game_id = if snapshot.id.is_empty() {
            fallback_id.to_string()
        } else {
            snapshot.id.clone()
        };
        self.game = Some(GameContext::new(game_id, snapshot, self.user_id()));
    }

    /// Install a fresh snapshot of the active game. Returns `false`, leaving
    /// the session untouched, when there is no active game.
    pub fn replace_snapshot(&mut self, snapshot: GameState) -> bool {
        let user_id = self.credentials.user_id.clone();
        match self.game.as_mut() {
            Some(game) => {
                *game = GameContext::new(game.game_id.clone(), snapshot, user_id.as_deref());
                true
            }
            None => false,
        }
    }

    /// Forget the active game entirely.
    pub fn leave_game(&mut self) -> Option<GameContext> {
        self.game.take()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Verbose tracing applies to a single command; the REPL sets it per line.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Push the verbose flag down to the transport before a command runs.
    pub fn sync_transport(&mut self) {
        self.api.set_verbose(self.verbose);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("user_id", &self.credentials.user_id)
            .field("username", &self.credentials.username)
            .field("authenticated", &self.is_authenticated())
            .field("game", &self.current_game_id())
            .field("last_move_count", &self.last_move_count())
            .field("verbose", &self.verbose)
            .finish()
    }
}
