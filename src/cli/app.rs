use crate::api::{ApiClient, DEFAULT_API_PREFIX};
use crate::cli::builtins::{builtin_registry, is_exit};
use crate::cli::display::build_prompt;
use crate::cli::error_handler::display_error;
use crate::cli::input::{InputSource, StdinInput};
use crate::cli::registry::{CommandSettings, Dispatch, Registry};
use crate::session::Session;
use crate::sync::{PollPolicy, DEFAULT_POLL_ATTEMPTS};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Suffix that turns on request/response tracing for one command
pub const VERBOSE_SUFFIX: &str = " -v";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service root, e.g. http://localhost:8080
    pub api_url: String,
    /// Path prefix of the game and auth endpoints
    pub api_prefix: String,
    /// Per-request timeout; must exceed the service's long-poll budget
    pub http_timeout_secs: u64,
    /// Delay between re-fetches while the engine is thinking
    pub poll_interval_ms: u64,
    /// Re-fetches before giving up on the engine
    pub poll_max_attempts: u32,
    pub default_computer_level: u8,
    pub default_search_time_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            http_timeout_secs: 30,
            poll_interval_ms: 200,
            poll_max_attempts: DEFAULT_POLL_ATTEMPTS,
            default_computer_level: 10,
            default_search_time_ms: 1000,
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "gambit", "gambit")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Get the default config file path
    pub fn default_config_file() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default file, creating it if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        Self::load_or_create(&Self::default_config_file()?)
    }

    /// Load configuration from `path`, writing defaults there first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            info!("Wrote default configuration to {}", path.display());
            Ok(config)
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content).context("Failed to write configuration file")?;

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            self.poll_max_attempts,
        )
    }

    pub fn command_settings(&self) -> CommandSettings {
        CommandSettings {
            poll: self.poll_policy(),
            default_computer_level: self.default_computer_level,
            default_search_time_ms: self.default_search_time_ms,
        }
    }
}

/// Whether the REPL keeps going after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Split the per-command verbose flag off an input line.
pub fn split_verbose(line: &str) -> (&str, bool) {
    match line.strip_suffix(VERBOSE_SUFFIX) {
        Some(rest) => (rest.trim_end(), true),
        None => (line, false),
    }
}

/// Main application state
pub struct App {
    /// Client context shared by every command
    pub session: Session,
    pub registry: Registry,
    input: Box<dyn InputSource>,
}

impl App {
    /// Create an App talking HTTP to the configured service, reading stdin
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::with_options(&config.api_url, &config.api_prefix, config.http_timeout())
            .context("Failed to build HTTP client")?;
        let session = Session::new(&config.api_url, Box::new(api));
        let registry = builtin_registry(config.command_settings());
        Ok(Self::with_parts(session, registry, Box::new(StdinInput)))
    }

    pub fn with_parts(session: Session, registry: Registry, input: Box<dyn InputSource>) -> Self {
        Self {
            session,
            registry,
            input,
        }
    }

    /// Handle one input line: exit words, the verbose suffix, then dispatch.
    pub async fn handle_line(&mut self, raw: &str) -> Flow {
        let (line, verbose) = split_verbose(raw.trim());
        if line.is_empty() {
            return Flow::Continue;
        }
        if is_exit(line) {
            return Flow::Exit;
        }

        self.session.set_verbose(verbose);
        let dispatch = self
            .registry
            .execute(&mut self.session, self.input.as_mut(), line)
            .await;
        self.session.set_verbose(false);

        match dispatch {
            Dispatch::Empty | Dispatch::Completed { .. } => {}
            Dispatch::Unknown(key) => {
                println!("Unknown command: {}", key);
                println!("Type 'help' for available commands");
            }
            Dispatch::Failed { command, error } => {
                debug!("Command '{}' failed: {:?}", command, error);
                display_error(&error);
            }
        }
        Flow::Continue
    }

    /// Read-dispatch loop. Returns at an exit word or end of input.
    pub async fn run(&mut self) -> Result<()> {
        println!("Chess Client");
        println!("API: {}", self.session.base_url());
        println!("Type 'help' for commands");
        println!();

        loop {
            let prompt = build_prompt(&self.session);
            let line = match self.input.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    break;
                }
            };

            if self.handle_line(&line).await == Flow::Exit {
                println!("Goodbye!");
                break;
            }
        }
        Ok(())
    }
}
