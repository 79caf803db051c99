//! Command registry: maps names and aliases to handlers and runs one input line.

use crate::cli::error_handler::CliResult;
use crate::cli::input::InputSource;
use crate::session::Session;
use crate::sync::PollPolicy;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub input: &'a mut dyn InputSource,
    pub registry: &'a Registry,
}

/// Behavior behind a command name
#[async_trait]
pub trait Handler: Send + Sync {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()>;
}

/// A named command. Name and alias share the same instance.
pub struct Command {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: Box<dyn Handler>,
}

impl Command {
    pub fn new(
        name: &'static str,
        alias: Option<&'static str>,
        description: &'static str,
        usage: &'static str,
        handler: impl Handler + 'static,
    ) -> Self {
        Self {
            name,
            alias,
            description,
            usage,
            handler: Box::new(handler),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("usage", &self.usage)
            .finish()
    }
}

/// Settings handlers read from the registry rather than the session
#[derive(Debug, Clone)]
pub struct CommandSettings {
    pub poll: PollPolicy,
    pub default_computer_level: u8,
    pub default_search_time_ms: u32,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            default_computer_level: 10,
            default_search_time_ms: 1000,
        }
    }
}

/// What happened to one input line
#[derive(Debug)]
pub enum Dispatch {
    /// Blank line
    Empty,
    /// No command under that key
    Unknown(String),
    Completed { command: &'static str },
    Failed {
        command: &'static str,
        error: crate::cli::CliError,
    },
}

impl Dispatch {
    pub fn is_success(&self) -> bool {
        matches!(self, Dispatch::Completed { .. } | Dispatch::Empty)
    }
}

#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Arc<Command>>,
    settings: CommandSettings,
}

impl Registry {
    /// Empty registry; see [`crate::cli::builtin_registry`] for the full command set.
    pub fn new(settings: CommandSettings) -> Self {
        Self {
            commands: HashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// Insert under the name and alias. Later registrations win.
    pub fn register(&mut self, command: Command) {
        let command = Arc::new(command);
        if let Some(alias) = command.alias {
            self.commands.insert(alias.to_string(), Arc::clone(&command));
        }
        self.commands.insert(command.name.to_string(), command);
    }

    pub fn lookup(&self, key: &str) -> Option<&Arc<Command>> {
        self.commands.get(key)
    }

    /// Unique commands, sorted by name
    pub fn commands(&self) -> Vec<&Arc<Command>> {
        let mut seen: Vec<&Arc<Command>> = Vec::new();
        for command in self.commands.values() {
            if !seen.iter().any(|c| Arc::ptr_eq(c, command)) {
                seen.push(command);
            }
        }
        seen.sort_by_key(|c| c.name);
        seen
    }

    /// Run one input line against the session.
    ///
    /// Errors are returned inside [`Dispatch`], never propagated.
    pub async fn execute(
        &self,
        session: &mut Session,
        input: &mut dyn InputSource,
        line: &str,
    ) -> Dispatch {
        let mut tokens = line.split_whitespace();
        let key = match tokens.next() {
            Some(key) => key,
            None => return Dispatch::Empty,
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let command = match self.commands.get(key) {
            Some(command) => Arc::clone(command),
            None => {
                debug!("Unknown command: {}", key);
                return Dispatch::Unknown(key.to_string());
            }
        };

        session.sync_transport();

        debug!("Running '{}' with {} argument(s)", command.name, args.len());
        let mut ctx = CommandContext {
            session,
            input,
            registry: self,
        };
        match command.handler.execute(&mut ctx, &args).await {
            Ok(()) => Dispatch::Completed {
                command: command.name,
            },
            Err(error) => Dispatch::Failed {
                command: command.name,
                error,
            },
        }
    }
}
