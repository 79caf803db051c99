use crate::cli::auth_ops::register_auth_commands;
use crate::cli::debug_ops::register_debug_commands;
use crate::cli::error_handler::{CliError, CliResult};
use crate::cli::game_ops::register_game_commands;
use crate::cli::registry::{Command, CommandContext, CommandSettings, Handler, Registry};
use async_trait::async_trait;

/// Words that end the REPL before dispatch
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", "x"];

const GAME_GROUP: &[&str] = &[
    "new", "join", "move", "computer", "undo", "show", "state", "delete", "poll",
];
const AUTH_GROUP: &[&str] = &["register", "login", "logout", "whoami", "user"];
const UTILITY_GROUP: &[&str] = &["health", "url", "raw", "help", "exit"];

/// Registry with every command the client knows.
///
/// Help and exit go in last so they win over any domain command using the
/// same key.
pub fn builtin_registry(settings: CommandSettings) -> Registry {
    let mut registry = Registry::new(settings);
    register_game_commands(&mut registry);
    register_auth_commands(&mut registry);
    register_debug_commands(&mut registry);

    registry.register(Command::new(
        "help",
        Some("?"),
        "Show available commands",
        "help [command]",
        Help,
    ));
    registry.register(Command::new(
        "exit",
        Some("x"),
        "Exit the client",
        "exit",
        Exit,
    ));
    registry
}

pub fn is_exit(line: &str) -> bool {
    EXIT_WORDS.contains(&line.trim())
}

pub struct Help;

impl Help {
    /// Text for `help <command>`
    pub fn command_help(registry: &Registry, key: &str) -> Option<String> {
        let cmd = registry.lookup(key)?;
        let mut text = format!("{} - {}\n", cmd.name, cmd.description);
        if let Some(alias) = cmd.alias {
            text.push_str(&format!("Short form: {}\n", alias));
        }
        text.push_str(&format!("Usage: {}", cmd.usage));
        Some(text)
    }

    /// Grouped listing for bare `help`
    pub fn overview(registry: &Registry) -> String {
        let mut text = String::from("Available Commands:\n\n");
        for (title, names) in [
            ("Game Commands", GAME_GROUP),
            ("Auth Commands", AUTH_GROUP),
            ("Utility Commands", UTILITY_GROUP),
        ] {
            text.push_str(&format!("{}:\n", title));
            for name in names {
                if let Some(cmd) = registry.lookup(name) {
                    let alias = cmd.alias.map(|a| format!("[{}] ", a)).unwrap_or_default();
                    text.push_str(&format!("  {:<4}{:<10} {}\n", alias, cmd.name, cmd.description));
                }
            }
            text.push('\n');
        }
        text.push_str("Type 'help <command>' for detailed usage\n");
        text.push_str("Add '-v' to any command for verbose output");
        text
    }
}

#[async_trait]
impl Handler for Help {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        match args.first() {
            Some(key) => match Self::command_help(ctx.registry, key) {
                Some(text) => println!("{}", text),
                None => {
                    return Err(CliError::UserError {
                        message: format!("unknown command: {}", key),
                        suggestion: Some("Type 'help' for available commands".to_string()),
                    })
                }
            },
            None => println!("{}", Self::overview(ctx.registry)),
        }
        Ok(())
    }
}

/// The REPL leaves before dispatching exit words; this entry exists for help
/// and for scripted registries that dispatch it directly.
pub struct Exit;

#[async_trait]
impl Handler for Exit {
    async fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        println!("Goodbye!");
        Ok(())
    }
}
