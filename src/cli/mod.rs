pub mod app;
pub mod auth_ops;
pub mod builtins;
pub mod commands;
pub mod debug_ops;
pub mod display;
pub mod error_handler;
pub mod game_ops;
pub mod input;
pub mod registry;
pub mod validation;

pub use app::{split_verbose, App, Config, Flow};
pub use builtins::{builtin_registry, is_exit};
pub use commands::{Cli, Commands, ConfigCommand};
pub use display::build_prompt;
pub use error_handler::{CliError, CliResult};
pub use input::{InputSource, ScriptedInput, StdinInput};
pub use registry::{Command, CommandContext, CommandSettings, Dispatch, Handler, Registry};
pub use validation::{ValidationError, ValidationResult};
