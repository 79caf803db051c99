use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gambit")]
#[command(about = "Interactive client for the chess game service")]
pub struct Cli {
    /// Service base URL (overrides the config file)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "gambit=trace" (RUST_LOG wins if set)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive client (default)
    Repl,
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Show the default config file path
    Path,
    /// Print the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["gambit"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_url_override() {
        let cli = Cli::parse_from(["gambit", "--url", "http://chess.local:9000", "repl"]);
        assert_eq!(cli.url.as_deref(), Some("http://chess.local:9000"));
        assert_eq!(cli.command, Some(Commands::Repl));
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::parse_from(["gambit", "config", "show"]);
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommand::Show
            })
        );
    }
}
