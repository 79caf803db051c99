use anyhow::Result;
use clap::Parser;
use gambit::cli::{App, Cli, Commands, Config, ConfigCommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Load the config named on the command line, or the default one, then apply overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_or_create(path)?,
        None => Config::load_or_create_default()?,
    };
    if let Some(url) = &cli.url {
        config.api_url = gambit::cli::validation::normalize_url(url)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with REPL output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.clone() {
        Some(Commands::Config { command }) => match command {
            ConfigCommand::Path => match Config::default_config_file() {
                Ok(path) => {
                    println!("{}", path.display());
                    if !path.exists() {
                        println!("(not created yet; it is written on first run)");
                    }
                }
                Err(e) => error!("Failed to determine config path: {}", e),
            },
            ConfigCommand::Show => {
                let config = load_config(&cli)?;
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },
        Some(Commands::Repl) | None => {
            let config = load_config(&cli)?;
            info!("Using service at {}", config.api_url);
            let mut app = App::new(&config)?;
            app.run().await?;
        }
    }

    Ok(())
}
