use crate::cli::display;
use crate::cli::error_handler::CliResult;
use crate::cli::registry::{Command, CommandContext, Handler, Registry};
use crate::cli::validation::{normalize_url, ValidationError};
use async_trait::async_trait;
use serde_json::Value;

pub fn register_debug_commands(registry: &mut Registry) {
    registry.register(Command::new(
        "health",
        Some("."),
        "Check server health",
        "health",
        Health,
    ));
    registry.register(Command::new(
        "url",
        Some("/"),
        "Set API base URL",
        "url [apiUrl]",
        SetUrl,
    ));
    registry.register(Command::new(
        "raw",
        Some(":"),
        "Send raw API request",
        "raw <method> <path> [json-body]",
        RawRequest,
    ));
}

pub struct Health;

#[async_trait]
impl Handler for Health {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let health = ctx.session.api().health().await?;
        display::display_health(&health);
        Ok(())
    }
}

pub struct SetUrl;

#[async_trait]
impl Handler for SetUrl {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        match args.first() {
            None => println!("Current API URL: {}", ctx.session.base_url()),
            Some(raw) => {
                let url = normalize_url(raw)?;
                ctx.session.set_base_url(&url);
                println!("API URL set to: {}", url);
            }
        }
        Ok(())
    }
}

pub struct RawRequest;

impl RawRequest {
    /// Join the remaining tokens back into a body. Anything that isn't JSON is
    /// sent as a JSON string.
    fn parse_body(tokens: &[String]) -> Option<Value> {
        if tokens.is_empty() {
            return None;
        }
        let text = tokens.join(" ");
        Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[async_trait]
impl Handler for RawRequest {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        if args.len() < 2 {
            return Err(ValidationError::Usage("raw <method> <path> [json-body]".to_string()).into());
        }
        let method = args[0].to_uppercase();
        let body = Self::parse_body(&args[2..]);

        match ctx.session.api().raw_request(&method, &args[1], body).await? {
            Some(value) => println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            ),
            None => println!("(empty response)"),
        }
        Ok(())
    }
}
