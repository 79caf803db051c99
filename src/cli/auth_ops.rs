use crate::api::{AuthResponse, LoginRequest, RegisterRequest};
use crate::cli::display;
use crate::cli::error_handler::{CliError, CliResult};
use crate::cli::input::{require_line, require_secret};
use crate::cli::registry::{Command, CommandContext, Handler, Registry};
use crate::cli::validation::{require_arg, ValidationError};
use crate::session::Credentials;
use async_trait::async_trait;
use tracing::info;

pub fn register_auth_commands(registry: &mut Registry) {
    registry.register(Command::new(
        "register",
        Some("r"),
        "Register a new user",
        "register",
        RegisterUser,
    ));
    registry.register(Command::new(
        "login",
        Some("l"),
        "Login with credentials",
        "login",
        Login,
    ));
    registry.register(Command::new(
        "logout",
        Some("o"),
        "Clear authentication",
        "logout",
        Logout,
    ));
    registry.register(Command::new(
        "whoami",
        Some("i"),
        "Show current user",
        "whoami",
        WhoAmI,
    ));
    registry.register(Command::new(
        "user",
        Some("e"),
        "Set user ID manually",
        "user <userId>",
        SetUser,
    ));
}

/// Install a successful auth response as one credentials value.
fn install(ctx: &mut CommandContext<'_>, resp: AuthResponse) {
    info!("Authenticated as {} ({})", resp.username, resp.user_id);
    println!("User ID: {}", resp.user_id);
    println!("Username: {}", resp.username);
    ctx.session.set_credentials(Credentials::authenticated(
        resp.token,
        resp.user_id,
        resp.username,
    ));
}

pub struct RegisterUser;

#[async_trait]
impl Handler for RegisterUser {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let username = require_line(ctx.input, "Username: ")?;
        if username.is_empty() {
            return Err(ValidationError::invalid("username", "", "must not be empty").into());
        }
        let password = require_secret(ctx.input, "Password: ")?;
        let email = require_line(ctx.input, "Email (optional): ")?;

        let req = RegisterRequest {
            username,
            password,
            email: Some(email).filter(|e| !e.is_empty()),
        };
        let resp = ctx.session.api().register(&req).await?;
        println!("Registered successfully");
        install(ctx, resp);
        Ok(())
    }
}

pub struct Login;

#[async_trait]
impl Handler for Login {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let identifier = require_line(ctx.input, "Username or Email: ")?;
        if identifier.is_empty() {
            return Err(ValidationError::invalid("identifier", "", "must not be empty").into());
        }
        let password = require_secret(ctx.input, "Password: ")?;

        let req = LoginRequest {
            identifier,
            password,
        };
        // Credentials are only touched once the service has said yes
        let resp = ctx.session.api().login(&req).await?;
        println!("Logged in successfully");
        install(ctx, resp);
        Ok(())
    }
}

pub struct Logout;

#[async_trait]
impl Handler for Logout {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        ctx.session.clear_credentials();
        println!("Logged out");
        Ok(())
    }
}

pub struct WhoAmI;

#[async_trait]
impl Handler for WhoAmI {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        if !ctx.session.is_authenticated() {
            println!("Not authenticated");
            return Ok(());
        }
        let user = ctx.session.api().current_user().await?;
        display::display_user(&user);
        Ok(())
    }
}

pub struct SetUser;

#[async_trait]
impl Handler for SetUser {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let user_id = require_arg(args, 0, "user <userId>")?.to_string();
        // A display-only id would replace the login token
        if ctx.session.is_authenticated() {
            return Err(CliError::UserError {
                message: format!(
                    "already logged in as {}",
                    ctx.session.username().unwrap_or("<unknown>")
                ),
                suggestion: Some("Use 'logout' first to set a display-only user ID".to_string()),
            });
        }
        ctx.session
            .set_credentials(Credentials::user_only(user_id.clone()));
        println!("User ID set to: {}", user_id);
        println!("Note: This doesn't authenticate, just sets the ID for display");
        Ok(())
    }
}
