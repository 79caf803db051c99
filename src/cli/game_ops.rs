//! Game commands: create, join, move, computer, undo, show, state, delete, poll.

use crate::api::{CreateGameRequest, PlayerConfig, PlayerKind};
use crate::cli::display;
use crate::cli::error_handler::CliResult;
use crate::cli::input::{require_line, InputSource};
use crate::cli::registry::{Command, CommandContext, Handler, Registry};
use crate::cli::validation::{
    parse_level, parse_player_spec, parse_search_time, parse_undo_count, require_arg,
    require_game, ValidationError,
};
use crate::sync::{long_poll, settle_move};
use async_trait::async_trait;
use tracing::info;

pub fn register_game_commands(registry: &mut Registry) {
    registry.register(Command::new(
        "new",
        Some("n"),
        "Create a new game",
        "new [h|c[:level[:searchMs]]] [h|c[:level[:searchMs]]] [fen]",
        NewGame,
    ));
    registry.register(Command::new(
        "join",
        Some("j"),
        "Join/set current game ID",
        "join <gameId>",
        JoinGame,
    ));
    registry.register(Command::new(
        "move",
        Some("m"),
        "Make a move",
        "move <uci-move>",
        MakeMove,
    ));
    registry.register(Command::new(
        "computer",
        Some("c"),
        "Trigger computer move",
        "computer",
        ComputerMove,
    ));
    registry.register(Command::new(
        "undo",
        Some("u"),
        "Undo moves",
        "undo [count]",
        Undo,
    ));
    registry.register(Command::new(
        "show",
        Some("h"),
        "Show board and game state",
        "show",
        ShowBoard,
    ));
    registry.register(Command::new(
        "state",
        Some("s"),
        "Show raw game JSON",
        "state",
        GameStateDump,
    ));
    registry.register(Command::new(
        "delete",
        Some("d"),
        "Delete a game",
        "delete [gameId]",
        DeleteGame,
    ));
    registry.register(Command::new(
        "poll",
        Some("p"),
        "Long-poll for game updates",
        "poll",
        Poll,
    ));
}

pub struct NewGame;

impl NewGame {
    /// Ask for one side's configuration. Blank answers take the defaults.
    fn prompt_player(
        input: &mut dyn InputSource,
        side: &str,
        default_level: u8,
        default_search_ms: u32,
    ) -> CliResult<PlayerConfig> {
        let kind = require_line(input, &format!("{} player type (h/c) [h]: ", side))?;
        match kind.to_lowercase().as_str() {
            "" | "h" => Ok(PlayerConfig::human()),
            "c" => {
                let level = require_line(
                    input,
                    &format!("Computer level (0-20) [{}]: ", default_level),
                )?;
                let level = if level.is_empty() {
                    default_level
                } else {
                    parse_level(&level)?
                };
                let search = require_line(
                    input,
                    &format!("Search time (100-10000ms) [{}]: ", default_search_ms),
                )?;
                let search = if search.is_empty() {
                    default_search_ms
                } else {
                    parse_search_time(&search)?
                };
                Ok(PlayerConfig::computer(level, search))
            }
            other => Err(ValidationError::invalid(
                "player type",
                other,
                "use 'h' for human or 'c' for computer",
            )
            .into()),
        }
    }

    fn build_request(ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<CreateGameRequest> {
        let settings = ctx.registry.settings();
        let (level, search) = (
            settings.default_computer_level,
            settings.default_search_time_ms,
        );

        if args.is_empty() {
            println!("Creating new game...");
            let white = Self::prompt_player(ctx.input, "White", level, search)?;
            let black = Self::prompt_player(ctx.input, "Black", level, search)?;
            let fen = require_line(ctx.input, "Starting position (FEN) [default]: ")?;
            return Ok(CreateGameRequest {
                white,
                black,
                fen: Some(fen).filter(|f| !f.is_empty()),
            });
        }

        let white = parse_player_spec(&args[0], level, search)?;
        let black = match args.get(1) {
            Some(spec) => parse_player_spec(spec, level, search)?,
            None => PlayerConfig::human(),
        };
        // A FEN has spaces, so it arrives split across the remaining tokens
        let fen = if args.len() > 2 {
            Some(args[2..].join(" "))
        } else {
            None
        };
        Ok(CreateGameRequest { white, black, fen })
    }
}

#[async_trait]
impl Handler for NewGame {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let req = Self::build_request(ctx, args)?;
        let game = ctx.session.api().create_game(&req).await?;
        let game_id = game.id.clone();
        ctx.session.enter_game(&game_id, game);
        info!("Created game {}", game_id);

        println!("Game created: {}", game_id);
        println!("Current game set to: {}", game_id);
        if req.white.kind == PlayerKind::Computer {
            println!();
            println!("White is computer. Use 'computer' or 'c' to trigger first move.");
        }
        Ok(())
    }
}

pub struct JoinGame;

#[async_trait]
impl Handler for JoinGame {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let game_id = require_arg(args, 0, "join <gameId>")?.to_string();
        let game = ctx.session.api().get_game(&game_id).await?;
        ctx.session.enter_game(&game_id, game);

        if let Some(game) = ctx.session.snapshot() {
            println!("Joined game: {}", game.id);
            display::display_game_summary(game);
        }
        Ok(())
    }
}

pub struct MakeMove;

#[async_trait]
impl Handler for MakeMove {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let token = require_arg(args, 0, "move <uci-move>")?.to_string();
        let game_id = require_game(ctx.session)?;

        let response = ctx.session.api().make_move(&game_id, &token).await?;
        if response.is_pending() {
            println!("Computer is thinking...");
        }
        let policy = ctx.registry.settings().poll;
        let report = settle_move(ctx.session, response, &policy).await?;
        display::display_move_report(&report, report.attempts > 0);
        Ok(())
    }
}

pub struct ComputerMove;

#[async_trait]
impl Handler for ComputerMove {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let game_id = require_game(ctx.session)?;

        let response = ctx.session.api().trigger_computer_move(&game_id).await?;
        if response.is_pending() {
            println!("Computer is thinking...");
        }
        let policy = ctx.registry.settings().poll;
        let report = settle_move(ctx.session, response, &policy).await?;
        display::display_move_report(&report, true);
        Ok(())
    }
}

pub struct Undo;

#[async_trait]
impl Handler for Undo {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let game_id = require_game(ctx.session)?;
        let count = parse_undo_count(args.first().map(String::as_str))?;

        let game = ctx.session.api().undo_moves(&game_id, count).await?;
        ctx.session.replace_snapshot(game);
        println!("Undid {} move(s)", count);
        Ok(())
    }
}

pub struct ShowBoard;

#[async_trait]
impl Handler for ShowBoard {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let game_id = require_game(ctx.session)?;

        let game = ctx.session.api().get_game(&game_id).await?;
        let board = ctx.session.api().get_board(&game_id).await?;
        display::display_game(&game, &board);
        ctx.session.replace_snapshot(game);
        Ok(())
    }
}

pub struct GameStateDump;

#[async_trait]
impl Handler for GameStateDump {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        let game_id = require_game(ctx.session)?;

        let game = ctx.session.api().get_game(&game_id).await?;
        println!("Game State:");
        match serde_json::to_string_pretty(&game) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("{:#?}\n(could not format as JSON: {})", game, e),
        }
        ctx.session.replace_snapshot(game);
        Ok(())
    }
}

pub struct DeleteGame;

#[async_trait]
impl Handler for DeleteGame {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> CliResult<()> {
        let game_id = match args.first() {
            Some(id) => id.clone(),
            None => ctx
                .session
                .current_game_id()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::Usage("delete [gameId]".to_string()))?,
        };

        ctx.session.api().delete_game(&game_id).await?;
        if ctx.session.current_game_id() == Some(game_id.as_str()) {
            ctx.session.leave_game();
        }
        println!("Game deleted: {}", game_id);
        Ok(())
    }
}

pub struct Poll;

#[async_trait]
impl Handler for Poll {
    async fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> CliResult<()> {
        require_game(ctx.session)?;

        println!(
            "Long-polling for updates (move count: {})...",
            ctx.session.last_move_count()
        );
        println!("This may take up to 25 seconds");
        let outcome = long_poll(ctx.session).await?;
        display::display_poll_outcome(&outcome);
        Ok(())
    }
}
