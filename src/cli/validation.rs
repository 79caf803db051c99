//! Argument checks that run before any request is sent.

use crate::api::PlayerConfig;
use crate::session::Session;

pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 20;
pub const MIN_SEARCH_TIME_MS: u32 = 100;
pub const MAX_SEARCH_TIME_MS: u32 = 10_000;

/// Problems with what the user typed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("no current game, use 'new' or 'join <gameId>'")]
    NoActiveGame,

    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// The id of the active game, or the "no current game" error.
pub fn require_game(session: &Session) -> ValidationResult<String> {
    session
        .current_game_id()
        .map(str::to_string)
        .ok_or(ValidationError::NoActiveGame)
}

/// The argument at `index`, or a usage error.
pub fn require_arg<'a>(args: &'a [String], index: usize, usage: &str) -> ValidationResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ValidationError::Usage(usage.to_string()))
}

/// Undo count: defaults to 1, must be a positive integer.
pub fn parse_undo_count(arg: Option<&str>) -> ValidationResult<u32> {
    match arg {
        None => Ok(1),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) => Err(ValidationError::invalid("count", raw, "must be at least 1")),
            Ok(n) => Ok(n),
            Err(_) => Err(ValidationError::invalid("count", raw, "not a number")),
        },
    }
}

pub fn parse_level(raw: &str) -> ValidationResult<u8> {
    match raw.trim().parse::<u8>() {
        Ok(level) if (MIN_LEVEL..=MAX_LEVEL).contains(&level) => Ok(level),
        _ => Err(ValidationError::invalid(
            "level",
            raw,
            format!("expected {}-{}", MIN_LEVEL, MAX_LEVEL),
        )),
    }
}

pub fn parse_search_time(raw: &str) -> ValidationResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(ms) if (MIN_SEARCH_TIME_MS..=MAX_SEARCH_TIME_MS).contains(&ms) => Ok(ms),
        _ => Err(ValidationError::invalid(
            "search time",
            raw,
            format!("expected {}-{} ms", MIN_SEARCH_TIME_MS, MAX_SEARCH_TIME_MS),
        )),
    }
}

/// Parse a seat spec: `h`, `c`, `c:<level>` or `c:<level>:<searchMs>`.
/// Missing computer settings fall back to the given defaults.
pub fn parse_player_spec(
    spec: &str,
    default_level: u8,
    default_search_ms: u32,
) -> ValidationResult<PlayerConfig> {
    let mut parts = spec.split(':');
    let kind = parts.next().unwrap_or_default().to_lowercase();
    match kind.as_str() {
        "h" | "human" => {
            if parts.next().is_some() {
                return Err(ValidationError::invalid(
                    "player",
                    spec,
                    "human players take no settings",
                ));
            }
            Ok(PlayerConfig::human())
        }
        "c" | "computer" => {
            let level = match parts.next() {
                Some(raw) if !raw.is_empty() => parse_level(raw)?,
                _ => default_level,
            };
            let search = match parts.next() {
                Some(raw) if !raw.is_empty() => parse_search_time(raw)?,
                _ => default_search_ms,
            };
            if parts.next().is_some() {
                return Err(ValidationError::invalid(
                    "player",
                    spec,
                    "expected c[:level[:searchMs]]",
                ));
            }
            Ok(PlayerConfig::computer(level, search))
        }
        _ => Err(ValidationError::invalid(
            "player",
            spec,
            "use 'h' for human or 'c' for computer",
        )),
    }
}

/// Normalize a service URL: bare hosts get `http://`, trailing slashes go.
pub fn normalize_url(raw: &str) -> ValidationResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ValidationError::invalid("url", raw, "empty"));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerKind;

    #[test]
    fn test_undo_count() {
        assert_eq!(parse_undo_count(None), Ok(1));
        assert_eq!(parse_undo_count(Some("3")), Ok(3));
        assert!(parse_undo_count(Some("0")).is_err());
        assert!(parse_undo_count(Some("two")).is_err());
        assert!(parse_undo_count(Some("-1")).is_err());
    }

    #[test]
    fn test_player_spec_defaults() {
        let human = parse_player_spec("h", 10, 1000).unwrap();
        assert_eq!(human.kind, PlayerKind::Human);

        let computer = parse_player_spec("c", 10, 1000).unwrap();
        assert_eq!(computer, PlayerConfig::computer(10, 1000));
    }

    #[test]
    fn test_player_spec_explicit_settings() {
        assert_eq!(
            parse_player_spec("C:5:2500", 10, 1000).unwrap(),
            PlayerConfig::computer(5, 2500)
        );
        assert_eq!(
            parse_player_spec("computer::300", 10, 1000).unwrap(),
            PlayerConfig::computer(10, 300)
        );
    }

    #[test]
    fn test_player_spec_rejects_out_of_range() {
        assert!(parse_player_spec("c:21", 10, 1000).is_err());
        assert!(parse_player_spec("c:5:50", 10, 1000).is_err());
        assert!(parse_player_spec("c:5:20000", 10, 1000).is_err());
        assert!(parse_player_spec("h:5", 10, 1000).is_err());
        assert!(parse_player_spec("x", 10, 1000).is_err());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("localhost:9090").unwrap(), "http://localhost:9090");
        assert_eq!(
            normalize_url("https://chess.example.com/").unwrap(),
            "https://chess.example.com"
        );
        assert!(normalize_url("  ").is_err());
    }

    #[test]
    fn test_require_arg() {
        let args = vec!["abc".to_string()];
        assert_eq!(require_arg(&args, 0, "join <gameId>"), Ok("abc"));
        assert_eq!(
            require_arg(&args, 1, "join <gameId>"),
            Err(ValidationError::Usage("join <gameId>".to_string()))
        );
        assert_eq!(
            ValidationError::Usage("join <gameId>".to_string()).to_string(),
            "usage: join <gameId>"
        );
    }
}
