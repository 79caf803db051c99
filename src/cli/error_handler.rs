use crate::api::ApiError;
use crate::cli::validation::ValidationError;
use crate::sync::SyncError;
use std::fmt;

/// Unified error type for CLI operations with user-friendly messages
#[derive(Debug)]
pub enum CliError {
    /// Request to the service failed or was rejected
    Api(ApiError),
    /// Bad arguments or missing game context; nothing was sent
    Validation(ValidationError),
    /// The engine did not finish in time. The move may still have been accepted.
    ReconcileTimeout { attempts: u32, waited_ms: u128 },
    /// Reading interactive input failed
    Input(std::io::Error),
    /// User-friendly error with custom message
    UserError {
        message: String,
        suggestion: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Api(e) => write!(f, "{}", format_api_error(e)),
            CliError::Validation(e) => write!(f, "{}", e),
            CliError::ReconcileTimeout {
                attempts,
                waited_ms,
            } => {
                write!(
                    f,
                    "timeout waiting for computer move ({} attempts, {}ms)\n   The move may already be recorded. Use 'show' or 'poll' to check.",
                    attempts, waited_ms
                )
            }
            CliError::Input(e) => write!(f, "could not read input: {}", e),
            CliError::UserError {
                message,
                suggestion,
            } => {
                if let Some(suggestion) = suggestion {
                    write!(f, "{}\n   Suggestion: {}", message, suggestion)
                } else {
                    write!(f, "{}", message)
                }
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Api(e) => Some(e),
            CliError::Validation(e) => Some(e),
            CliError::Input(e) => Some(e),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        CliError::Api(err)
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Validation(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Input(err)
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NoActiveGame => CliError::Validation(ValidationError::NoActiveGame),
            SyncError::Timeout { attempts, waited } => CliError::ReconcileTimeout {
                attempts,
                waited_ms: waited.as_millis(),
            },
            SyncError::Api(e) => CliError::Api(e),
        }
    }
}

/// Format transport and service errors with user-friendly messages
fn format_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Transport(_) if error.is_connect() => {
            format!("{}\n   Suggestion: Is the server running? Check the address with 'url'.", error)
        }
        ApiError::Transport(_) if error.is_timeout() => {
            format!("{}\n   Suggestion: The server took too long to answer. Try again.", error)
        }
        ApiError::Service { status: 401, .. } => {
            format!("{}\n   Suggestion: Log in with 'login' first.", error)
        }
        ApiError::Service { status: 404, .. } => {
            format!("{}\n   Suggestion: Check the game ID, or create one with 'new'.", error)
        }
        _ => error.to_string(),
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Text shown for a failed command, with a retry hint for transient failures
pub fn error_report(error: &CliError) -> String {
    let mut report = format!("Error: {}", error);
    if is_recoverable_error(error) {
        report.push_str("\n   This looks temporary; running the command again may succeed.");
    }
    report
}

/// Display an error without exiting
pub fn display_error(error: &CliError) {
    eprintln!("{}", error_report(error));
}

/// Check if an error is transient, so the same command may succeed when retried.
///
/// Reconcile timeouts are excluded: the move may already be recorded, and
/// resubmitting it is not the same as retrying.
pub fn is_recoverable_error(error: &CliError) -> bool {
    match error {
        CliError::Api(ApiError::Transport(_)) => true,
        CliError::Api(ApiError::Service { status, .. }) => *status >= 500 || *status == 408,
        _ => false,
    }
}
