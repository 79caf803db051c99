pub mod api;
pub mod cli;
pub mod session;
pub mod sync;

// Re-export key types for easy testing
pub use api::{ApiClient, ApiError, GameApi, GameState};
pub use session::{Credentials, PlayerColor, Session};
pub use sync::{Outcome, PollPolicy, SyncError};
