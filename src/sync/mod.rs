pub mod outcome;
pub mod reconcile;

pub use outcome::Outcome;
pub use reconcile::{
    await_computation, long_poll, settle_move, MoveReport, PollOutcome, PollPolicy, SyncError,
    DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
