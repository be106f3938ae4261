pub mod clock;
pub mod error;
pub mod id;
pub mod manager;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, RewardError};
pub use manager::{ConfirmOutcome, ConfirmParams, SessionManager, StartParams};
pub use session::{RewardSession, SessionStatus};
pub use store::SessionStore;

use chrono::Duration;

/// Minimum number of seconds an ad must have been watched
pub const MINIMUM_WATCH_TIME_SECS: u32 = 30;

/// A session can only be confirmed within this window after creation
pub fn confirmation_window() -> Duration {
    Duration::minutes(10)
}

/// Sessions are purged once they are older than this, confirmed or not
pub fn retention_ceiling() -> Duration {
    Duration::hours(1)
}
