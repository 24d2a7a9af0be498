//! Pacing against GitHub's request budget.
//!
//! A migration issues thousands of requests, so the client parks once the
//! budget is nearly spent and resumes when the window rolls over.

mod info;

pub use info::RateLimitInfo;

use chrono::Utc;
use std::time::Duration;
use tracing::warn;

/// Longest single pause; a reset further out than this is treated as bogus.
const WAIT_CAP: Duration = Duration::from_secs(60 * 60);

/// Requests kept in reserve before pausing.
const RESERVE: u32 = 5;

impl RateLimitInfo {
    /// How long to pause at Unix time `now`, or `None` when the budget holds.
    #[must_use]
    pub fn pause_at(&self, now: u64) -> Option<Duration> {
        if self.remaining >= RESERVE || self.reset <= now {
            return None;
        }
        Some(Duration::from_secs(self.reset - now).min(WAIT_CAP))
    }
}

/// Sleeps until the budget in `info` resets, if it is nearly spent.
///
/// Returns whether it slept.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let Some(pause) = info.pause_at(now) else {
        return false;
    };
    warn!(
        remaining = info.remaining,
        limit = info.limit,
        reset = info.reset,
        pause_secs = pause.as_secs(),
        "Request budget nearly spent, pausing"
    );
    tokio::time::sleep(pause).await;
    true
}
