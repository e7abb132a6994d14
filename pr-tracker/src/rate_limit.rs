//! Rate limit reporting for the GitHub API.
//!
//! Runs do not wait for rate limit resets; a request rejected for rate
//! limiting fails like any other. The remaining quota is logged up front so
//! such failures are easy to explain.

use crate::github::GitHubApi;
use tracing::{debug, warn};

/// Requests a full organization scan is expected to need at minimum.
const LOW_REMAINING_THRESHOLD: u32 = 100;

/// Rate limit information for a specific resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns true if the remaining quota is below what a scan usually needs.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.remaining < LOW_REMAINING_THRESHOLD
    }
}

/// Logs the core API quota. Failing to read it is only logged.
pub async fn log_core_rate_limit(api: &dyn GitHubApi) -> Option<RateLimitInfo> {
    match api.core_rate_limit().await {
        Ok(info) => {
            if info.is_low() {
                warn!(
                    remaining = info.remaining,
                    limit = info.limit,
                    reset = info.reset,
                    "GitHub API quota is low, requests may start failing"
                );
            } else {
                debug!(remaining = info.remaining, limit = info.limit, "GitHub API quota");
            }
            Some(info)
        }
        Err(e) => {
            debug!(error = %e, "Could not read GitHub API quota");
            None
        }
    }
}
