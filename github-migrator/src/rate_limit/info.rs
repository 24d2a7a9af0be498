//! `X-RateLimit-*` header parsing.

use crate::github::HttpResponse;

/// Budget reported by the `X-RateLimit-*` response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: u32,
    /// Unix time at which `remaining` is refilled.
    pub reset: u64,
    pub limit: u32,
}

impl RateLimitInfo {
    /// Reads the rate limit headers of a response.
    ///
    /// Returns `None` when the server does not report a limit, as GitHub
    /// Enterprise instances with rate limiting disabled do.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        let remaining = response.header("x-ratelimit-remaining")?.trim().parse().ok()?;
        let reset = response.header("x-ratelimit-reset")?.trim().parse().ok()?;
        let limit = response
            .header("x-ratelimit-limit")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default();
        Some(Self {
            remaining,
            reset,
            limit,
        })
    }
}
