//! GitHub REST access layer.
//!
//! [`ApiClient`] owns the request cycle: authentication and media types
//! (through a [`Transport`]), retries of transient failures, rate limit
//! pacing and `Link` header pagination. List endpoints are exposed as lazy
//! [`Items`] sequences.

mod client;
mod error;
mod items;
mod link;
pub mod models;
pub mod path;
mod retry;
mod transport;

pub use client::{ApiClient, Page, DEFAULT_ENDPOINT};
pub use error::{FieldError, GitHubError};
pub use items::Items;
pub use link::next_link;
pub use retry::{
    RetryPolicy, RetrySchedule, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY,
};
pub use transport::{
    HttpRequest, HttpResponse, MediaType, Method, OctocrabTransport, Transport, USER_AGENT_NAME,
};

#[cfg(test)]
pub(crate) use transport::MockTransport;
