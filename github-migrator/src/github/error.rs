//! Access layer error types.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors returned by the GitHub access layer.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The API answered with a status outside `[200, 400)`.
    #[error("{status} {}", describe(.message, .errors))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Top level `message` of the error payload.
        message: String,
        /// Field level sub-errors.
        errors: Vec<FieldError>,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be serialized.
    #[error("failed to encode request for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A diff endpoint answered with something that is not a unified diff.
    #[error("unexpected diff response from {url}")]
    UnexpectedDiff { url: String },
}

impl GitHubError {
    /// Returns true for server side and transport failures.
    ///
    /// Client errors (4xx) and decoding failures are never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Transport(_) => true,
            Self::Decode { .. } | Self::Encode { .. } | Self::UnexpectedDiff { .. } => false,
        }
    }

    /// Returns true if the API answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds an API error from a non-success response body.
    ///
    /// Falls back to the raw body when it is not a GitHub error document.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(payload) => Self::Api {
                status,
                message: payload.message,
                errors: payload.errors,
            },
            Err(_) => Self::Api {
                status,
                message: body.trim().to_string(),
                errors: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<FieldError>,
}

/// One entry of the `errors` array of a GitHub error payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == "custom" {
            if let Some(message) = &self.message {
                return write!(f, "{message}");
            }
        }
        match &self.value {
            Some(serde_json::Value::String(value)) => write!(
                f,
                "{} ({}.{} = \"{}\")",
                self.code, self.resource, self.field, value
            ),
            Some(value) if !value.is_null() => write!(
                f,
                "{} ({}.{} = {})",
                self.code, self.resource, self.field, value
            ),
            _ => write!(f, "{} ({}.{})", self.code, self.resource, self.field),
        }
    }
}

fn describe(message: &str, errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return message.to_string();
    }
    let details = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{message}: {details}")
}
