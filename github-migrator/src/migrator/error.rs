//! Orchestrator error types.

use super::builder::BuildError;
use crate::github::models::ImportError;
use crate::github::GitHubError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that abort a migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The import API reported a terminal failure.
    #[error("import of {url} failed{}", describe(.errors))]
    ImportFailed {
        url: String,
        errors: Vec<ImportError>,
    },

    /// The import never left the pending state.
    #[error("import of {url} still pending after {attempts} status checks")]
    ImportTimedOut { url: String, attempts: u32 },

    /// A source project has no counterpart on the target.
    #[error("project not found on target: {name}")]
    ProjectNotFound { name: String },

    /// A source project column has no counterpart on the target.
    #[error("project column not found on target: {name}")]
    ProjectColumnNotFound { name: String },

    /// Any failure while migrating one issue.
    #[error("migrating {url} failed: {source}")]
    Issue {
        url: String,
        #[source]
        source: Box<MigrateError>,
    },
}

impl MigrateError {
    /// Tags the error with the issue being migrated.
    pub(crate) fn for_issue(self, url: &str) -> Self {
        match self {
            Self::Issue { .. } => self,
            other => Self::Issue {
                url: url.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the URL of the issue that failed, if any.
    #[must_use]
    pub fn issue_url(&self) -> Option<&str> {
        match self {
            Self::Issue { url, .. } | Self::ImportFailed { url, .. } | Self::ImportTimedOut { url, .. } => {
                Some(url)
            }
            _ => None,
        }
    }
}

fn describe(errors: &[ImportError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let errors: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!(": {}", errors.join(", "))
}
