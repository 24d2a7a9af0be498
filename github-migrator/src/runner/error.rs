//! Runner error types.

/// Errors that can occur while running a migration.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid arguments or settings.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// A request made before the migration started failed.
    #[error(transparent)]
    GitHub(#[from] crate::github::GitHubError),

    /// The migration was aborted.
    #[error(transparent)]
    Migrate(#[from] crate::migrator::MigrateError),
}

impl RunnerError {
    /// Returns true for errors raised before anything was migrated.
    #[must_use]
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Octocrab(_))
    }
}
