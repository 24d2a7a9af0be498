//! Runner configuration.

use crate::config::{Settings, UserMapping};
use crate::github::DEFAULT_ENDPOINT;

/// Credentials and endpoint for one side of a migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    token: String,
    endpoint: String,
}

impl ApiConfig {
    /// Creates a configuration for the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Sets a custom endpoint, such as a GitHub Enterprise server.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns the API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the API endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Configuration for running a migration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Source repository in `owner/name` form.
    source: String,
    /// Target repository in `owner/name` form.
    target: String,
    source_api: ApiConfig,
    target_api: ApiConfig,
    /// Login renames applied to migrated text.
    user_mapping: UserMapping,
    settings: Settings,
}

impl RunnerConfig {
    /// Creates a new configuration for a run with default settings.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_api: ApiConfig,
        target_api: ApiConfig,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_api,
            target_api,
            user_mapping: UserMapping::default(),
            settings: Settings::default(),
        }
    }

    /// Sets the login mapping.
    #[must_use]
    pub fn with_user_mapping(mut self, user_mapping: UserMapping) -> Self {
        self.user_mapping = user_mapping;
        self
    }

    /// Sets the tunable timings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the source repository path.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target repository path.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn source_api(&self) -> &ApiConfig {
        &self.source_api
    }

    pub fn target_api(&self) -> &ApiConfig {
        &self.target_api
    }

    pub fn user_mapping(&self) -> &UserMapping {
        &self.user_mapping
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
