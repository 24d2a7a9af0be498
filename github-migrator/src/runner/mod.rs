//! Wires configuration, API clients and the migrator together.

mod config;
mod error;

pub use config::{ApiConfig, RunnerConfig};
pub use error::RunnerError;

use crate::config::parse_repo_path;
use crate::github::{ApiClient, OctocrabTransport};
use crate::migrator::Migrator;
use crate::repo::GitHubRepo;
use crate::summary::MigrationSummary;
use std::sync::Arc;
use tracing::info;

/// Runs one migration from a [`RunnerConfig`].
pub struct Runner {
    config: RunnerConfig,
    source_client: Arc<ApiClient>,
    target_client: Arc<ApiClient>,
}

impl Runner {
    /// Validates the configuration and builds one API client per side.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] for malformed repository paths and
    /// [`RunnerError::Octocrab`] if a client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        parse_repo_path(config.source())?;
        parse_repo_path(config.target())?;

        let retry = config.settings().retry_policy();
        let source_client = build_client(config.source_api())?.with_retry_policy(retry);
        let target_client = build_client(config.target_api())?.with_retry_policy(retry);
        Ok(Self {
            config,
            source_client: Arc::new(source_client),
            target_client: Arc::new(target_client),
        })
    }

    /// Checks both logins, then migrates the source into the target.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::GitHub`] if a token is rejected and
    /// [`RunnerError::Migrate`] if the migration aborts.
    pub async fn run(&self) -> Result<MigrationSummary, RunnerError> {
        let source_user = self.source_client.login().await?;
        info!(login = %source_user.login, endpoint = self.source_client.endpoint(), "Source login succeeded");
        let target_user = self.target_client.login().await?;
        info!(login = %target_user.login, endpoint = self.target_client.endpoint(), "Target login succeeded");

        let source = GitHubRepo::new(self.source_client.clone(), self.config.source());
        let target = GitHubRepo::new(self.target_client.clone(), self.config.target());
        let migrator = Migrator::new(
            Arc::new(source),
            Arc::new(target),
            self.config.user_mapping().clone(),
            self.config.settings().clone(),
        );
        Ok(migrator.migrate().await?)
    }
}

fn build_client(api: &ApiConfig) -> Result<ApiClient, RunnerError> {
    let transport = OctocrabTransport::new(api.endpoint(), api.token())?;
    Ok(ApiClient::new(Arc::new(transport), api.endpoint()))
}
