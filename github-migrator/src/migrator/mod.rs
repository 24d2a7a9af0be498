//! Migration orchestrator.
//!
//! A run walks a fixed sequence of phases, each depending on the previous
//! ones: repository metadata, labels, projects and their columns, milestones,
//! issues, project cards and hooks. Every phase compares source and target
//! and only writes what is missing or different, so an interrupted run is
//! resumed by running it again.

pub mod builder;
mod error;
pub mod filter;
mod hooks;
mod issues;
mod labels;
mod milestones;
mod project_cards;
mod projects;
mod repos;
mod session;


pub use error::MigrateError;

use crate::config::{Settings, UserMapping};
use crate::github::GitHubError;
use crate::repo::Repository;
use crate::summary::MigrationSummary;
use crate::templates::TemplateRenderer;
use session::Session;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Copies the history of one repository into another.
pub struct Migrator {
    source: Arc<dyn Repository>,
    target: Arc<dyn Repository>,
    user_mapping: UserMapping,
    settings: Settings,
}

impl Migrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn Repository>,
        target: Arc<dyn Repository>,
        user_mapping: UserMapping,
        settings: Settings,
    ) -> Self {
        Self {
            source,
            target,
            user_mapping,
            settings,
        }
    }

    /// Runs every phase in order and returns what was changed.
    ///
    /// # Errors
    ///
    /// Returns the first [`MigrateError`]; later phases are not attempted.
    pub async fn migrate(&self) -> Result<MigrationSummary, MigrateError> {
        info!(source = self.source.path(), target = self.target.path(), "Starting migration");
        let renderer = TemplateRenderer::new()?;

        let mut session = self
            .migrate_repo()
            .instrument(info_span!("repo"))
            .await?;
        self.migrate_labels(&mut session)
            .instrument(info_span!("labels"))
            .await?;
        self.migrate_projects(&mut session)
            .instrument(info_span!("projects"))
            .await?;
        self.migrate_milestones(&mut session)
            .instrument(info_span!("milestones"))
            .await?;
        self.migrate_issues(&mut session, &renderer)
            .instrument(info_span!("issues"))
            .await?;
        self.migrate_project_cards(&mut session)
            .instrument(info_span!("project_cards"))
            .await?;
        self.migrate_hooks(&mut session)
            .instrument(info_span!("hooks"))
            .await?;

        info!(changes = session.summary.total_changes(), "Migration finished");
        Ok(session.summary)
    }
}

/// Returns true for the error GitHub answers when projects are turned off.
fn projects_disabled(err: &GitHubError) -> bool {
    matches!(err, GitHubError::Api { message, .. } if message.contains("disabled"))
}
