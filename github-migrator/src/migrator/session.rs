//! Per-run state shared by the migration phases.

use super::builder::{BuildContext, ProjectLink};
use super::filter::CommentFilters;
use crate::config::{Settings, UserMapping};
use crate::github::models::{Project, Repo};
use crate::summary::MigrationSummary;
use std::collections::HashMap;

/// Lookups fetched once per run, plus the running summary.
pub(crate) struct Session {
    /// Everything the import builder reads; also holds both repositories.
    pub context: BuildContext,
    /// Whether target members were merged into the builder identities.
    pub identities_loaded: bool,
    /// Target projects, once listed.
    pub target_projects: Option<Vec<Project>>,
    /// Target issue IDs by number.
    pub issue_ids: HashMap<u64, u64>,
    pub summary: MigrationSummary,
}

impl Session {
    pub fn new(source: Repo, target: Repo, mapping: &UserMapping, settings: &Settings) -> Self {
        let filters = CommentFilters::for_repos(&source, &target, mapping);
        let context = BuildContext::new(source, target, filters)
            .with_group_window(settings.group_window());
        Self {
            context,
            identities_loaded: false,
            target_projects: None,
            issue_ids: HashMap::new(),
            summary: MigrationSummary::new(),
        }
    }

    pub fn source(&self) -> &Repo {
        &self.context.source
    }

    pub fn target(&self) -> &Repo {
        &self.context.target
    }

    /// Chooses what narrations of `project` link to.
    ///
    /// Projects of the source repository link to their migrated counterpart
    /// when one exists; anything else keeps its own URL.
    pub fn link_project(&self, project: &Project) -> ProjectLink {
        let prefix = format!("{}/projects/", self.source().html_url);
        let migrated = project
            .html_url
            .starts_with(&prefix)
            .then(|| {
                self.target_projects
                    .iter()
                    .flatten()
                    .find(|candidate| candidate.name == project.name)
            })
            .flatten();
        ProjectLink {
            name: project.name.clone(),
            html_url: migrated.unwrap_or(project).html_url.clone(),
        }
    }
}
