use super::session::Session;
use super::{projects_disabled, MigrateError, Migrator};
use crate::github::models::{
    CreateProjectParams, Project, ProjectColumnParams, UpdateProjectParams,
};
use crate::github::GitHubError;
use tracing::{debug, info};

impl Migrator {
    /// Creates or updates projects by name, then their columns.
    pub(super) async fn migrate_projects(&self, session: &mut Session) -> Result<(), MigrateError> {
        let Some(source_projects) = disabled_as_none(self.source.list_projects().collect_all().await)?
        else {
            info!(repo = self.source.path(), "Projects are disabled, skipping");
            return Ok(());
        };
        if source_projects.is_empty() {
            return Ok(());
        }
        let Some(mut target_projects) =
            disabled_as_none(self.target.list_projects().collect_all().await)?
        else {
            info!(repo = self.target.path(), "Projects are disabled, skipping");
            return Ok(());
        };

        for project in &source_projects {
            info!(project = %project.name, "Migrating project");
            let index = match target_projects.iter().position(|target| target.name == project.name) {
                Some(index) => index,
                None => {
                    info!(project = %project.name, "Creating project");
                    let created = self
                        .target
                        .create_project(&CreateProjectParams {
                            name: project.name.clone(),
                            body: project.body.clone().unwrap_or_default(),
                        })
                        .await?;
                    session.summary.projects_created += 1;
                    target_projects.push(created);
                    target_projects.len() - 1
                }
            };

            let target = &target_projects[index];
            if needs_update(project, target) {
                info!(project = %project.name, "Updating project");
                let updated = self
                    .target
                    .update_project(
                        target.id,
                        &UpdateProjectParams {
                            body: project.body.clone().unwrap_or_default(),
                            state: project.state,
                        },
                    )
                    .await?;
                session.summary.projects_updated += 1;
                target_projects[index] = updated;
            }

            self.migrate_project_columns(session, project.id, target_projects[index].id)
                .await?;
        }

        session.target_projects = Some(target_projects);
        for project in &source_projects {
            let link = session.link_project(project);
            session.context.projects.insert(project.id, link);
        }
        Ok(())
    }

    async fn migrate_project_columns(
        &self,
        session: &mut Session,
        source_id: u64,
        target_id: u64,
    ) -> Result<(), MigrateError> {
        let source_columns = self.source.list_project_columns(source_id).collect_all().await?;
        let target_columns = self.target.list_project_columns(target_id).collect_all().await?;

        for column in &source_columns {
            if target_columns.iter().any(|target| target.name == column.name) {
                debug!(column = %column.name, "Project column exists");
                continue;
            }
            info!(column = %column.name, "Creating project column");
            self.target
                .create_project_column(
                    target_id,
                    &ProjectColumnParams {
                        name: column.name.clone(),
                    },
                )
                .await?;
            session.summary.columns_created += 1;
            tokio::time::sleep(self.settings.column_pause()).await;
        }
        Ok(())
    }
}

fn needs_update(source: &Project, target: &Project) -> bool {
    source.body.as_deref().unwrap_or_default() != target.body.as_deref().unwrap_or_default()
        || source.state != target.state
}

/// Maps the projects-disabled error to `None`.
pub(super) fn disabled_as_none<T>(result: Result<T, GitHubError>) -> Result<Option<T>, GitHubError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if projects_disabled(&err) => Ok(None),
        Err(err) => Err(err),
    }
}
