use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::{Repo, UpdateRepoParams};
use tracing::info;

impl Migrator {
    /// Fetches both repositories and syncs the target description.
    pub(super) async fn migrate_repo(&self) -> Result<Session, MigrateError> {
        let source = self.source.get().await?;
        let target = self.target.get().await?;
        info!(
            source = %source.full_name,
            source_url = %source.html_url,
            target = %target.full_name,
            target_url = %target.html_url,
            "Migrating repository"
        );

        let mut session = Session::new(source, target, &self.user_mapping, &self.settings);
        if let Some(params) = repo_update(session.source(), session.target()) {
            info!(repo = %session.target().full_name, "Updating repository description");
            self.target.update(&params).await?;
            session.summary.repo_updated = true;
        }
        Ok(session)
    }
}

fn repo_update(source: &Repo, target: &Repo) -> Option<UpdateRepoParams> {
    let description = source.description.as_deref().unwrap_or_default();
    let homepage = source.homepage.as_deref().unwrap_or_default();
    if description == target.description.as_deref().unwrap_or_default()
        && homepage == target.homepage.as_deref().unwrap_or_default()
    {
        return None;
    }
    Some(UpdateRepoParams {
        name: target.name.clone(),
        description: description.to_string(),
        homepage: homepage.to_string(),
        private: target.private,
    })
}
