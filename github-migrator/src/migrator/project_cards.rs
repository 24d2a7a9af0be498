use super::projects::disabled_as_none;
use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::{Project, ProjectCard, ProjectCardParams, ProjectColumn};
use tracing::{debug, info};

impl Migrator {
    /// Recreates project cards once every issue exists on the target.
    pub(super) async fn migrate_project_cards(
        &self,
        session: &mut Session,
    ) -> Result<(), MigrateError> {
        let Some(source_projects) = disabled_as_none(self.source.list_projects().collect_all().await)?
        else {
            return Ok(());
        };
        if source_projects.is_empty() {
            return Ok(());
        }
        let Some(target_projects) =
            disabled_as_none(self.target.list_projects().collect_all().await)?
        else {
            return Ok(());
        };

        for project in &source_projects {
            let target = target_projects
                .iter()
                .find(|target| target.name == project.name)
                .ok_or_else(|| MigrateError::ProjectNotFound {
                    name: project.name.clone(),
                })?;
            self.migrate_project_board(session, project, target).await?;
        }
        Ok(())
    }

    async fn migrate_project_board(
        &self,
        session: &mut Session,
        source: &Project,
        target: &Project,
    ) -> Result<(), MigrateError> {
        info!(project = %source.name, "Migrating project cards");
        let source_columns = self.source.list_project_columns(source.id).collect_all().await?;
        let target_columns = self.target.list_project_columns(target.id).collect_all().await?;

        for column in &source_columns {
            let target_column = target_columns
                .iter()
                .find(|target| target.name == column.name)
                .ok_or_else(|| MigrateError::ProjectColumnNotFound {
                    name: column.name.clone(),
                })?;
            self.migrate_column_cards(session, column, target_column)
                .await?;
        }
        Ok(())
    }

    async fn migrate_column_cards(
        &self,
        session: &mut Session,
        source: &ProjectColumn,
        target: &ProjectColumn,
    ) -> Result<(), MigrateError> {
        let mut source_cards = self.source.list_project_cards(source.id).collect_all().await?;
        let target_cards = self.target.list_project_cards(target.id).collect_all().await?;
        // Cards are listed top first; creating bottom first keeps the order.
        source_cards.reverse();

        for card in &source_cards {
            if target_cards.iter().any(|existing| same_card(card, existing)) {
                debug!(column = %source.name, card = card.id, "Project card exists");
                session.summary.cards_skipped += 1;
                continue;
            }

            let params = match card.issue_number() {
                Some(number) => ProjectCardParams::Content {
                    content_id: self.target_issue_id(session, number).await?,
                    content_type: "Issue".to_string(),
                },
                None => ProjectCardParams::Note {
                    note: card.note.clone().unwrap_or_default(),
                },
            };
            info!(column = %source.name, card = card.id, "Creating project card");
            self.target.create_project_card(target.id, &params).await?;
            session.summary.cards_created += 1;
        }
        Ok(())
    }

    async fn target_issue_id(&self, session: &mut Session, number: u64) -> Result<u64, MigrateError> {
        if let Some(id) = session.issue_ids.get(&number) {
            return Ok(*id);
        }
        let issue = self.target.get_issue(number).await?;
        session.issue_ids.insert(number, issue.id);
        Ok(issue.id)
    }
}

/// Cards match on their note text or on the issue they point at.
fn same_card(source: &ProjectCard, target: &ProjectCard) -> bool {
    if let Some(note) = source.note_text() {
        if target.note_text() == Some(note) {
            return true;
        }
    }
    source.issue_number().is_some() && source.issue_number() == target.issue_number()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u64, note: Option<&str>, issue: Option<u64>) -> ProjectCard {
        ProjectCard {
            id,
            note: note.map(str::to_string),
            archived: false,
            content_url: issue.map(|n| format!("https://api.github.com/repos/a/b/issues/{n}")),
        }
    }

    #[test]
    fn test_same_card() {
        assert!(same_card(&card(1, Some("todo"), None), &card(2, Some("todo"), None)));
        assert!(same_card(&card(1, None, Some(4)), &card(2, None, Some(4))));
        assert!(!same_card(&card(1, None, Some(4)), &card(2, None, Some(5))));
        // two notes without text never match
        assert!(!same_card(&card(1, Some(""), None), &card(2, Some(""), None)));
        assert!(!same_card(&card(1, None, None), &card(2, None, None)));
    }
}
