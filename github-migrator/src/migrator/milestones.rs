use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::{Milestone, MilestoneParams, MilestoneState};
use crate::templates::DELETED_MILESTONE_TITLE;
use tracing::{debug, info};

impl Migrator {
    /// Syncs milestones by title while keeping their numbers aligned.
    ///
    /// Numbers missing on the source are burnt on the target by creating and
    /// deleting a placeholder, so that the next creation lands on the right
    /// number.
    pub(super) async fn migrate_milestones(&self, session: &mut Session) -> Result<(), MigrateError> {
        let mut source_milestones = self.source.list_milestones().collect_all().await?;
        source_milestones.sort_by_key(|milestone| milestone.number);
        let target_milestones = self.target.list_milestones().collect_all().await?;
        let mut largest = target_milestones
            .iter()
            .map(|milestone| milestone.number)
            .max()
            .unwrap_or(0);

        for milestone in &source_milestones {
            info!(milestone = %milestone.title, "Migrating milestone");
            while milestone.number > largest + 1 {
                let placeholder = self
                    .target
                    .create_milestone(&MilestoneParams {
                        title: DELETED_MILESTONE_TITLE.to_string(),
                        description: None,
                        state: MilestoneState::Closed,
                        due_on: None,
                    })
                    .await?;
                debug!(number = placeholder.number, "Burnt milestone number");
                largest = largest.max(placeholder.number);
                self.target.delete_milestone(placeholder.number).await?;
                session.summary.milestone_placeholders += 1;
            }

            let params = MilestoneParams::from(milestone);
            match target_milestones
                .iter()
                .find(|target| target.title == milestone.title)
            {
                Some(target) if differs(milestone, target) => {
                    info!(milestone = %milestone.title, "Updating milestone");
                    self.target.update_milestone(target.number, &params).await?;
                    session.summary.milestones_updated += 1;
                }
                Some(_) => debug!(milestone = %milestone.title, "Milestone is up to date"),
                None => {
                    info!(milestone = %milestone.title, "Creating milestone");
                    let created = self.target.create_milestone(&params).await?;
                    largest = largest.max(created.number);
                    session.summary.milestones_created += 1;
                }
            }
        }

        let milestones = self.target.list_milestones().collect_all().await?;
        session.context.milestones = milestones
            .into_iter()
            .map(|milestone| (milestone.title.clone(), milestone))
            .collect();
        Ok(())
    }
}

/// Compares the synced fields; due dates only by calendar day.
fn differs(source: &Milestone, target: &Milestone) -> bool {
    source.description.as_deref().unwrap_or_default()
        != target.description.as_deref().unwrap_or_default()
        || source.state != target.state
        || source.due_on.map(|due| due.date_naive()) != target.due_on.map(|due| due.date_naive())
}
