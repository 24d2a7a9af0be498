use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::LabelParams;
use tracing::{debug, info};

impl Migrator {
    /// Creates missing labels and updates those whose color or description differ.
    pub(super) async fn migrate_labels(&self, session: &mut Session) -> Result<(), MigrateError> {
        let source_labels = self.source.list_labels().collect_all().await?;
        let target_labels = self.target.list_labels().collect_all().await?;

        for label in &source_labels {
            let params = LabelParams::from(label);
            match target_labels.iter().find(|target| target.name == label.name) {
                Some(existing)
                    if existing.color == label.color
                        && existing.description == label.description =>
                {
                    debug!(label = %label.name, "Label is up to date");
                }
                Some(_) => {
                    info!(label = %label.name, "Updating label");
                    self.target.update_label(&label.name, &params).await?;
                    session.summary.labels_updated += 1;
                }
                None => {
                    info!(label = %label.name, "Creating label");
                    self.target.create_label(&params).await?;
                    session.summary.labels_created += 1;
                }
            }
        }
        Ok(())
    }
}
