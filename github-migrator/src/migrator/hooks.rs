use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::HookParams;
use tracing::{debug, info};

impl Migrator {
    /// Syncs webhooks, matched by name and payload URL.
    pub(super) async fn migrate_hooks(&self, session: &mut Session) -> Result<(), MigrateError> {
        let source_hooks = self.source.list_hooks().collect_all().await?;
        let target_hooks = self.target.list_hooks().collect_all().await?;

        for hook in &source_hooks {
            let url = hook.config.url.as_deref().unwrap_or_default();
            let params = HookParams::from(hook);
            let existing = target_hooks
                .iter()
                .find(|target| target.name == hook.name && target.config.url == hook.config.url);
            match existing {
                Some(target)
                    if target.active == hook.active
                        && target.events == hook.events
                        && target.config == hook.config =>
                {
                    debug!(hook = url, "Hook is up to date");
                }
                Some(target) => {
                    info!(hook = url, "Updating hook");
                    self.target.update_hook(target.id, &params).await?;
                    session.summary.hooks_updated += 1;
                }
                None => {
                    info!(hook = url, "Creating hook");
                    self.target.create_hook(&params).await?;
                    session.summary.hooks_created += 1;
                }
            }
        }
        Ok(())
    }
}
