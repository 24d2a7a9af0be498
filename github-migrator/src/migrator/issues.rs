use super::builder::{build_import, IssueBundle};
use super::session::Session;
use super::{MigrateError, Migrator};
use crate::github::models::{Import, ImportIssue, ImportStatus, Issue, PullReq};
use crate::github::{GitHubError, Items};
use crate::templates::{TemplateRenderer, DELETED_ISSUE_TITLE};
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{debug, info, info_span, warn, Instrument};

/// Target issues read on demand while probing for numbers.
///
/// The target lists issues in ascending number order, so reading stops as
/// soon as a number above the one asked for shows up.
pub(crate) struct TargetIssues {
    source: Items<Issue>,
    seen: Vec<Issue>,
    exhausted: bool,
}

impl TargetIssues {
    pub fn new(source: Items<Issue>) -> Self {
        Self {
            source,
            seen: Vec::new(),
            exhausted: false,
        }
    }

    /// Returns the target issue numbered `number`, if it exists.
    pub async fn get(&mut self, number: u64) -> Result<Option<&Issue>, GitHubError> {
        if let Some(index) = self.seen.iter().position(|issue| issue.number == number) {
            return Ok(Some(&self.seen[index]));
        }
        while !self.exhausted {
            let Some(issue) = self.source.next().await else {
                self.exhausted = true;
                break;
            };
            let issue = issue?;
            let found = issue.number.cmp(&number);
            self.seen.push(issue);
            match found {
                std::cmp::Ordering::Equal => return Ok(self.seen.last()),
                std::cmp::Ordering::Greater => return Ok(None),
                std::cmp::Ordering::Less => {}
            }
        }
        Ok(None)
    }
}

impl Migrator {
    /// Imports every source issue in number order.
    pub(super) async fn migrate_issues(
        &self,
        session: &mut Session,
        renderer: &TemplateRenderer,
    ) -> Result<(), MigrateError> {
        self.load_identities(session).await?;

        let mut source_issues = self.source.list_issues();
        let mut target_issues = TargetIssues::new(self.target.list_issues());
        let mut last_number = 0;

        while let Some(issue) = source_issues.next().await {
            let issue = issue?;
            if issue.number <= last_number {
                warn!(issue = %issue.html_url, last = last_number, "Skipping out of order issue");
                continue;
            }
            for number in last_number + 1..issue.number {
                let url = format!("{}/issues/{number}", session.source().html_url);
                self.migrate_deleted_issue(session, &mut target_issues, renderer, number, &issue)
                    .instrument(info_span!("issue", number))
                    .await
                    .map_err(|err| err.for_issue(&url))?;
            }
            self.migrate_issue(session, &mut target_issues, &issue)
                .instrument(info_span!("issue", number = issue.number))
                .await
                .map_err(|err| err.for_issue(&issue.html_url))?;
            last_number = issue.number;
        }
        Ok(())
    }

    /// Merges target members into the identities avatars and assignees may use.
    async fn load_identities(&self, session: &mut Session) -> Result<(), MigrateError> {
        if session.identities_loaded {
            return Ok(());
        }
        match self.target.list_members().collect_all().await {
            Ok(members) => {
                debug!(count = members.len(), "Loaded target members");
                session
                    .context
                    .identities
                    .extend(members.into_iter().map(|member| member.login));
            }
            Err(err) if err.is_not_found() => {
                debug!(repo = self.target.path(), "Target owner is not an organisation");
            }
            Err(err) => return Err(err.into()),
        }
        session.identities_loaded = true;
        Ok(())
    }

    /// Returns true, caching its ID, if the target already has `number`.
    async fn already_migrated(
        &self,
        session: &mut Session,
        target_issues: &mut TargetIssues,
        number: u64,
    ) -> Result<bool, MigrateError> {
        match target_issues.get(number).await? {
            Some(existing) => {
                info!(issue = %existing.html_url, "Skipping issue that already exists");
                session.issue_ids.insert(existing.number, existing.id);
                session.summary.issues_skipped += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn migrate_issue(
        &self,
        session: &mut Session,
        target_issues: &mut TargetIssues,
        issue: &Issue,
    ) -> Result<(), MigrateError> {
        info!(issue = %issue.html_url, "Migrating issue");
        if self
            .already_migrated(session, target_issues, issue.number)
            .await?
        {
            return Ok(());
        }

        let bundle = self.fetch_bundle(session, issue).await?;
        let import = build_import(&session.context, &bundle)?;
        self.submit(&import, &issue.html_url).await?;
        session.summary.issues_imported += 1;
        Ok(())
    }

    /// Fills the gap left by a deleted source issue.
    ///
    /// Timestamps are taken from the next issue that still exists.
    async fn migrate_deleted_issue(
        &self,
        session: &mut Session,
        target_issues: &mut TargetIssues,
        renderer: &TemplateRenderer,
        number: u64,
        next: &Issue,
    ) -> Result<(), MigrateError> {
        let url = format!("{}/issues/{number}", session.source().html_url);
        info!(issue = %url, "Migrating deleted issue");
        if self.already_migrated(session, target_issues, number).await? {
            return Ok(());
        }

        let body = renderer.render_deleted_issue(&session.source().full_name, number, &url)?;
        let import = Import {
            issue: ImportIssue {
                title: DELETED_ISSUE_TITLE.to_string(),
                body,
                created_at: next.created_at,
                updated_at: next.created_at,
                closed: true,
                closed_at: Some(next.created_at),
                labels: Vec::new(),
                assignee: None,
                milestone: None,
            },
            comments: Vec::new(),
        };
        self.submit(&import, &url).await?;
        session.summary.issue_placeholders += 1;
        Ok(())
    }

    /// Fetches everything the builder renders for `issue`.
    async fn fetch_bundle(
        &self,
        session: &mut Session,
        issue: &Issue,
    ) -> Result<IssueBundle, MigrateError> {
        let mut bundle = IssueBundle::new(issue.clone());
        bundle.comments = self.source.list_comments(issue.number).collect_all().await?;
        bundle.events = self.source.list_events(issue.number).collect_all().await?;
        self.resolve_projects(session, &bundle).await?;

        if issue.is_pull_request() {
            let pull_req = self.source.get_pull_req(issue.number).await?;
            bundle.commits = self
                .source
                .list_pull_req_commits(issue.number)
                .collect_all()
                .await?;
            bundle.diff = self.fetch_diff(issue, &pull_req).await?;
            bundle.reviews = self.source.list_reviews(issue.number).collect_all().await?;
            bundle.review_comments = self
                .source
                .list_review_comments(issue.number)
                .collect_all()
                .await?;
            bundle.pull_req = Some(pull_req);
        }
        Ok(bundle)
    }

    /// Fetches the pull request diff, falling back to the merge commit when
    /// the compared refs are gone.
    async fn fetch_diff(
        &self,
        issue: &Issue,
        pull_req: &PullReq,
    ) -> Result<Option<String>, MigrateError> {
        let compare = self
            .source
            .get_compare(&pull_req.base.sha, &pull_req.head.sha)
            .await;
        let err = match compare {
            Ok(diff) => return Ok(Some(diff)),
            Err(err) if matches!(err.status(), Some(404 | 422)) => err,
            Err(err) => return Err(err.into()),
        };

        if let Some(sha) = pull_req.merge_commit_sha.as_deref().filter(|_| pull_req.merged) {
            match self.source.get_commit_diff(sha).await {
                Ok(diff) => {
                    debug!(issue = %issue.html_url, sha, "Using merge commit diff");
                    return Ok(Some(diff));
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err.into()),
            }
        }
        warn!(issue = %issue.html_url, error = %err, "Compare diff unavailable");
        Ok(None)
    }

    /// Looks up projects referenced by events that are not known yet.
    async fn resolve_projects(
        &self,
        session: &mut Session,
        bundle: &IssueBundle,
    ) -> Result<(), MigrateError> {
        let missing: HashSet<u64> = bundle
            .events
            .iter()
            .filter_map(|event| event.kind.project_card())
            .map(|card| card.project_id)
            .filter(|id| !session.context.projects.contains_key(id))
            .collect();
        for id in missing {
            debug!(project = id, "Resolving project");
            let project = self.source.get_project(id).await?;
            let link = session.link_project(&project);
            session.context.projects.insert(id, link);
        }
        Ok(())
    }

    /// Submits an import and waits for the target to process it.
    async fn submit(&self, import: &Import, url: &str) -> Result<(), MigrateError> {
        sleep(self.settings.import_throttle()).await;
        info!(issue = %url, "Creating issue");
        let result = self.target.import(import).await?;
        self.wait_import(result.id, url).await
    }

    /// Polls an import until it settles.
    ///
    /// The first three polls wait the configured interval; each later one
    /// waits twice as long as the previous.
    async fn wait_import(&self, id: u64, url: &str) -> Result<(), MigrateError> {
        let attempts = self.settings.import.poll_max_attempts;
        let mut delay = self.settings.poll_interval();
        for attempt in 1..=attempts {
            sleep(delay).await;
            if attempt > 2 {
                delay = delay.saturating_mul(2);
            }
            let result = self.target.get_import(id).await?;
            match result.status {
                ImportStatus::Imported => {
                    info!(issue = %url, status = "imported", "Checked import status");
                    return Ok(());
                }
                ImportStatus::Failed => {
                    warn!(issue = %url, status = "failed", "Checked import status");
                    return Err(MigrateError::ImportFailed {
                        url: url.to_string(),
                        errors: result.errors,
                    });
                }
                ImportStatus::Pending => {
                    debug!(issue = %url, attempt, status = "pending", "Checked import status");
                }
            }
        }
        Err(MigrateError::ImportTimedOut {
            url: url.to_string(),
            attempts,
        })
    }
}
