//! Renders a source issue and its history into a single import payload.
//!
//! The builder is pure: everything it needs from the target repository is
//! resolved up front into a [`BuildContext`].

mod diff;
mod error;
mod events;
mod html;

pub use diff::{escape_fences, truncate_diff, SECTION_LIMIT, TOO_LARGE, TOTAL_LIMIT};
pub use error::BuildError;
pub use events::{group_events, EventCategory};

use crate::github::models::{
    Comment, Commit, Event, EventKind, Import, ImportComment, ImportIssue, Issue, IssueState,
    Milestone, PullReq, Repo, Review, ReviewComment, ReviewState, User, GHOST_LOGIN,
};
use crate::migrator::filter::CommentFilters;
use chrono::TimeDelta;
use html::{build_details, build_table, escape, plural, short_sha};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use url::Url;

const AVATAR_WIDTH: u32 = 35;
const COMMIT_AVATAR_WIDTH: u32 = 16;

/// A project as linked from timeline narrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLink {
    pub name: String,
    pub html_url: String,
}

/// Target-side knowledge shared by every issue of a run.
pub struct BuildContext {
    pub source: Repo,
    pub target: Repo,
    pub filters: CommentFilters,
    /// Logins that exist on the target: its members and its owner.
    pub identities: HashSet<String>,
    /// Source project ID to the project linked from narrations.
    pub projects: HashMap<u64, ProjectLink>,
    /// Target milestones by title.
    pub milestones: HashMap<String, Milestone>,
    pub group_window: TimeDelta,
}

impl BuildContext {
    #[must_use]
    pub fn new(source: Repo, target: Repo, filters: CommentFilters) -> Self {
        let owner = target.owner().to_string();
        Self {
            source,
            target,
            filters,
            identities: HashSet::from([owner]),
            projects: HashMap::new(),
            milestones: HashMap::new(),
            group_window: TimeDelta::seconds(10),
        }
    }

    /// Adds target identities.
    #[must_use]
    pub fn with_identities<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identities.extend(logins.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_milestones(mut self, milestones: impl IntoIterator<Item = Milestone>) -> Self {
        self.milestones = milestones
            .into_iter()
            .map(|milestone| (milestone.title.clone(), milestone))
            .collect();
        self
    }

    #[must_use]
    pub fn with_project(mut self, id: u64, link: ProjectLink) -> Self {
        self.projects.insert(id, link);
        self
    }

    #[must_use]
    pub fn with_group_window(mut self, window: Duration) -> Self {
        self.group_window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
        self
    }
}

/// A source issue with everything fetched for it.
#[derive(Debug, Clone)]
pub struct IssueBundle {
    pub issue: Issue,
    pub pull_req: Option<PullReq>,
    pub comments: Vec<Comment>,
    pub events: Vec<Event>,
    pub commits: Vec<Commit>,
    /// Unified diff between base and head, if available.
    pub diff: Option<String>,
    pub reviews: Vec<Review>,
    pub review_comments: Vec<ReviewComment>,
}

impl IssueBundle {
    #[must_use]
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            pull_req: None,
            comments: Vec::new(),
            events: Vec::new(),
            commits: Vec::new(),
            diff: None,
            reviews: Vec::new(),
            review_comments: Vec::new(),
        }
    }
}

/// Builds the import payload for one issue.
///
/// Comments are emitted as issue comments, event groups, reviews, review
/// threads and finally the closing comment; the target orders them by their
/// timestamps.
///
/// # Errors
///
/// Returns [`BuildError`] if the timeline holds an unknown event kind, an
/// unresolved project, or if pull request details are missing.
pub fn build_import(ctx: &BuildContext, bundle: &IssueBundle) -> Result<Import, BuildError> {
    Builder::new(ctx, bundle)?.build()
}

pub(crate) struct Builder<'a> {
    ctx: &'a BuildContext,
    bundle: &'a IssueBundle,
    avatar_base: String,
}

impl<'a> Builder<'a> {
    fn new(ctx: &'a BuildContext, bundle: &'a IssueBundle) -> Result<Self, BuildError> {
        if bundle.issue.is_pull_request() && bundle.pull_req.is_none() {
            return Err(BuildError::MissingPullRequest {
                number: bundle.issue.number,
            });
        }
        let avatar_base = Url::parse(&ctx.target.html_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| "https://github.com".to_string());
        Ok(Self {
            ctx,
            bundle,
            avatar_base,
        })
    }

    fn build(&self) -> Result<Import, BuildError> {
        let issue = &self.bundle.issue;
        let (narrated, mut closing): (Vec<&Event>, Vec<&Event>) = self
            .bundle
            .events
            .iter()
            .partition(|event| !self.is_final_closing(event));
        closing.sort_by_key(|event| event.created_at);

        let mut comments = self.issue_comments();
        comments.extend(self.event_comments(&narrated)?);
        comments.extend(self.review_comments());
        comments.extend(self.review_threads());
        comments.extend(self.closing_comment(&closing)?);

        let import_issue = ImportIssue {
            title: issue.title.clone(),
            body: self.body(),
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            closed: issue.state == IssueState::Closed,
            closed_at: issue.closed_at,
            labels: issue.labels.iter().map(|label| label.name.clone()).collect(),
            assignee: issue
                .assignee
                .as_ref()
                .map(|user| self.ctx.filters.apply(&user.login))
                .filter(|login| self.ctx.identities.contains(login)),
            milestone: issue
                .milestone
                .as_ref()
                .and_then(|milestone| self.ctx.milestones.get(&milestone.title))
                .map(|milestone| milestone.number),
        };
        Ok(Import {
            issue: import_issue,
            comments,
        })
    }

    /// Returns true for close and merge events told by the closing comment.
    ///
    /// That is every one of them after the last reopen of a closed issue.
    fn is_final_closing(&self, event: &Event) -> bool {
        if self.bundle.issue.state != IssueState::Closed {
            return false;
        }
        if !matches!(event.kind, EventKind::Closed { .. } | EventKind::Merged { .. }) {
            return false;
        }
        let last_reopen = self
            .bundle
            .events
            .iter()
            .filter(|candidate| matches!(candidate.kind, EventKind::Reopened))
            .map(|candidate| candidate.created_at)
            .max();
        last_reopen.is_none_or(|reopened| event.created_at >= reopened)
    }

    fn body(&self) -> String {
        let issue = &self.bundle.issue;
        let mut action = format!("created the original {}<br>\n", issue.kind());
        if let Some(pr) = &self.bundle.pull_req {
            action.push_str(&format!(
                "{} {}<br>\n",
                self.compare_link(&pr.base.sha, &pr.head.sha),
                refs(pr)
            ));
        }
        action.push_str(&format!(
            "imported from <a href=\"{}\">{}#{}</a>",
            issue.html_url, self.ctx.source.full_name, issue.number
        ));

        let mut rows = vec![vec![
            self.image_tag(&issue.user, AVATAR_WIDTH),
            format!("@{} {action}", self.ctx.filters.apply(&issue.user.login)),
        ]];
        if let Some(pr) = &self.bundle.pull_req {
            if let Some(diff) = self.bundle.diff.as_deref().filter(|diff| !diff.is_empty()) {
                rows.push(vec![diff_details(pr, diff)]);
            }
            if !self.bundle.commits.is_empty() {
                rows.push(vec![self.commit_details(pr)]);
            }
        }
        self.append_text(build_table(2, &rows), issue.body.as_deref().unwrap_or_default())
    }

    fn commit_details(&self, pr: &PullReq) -> String {
        let rows: Vec<Vec<String>> = self
            .bundle
            .commits
            .iter()
            .map(|commit| {
                let committer = User::new(commit.committer_login());
                let date = commit
                    .committed_at()
                    .map(|at| at.format(" on %b %-d, %Y").to_string())
                    .unwrap_or_default();
                vec![format!(
                    "{}<br>\n{} @{} committed{date} <a href=\"{}\">{}</a>",
                    escape(&commit.commit.message),
                    self.image_tag(&committer, COMMIT_AVATAR_WIDTH),
                    self.ctx.filters.apply(&committer.login),
                    self.ctx.filters.apply(&commit.html_url),
                    short_sha(&commit.sha)
                )]
            })
            .collect();
        build_details("", &plural(pr.commits, "commit"), &build_table(1, &rows))
    }

    fn issue_comments(&self) -> Vec<ImportComment> {
        self.bundle
            .comments
            .iter()
            .map(|comment| ImportComment {
                body: self.user_action_body(&comment.user, "commented", &comment.body),
                created_at: comment.created_at,
            })
            .collect()
    }

    fn review_comments(&self) -> Vec<ImportComment> {
        self.bundle
            .reviews
            .iter()
            .filter_map(|review| {
                let action = match review.state {
                    ReviewState::Approved => "approved",
                    ReviewState::ChangesRequested => "requested changes",
                    _ => return None,
                };
                Some(ImportComment {
                    body: self.user_action_body(
                        &review.user,
                        action,
                        review.body.as_deref().unwrap_or_default(),
                    ),
                    created_at: review.submitted_at.unwrap_or(self.bundle.issue.updated_at),
                })
            })
            .collect()
    }

    /// Folds each review comment thread into one comment on its root.
    fn review_threads(&self) -> Vec<ImportComment> {
        let mut threads: Vec<ImportComment> = Vec::new();
        let mut thread_of: HashMap<u64, usize> = HashMap::new();
        for comment in &self.bundle.review_comments {
            let reply = self.user_action_body(&comment.user, "commented", &comment.body);
            let root = comment
                .in_reply_to_id
                .and_then(|id| thread_of.get(&id).copied());
            if let Some(index) = root {
                thread_of.insert(comment.id, index);
                threads[index].body.push_str("\n\n");
                threads[index].body.push_str(&reply);
                continue;
            }
            thread_of.insert(comment.id, threads.len());
            threads.push(ImportComment {
                body: format!(
                    "```diff\n# {}\n{}\n```\n\n{reply}",
                    comment.path, comment.diff_hunk
                ),
                created_at: comment.created_at,
            });
        }
        threads
    }

    fn closing_comment(&self, closing: &[&Event]) -> Result<Option<ImportComment>, BuildError> {
        let issue = &self.bundle.issue;
        if issue.state != IssueState::Closed {
            return Ok(None);
        }
        let last_actor = |merged: bool| {
            closing
                .iter()
                .rev()
                .find(|event| matches!(event.kind, EventKind::Merged { .. }) == merged)
                .map(|event| &event.actor)
        };

        let (user, action, created_at) = match self.bundle.pull_req.as_ref().filter(|pr| pr.merged)
        {
            Some(pr) => (
                pr.merged_by.as_ref().or_else(|| last_actor(true)),
                self.merged_phrase(pr.merge_commit_sha.as_deref())?,
                pr.merged_at.or(issue.closed_at).unwrap_or(issue.updated_at),
            ),
            None => (
                issue.closed_by.as_ref().or_else(|| last_actor(false)),
                self.closed_phrase().to_string(),
                issue.closed_at.unwrap_or(issue.updated_at),
            ),
        };
        let ghost = User::ghost();
        Ok(Some(ImportComment {
            body: self.user_action_body(user.unwrap_or(&ghost), &action, ""),
            created_at,
        }))
    }

    fn closed_phrase(&self) -> &'static str {
        if self.bundle.issue.is_pull_request() {
            "closed the pull request without merging"
        } else {
            "closed the issue"
        }
    }

    fn merged_phrase(&self, commit_id: Option<&str>) -> Result<String, BuildError> {
        let pr = self.pull_req()?;
        let mut phrase = "merged the pull request<br>\n".to_string();
        if let Some(sha) = commit_id.or(pr.merge_commit_sha.as_deref()) {
            phrase.push_str(&format!("commit {} ", self.commit_link(sha)));
        }
        phrase.push_str(&refs(pr));
        Ok(phrase)
    }

    fn pull_req(&self) -> Result<&PullReq, BuildError> {
        self.bundle
            .pull_req
            .as_ref()
            .ok_or(BuildError::MissingPullRequest {
                number: self.bundle.issue.number,
            })
    }

    /// An avatar and `@login action` row, followed by the filtered text.
    fn user_action_body(&self, user: &User, action: &str, text: &str) -> String {
        let table = build_table(
            2,
            &[vec![
                self.image_tag(user, AVATAR_WIDTH),
                format!("@{} {action}", self.ctx.filters.apply(&user.login)),
            ]],
        );
        self.append_text(table, text)
    }

    fn append_text(&self, mut body: String, text: &str) -> String {
        if !text.is_empty() {
            body.push_str("\n\n");
            body.push_str(&self.ctx.filters.apply(text));
        }
        body
    }

    /// Avatar of `user` on the target host; unknown identities show the ghost.
    fn image_tag(&self, user: &User, width: u32) -> String {
        let login = self.ctx.filters.apply(&user.login);
        let login = if self.ctx.identities.contains(&login) {
            login.as_str()
        } else {
            GHOST_LOGIN
        };
        format!(
            "<img src=\"{}/{login}.png\" width=\"{width}\">",
            self.avatar_base
        )
    }

    fn commit_link(&self, sha: &str) -> String {
        format!(
            "<a href=\"{}/commit/{sha}\">{}</a>",
            self.ctx.target.html_url,
            short_sha(sha)
        )
    }

    fn compare_link(&self, base: &str, head: &str) -> String {
        format!(
            "<a href=\"{}/compare/{base}...{head}\">{}...{}</a>",
            self.ctx.target.html_url,
            short_sha(base),
            short_sha(head)
        )
    }
}

fn refs(pr: &PullReq) -> String {
    format!(
        "into <code>{}</code> from <code>{}</code>",
        escape(&pr.base.ref_name),
        escape(&pr.head.ref_name)
    )
}

fn diff_details(pr: &PullReq, diff: &str) -> String {
    let mut summary = format!("{} changed", plural(pr.changed_files, "file"));
    if pr.additions > 0 {
        summary.push_str(&format!(", {}(+)", plural(pr.additions, "insertion")));
    }
    if pr.deletions > 0 {
        summary.push_str(&format!(", {}(-)", plural(pr.deletions, "deletion")));
    }
    let mut diff = escape_fences(&truncate_diff(diff));
    if !diff.ends_with('\n') {
        diff.push('\n');
    }
    build_details("  ", &summary, &format!("\n```diff\n{diff}```\n"))
}
