//! Serde models for the GitHub REST resources the migrator reads and writes.

mod comment;
mod event;
mod hook;
mod import;
mod issue;
mod label;
mod milestone;
mod project;
mod repo;
mod user;

pub use comment::{Comment, Review, ReviewComment, ReviewState};
pub use event::{
    DismissedReview, Event, EventKind, EventLabel, EventProjectCard, Rename, Reviewer, Team,
    IGNORED_KINDS,
};
pub use hook::{Hook, HookConfig, HookParams};
pub use import::{
    Import, ImportComment, ImportError, ImportIssue, ImportResult, ImportStatus,
};
pub use issue::{
    Commit, CommitDetail, CommitSignature, Issue, IssueState, MilestoneRef, PullReq, PullReqRef,
    PullRequestMarker,
};
pub use label::{Label, LabelParams};
pub use milestone::{Milestone, MilestoneParams, MilestoneState};
pub use project::{
    CreateProjectParams, Project, ProjectCard, ProjectCardParams, ProjectColumn,
    ProjectColumnParams, ProjectState, UpdateProjectParams,
};
pub use repo::{Repo, UpdateRepoParams};
pub use user::{User, GHOST_LOGIN};
