//! Repository-scoped view of the API.
//!
//! The migrator talks to both sides through [`Repository`], which keeps the
//! orchestration independent of HTTP and lets tests substitute an in-memory
//! repository.

mod remote;

#[cfg(test)]
pub(crate) mod memory;

pub use remote::GitHubRepo;

use crate::github::models::{
    Comment, Commit, CreateProjectParams, Event, Hook, HookParams, Import, ImportResult, Issue,
    Label, LabelParams, Milestone, MilestoneParams, Project, ProjectCard, ProjectCardParams,
    ProjectColumn, ProjectColumnParams, PullReq, Repo, Review, ReviewComment,
    UpdateProjectParams, UpdateRepoParams, User,
};
use crate::github::{GitHubError, Items};
use async_trait::async_trait;

/// Operations on one `owner/name` repository.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Returns `owner/name`.
    fn path(&self) -> &str;

    async fn get(&self) -> Result<Repo, GitHubError>;
    async fn update(&self, params: &UpdateRepoParams) -> Result<Repo, GitHubError>;

    /// Lists members of the owning organisation.
    fn list_members(&self) -> Items<User>;

    fn list_labels(&self) -> Items<Label>;
    async fn create_label(&self, params: &LabelParams) -> Result<Label, GitHubError>;
    async fn update_label(&self, name: &str, params: &LabelParams) -> Result<Label, GitHubError>;

    /// Lists issues and pull requests of every state in ascending number order.
    fn list_issues(&self) -> Items<Issue>;
    async fn get_issue(&self, number: u64) -> Result<Issue, GitHubError>;
    fn list_comments(&self, number: u64) -> Items<Comment>;
    fn list_events(&self, number: u64) -> Items<Event>;

    async fn get_pull_req(&self, number: u64) -> Result<PullReq, GitHubError>;
    fn list_pull_req_commits(&self, number: u64) -> Items<Commit>;
    fn list_reviews(&self, number: u64) -> Items<Review>;
    fn list_review_comments(&self, number: u64) -> Items<ReviewComment>;
    /// Returns the unified diff between two commits.
    async fn get_compare(&self, base: &str, head: &str) -> Result<String, GitHubError>;
    /// Returns the unified diff of a single commit.
    async fn get_commit_diff(&self, sha: &str) -> Result<String, GitHubError>;

    fn list_milestones(&self) -> Items<Milestone>;
    async fn create_milestone(&self, params: &MilestoneParams) -> Result<Milestone, GitHubError>;
    async fn update_milestone(
        &self,
        number: u64,
        params: &MilestoneParams,
    ) -> Result<Milestone, GitHubError>;
    async fn delete_milestone(&self, number: u64) -> Result<(), GitHubError>;

    fn list_projects(&self) -> Items<Project>;
    async fn get_project(&self, id: u64) -> Result<Project, GitHubError>;
    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, GitHubError>;
    async fn update_project(
        &self,
        id: u64,
        params: &UpdateProjectParams,
    ) -> Result<Project, GitHubError>;
    fn list_project_columns(&self, project_id: u64) -> Items<ProjectColumn>;
    async fn create_project_column(
        &self,
        project_id: u64,
        params: &ProjectColumnParams,
    ) -> Result<ProjectColumn, GitHubError>;
    fn list_project_cards(&self, column_id: u64) -> Items<ProjectCard>;
    async fn create_project_card(
        &self,
        column_id: u64,
        params: &ProjectCardParams,
    ) -> Result<ProjectCard, GitHubError>;

    fn list_hooks(&self) -> Items<Hook>;
    async fn create_hook(&self, params: &HookParams) -> Result<Hook, GitHubError>;
    async fn update_hook(&self, id: u64, params: &HookParams) -> Result<Hook, GitHubError>;

    /// Submits an issue import.
    async fn import(&self, import: &Import) -> Result<ImportResult, GitHubError>;
    /// Fetches the status of a submitted import.
    async fn get_import(&self, id: u64) -> Result<ImportResult, GitHubError>;
}
