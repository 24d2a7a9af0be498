//! [`Repository`] implementation over the REST API.

use super::Repository;
use crate::github::models::{
    Comment, Commit, CreateProjectParams, Event, Hook, HookParams, Import, ImportResult, Issue,
    Label, LabelParams, Milestone, MilestoneParams, Project, ProjectCard, ProjectCardParams,
    ProjectColumn, ProjectColumnParams, PullReq, Repo, Review, ReviewComment,
    UpdateProjectParams, UpdateRepoParams, User,
};
use crate::github::path::{encode_segment, with_query};
use crate::github::{ApiClient, GitHubError, Items};
use async_trait::async_trait;
use std::sync::Arc;

const PER_PAGE: (&str, &str) = ("per_page", "100");

/// A repository reached through an [`ApiClient`].
pub struct GitHubRepo {
    client: Arc<ApiClient>,
    path: String,
}

impl GitHubRepo {
    /// Binds `path` (`owner/name`) to `client`.
    pub fn new(client: Arc<ApiClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}{}", self.path, suffix)
    }

    fn owner(&self) -> &str {
        self.path.split('/').next().unwrap_or(&self.path)
    }

    fn list_all<T>(&self, path: &str, params: &[(&str, &str)]) -> Items<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let mut query = params.to_vec();
        query.push(PER_PAGE);
        self.client.list(&with_query(path, &query))
    }
}

#[async_trait]
impl Repository for GitHubRepo {
    fn path(&self) -> &str {
        &self.path
    }

    async fn get(&self) -> Result<Repo, GitHubError> {
        self.client.get(&self.repo_path("")).await
    }

    async fn update(&self, params: &UpdateRepoParams) -> Result<Repo, GitHubError> {
        self.client.patch(&self.repo_path(""), params).await
    }

    fn list_members(&self) -> Items<User> {
        self.list_all(&format!("/orgs/{}/members", self.owner()), &[])
    }

    fn list_labels(&self) -> Items<Label> {
        self.list_all(&self.repo_path("/labels"), &[])
    }

    async fn create_label(&self, params: &LabelParams) -> Result<Label, GitHubError> {
        self.client.post(&self.repo_path("/labels"), params).await
    }

    async fn update_label(&self, name: &str, params: &LabelParams) -> Result<Label, GitHubError> {
        let path = self.repo_path(&format!("/labels/{}", encode_segment(name)));
        self.client.patch(&path, params).await
    }

    fn list_issues(&self) -> Items<Issue> {
        self.list_all(
            &self.repo_path("/issues"),
            &[("filter", "all"), ("state", "all"), ("direction", "asc")],
        )
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, GitHubError> {
        self.client
            .get(&self.repo_path(&format!("/issues/{number}")))
            .await
    }

    fn list_comments(&self, number: u64) -> Items<Comment> {
        self.list_all(&self.repo_path(&format!("/issues/{number}/comments")), &[])
    }

    fn list_events(&self, number: u64) -> Items<Event> {
        self.list_all(&self.repo_path(&format!("/issues/{number}/events")), &[])
    }

    async fn get_pull_req(&self, number: u64) -> Result<PullReq, GitHubError> {
        self.client
            .get(&self.repo_path(&format!("/pulls/{number}")))
            .await
    }

    fn list_pull_req_commits(&self, number: u64) -> Items<Commit> {
        self.list_all(&self.repo_path(&format!("/pulls/{number}/commits")), &[])
    }

    fn list_reviews(&self, number: u64) -> Items<Review> {
        self.list_all(&self.repo_path(&format!("/pulls/{number}/reviews")), &[])
    }

    fn list_review_comments(&self, number: u64) -> Items<ReviewComment> {
        self.list_all(&self.repo_path(&format!("/pulls/{number}/comments")), &[])
    }

    async fn get_compare(&self, base: &str, head: &str) -> Result<String, GitHubError> {
        self.client
            .get_diff(&self.repo_path(&format!("/compare/{base}...{head}")))
            .await
    }

    async fn get_commit_diff(&self, sha: &str) -> Result<String, GitHubError> {
        self.client
            .get_diff(&self.repo_path(&format!("/commits/{sha}")))
            .await
    }

    fn list_milestones(&self) -> Items<Milestone> {
        self.list_all(&self.repo_path("/milestones"), &[("state", "all")])
    }

    async fn create_milestone(&self, params: &MilestoneParams) -> Result<Milestone, GitHubError> {
        self.client.post(&self.repo_path("/milestones"), params).await
    }

    async fn update_milestone(
        &self,
        number: u64,
        params: &MilestoneParams,
    ) -> Result<Milestone, GitHubError> {
        self.client
            .patch(&self.repo_path(&format!("/milestones/{number}")), params)
            .await
    }

    async fn delete_milestone(&self, number: u64) -> Result<(), GitHubError> {
        self.client
            .delete(&self.repo_path(&format!("/milestones/{number}")))
            .await
    }

    fn list_projects(&self) -> Items<Project> {
        self.list_all(&self.repo_path("/projects"), &[("state", "all")])
    }

    async fn get_project(&self, id: u64) -> Result<Project, GitHubError> {
        self.client.get(&format!("/projects/{id}")).await
    }

    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, GitHubError> {
        self.client.post(&self.repo_path("/projects"), params).await
    }

    async fn update_project(
        &self,
        id: u64,
        params: &UpdateProjectParams,
    ) -> Result<Project, GitHubError> {
        self.client.patch(&format!("/projects/{id}"), params).await
    }

    fn list_project_columns(&self, project_id: u64) -> Items<ProjectColumn> {
        self.list_all(&format!("/projects/{project_id}/columns"), &[])
    }

    async fn create_project_column(
        &self,
        project_id: u64,
        params: &ProjectColumnParams,
    ) -> Result<ProjectColumn, GitHubError> {
        self.client
            .post(&format!("/projects/{project_id}/columns"), params)
            .await
    }

    fn list_project_cards(&self, column_id: u64) -> Items<ProjectCard> {
        self.list_all(&format!("/projects/columns/{column_id}/cards"), &[])
    }

    async fn create_project_card(
        &self,
        column_id: u64,
        params: &ProjectCardParams,
    ) -> Result<ProjectCard, GitHubError> {
        self.client
            .post(&format!("/projects/columns/{column_id}/cards"), params)
            .await
    }

    fn list_hooks(&self) -> Items<Hook> {
        self.list_all(&self.repo_path("/hooks"), &[])
    }

    async fn create_hook(&self, params: &HookParams) -> Result<Hook, GitHubError> {
        self.client.post(&self.repo_path("/hooks"), params).await
    }

    async fn update_hook(&self, id: u64, params: &HookParams) -> Result<Hook, GitHubError> {
        self.client
            .patch(&self.repo_path(&format!("/hooks/{id}")), params)
            .await
    }

    async fn import(&self, import: &Import) -> Result<ImportResult, GitHubError> {
        self.client
            .post(&self.repo_path("/import/issues"), import)
            .await
    }

    async fn get_import(&self, id: u64) -> Result<ImportResult, GitHubError> {
        self.client
            .get(&self.repo_path(&format!("/import/issues/{id}")))
            .await
    }
}
