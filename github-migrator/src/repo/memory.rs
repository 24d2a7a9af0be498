//! In-memory [`Repository`] for exercising the migrator without HTTP.

use super::Repository;
use crate::github::models::{
    Comment, Commit, CreateProjectParams, Event, Hook, HookParams, Import, ImportError,
    ImportResult, ImportStatus, Issue, IssueState, Label, LabelParams, Milestone,
    MilestoneParams, MilestoneState, Project, ProjectCard, ProjectCardParams, ProjectColumn,
    ProjectColumnParams, ProjectState, PullReq, Repo, Review, ReviewComment, UpdateProjectParams,
    UpdateRepoParams, User,
};
use crate::github::{GitHubError, Items};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Everything a [`MemoryRepository`] holds, plus a record of the writes.
#[derive(Default)]
pub(crate) struct MemoryState {
    pub repo: Option<Repo>,
    pub repo_updates: Vec<UpdateRepoParams>,
    /// `None` answers 404, as for a user owned repository.
    pub members: Option<Vec<User>>,
    pub labels: Vec<Label>,
    pub issues: Vec<Issue>,
    pub comments: HashMap<u64, Vec<Comment>>,
    pub events: HashMap<u64, Vec<Event>>,
    pub pull_reqs: HashMap<u64, PullReq>,
    pub commits: HashMap<u64, Vec<Commit>>,
    pub reviews: HashMap<u64, Vec<Review>>,
    pub review_comments: HashMap<u64, Vec<ReviewComment>>,
    /// Diffs keyed by `(base, head)`; anything else answers 404.
    pub compares: HashMap<(String, String), String>,
    /// Commit diffs keyed by SHA.
    pub commit_diffs: HashMap<String, String>,
    pub milestones: Vec<Milestone>,
    pub deleted_milestones: Vec<u64>,
    /// `None` answers as a repository with projects disabled.
    pub projects: Option<Vec<Project>>,
    /// Projects reachable by ID only, such as organisation projects.
    pub foreign_projects: Vec<Project>,
    pub columns: HashMap<u64, Vec<ProjectColumn>>,
    pub cards: HashMap<u64, Vec<ProjectCard>>,
    pub created_cards: Vec<(u64, ProjectCardParams)>,
    pub hooks: Vec<Hook>,
    pub imports: Vec<Import>,
    /// Statuses returned by successive polls; empty means imported.
    pub import_statuses: VecDeque<ImportStatus>,
    pub import_polls: u32,
    /// Clock readings at each submit and each poll.
    pub import_times: Vec<Instant>,
    pub poll_times: Vec<Instant>,
    next_id: u64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        10_000 + self.next_id
    }

    fn html_url(&self) -> String {
        self.repo
            .as_ref()
            .map(|repo| repo.html_url.clone())
            .unwrap_or_default()
    }

    fn project_mut(&mut self, id: u64) -> Result<&mut Project, GitHubError> {
        self.projects
            .iter_mut()
            .flatten()
            .find(|project| project.id == id)
            .ok_or_else(not_found)
    }
}

pub(crate) struct MemoryRepository {
    path: String,
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new(repo: Repo) -> Self {
        Self {
            path: repo.full_name.clone(),
            state: Mutex::new(MemoryState {
                repo: Some(repo),
                projects: Some(Vec::new()),
                ..MemoryState::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }
}

fn not_found() -> GitHubError {
    GitHubError::Api {
        status: 404,
        message: "Not Found".to_string(),
        errors: Vec::new(),
    }
}

fn projects_disabled() -> GitHubError {
    GitHubError::Api {
        status: 410,
        message: "Projects are disabled for this repository".to_string(),
        errors: Vec::new(),
    }
}

fn listed<T: Clone>(items: Option<&Vec<T>>) -> Items<T> {
    Items::from_vec(items.cloned().unwrap_or_default())
}

#[async_trait]
impl Repository for MemoryRepository {
    fn path(&self) -> &str {
        &self.path
    }

    async fn get(&self) -> Result<Repo, GitHubError> {
        self.state().repo.clone().ok_or_else(not_found)
    }

    async fn update(&self, params: &UpdateRepoParams) -> Result<Repo, GitHubError> {
        let mut state = self.state();
        state.repo_updates.push(params.clone());
        let repo = state.repo.as_mut().ok_or_else(not_found)?;
        repo.description = Some(params.description.clone());
        repo.homepage = Some(params.homepage.clone());
        Ok(repo.clone())
    }

    fn list_members(&self) -> Items<User> {
        match &self.state().members {
            Some(members) => Items::from_vec(members.clone()),
            None => Items::from_error(not_found()),
        }
    }

    fn list_labels(&self) -> Items<Label> {
        Items::from_vec(self.state().labels.clone())
    }

    async fn create_label(&self, params: &LabelParams) -> Result<Label, GitHubError> {
        let mut state = self.state();
        let label = Label {
            id: state.next_id(),
            name: params.name.clone(),
            description: params.description.clone(),
            color: params.color.clone(),
            default: false,
        };
        state.labels.push(label.clone());
        Ok(label)
    }

    async fn update_label(&self, name: &str, params: &LabelParams) -> Result<Label, GitHubError> {
        let mut state = self.state();
        let label = state
            .labels
            .iter_mut()
            .find(|label| label.name == name)
            .ok_or_else(not_found)?;
        label.description = params.description.clone();
        label.color = params.color.clone();
        Ok(label.clone())
    }

    fn list_issues(&self) -> Items<Issue> {
        let mut issues = self.state().issues.clone();
        issues.sort_by_key(|issue| issue.number);
        Items::from_vec(issues)
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, GitHubError> {
        self.state()
            .issues
            .iter()
            .find(|issue| issue.number == number)
            .cloned()
            .ok_or_else(not_found)
    }

    fn list_comments(&self, number: u64) -> Items<Comment> {
        listed(self.state().comments.get(&number))
    }

    fn list_events(&self, number: u64) -> Items<Event> {
        listed(self.state().events.get(&number))
    }

    async fn get_pull_req(&self, number: u64) -> Result<PullReq, GitHubError> {
        self.state()
            .pull_reqs
            .get(&number)
            .cloned()
            .ok_or_else(not_found)
    }

    fn list_pull_req_commits(&self, number: u64) -> Items<Commit> {
        listed(self.state().commits.get(&number))
    }

    fn list_reviews(&self, number: u64) -> Items<Review> {
        listed(self.state().reviews.get(&number))
    }

    fn list_review_comments(&self, number: u64) -> Items<ReviewComment> {
        listed(self.state().review_comments.get(&number))
    }

    async fn get_compare(&self, base: &str, head: &str) -> Result<String, GitHubError> {
        self.state()
            .compares
            .get(&(base.to_string(), head.to_string()))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_commit_diff(&self, sha: &str) -> Result<String, GitHubError> {
        self.state()
            .commit_diffs
            .get(sha)
            .cloned()
            .ok_or_else(not_found)
    }

    fn list_milestones(&self) -> Items<Milestone> {
        Items::from_vec(self.state().milestones.clone())
    }

    async fn create_milestone(&self, params: &MilestoneParams) -> Result<Milestone, GitHubError> {
        let mut state = self.state();
        let number = state
            .milestones
            .iter()
            .map(|milestone| milestone.number)
            .chain(state.deleted_milestones.iter().copied())
            .max()
            .unwrap_or(0)
            + 1;
        let milestone = Milestone {
            id: state.next_id(),
            number,
            title: params.title.clone(),
            description: params.description.clone(),
            state: params.state,
            due_on: params.due_on,
            html_url: format!("{}/milestone/{number}", state.html_url()),
        };
        state.milestones.push(milestone.clone());
        Ok(milestone)
    }

    async fn update_milestone(
        &self,
        number: u64,
        params: &MilestoneParams,
    ) -> Result<Milestone, GitHubError> {
        let mut state = self.state();
        let milestone = state
            .milestones
            .iter_mut()
            .find(|milestone| milestone.number == number)
            .ok_or_else(not_found)?;
        milestone.title = params.title.clone();
        milestone.description = params.description.clone();
        milestone.state = params.state;
        milestone.due_on = params.due_on;
        Ok(milestone.clone())
    }

    async fn delete_milestone(&self, number: u64) -> Result<(), GitHubError> {
        let mut state = self.state();
        let before = state.milestones.len();
        state.milestones.retain(|milestone| milestone.number != number);
        if state.milestones.len() == before {
            return Err(not_found());
        }
        state.deleted_milestones.push(number);
        Ok(())
    }

    fn list_projects(&self) -> Items<Project> {
        match &self.state().projects {
            Some(projects) => Items::from_vec(projects.clone()),
            None => Items::from_error(projects_disabled()),
        }
    }

    async fn get_project(&self, id: u64) -> Result<Project, GitHubError> {
        let state = self.state();
        state
            .projects
            .iter()
            .flatten()
            .chain(&state.foreign_projects)
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_project(&self, params: &CreateProjectParams) -> Result<Project, GitHubError> {
        let mut state = self.state();
        let id = state.next_id();
        let html_url = state.html_url();
        let projects = state.projects.as_mut().ok_or_else(projects_disabled)?;
        let number = projects.len() as u64 + 1;
        let project = Project {
            id,
            name: params.name.clone(),
            body: Some(params.body.clone()),
            number,
            state: ProjectState::Open,
            html_url: format!("{html_url}/projects/{number}"),
        };
        projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: u64,
        params: &UpdateProjectParams,
    ) -> Result<Project, GitHubError> {
        let mut state = self.state();
        let project = state.project_mut(id)?;
        project.body = Some(params.body.clone());
        project.state = params.state;
        Ok(project.clone())
    }

    fn list_project_columns(&self, project_id: u64) -> Items<ProjectColumn> {
        listed(self.state().columns.get(&project_id))
    }

    async fn create_project_column(
        &self,
        project_id: u64,
        params: &ProjectColumnParams,
    ) -> Result<ProjectColumn, GitHubError> {
        let mut state = self.state();
        let column = ProjectColumn {
            id: state.next_id(),
            name: params.name.clone(),
        };
        state
            .columns
            .entry(project_id)
            .or_default()
            .push(column.clone());
        Ok(column)
    }

    fn list_project_cards(&self, column_id: u64) -> Items<ProjectCard> {
        listed(self.state().cards.get(&column_id))
    }

    async fn create_project_card(
        &self,
        column_id: u64,
        params: &ProjectCardParams,
    ) -> Result<ProjectCard, GitHubError> {
        let mut state = self.state();
        let (note, content_url) = match params {
            ProjectCardParams::Note { note } => (Some(note.clone()), None),
            ProjectCardParams::Content { content_id, .. } => {
                let number = state
                    .issues
                    .iter()
                    .find(|issue| issue.id == *content_id)
                    .map(|issue| issue.number)
                    .ok_or_else(not_found)?;
                let url = format!("https://api.github.com/repos/{}/issues/{number}", self.path);
                (None, Some(url))
            }
        };
        let card = ProjectCard {
            id: state.next_id(),
            note,
            archived: false,
            content_url,
        };
        state.created_cards.push((column_id, params.clone()));
        // the API puts new cards on top
        state.cards.entry(column_id).or_default().insert(0, card.clone());
        Ok(card)
    }

    fn list_hooks(&self) -> Items<Hook> {
        Items::from_vec(self.state().hooks.clone())
    }

    async fn create_hook(&self, params: &HookParams) -> Result<Hook, GitHubError> {
        let mut state = self.state();
        let hook = Hook {
            id: state.next_id(),
            name: params.name.clone(),
            active: params.active,
            events: params.events.clone(),
            config: params.config.clone(),
        };
        state.hooks.push(hook.clone());
        Ok(hook)
    }

    async fn update_hook(&self, id: u64, params: &HookParams) -> Result<Hook, GitHubError> {
        let mut state = self.state();
        let hook = state
            .hooks
            .iter_mut()
            .find(|hook| hook.id == id)
            .ok_or_else(not_found)?;
        hook.active = params.active;
        hook.events = params.events.clone();
        hook.config = params.config.clone();
        Ok(hook.clone())
    }

    async fn import(&self, import: &Import) -> Result<ImportResult, GitHubError> {
        let mut state = self.state();
        let number = state.issues.iter().map(|issue| issue.number).max().unwrap_or(0) + 1;
        let html_url = format!("{}/issues/{number}", state.html_url());
        let created = Issue {
            id: state.next_id(),
            title: import.issue.title.clone(),
            body: Some(import.issue.body.clone()),
            state: if import.issue.closed {
                IssueState::Closed
            } else {
                IssueState::Open
            },
            html_url,
            created_at: import.issue.created_at,
            updated_at: import.issue.updated_at,
            closed_at: import.issue.closed_at,
            ..issue(number, "")
        };
        state.issues.push(created);
        state.imports.push(import.clone());
        state.import_times.push(Instant::now());
        Ok(ImportResult {
            id: state.imports.len() as u64,
            status: ImportStatus::Pending,
            url: String::new(),
            import_issues_url: None,
            repository_url: None,
            issue_url: None,
            errors: Vec::new(),
        })
    }

    async fn get_import(&self, id: u64) -> Result<ImportResult, GitHubError> {
        let mut state = self.state();
        state.import_polls += 1;
        state.poll_times.push(Instant::now());
        let status = state
            .import_statuses
            .pop_front()
            .unwrap_or(ImportStatus::Imported);
        let errors = match status {
            ImportStatus::Failed => vec![ImportError {
                location: "/issue/assignee".to_string(),
                resource: "Issue".to_string(),
                field: "assignee".to_string(),
                value: None,
                code: "invalid".to_string(),
            }],
            _ => Vec::new(),
        };
        Ok(ImportResult {
            id,
            status,
            url: String::new(),
            import_issues_url: None,
            repository_url: None,
            issue_url: None,
            errors,
        })
    }
}

/// 2020-01-01 plus `days`.
pub(crate) fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + TimeDelta::days(days)
}

pub(crate) fn repo(full_name: &str) -> Repo {
    Repo {
        name: full_name
            .split_once('/')
            .map_or(full_name, |(_, name)| name)
            .to_string(),
        full_name: full_name.to_string(),
        description: None,
        homepage: None,
        html_url: format!("https://github.com/{full_name}"),
        private: false,
    }
}

pub(crate) fn user(login: &str) -> User {
    User {
        login: login.to_string(),
        html_url: format!("https://github.com/{login}"),
    }
}

pub(crate) fn issue(number: u64, title: &str) -> Issue {
    Issue {
        id: 100 + number,
        number,
        title: title.to_string(),
        body: None,
        state: IssueState::Open,
        user: user("alice"),
        assignee: None,
        labels: Vec::new(),
        milestone: None,
        html_url: format!("https://github.com/source/repo/issues/{number}"),
        created_at: day(number as i64),
        updated_at: day(number as i64),
        closed_at: None,
        closed_by: None,
        pull_request: None,
    }
}

pub(crate) fn comment(id: u64, login: &str, body: &str, at: DateTime<Utc>) -> Comment {
    Comment {
        id,
        body: body.to_string(),
        html_url: format!("https://github.com/source/repo/issues/1#issuecomment-{id}"),
        user: user(login),
        created_at: at,
        updated_at: None,
    }
}

pub(crate) fn project(id: u64, name: &str, html_url: &str) -> Project {
    Project {
        id,
        name: name.to_string(),
        body: None,
        number: id,
        state: ProjectState::Open,
        html_url: html_url.to_string(),
    }
}

pub(crate) fn milestone(number: u64, title: &str) -> Milestone {
    Milestone {
        id: number,
        number,
        title: title.to_string(),
        description: None,
        state: MilestoneState::Open,
        due_on: None,
        html_url: String::new(),
    }
}

pub(crate) fn label(name: &str, color: &str) -> Label {
    Label {
        id: 0,
        name: name.to_string(),
        description: None,
        color: color.to_string(),
        default: false,
    }
}
