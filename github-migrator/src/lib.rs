#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod github;
pub mod migrator;
pub mod rate_limit;
pub mod repo;
pub mod runner;
pub mod summary;
pub mod templates;

pub use config::{parse_repo_path, ConfigError, Settings, UserMapping};
pub use github::{ApiClient, GitHubError, Items, RetryPolicy};
pub use migrator::builder::{build_import, BuildContext, BuildError, IssueBundle};
pub use migrator::{MigrateError, Migrator};
pub use rate_limit::{wait_if_needed, RateLimitInfo};
pub use repo::{GitHubRepo, Repository};
pub use runner::{ApiConfig, Runner, RunnerConfig, RunnerError};
pub use summary::MigrationSummary;
pub use templates::{TemplateError, TemplateRenderer};
