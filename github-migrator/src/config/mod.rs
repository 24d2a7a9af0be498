//! Configuration.
//!
//! Credentials and repository names arrive through the CLI; the heuristic
//! timings and windows live in an optional TOML [`Settings`] file.

mod error;
mod settings;
mod user_mapping;

pub use error::ConfigError;
pub use settings::{EventSettings, ImportSettings, ProjectSettings, RetrySettings, Settings};
pub use user_mapping::UserMapping;

/// Splits and validates an `owner/name` repository path.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] unless `path` has exactly two
/// non-empty segments.
pub fn parse_repo_path(path: &str) -> Result<(&str, &str), ConfigError> {
    match path.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(ConfigError::ValidationError {
            path: path.to_string(),
            message: "expected a repository in `owner/name` form".to_string(),
        }),
    }
}
