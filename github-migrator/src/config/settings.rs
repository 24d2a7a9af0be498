//! Tunable timings and heuristics.

use super::ConfigError;
use crate::github::RetryPolicy;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings read from an optional TOML file.
///
/// ```toml
/// [retry]
/// max-attempts = 7
/// base-delay-secs = 60
/// max-delay-secs = 600
///
/// [import]
/// throttle-millis = 1000
/// poll-interval-millis = 3000
/// poll-max-attempts = 10
///
/// [events]
/// group-window-secs = 10
///
/// [projects]
/// column-pause-millis = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    pub retry: RetrySettings,
    pub import: ImportSettings,
    pub events: EventSettings,
    pub projects: ProjectSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Attempts per request, the first one included.
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_secs: policy.base_delay.as_secs(),
            max_delay_secs: policy.max_delay.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ImportSettings {
    /// Pause before every import submission.
    pub throttle_millis: u64,
    /// Wait before the first status poll.
    pub poll_interval_millis: u64,
    pub poll_max_attempts: u32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            throttle_millis: 1000,
            poll_interval_millis: 3000,
            poll_max_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct EventSettings {
    /// Maximum distance between events merged into one comment.
    pub group_window_secs: u64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            group_window_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Pause after creating each project column.
    pub column_pause_millis: u64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            column_pause_millis: 100,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, does not parse, or
    /// holds invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses settings from TOML text; `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text does not parse or holds invalid
    /// values.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: origin.to_string(),
            source: e,
        })?;
        settings.validate(origin)?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first problem.
    pub fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::ValidationError {
                path: origin.to_string(),
                message: message.to_string(),
            })
        };

        if self.retry.max_attempts == 0 {
            return invalid("retry.max-attempts must be at least 1");
        }
        if self.retry.max_delay_secs < self.retry.base_delay_secs {
            return invalid("retry.max-delay-secs must not be lower than retry.base-delay-secs");
        }
        if self.import.poll_max_attempts == 0 {
            return invalid("import.poll-max-attempts must be at least 1");
        }
        Ok(())
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_secs(self.retry.base_delay_secs),
            max_delay: Duration::from_secs(self.retry.max_delay_secs),
        }
    }

    #[must_use]
    pub fn import_throttle(&self) -> Duration {
        Duration::from_millis(self.import.throttle_millis)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.import.poll_interval_millis)
    }

    #[must_use]
    pub fn group_window(&self) -> Duration {
        Duration::from_secs(self.events.group_window_secs)
    }

    #[must_use]
    pub fn column_pause(&self) -> Duration {
        Duration::from_millis(self.projects.column_pause_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.import_throttle(), Duration::from_secs(1));
        assert_eq!(settings.poll_interval(), Duration::from_secs(3));
        assert_eq!(settings.import.poll_max_attempts, 10);
        assert_eq!(settings.group_window(), Duration::from_secs(10));
        assert_eq!(settings.column_pause(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
[events]
group-window-secs = 30

[import]
throttle-millis = 0
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.group_window(), Duration::from_secs(30));
        assert_eq!(settings.import_throttle(), Duration::ZERO);
        assert_eq!(settings.import.poll_max_attempts, 10);
        assert_eq!(settings.retry, RetrySettings::default());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = Settings::parse("[retry]\nattempts = 3\n", "inline");

        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let result = Settings::parse(
            "[retry]\nbase-delay-secs = 60\nmax-delay-secs = 10\n",
            "inline",
        );

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();

        let result = Settings::load(&temp.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
