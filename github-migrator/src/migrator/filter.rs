//! Rewrites applied to user-authored text before it reaches the target.

use crate::config::UserMapping;
use crate::github::models::Repo;
use regex::{NoExpand, Regex};
use url::Url;

/// A pure text rewrite.
pub trait CommentFilter: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

/// Filters applied in insertion order.
#[derive(Default)]
pub struct CommentFilters {
    filters: Vec<Box<dyn CommentFilter>>,
}

impl CommentFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard chain: repository URLs first, then logins.
    #[must_use]
    pub fn for_repos(source: &Repo, target: &Repo, mapping: &UserMapping) -> Self {
        Self::new()
            .with(RepoUrlFilter::new(source, target))
            .with(UserMappingFilter::new(mapping))
    }

    #[must_use]
    pub fn with(mut self, filter: impl CommentFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Runs `text` through every filter.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.filters
            .iter()
            .fold(text.to_string(), |text, filter| filter.apply(&text))
    }
}

/// Points links at the target repository.
///
/// When the two repositories live on different hosts, images still served by
/// the source host are additionally wrapped in a link to the original.
pub struct RepoUrlFilter {
    source_url: String,
    target_url: String,
    image_patterns: Vec<Regex>,
}

impl RepoUrlFilter {
    #[must_use]
    pub fn new(source: &Repo, target: &Repo) -> Self {
        Self {
            source_url: source.html_url.clone(),
            target_url: target.html_url.clone(),
            image_patterns: image_patterns(&source.html_url, &target.html_url),
        }
    }
}

fn image_patterns(source_url: &str, target_url: &str) -> Vec<Regex> {
    let (Ok(source), Ok(target)) = (Url::parse(source_url), Url::parse(target_url)) else {
        return Vec::new();
    };
    if source.scheme() == target.scheme() && source.host_str() == target.host_str() {
        return Vec::new();
    }
    let Some(host) = source.host_str() else {
        return Vec::new();
    };
    let url = format!(
        r#"{}://{}[^"<>()\s]+"#,
        regex::escape(source.scheme()),
        regex::escape(host)
    );
    [
        format!(r"(?i)!\[[^\]]*\]\(({url})\)"),
        format!(r#"(?i)<img [^<>]*\bsrc="({url})"[^<>]*>"#),
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

impl CommentFilter for RepoUrlFilter {
    fn apply(&self, text: &str) -> String {
        let mut text = text.replace(&self.source_url, &self.target_url);
        for pattern in &self.image_patterns {
            text = pattern
                .replace_all(&text, r#"<a href="$1">$0</a>"#)
                .into_owned();
        }
        text
    }
}

/// Replaces mapped logins on word boundaries.
pub struct UserMappingFilter {
    rules: Vec<(Regex, String)>,
}

impl UserMappingFilter {
    #[must_use]
    pub fn new(mapping: &UserMapping) -> Self {
        let rules = mapping
            .iter()
            .filter_map(|(from, to)| {
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(from))).ok()?;
                Some((pattern, to.to_string()))
            })
            .collect();
        Self { rules }
    }
}

impl CommentFilter for UserMappingFilter {
    fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |text, (pattern, to)| {
                pattern.replace_all(&text, NoExpand(to)).into_owned()
            })
    }
}
