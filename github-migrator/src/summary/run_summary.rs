//! Run summary types.

/// Counts of what a migration changed on the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Whether the target description or homepage was updated.
    pub repo_updated: bool,

    pub labels_created: usize,
    pub labels_updated: usize,

    pub projects_created: usize,
    pub projects_updated: usize,
    pub columns_created: usize,

    pub milestones_created: usize,
    pub milestones_updated: usize,

    /// Milestones created and deleted again to keep numbers aligned.
    pub milestone_placeholders: usize,

    /// Number of issues and pull requests imported.
    pub issues_imported: usize,

    /// Number of issues already present on the target.
    pub issues_skipped: usize,

    /// Number of `[Deleted issue]` imports filling numbering gaps.
    pub issue_placeholders: usize,

    pub cards_created: usize,
    pub cards_skipped: usize,

    pub hooks_created: usize,
    pub hooks_updated: usize,
}

impl MigrationSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of writes made to the target.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        usize::from(self.repo_updated)
            + self.labels_created
            + self.labels_updated
            + self.projects_created
            + self.projects_updated
            + self.columns_created
            + self.milestones_created
            + self.milestones_updated
            + self.milestone_placeholders
            + self.issues_imported
            + self.issue_placeholders
            + self.cards_created
            + self.hooks_created
            + self.hooks_updated
    }

    /// Returns true if the target was already up to date.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.total_changes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_changes() {
        let mut summary = MigrationSummary::new();
        assert!(summary.is_noop());

        summary.repo_updated = true;
        summary.issues_imported = 3;
        summary.issue_placeholders = 2;
        summary.issues_skipped = 10;
        summary.cards_skipped = 4;

        assert_eq!(summary.total_changes(), 6);
        assert!(!summary.is_noop());
    }
}
