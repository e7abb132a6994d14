//! Run summary types.

use crate::labels::{LabelResult, LabelStatus};

/// Summary of an `add-protections` or `add-label` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories that received a branch protection rule.
    pub protected: Vec<String>,

    /// Number of labels created.
    pub labels_created: usize,

    /// Number of labels renamed or edited.
    pub labels_updated: usize,

    /// Number of repositories left unchanged.
    pub labels_skipped: usize,

    /// Repositories that failed, in `"<org>/<repo>"` format.
    pub failed: Vec<String>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a label result.
    pub fn record_label(&mut self, result: &LabelResult) {
        match result.status {
            LabelStatus::Created => self.labels_created += 1,
            LabelStatus::Updated { .. } => self.labels_updated += 1,
            LabelStatus::Skipped { .. } => self.labels_skipped += 1,
        }
    }

    /// Returns true if any repository failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
