//! Label operation status types.

use serde::Serialize;

/// What happened to the label on one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelStatus {
    /// A new label was created.
    Created,

    /// An existing label was renamed or edited.
    Updated {
        /// Name of the label before the edit.
        old_name: String,
    },

    /// Nothing was changed.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },
}

/// Label status of a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelResult {
    /// Repository key in `"<org>/<repo>"` format.
    pub repository: String,

    /// What happened.
    pub status: LabelStatus,
}
