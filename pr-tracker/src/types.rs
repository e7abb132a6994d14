//! Domain types shared by the pipeline stages.
//!
//! These are deliberately narrow: each stage only consumes a handful of
//! attributes from the GitHub models, so the GitHub client converts into
//! these types at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pull requests grouped by `"<org>/<repo>"`, in discovery order per repository.
pub type PrMap = BTreeMap<String, Vec<PullRequest>>;

/// Repositories that carry the release branch, keyed by `"<org>/<repo>"`.
pub type ReleaseRepoMap = BTreeMap<String, Repository>;

/// Builds the `"<org>/<repo>"` key used by [`PrMap`] and [`ReleaseRepoMap`].
#[must_use]
pub fn repo_key(org: &str, repo: &str) -> String {
    format!("{org}/{repo}")
}

/// A repository within the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Repository name, unique within the organization.
    pub name: String,

    /// Whether the repository is archived.
    pub archived: bool,

    /// Whether the repository is private.
    pub private: bool,

    /// Time of the last push to any branch, if GitHub reported one.
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A pull request as consumed by the collector and reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Pull request number, unique within its repository.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Merge time. `None` means the pull request was closed without merging.
    pub merged_at: Option<DateTime<Utc>>,

    /// Link to the pull request on github.com.
    pub html_url: String,
}

/// A commit on a branch. Only the message is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
}

/// A branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
}

/// An issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,

    /// Hex color without the leading `#`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An existing branch protection rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchProtection {
    /// API URL of the protection resource.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_repo_key() {
        assert_eq!(repo_key("Acme", "widgets"), "Acme/widgets");
    }

    #[test]
    fn label_omits_unset_fields() {
        let label = Label {
            name: "bug".to_string(),
            color: None,
            description: None,
        };

        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "bug" }));
    }
}
