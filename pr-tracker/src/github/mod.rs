//! The GitHub collaborator.
//!
//! Every remote call the tool makes goes through [`GitHubApi`], so the
//! pipeline can run against [`OctocrabApi`] in production and against an
//! in-memory implementation in tests. Listing calls are page-based; use
//! [`pages`] to walk them.

mod error;
mod octocrab_api;
mod pagination;

pub use error::ApiError;
pub use octocrab_api::OctocrabApi;
pub use pagination::{collect_pages, pages};

use crate::protections::ProtectionRule;
use crate::rate_limit::RateLimitInfo;
use crate::types::{Branch, BranchProtection, Commit, Label, PullRequest, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in API order.
    pub items: Vec<T>,

    /// Number of the following page, or `None` if this was the last one.
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// Creates the final page of a listing.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Remote operations consumed from GitHub.
///
/// Page numbers are 1-based.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists all repositories (any type) of an organization.
    async fn list_org_repos(&self, org: &str, page: u32) -> Result<Page<Repository>, ApiError>;

    /// Fetches a single repository by name.
    async fn get_repo(&self, org: &str, repo: &str) -> Result<Repository, ApiError>;

    /// Lists the branches of a repository.
    async fn list_branches(
        &self,
        org: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<Branch>, ApiError>;

    /// Lists closed pull requests, most recently updated first.
    async fn list_closed_pulls(
        &self,
        org: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<PullRequest>, ApiError>;

    /// Lists commits reachable from `branch` that were made at or after `since`.
    async fn list_commits_since(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        since: DateTime<Utc>,
        page: u32,
    ) -> Result<Page<Commit>, ApiError>;

    /// Fetches the protection of a branch. `None` if the branch is unprotected.
    async fn get_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, ApiError>;

    /// Replaces the protection of a branch.
    async fn update_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        rule: &ProtectionRule,
    ) -> Result<BranchProtection, ApiError>;

    /// Fetches a label by name. `None` if the repository has no such label.
    async fn get_label(&self, org: &str, repo: &str, name: &str)
        -> Result<Option<Label>, ApiError>;

    /// Creates a label.
    async fn create_label(&self, org: &str, repo: &str, label: &Label) -> Result<Label, ApiError>;

    /// Edits the label currently named `current_name`.
    async fn edit_label(
        &self,
        org: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> Result<Label, ApiError>;

    /// Reads the core API rate limit.
    async fn core_rate_limit(&self) -> Result<RateLimitInfo, ApiError>;
}
