//! Run configuration.
//!
//! This module resolves everything a run needs before the first remote call:
//! the cutoff date, the release branch, the token and the optional settings
//! file. Any failure here is fatal.

pub mod defaults;
mod error;
mod settings;
mod token;

pub use error::ConfigError;
pub use settings::{ProtectionSettings, TrackerSettings};
pub use token::{fallback_token_path, resolve_token, validate_token, TOKEN_ENV};

use bstr::ByteSlice;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parses a `YYYY-MM-DD` start date into midnight UTC of that day.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedDate`] if the value is not a valid date.
pub fn parse_start_date(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ConfigError::MalformedDate {
            value: value.to_string(),
            source: e,
        }
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Checks that the release branch is a valid git branch name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBranchName`] otherwise.
pub fn validate_release_branch(name: &str) -> Result<(), ConfigError> {
    gix_validate::reference::name_partial(name.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidBranchName {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// Immutable inputs shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Organization owning the repositories.
    org: String,
    /// Branch checked for already released pull requests.
    release_branch: String,
    /// Repositories to scan instead of the whole organization.
    repo_names: Vec<String>,
    /// Earliest push, merge and commit time in scope.
    cutoff: DateTime<Utc>,
    /// Repository names skipped when listing the organization.
    excluded_repositories: Vec<String>,
    /// Title fragments of pull requests that are not reported.
    excluded_pr_titles: Vec<String>,
}

impl ClientContext {
    /// Creates a context using the exclusion lists from `settings`.
    pub fn new(
        org: impl Into<String>,
        release_branch: impl Into<String>,
        repo_names: Vec<String>,
        cutoff: DateTime<Utc>,
        settings: &TrackerSettings,
    ) -> Self {
        Self {
            org: org.into(),
            release_branch: release_branch.into(),
            repo_names,
            cutoff,
            excluded_repositories: settings.excluded_repositories.clone(),
            excluded_pr_titles: settings.excluded_pr_titles.clone(),
        }
    }

    /// Replaces the cutoff timestamp.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Returns the organization name.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Returns the release branch name.
    pub fn release_branch(&self) -> &str {
        &self.release_branch
    }

    /// Returns the explicitly requested repositories, empty for the whole organization.
    pub fn repo_names(&self) -> &[String] {
        &self.repo_names
    }

    /// Returns the cutoff timestamp.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Returns true if the repository is excluded by name.
    pub fn is_excluded_repository(&self, name: &str) -> bool {
        self.excluded_repositories.iter().any(|excluded| excluded == name)
    }

    /// Returns true if the title contains an excluded fragment (case-sensitive).
    pub fn is_excluded_title(&self, title: &str) -> bool {
        self.excluded_pr_titles
            .iter()
            .any(|excluded| title.contains(excluded.as_str()))
    }
}
