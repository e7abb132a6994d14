//! Runner configuration.

use crate::config::{ClientContext, TrackerSettings};
use chrono::{DateTime, Utc};

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// Organization owning the repositories.
    org: String,
    /// Branch checked for already released pull requests.
    release_branch: String,
    /// Repositories to scan instead of the whole organization.
    repo_names: Vec<String>,
    /// Earliest push, merge and commit time in scope.
    start_date: DateTime<Utc>,
    /// Exclusion lists and protection rule.
    settings: TrackerSettings,
}

impl RunnerConfig {
    /// Creates a configuration covering the whole organization with default settings.
    pub fn new(
        token: String,
        org: String,
        release_branch: String,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            org,
            release_branch,
            repo_names: Vec::new(),
            start_date,
            settings: TrackerSettings::default(),
        }
    }

    /// Restricts the run to the named repositories.
    pub fn with_repo_names(mut self, repo_names: Vec<String>) -> Self {
        self.repo_names = repo_names;
        self
    }

    /// Replaces the default settings.
    pub fn with_settings(mut self, settings: TrackerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the organization name.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Returns the release branch name.
    pub fn release_branch(&self) -> &str {
        &self.release_branch
    }

    /// Returns the explicitly requested repositories.
    pub fn repo_names(&self) -> &[String] {
        &self.repo_names
    }

    /// Returns the start date.
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the settings.
    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Builds the context shared by the pipeline stages.
    pub fn client_context(&self) -> ClientContext {
        ClientContext::new(
            self.org.clone(),
            self.release_branch.clone(),
            self.repo_names.clone(),
            self.start_date,
            &self.settings,
        )
    }
}
