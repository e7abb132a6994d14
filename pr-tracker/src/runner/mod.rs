//! Orchestrates the pull request pipeline and the administrative commands.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::config::ClientContext;
use crate::discovery::gather_repositories;
use crate::github::{GitHubApi, OctocrabApi};
use crate::labels::{create_label_on_repositories, LabelData};
use crate::outcome::Outcome;
use crate::protections::update_branch_rules;
use crate::pull_requests::gather_merged_prs;
use crate::rate_limit::log_core_rate_limit;
use crate::reconcile::filter_matching_commits_on_branch;
use crate::release_branch::gather_release_repositories;
use crate::summary::RunSummary;
use crate::types::{repo_key, PrMap, Repository};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Values a stage can come back with, for deciding whether a partial result
/// is still worth continuing with.
trait StageValue {
    fn is_empty(&self) -> bool;
}

impl<T> StageValue for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> StageValue for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

/// Applies the partial result policy to a stage outcome.
///
/// Failures are logged. A partial result that still holds something is
/// passed on; one that holds nothing ends the run.
fn accept_partial<T: StageValue>(stage: &'static str, outcome: Outcome<T>) -> Result<T, RunnerError> {
    let (value, failures) = outcome.into_parts();
    if failures.is_empty() {
        return Ok(value);
    }

    for failure in &failures {
        error!(stage, subject = %failure.subject, error = %failure.error, "Item failed");
    }

    if value.is_empty() {
        return Err(RunnerError::Stage {
            stage,
            failures: failures.len(),
        });
    }

    warn!(stage, failures = failures.len(), "Continuing with partial results");
    Ok(value)
}

/// Runs the commands against a GitHub API.
pub struct Runner {
    config: RunnerConfig,
    api: Box<dyn GitHubApi>,
}

impl Runner {
    /// Builds a runner talking to github.com.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = OctocrabApi::new(config.token())?;
        Ok(Self::with_api(config, api))
    }

    /// Builds a runner on top of any [`GitHubApi`].
    pub fn with_api(config: RunnerConfig, api: impl GitHubApi + 'static) -> Self {
        Self {
            config,
            api: Box::new(api),
        }
    }

    /// Lists pull requests merged since the start date.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if repositories cannot be listed or a stage
    /// yields nothing but failures.
    pub async fn all_prs(&self) -> Result<PrMap, RunnerError> {
        let ctx = self.start().await;
        let repos = self.repositories(&ctx).await?;

        let prs = gather_merged_prs(self.api.as_ref(), &ctx, &repos).await;
        accept_partial("pull request collection", prs)
    }

    /// Lists pull requests merged since the start date that are not on the
    /// release branch.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if repositories cannot be listed or a stage
    /// yields nothing but failures.
    pub async fn unmerged_prs(&self) -> Result<PrMap, RunnerError> {
        let ctx = self.start().await;
        let repos = self.repositories(&ctx).await?;

        let release_repos = gather_release_repositories(self.api.as_ref(), &ctx, &repos).await;
        let release_repos = accept_partial("release branch detection", release_repos)?;

        let prs = gather_merged_prs(self.api.as_ref(), &ctx, &repos).await;
        let prs = accept_partial("pull request collection", prs)?;

        let unreleased =
            filter_matching_commits_on_branch(self.api.as_ref(), &ctx, prs, &release_repos).await;
        accept_partial("release branch reconciliation", unreleased)
    }

    /// Protects the release branch of every eligible repository.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the organization repositories cannot be listed.
    pub async fn add_protections(&self) -> Result<RunSummary, RunnerError> {
        let ctx = self.start().await;
        let outcome =
            update_branch_rules(self.api.as_ref(), &ctx, &self.config.settings().protection)
                .await?;

        let (protected, failures) = outcome.into_parts();
        let mut summary = RunSummary::new();
        for repo in &protected {
            let key = repo_key(ctx.org(), &repo.name);
            info!(branch = %ctx.release_branch(), repo = %key, "Added branch protection rule");
            summary.protected.push(key);
        }
        summary.failed = failures.into_iter().map(|f| f.subject).collect();
        Ok(summary)
    }

    /// Creates or updates a label on every repository.
    ///
    /// Repositories are not bounded by their last push; every active
    /// repository of the organization is labelled.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the label request is invalid or the
    /// repositories cannot be listed.
    pub async fn add_label(&self, data: LabelData) -> Result<RunSummary, RunnerError> {
        let data = data.validated()?;
        let ctx = self
            .announce(self.config.client_context().with_cutoff(DateTime::<Utc>::MIN_UTC))
            .await;
        let repos = self.repositories(&ctx).await?;

        let outcome = create_label_on_repositories(self.api.as_ref(), &ctx, &repos, data).await?;
        let (results, failures) = outcome.into_parts();

        let mut summary = RunSummary::new();
        for result in &results {
            summary.record_label(result);
        }
        summary.failed = failures.into_iter().map(|f| f.subject).collect();
        Ok(summary)
    }

    /// Builds the stage context from the configuration and announces it.
    async fn start(&self) -> ClientContext {
        self.announce(self.config.client_context()).await
    }

    /// Logs the run parameters and quota.
    async fn announce(&self, ctx: ClientContext) -> ClientContext {
        info!(org = %ctx.org(), "Organization");
        info!(branch = %ctx.release_branch(), "Release branch");
        if !ctx.repo_names().is_empty() {
            info!(repos = ?ctx.repo_names(), "Specific repositories");
        }
        if ctx.cutoff() > DateTime::<Utc>::MIN_UTC {
            info!(date = %ctx.cutoff().to_rfc3339(), "Pull requests after");
        }

        log_core_rate_limit(self.api.as_ref()).await;
        ctx
    }

    async fn repositories(&self, ctx: &ClientContext) -> Result<Vec<Repository>, RunnerError> {
        let repos = gather_repositories(self.api.as_ref(), ctx).await?;
        accept_partial("repository discovery", repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::ApiError;
    use crate::outcome::Failure;

    fn failure() -> Failure {
        Failure::new(
            "Acme/widgets",
            ApiError::NotFound {
                resource: "Acme/widgets".to_string(),
            },
        )
    }

    #[test]
    fn passes_complete_results_through() {
        let value = accept_partial("test", Outcome::Complete(Vec::<u32>::new())).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn continues_with_non_empty_partial_results() {
        let value = accept_partial("test", Outcome::from_parts(vec![1], vec![failure()])).unwrap();
        assert_eq!(value, vec![1]);
    }

    #[test]
    fn aborts_on_empty_partial_results() {
        let result = accept_partial("test", Outcome::from_parts(Vec::<u32>::new(), vec![failure()]));
        assert!(matches!(
            result,
            Err(RunnerError::Stage {
                stage: "test",
                failures: 1
            })
        ));
    }
}
