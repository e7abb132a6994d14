//! Repository discovery.
//!
//! Produces the set of repositories the pipeline works on: either the
//! repositories named on the command line, or every active repository of the
//! organization.

use crate::config::ClientContext;
use crate::github::{pages, ApiError, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::types::{repo_key, Repository};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use std::pin::pin;
use tracing::{debug, error, info, info_span, Instrument};

/// Gathers the repositories to scan.
///
/// With explicit repository names each one is fetched on its own, and names
/// that cannot be fetched are reported as failures. Otherwise every
/// organization repository is listed and filtered with [`is_candidate`].
///
/// # Errors
///
/// Returns [`ApiError`] if a page of organization repositories cannot be
/// listed; nothing gathered so far is returned in that case.
pub async fn gather_repositories(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
) -> Result<Outcome<Vec<Repository>>, ApiError> {
    let span = info_span!("gather_repositories", org = %ctx.org());

    async {
        if !ctx.repo_names().is_empty() {
            return Ok(gather_named_repositories(api, ctx).await);
        }

        info!("Listing organization repositories");
        let mut repositories = Vec::new();
        let mut org_pages = pin!(pages(|page| api.list_org_repos(ctx.org(), page)));

        while let Some(page) = org_pages
            .try_next()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch some repositories"))?
        {
            for repo in page {
                if is_candidate(ctx, &repo) {
                    debug!(repo = %repo.name, "Found repository");
                    repositories.push(repo);
                }
            }
        }

        info!(count = repositories.len(), "Discovery complete");
        Ok(Outcome::Complete(repositories))
    }
    .instrument(span)
    .await
}

/// Fetches each explicitly named repository, continuing past failures.
async fn gather_named_repositories(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
) -> Outcome<Vec<Repository>> {
    let mut repositories = Vec::new();
    let mut failures = Vec::new();

    for name in ctx.repo_names() {
        match api.get_repo(ctx.org(), name).await {
            Ok(repo) => {
                debug!(repo = %repo.name, "Found repository");
                repositories.push(repo);
            }
            Err(e) => {
                let key = repo_key(ctx.org(), name);
                error!(repo = %key, error = %e, "Failed to get repository");
                failures.push(Failure::new(key, e));
            }
        }
    }

    Outcome::from_parts(repositories, failures)
}

/// Returns true if an organization repository should be scanned.
///
/// Archived, unnamed and excluded repositories are dropped, as are
/// repositories whose last push is strictly before the cutoff. A repository
/// that was never pushed to counts as pushed at the earliest representable
/// time, so only an unbounded cutoff keeps it.
#[must_use]
pub fn is_candidate(ctx: &ClientContext, repo: &Repository) -> bool {
    if repo.archived {
        return false;
    }

    if repo.name.is_empty() || ctx.is_excluded_repository(&repo.name) {
        return false;
    }

    repo.pushed_at.unwrap_or(DateTime::<Utc>::MIN_UTC) >= ctx.cutoff()
}
