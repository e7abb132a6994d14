//! Release branch detection.

use crate::config::ClientContext;
use crate::github::{pages, ApiError, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::types::{repo_key, ReleaseRepoMap, Repository};
use futures::TryStreamExt;
use std::pin::pin;
use tracing::{debug, error, info, info_span, Instrument};

/// Checks whether a repository has a branch named exactly like the release branch.
///
/// Branch pages are fetched until a match is found or the listing ends.
///
/// # Errors
///
/// Returns [`ApiError`] if a page of branches cannot be listed.
pub async fn check_for_release_branch(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repo: &Repository,
) -> Result<bool, ApiError> {
    let mut branch_pages = pin!(pages(|page| api.list_branches(ctx.org(), &repo.name, page)));

    while let Some(branches) = branch_pages.try_next().await? {
        if branches
            .iter()
            .any(|branch| branch.name == ctx.release_branch())
        {
            debug!(repo = %repo.name, branch = %ctx.release_branch(), "Found release branch");
            return Ok(true);
        }
    }

    Ok(false)
}

/// Gathers the repositories that carry the release branch, keyed by `"<org>/<repo>"`.
///
/// A repository whose branches cannot be listed is recorded as a failure and
/// left out of the map.
pub async fn gather_release_repositories(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repos: &[Repository],
) -> Outcome<ReleaseRepoMap> {
    let span = info_span!(
        "gather_release_repositories",
        branch = %ctx.release_branch(),
        repositories = repos.len()
    );

    async {
        let mut release_repos = ReleaseRepoMap::new();
        let mut failures = Vec::new();

        for repo in repos {
            let key = repo_key(ctx.org(), &repo.name);
            match check_for_release_branch(api, ctx, repo).await {
                Ok(true) => {
                    release_repos.insert(key, repo.clone());
                }
                Ok(false) => {}
                Err(e) => {
                    error!(repo = %key, error = %e, "Failed to list branches");
                    failures.push(Failure::new(key, e));
                }
            }
        }

        info!(count = release_repos.len(), "Found repositories with release branch");
        Outcome::from_parts(release_repos, failures)
    }
    .instrument(span)
    .await
}
