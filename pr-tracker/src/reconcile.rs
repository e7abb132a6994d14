//! Release branch reconciliation.
//!
//! Squash merges on GitHub end the commit title with `(#<number>)`. A pull
//! request whose reference shows up in a release branch commit made after
//! the cutoff has already been released and is dropped from the report.

use crate::config::ClientContext;
use crate::github::{collect_pages, ApiError, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::types::{Commit, PrMap, PullRequest, ReleaseRepoMap, Repository};
use tracing::{debug, error, info, info_span, Instrument};

/// Removes pull requests that already landed on the release branch.
///
/// Repositories without the release branch pass through unchanged.
/// Repositories left without any pull request are dropped, as are
/// repositories whose release branch commits cannot be listed.
pub async fn filter_matching_commits_on_branch(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    prs: PrMap,
    release_repos: &ReleaseRepoMap,
) -> Outcome<PrMap> {
    let span = info_span!(
        "filter_matching_commits",
        branch = %ctx.release_branch(),
        repositories = prs.len()
    );

    async {
        let mut filtered = PrMap::new();
        let mut failures = Vec::new();

        for (key, repo_prs) in prs {
            let Some(release_repo) = release_repos.get(&key) else {
                debug!(repo = %key, "No release branch, keeping all pull requests");
                filtered.insert(key, repo_prs);
                continue;
            };

            let commits = match gather_commits_to_check(api, ctx, release_repo).await {
                Ok(commits) => commits,
                Err(e) => {
                    error!(repo = %key, error = %e, "Failed to filter pull requests");
                    failures.push(Failure::new(key, e));
                    continue;
                }
            };

            let unreleased = retain_unreleased(repo_prs, &commits);
            if unreleased.is_empty() {
                debug!(repo = %key, "All pull requests are on the release branch, skipping");
            } else {
                debug!(
                    repo = %key,
                    count = unreleased.len(),
                    "Found pull requests missing from the release branch"
                );
                filtered.insert(key, unreleased);
            }
        }

        info!(repositories = filtered.len(), "Reconciled against release branch");
        Outcome::from_parts(filtered, failures)
    }
    .instrument(span)
    .await
}

/// Lists every release branch commit made at or after the cutoff.
async fn gather_commits_to_check(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repo: &Repository,
) -> Result<Vec<Commit>, ApiError> {
    let commits = collect_pages(|page| {
        api.list_commits_since(
            ctx.org(),
            &repo.name,
            ctx.release_branch(),
            ctx.cutoff(),
            page,
        )
    })
    .await?;

    debug!(
        repo = %repo.name,
        branch = %ctx.release_branch(),
        count = commits.len(),
        "Fetched release branch commits"
    );
    Ok(commits)
}

/// Keeps the pull requests no commit message refers to, preserving order.
fn retain_unreleased(prs: Vec<PullRequest>, commits: &[Commit]) -> Vec<PullRequest> {
    prs.into_iter()
        .filter(|pr| {
            let released = is_released(pr, commits);
            if released {
                debug!(number = pr.number, "Found matching release branch commit");
            }
            !released
        })
        .collect()
}

/// Returns true if any commit message contains `(#<number>)`.
fn is_released(pr: &PullRequest, commits: &[Commit]) -> bool {
    let reference = format!("(#{})", pr.number);
    commits
        .iter()
        .any(|commit| commit.message.contains(&reference))
}
