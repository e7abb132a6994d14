//! Merged pull request collection.
//!
//! Closed pull requests are listed most recently updated first and scanned
//! until one merged before the cutoff shows up. Update order only
//! approximates merge order, so a pull request merged after the cutoff but
//! last updated before an older one can be missed; the scan accepts that in
//! exchange for not walking the full history of every repository.

use crate::config::ClientContext;
use crate::github::{pages, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::types::{repo_key, PrMap, PullRequest, Repository};
use futures::TryStreamExt;
use std::pin::pin;
use tracing::{debug, error, info, info_span, Instrument};

/// Whether a repository scan should fetch the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Continue,
    Stop,
}

/// Gathers pull requests merged at or after the cutoff, keyed by `"<org>/<repo>"`.
///
/// Repositories without any such pull request are left out. A repository
/// whose listing fails part way keeps what was collected before the failure.
pub async fn gather_merged_prs(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repos: &[Repository],
) -> Outcome<PrMap> {
    let span = info_span!(
        "gather_merged_prs",
        cutoff = %ctx.cutoff(),
        repositories = repos.len()
    );

    async {
        let mut prs = PrMap::new();
        let mut failures = Vec::new();

        for repo in repos {
            let key = repo_key(ctx.org(), &repo.name);
            let (collected, repo_failures) =
                gather_merged_prs_for_repo(api, ctx, repo).await.into_parts();

            for failure in repo_failures {
                error!(repo = %key, error = %failure.error, "Failed to list pull requests");
                failures.push(failure);
            }

            if !collected.is_empty() {
                debug!(repo = %key, count = collected.len(), "Found merged pull requests");
                prs.insert(key, collected);
            }
        }

        info!(repositories = prs.len(), "Collected merged pull requests");
        Outcome::from_parts(prs, failures)
    }
    .instrument(span)
    .await
}

/// Collects merged pull requests of one repository.
///
/// On a page error the pull requests from earlier pages are returned
/// together with the failure.
pub async fn gather_merged_prs_for_repo(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    repo: &Repository,
) -> Outcome<Vec<PullRequest>> {
    let mut collected = Vec::new();
    let mut pr_pages = pin!(pages(|page| api.list_closed_pulls(
        ctx.org(),
        &repo.name,
        page
    )));

    loop {
        match pr_pages.try_next().await {
            Ok(Some(page)) => {
                debug!(repo = %repo.name, count = page.len(), "Fetched page of pull requests");
                if collect_from_page(ctx, page, &mut collected) == Scan::Stop {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let failure = Failure::new(repo_key(ctx.org(), &repo.name), e);
                return Outcome::from_parts(collected, vec![failure]);
            }
        }
    }

    Outcome::Complete(collected)
}

/// Appends the reportable pull requests of one page to `collected`.
///
/// Returns [`Scan::Stop`] at the first pull request merged before the cutoff;
/// nothing after it on this page is looked at.
fn collect_from_page(
    ctx: &ClientContext,
    page: Vec<PullRequest>,
    collected: &mut Vec<PullRequest>,
) -> Scan {
    for pr in page {
        let Some(merged_at) = pr.merged_at else {
            continue;
        };

        if merged_at < ctx.cutoff() {
            return Scan::Stop;
        }

        if ctx.is_excluded_title(&pr.title) {
            debug!(number = pr.number, title = %pr.title, "Skipping excluded pull request");
            continue;
        }

        debug!(number = pr.number, title = %pr.title, "Found pull request");
        collected.push(pr);
    }

    Scan::Continue
}
