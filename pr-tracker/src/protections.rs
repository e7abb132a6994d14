//! Branch protection for release branches.

use crate::config::{ClientContext, ProtectionSettings};
use crate::github::{pages, ApiError, GitHubApi};
use crate::outcome::{Failure, Outcome};
use crate::release_branch::check_for_release_branch;
use crate::types::{repo_key, Repository};
use futures::TryStreamExt;
use serde::Serialize;
use std::pin::pin;
use tracing::{debug, error, info, info_span, Instrument};

/// Body of an "update branch protection" request.
///
/// GitHub requires every top-level key to be present, so unset sections are
/// sent as `null` rather than omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionRule {
    pub required_status_checks: Option<RequiredStatusChecks>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: Option<RequiredReviews>,
    pub restrictions: Option<()>,
    pub required_conversation_resolution: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredStatusChecks {
    pub strict: bool,
    pub checks: Vec<StatusCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCheck {
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredReviews {
    pub required_approving_review_count: u32,
    pub require_code_owner_reviews: bool,
}

impl ProtectionRule {
    /// Builds the rule described by the settings.
    #[must_use]
    pub fn from_settings(settings: &ProtectionSettings) -> Self {
        let required_status_checks = (!settings.required_status_checks.is_empty()).then(|| {
            RequiredStatusChecks {
                strict: false,
                checks: settings
                    .required_status_checks
                    .iter()
                    .map(|context| StatusCheck {
                        context: context.clone(),
                    })
                    .collect(),
            }
        });

        Self {
            required_status_checks,
            enforce_admins: None,
            required_pull_request_reviews: Some(RequiredReviews {
                required_approving_review_count: settings.required_approving_review_count,
                require_code_owner_reviews: settings.require_code_owner_reviews,
            }),
            restrictions: None,
            required_conversation_resolution: settings.require_conversation_resolution,
        }
    }
}

/// Protects the release branch of every eligible organization repository.
///
/// Archived and private repositories are skipped, as are repositories
/// without the release branch and repositories whose release branch is
/// already protected. Returns the repositories a rule was added to.
///
/// # Errors
///
/// Returns [`ApiError`] if a page of organization repositories cannot be listed.
pub async fn update_branch_rules(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    settings: &ProtectionSettings,
) -> Result<Outcome<Vec<Repository>>, ApiError> {
    let span = info_span!("update_branch_rules", branch = %ctx.release_branch());

    async {
        let mut failures = Vec::new();
        let candidates = gather_protection_candidates(api, ctx, &mut failures).await?;
        info!(count = candidates.len(), "Found repositories with release branch");

        let rule = ProtectionRule::from_settings(settings);
        let mut protected = Vec::new();

        for repo in candidates {
            let key = repo_key(ctx.org(), &repo.name);

            match api
                .get_branch_protection(ctx.org(), &repo.name, ctx.release_branch())
                .await
            {
                Ok(Some(_)) => {
                    debug!(repo = %key, "Found existing rule, skipping");
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    error!(repo = %key, error = %e, "Failed to get branch protection");
                    failures.push(Failure::new(key, e));
                    continue;
                }
            }

            debug!(repo = %key, "Adding branch protection rule");
            match api
                .update_branch_protection(ctx.org(), &repo.name, ctx.release_branch(), &rule)
                .await
            {
                Ok(_) => protected.push(repo),
                Err(e) => {
                    error!(repo = %key, error = %e, "Failed to add branch protection");
                    failures.push(Failure::new(key, e));
                }
            }
        }

        Ok(Outcome::from_parts(protected, failures))
    }
    .instrument(span)
    .await
}

/// Lists public, active repositories that carry the release branch.
async fn gather_protection_candidates(
    api: &dyn GitHubApi,
    ctx: &ClientContext,
    failures: &mut Vec<Failure>,
) -> Result<Vec<Repository>, ApiError> {
    let mut candidates = Vec::new();
    let mut org_pages = pin!(pages(|page| api.list_org_repos(ctx.org(), page)));

    while let Some(page) = org_pages
        .try_next()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to fetch some repositories"))?
    {
        for repo in page {
            // Protection rules on private repositories need a paid plan.
            if repo.archived || repo.private {
                continue;
            }

            match check_for_release_branch(api, ctx, &repo).await {
                Ok(true) => candidates.push(repo),
                Ok(false) => {}
                Err(e) => {
                    let key = repo_key(ctx.org(), &repo.name);
                    error!(repo = %key, error = %e, "Failed to look for release branch");
                    failures.push(Failure::new(key, e));
                }
            }
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_default_rule_with_null_sections() {
        let rule = ProtectionRule::from_settings(&ProtectionSettings::default());

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            serde_json::json!({
                "required_status_checks": {
                    "strict": false,
                    "checks": [{ "context": "build-and-test / build-and-test" }]
                },
                "enforce_admins": null,
                "required_pull_request_reviews": {
                    "required_approving_review_count": 1,
                    "require_code_owner_reviews": true
                },
                "restrictions": null,
                "required_conversation_resolution": true
            })
        );
    }

    #[test]
    fn omits_status_checks_when_none_configured() {
        let settings = ProtectionSettings {
            required_status_checks: Vec::new(),
            ..ProtectionSettings::default()
        };

        let rule = ProtectionRule::from_settings(&settings);
        assert!(rule.required_status_checks.is_none());
    }
}
