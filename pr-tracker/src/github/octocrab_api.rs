//! [`GitHubApi`] backed by octocrab.

use super::{ApiError, GitHubApi, Page};
use crate::protections::ProtectionRule;
use crate::rate_limit::RateLimitInfo;
use crate::types::{Branch, BranchProtection, Commit, Label, PullRequest, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::{models, params, Octocrab};
use serde_json::{Map, Value};
use tracing::debug;

/// Results per page for every listing call.
const RESULTS_PER_PAGE: u8 = 100;

/// GitHub client used for real runs.
#[derive(Clone)]
pub struct OctocrabApi {
    octocrab: Octocrab,
}

impl OctocrabApi {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the underlying HTTP client cannot be built.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self { octocrab })
    }

    /// Wraps an already configured octocrab instance.
    #[must_use]
    pub fn from_client(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

/// Derives the next page number from octocrab's `Link` header parsing.
fn next_page<T>(page: &octocrab::Page<T>, current: u32) -> Option<u32> {
    page.next.as_ref().map(|_| current + 1)
}

fn convert_page<T, U: From<T>>(page: octocrab::Page<T>, current: u32) -> Page<U> {
    let next_page = next_page(&page, current);
    Page {
        items: page.items.into_iter().map(U::from).collect(),
        next_page,
    }
}

fn protection_route(org: &str, repo: &str, branch: &str) -> String {
    format!(
        "/repos/{org}/{repo}/branches/{}/protection",
        urlencoding::encode(branch)
    )
}

fn label_route(org: &str, repo: &str, name: &str) -> String {
    format!("/repos/{org}/{repo}/labels/{}", urlencoding::encode(name))
}

/// Builds the body of an "update a label" request, which renames via `new_name`.
fn edit_label_body(label: &Label) -> Value {
    let mut body = Map::new();
    body.insert("new_name".to_string(), Value::String(label.name.clone()));
    if let Some(color) = &label.color {
        body.insert("color".to_string(), Value::String(color.clone()));
    }
    if let Some(description) = &label.description {
        body.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    Value::Object(body)
}

impl From<models::Repository> for Repository {
    fn from(repo: models::Repository) -> Self {
        Self {
            name: repo.name,
            archived: repo.archived.unwrap_or(false),
            private: repo.private.unwrap_or(false),
            pushed_at: repo.pushed_at,
        }
    }
}

impl From<models::pulls::PullRequest> for PullRequest {
    fn from(pr: models::pulls::PullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            merged_at: pr.merged_at,
            html_url: pr.html_url.map(|url| url.to_string()).unwrap_or_default(),
        }
    }
}

impl From<models::repos::Branch> for Branch {
    fn from(branch: models::repos::Branch) -> Self {
        Self { name: branch.name }
    }
}

impl From<models::repos::RepoCommit> for Commit {
    fn from(commit: models::repos::RepoCommit) -> Self {
        Self {
            message: commit.commit.message,
        }
    }
}

impl From<models::Label> for Label {
    fn from(label: models::Label) -> Self {
        Self {
            name: label.name,
            color: Some(label.color),
            description: label.description,
        }
    }
}

#[async_trait]
impl GitHubApi for OctocrabApi {
    async fn list_org_repos(&self, org: &str, number: u32) -> Result<Page<Repository>, ApiError> {
        debug!(org, page = number, "Listing organization repositories");
        let page = self
            .octocrab
            .orgs(org)
            .list_repos()
            .repo_type(params::repos::Type::All)
            .per_page(RESULTS_PER_PAGE)
            .page(number)
            .send()
            .await?;
        Ok(convert_page(page, number))
    }

    async fn get_repo(&self, org: &str, repo: &str) -> Result<Repository, ApiError> {
        let repository = self.octocrab.repos(org, repo).get().await?;
        Ok(repository.into())
    }

    async fn list_branches(
        &self,
        org: &str,
        repo: &str,
        number: u32,
    ) -> Result<Page<Branch>, ApiError> {
        let page = self
            .octocrab
            .repos(org, repo)
            .list_branches()
            .per_page(RESULTS_PER_PAGE)
            .page(number)
            .send()
            .await?;
        Ok(convert_page(page, number))
    }

    async fn list_closed_pulls(
        &self,
        org: &str,
        repo: &str,
        number: u32,
    ) -> Result<Page<PullRequest>, ApiError> {
        let page = self
            .octocrab
            .pulls(org, repo)
            .list()
            .state(params::State::Closed)
            .sort(params::pulls::Sort::Updated)
            .direction(params::Direction::Descending)
            .per_page(RESULTS_PER_PAGE)
            .page(number)
            .send()
            .await?;
        Ok(convert_page(page, number))
    }

    async fn list_commits_since(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        since: DateTime<Utc>,
        number: u32,
    ) -> Result<Page<Commit>, ApiError> {
        let page = self
            .octocrab
            .repos(org, repo)
            .list_commits()
            .branch(branch)
            .since(since)
            .per_page(RESULTS_PER_PAGE)
            .page(number)
            .send()
            .await?;
        Ok(convert_page(page, number))
    }

    async fn get_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, ApiError> {
        let route = protection_route(org, repo, branch);
        match self
            .octocrab
            .get::<BranchProtection, _, ()>(&route, None::<&()>)
            .await
        {
            Ok(protection) => Ok(Some(protection)),
            Err(e) => {
                let error = ApiError::from(e);
                if error.is_not_found() {
                    Ok(None)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn update_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
        rule: &ProtectionRule,
    ) -> Result<BranchProtection, ApiError> {
        let route = protection_route(org, repo, branch);
        let protection = self.octocrab.put(&route, Some(rule)).await?;
        Ok(protection)
    }

    async fn get_label(
        &self,
        org: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<Label>, ApiError> {
        let route = label_route(org, repo, name);
        match self
            .octocrab
            .get::<models::Label, _, ()>(&route, None::<&()>)
            .await
        {
            Ok(label) => Ok(Some(label.into())),
            Err(e) => {
                let error = ApiError::from(e);
                if error.is_not_found() {
                    Ok(None)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn create_label(&self, org: &str, repo: &str, label: &Label) -> Result<Label, ApiError> {
        let route = format!("/repos/{org}/{repo}/labels");
        let created: models::Label = self.octocrab.post(&route, Some(label)).await?;
        Ok(created.into())
    }

    async fn edit_label(
        &self,
        org: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> Result<Label, ApiError> {
        let route = label_route(org, repo, current_name);
        let body = edit_label_body(label);
        let edited: models::Label = self.octocrab.patch(&route, Some(&body)).await?;
        Ok(edited.into())
    }

    async fn core_rate_limit(&self) -> Result<RateLimitInfo, ApiError> {
        let rate_limit = self.octocrab.ratelimit().get().await?;
        let core = &rate_limit.resources.core;

        Ok(RateLimitInfo {
            remaining: core.remaining as u32,
            reset: core.reset,
            limit: core.limit as u32,
        })
    }
}
