//! In-memory GitHub for pipeline tests.
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pr_tracker::{
    ApiError, Branch, BranchProtection, ClientContext, Commit, GitHubApi, Label, Page,
    ProtectionRule, PullRequest, RateLimitInfo, Repository, TrackerSettings,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const ORG: &str = "Acme";
pub const RELEASE_BRANCH: &str = "release/1.x";

/// Remote operations that can be made to fail for a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetRepo,
    ListBranches,
    ListPulls,
    ListCommits,
    GetProtection,
    UpdateProtection,
    GetLabel,
    CreateLabel,
    EditLabel,
}

/// Call record for `update_branch_protection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionCall {
    pub repo: String,
    pub branch: String,
    pub rule: ProtectionRule,
}

/// Call record for `create_label` and `edit_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCall {
    pub repo: String,
    pub current_name: Option<String>,
    pub label: Label,
}

#[derive(Default)]
struct State {
    page_size: usize,
    repos: Vec<Repository>,
    branches: HashMap<String, Vec<String>>,
    pulls: HashMap<String, Vec<PullRequest>>,
    commits: HashMap<String, Vec<(DateTime<Utc>, String)>>,
    protections: HashSet<String>,
    labels: HashMap<String, Vec<Label>>,
    failures: HashSet<(Op, String)>,
    page_failures: HashSet<(Op, String, u32)>,
    // Call tracking
    pull_pages_fetched: HashMap<String, Vec<u32>>,
    protection_calls: Vec<ProtectionCall>,
    label_calls: Vec<LabelCall>,
}

/// Mock GitHub organization.
///
/// Cloning shares the state, so a test can hand one clone to the runner and
/// inspect the calls through another.
///
/// Features:
/// - Configurable page size for every listing
/// - Error injection per operation and repository
/// - Call tracking for writes and pull request pages
#[derive(Clone)]
pub struct MockGitHub {
    state: Arc<Mutex<State>>,
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitHub {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                page_size: 100,
                ..State::default()
            })),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size;
        self
    }

    pub fn add_repo(&self, repo: Repository) {
        self.state.lock().unwrap().repos.push(repo);
    }

    pub fn add_branch(&self, repo: &str, branch: &str) {
        self.state
            .lock()
            .unwrap()
            .branches
            .entry(repo.to_string())
            .or_default()
            .push(branch.to_string());
    }

    /// Adds closed pull requests, most recently updated first.
    pub fn add_pulls(&self, repo: &str, pulls: Vec<PullRequest>) {
        self.state
            .lock()
            .unwrap()
            .pulls
            .entry(repo.to_string())
            .or_default()
            .extend(pulls);
    }

    /// Adds a commit to the release branch of a repository.
    pub fn add_release_commit(&self, repo: &str, date: DateTime<Utc>, message: &str) {
        self.state
            .lock()
            .unwrap()
            .commits
            .entry(repo.to_string())
            .or_default()
            .push((date, message.to_string()));
    }

    pub fn protect(&self, repo: &str) {
        self.state.lock().unwrap().protections.insert(repo.to_string());
    }

    pub fn add_label(&self, repo: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .labels
            .entry(repo.to_string())
            .or_default()
            .push(Label {
                name: name.to_string(),
                color: Some("ededed".to_string()),
                description: None,
            });
    }

    // === Error injection ===

    pub fn fail(&self, op: Op, repo: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, repo.to_string()));
    }

    /// Fails only the given page of a listing, earlier pages still succeed.
    pub fn fail_page(&self, op: Op, repo: &str, page: u32) {
        self.state
            .lock()
            .unwrap()
            .page_failures
            .insert((op, repo.to_string(), page));
    }

    // === Call inspection ===

    pub fn pull_pages_fetched(&self, repo: &str) -> Vec<u32> {
        self.state
            .lock()
            .unwrap()
            .pull_pages_fetched
            .get(repo)
            .cloned()
            .unwrap_or_default()
    }

    pub fn protection_calls(&self) -> Vec<ProtectionCall> {
        self.state.lock().unwrap().protection_calls.clone()
    }

    pub fn label_calls(&self) -> Vec<LabelCall> {
        self.state.lock().unwrap().label_calls.clone()
    }

    pub fn labels(&self, repo: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .labels
            .get(repo)
            .map(|labels| labels.iter().map(|label| label.name.clone()).collect())
            .unwrap_or_default()
    }

    fn check(&self, op: Op, repo: &str) -> Result<(), ApiError> {
        if self
            .state
            .lock()
            .unwrap()
            .failures
            .contains(&(op, repo.to_string()))
        {
            Err(ApiError::UnexpectedResponse {
                route: format!("/repos/{ORG}/{repo}"),
                message: format!("injected {op:?} failure"),
            })
        } else {
            Ok(())
        }
    }

    fn check_page(&self, op: Op, repo: &str, page: u32) -> Result<(), ApiError> {
        self.check(op, repo)?;
        if self
            .state
            .lock()
            .unwrap()
            .page_failures
            .contains(&(op, repo.to_string(), page))
        {
            Err(ApiError::UnexpectedResponse {
                route: format!("/repos/{ORG}/{repo}?page={page}"),
                message: format!("injected {op:?} failure"),
            })
        } else {
            Ok(())
        }
    }

    fn page_of<T: Clone>(&self, items: &[T], page: u32) -> Page<T> {
        let size = self.state.lock().unwrap().page_size;
        let start = (page as usize - 1) * size;
        let end = (start + size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();

        Page {
            items: slice,
            next_page: (end < items.len()).then_some(page + 1),
        }
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn list_org_repos(&self, _org: &str, page: u32) -> Result<Page<Repository>, ApiError> {
        let repos = self.state.lock().unwrap().repos.clone();
        Ok(self.page_of(&repos, page))
    }

    async fn get_repo(&self, org: &str, repo: &str) -> Result<Repository, ApiError> {
        self.check(Op::GetRepo, repo)?;
        self.state
            .lock()
            .unwrap()
            .repos
            .iter()
            .find(|r| r.name == repo)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("{org}/{repo}"),
            })
    }

    async fn list_branches(
        &self,
        _org: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<Branch>, ApiError> {
        self.check_page(Op::ListBranches, repo, page)?;
        let branches: Vec<Branch> = self
            .state
            .lock()
            .unwrap()
            .branches
            .get(repo)
            .map(|names| {
                names
                    .iter()
                    .map(|name| Branch { name: name.clone() })
                    .collect()
            })
            .unwrap_or_default();
        Ok(self.page_of(&branches, page))
    }

    async fn list_closed_pulls(
        &self,
        _org: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<PullRequest>, ApiError> {
        self.state
            .lock()
            .unwrap()
            .pull_pages_fetched
            .entry(repo.to_string())
            .or_default()
            .push(page);
        self.check_page(Op::ListPulls, repo, page)?;
        let pulls = self
            .state
            .lock()
            .unwrap()
            .pulls
            .get(repo)
            .cloned()
            .unwrap_or_default();
        Ok(self.page_of(&pulls, page))
    }

    async fn list_commits_since(
        &self,
        _org: &str,
        repo: &str,
        _branch: &str,
        since: DateTime<Utc>,
        page: u32,
    ) -> Result<Page<Commit>, ApiError> {
        self.check_page(Op::ListCommits, repo, page)?;
        let commits: Vec<Commit> = self
            .state
            .lock()
            .unwrap()
            .commits
            .get(repo)
            .map(|commits| {
                commits
                    .iter()
                    .filter(|(date, _)| *date >= since)
                    .map(|(_, message)| Commit {
                        message: message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(self.page_of(&commits, page))
    }

    async fn get_branch_protection(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, ApiError> {
        self.check(Op::GetProtection, repo)?;
        let protected = self.state.lock().unwrap().protections.contains(repo);
        Ok(protected.then(|| BranchProtection {
            url: Some(format!(
                "https://api.github.com/repos/{org}/{repo}/branches/{branch}/protection"
            )),
        }))
    }

    async fn update_branch_protection(
        &self,
        _org: &str,
        repo: &str,
        branch: &str,
        rule: &ProtectionRule,
    ) -> Result<BranchProtection, ApiError> {
        self.check(Op::UpdateProtection, repo)?;
        let mut state = self.state.lock().unwrap();
        state.protection_calls.push(ProtectionCall {
            repo: repo.to_string(),
            branch: branch.to_string(),
            rule: rule.clone(),
        });
        state.protections.insert(repo.to_string());
        Ok(BranchProtection { url: None })
    }

    async fn get_label(
        &self,
        _org: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<Label>, ApiError> {
        self.check(Op::GetLabel, repo)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .labels
            .get(repo)
            .and_then(|labels| labels.iter().find(|label| label.name == name).cloned()))
    }

    async fn create_label(&self, _org: &str, repo: &str, label: &Label) -> Result<Label, ApiError> {
        self.check(Op::CreateLabel, repo)?;
        let mut state = self.state.lock().unwrap();
        state.label_calls.push(LabelCall {
            repo: repo.to_string(),
            current_name: None,
            label: label.clone(),
        });
        state
            .labels
            .entry(repo.to_string())
            .or_default()
            .push(label.clone());
        Ok(label.clone())
    }

    async fn edit_label(
        &self,
        _org: &str,
        repo: &str,
        current_name: &str,
        label: &Label,
    ) -> Result<Label, ApiError> {
        self.check(Op::EditLabel, repo)?;
        let mut state = self.state.lock().unwrap();
        state.label_calls.push(LabelCall {
            repo: repo.to_string(),
            current_name: Some(current_name.to_string()),
            label: label.clone(),
        });
        if let Some(existing) = state
            .labels
            .get_mut(repo)
            .and_then(|labels| labels.iter_mut().find(|l| l.name == current_name))
        {
            existing.name = label.name.clone();
        }
        Ok(label.clone())
    }

    async fn core_rate_limit(&self) -> Result<RateLimitInfo, ApiError> {
        Ok(RateLimitInfo {
            remaining: 4999,
            reset: 0,
            limit: 5000,
        })
    }
}

// === Fixtures ===

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn context() -> ClientContext {
    ClientContext::new(
        ORG,
        RELEASE_BRANCH,
        Vec::new(),
        cutoff(),
        &TrackerSettings::default(),
    )
}

pub fn context_for(repo_names: &[&str]) -> ClientContext {
    ClientContext::new(
        ORG,
        RELEASE_BRANCH,
        repo_names.iter().map(|name| name.to_string()).collect(),
        cutoff(),
        &TrackerSettings::default(),
    )
}

pub fn repo(name: &str, pushed_at: DateTime<Utc>) -> Repository {
    Repository {
        name: name.to_string(),
        archived: false,
        private: false,
        pushed_at: Some(pushed_at),
    }
}

pub fn merged_pr(repo: &str, number: u64, title: &str, merged_at: DateTime<Utc>) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        merged_at: Some(merged_at),
        html_url: format!("https://github.com/{ORG}/{repo}/pull/{number}"),
    }
}

pub fn closed_pr(repo: &str, number: u64, title: &str) -> PullRequest {
    PullRequest {
        merged_at: None,
        ..merged_pr(repo, number, title, date(2024, 1, 1))
    }
}
