#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod discovery;
pub mod github;
pub mod labels;
pub mod outcome;
pub mod protections;
pub mod pull_requests;
pub mod rate_limit;
pub mod reconcile;
pub mod release_branch;
pub mod report;
pub mod runner;
pub mod summary;
pub mod types;

pub use config::{
    parse_start_date, resolve_token, validate_release_branch, ClientContext, ConfigError,
    ProtectionSettings, TrackerSettings,
};
pub use discovery::{gather_repositories, is_candidate};
pub use github::{ApiError, GitHubApi, OctocrabApi, Page};
pub use labels::{create_label_on_repositories, LabelData, LabelError, LabelResult, LabelStatus};
pub use outcome::{Failure, Outcome};
pub use protections::{update_branch_rules, ProtectionRule};
pub use pull_requests::{gather_merged_prs, gather_merged_prs_for_repo};
pub use rate_limit::{log_core_rate_limit, RateLimitInfo};
pub use reconcile::filter_matching_commits_on_branch;
pub use release_branch::{check_for_release_branch, gather_release_repositories};
pub use report::{print_pr_list, render_discord, render_terminal_lines, OutputFormat};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
pub use types::{
    repo_key, Branch, BranchProtection, Commit, Label, PrMap, PullRequest, ReleaseRepoMap,
    Repository,
};
