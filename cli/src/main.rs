//! CLI for the PR tracker.
//!
//! Lists pull requests merged into an organization's default branches,
//! optionally only those missing from the release branch, and manages
//! release branch protection and labels across the organization.

use clap::{Args, Parser, Subcommand};
use pr_tracker::config::defaults::{
    DEFAULT_ORGANIZATION, DEFAULT_RELEASE_BRANCH, DEFAULT_START_DATE,
};
use pr_tracker::{
    parse_start_date, print_pr_list, resolve_token, validate_release_branch, LabelData,
    OutputFormat, PrMap, RunSummary, Runner, RunnerConfig, RunnerError, TrackerSettings,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// PR tracker - List merged pull requests that have not reached the release branch.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// GitHub Personal Access Token. Falls back to `.github_personal_token`.
    #[arg(short, long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Only consider pull requests merged on or after this date (YYYY-MM-DD).
    #[arg(short = 'd', long, default_value = DEFAULT_START_DATE, global = true)]
    start_date: String,

    /// GitHub organization to scan.
    #[arg(short = 'o', long, visible_alias = "org", default_value = DEFAULT_ORGANIZATION, global = true)]
    organization: String,

    /// Release branch checked for already released pull requests.
    #[arg(short = 'b', long, visible_alias = "branch", default_value = DEFAULT_RELEASE_BRANCH, global = true)]
    release_branch: String,

    /// Only scan these repositories, may be given several times.
    #[arg(short = 'r', long = "repos", global = true)]
    repos: Vec<String>,

    /// Output format for pull request listings (terminal or discord).
    #[arg(short = 'f', long, default_value = "terminal", global = true)]
    formatting: String,

    /// Path to a settings file with exclusion lists and the protection rule.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, hide = true, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all pull requests merged since the start date.
    AllPrs,

    /// List pull requests merged since the start date that are not on the release branch.
    UnmergedPrs,

    /// Protect the release branch of every public repository that has one.
    AddProtections,

    /// Create or update a label on every repository.
    AddLabel(LabelArgs),
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Name of the label.
    #[arg(short, long)]
    name: String,

    /// Existing label to rename or edit.
    #[arg(long)]
    old_name: Option<String>,

    /// Hex color of the label, with or without a leading '#'.
    #[arg(short, long)]
    color: Option<String>,

    /// Description of the label.
    #[arg(long = "desc")]
    description: Option<String>,

    /// Only update existing labels, never create new ones.
    #[arg(long)]
    update_only: bool,
}

impl From<LabelArgs> for LabelData {
    fn from(args: LabelArgs) -> Self {
        Self {
            name: args.name,
            old_name: args.old_name,
            color: args.color,
            description: args.description,
            update_only: args.update_only,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);
    install_crypto_provider();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing on stderr, keeping stdout free for Discord output.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `--debug` is passed.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

/// Installs aws-lc-rs as the process-wide rustls crypto provider.
///
/// octocrab's HTTP stack enables a second provider, so rustls cannot pick one
/// on its own. An already installed provider is kept.
fn install_crypto_provider() {
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("Crypto provider already installed");
    }
}

/// Main execution logic. Returns false when some repositories failed.
async fn run(cli: Cli) -> Result<bool, RunnerError> {
    let format = parse_format(&cli.global.formatting)?;
    let runner = Runner::new(build_config(cli.global)?)?;

    match cli.command {
        Command::AllPrs => {
            let prs = runner.all_prs().await?;
            print_listing(&prs, format)?;
            Ok(true)
        }
        Command::UnmergedPrs => {
            let prs = runner.unmerged_prs().await?;
            print_listing(&prs, format)?;
            Ok(true)
        }
        Command::AddProtections => {
            let summary = runner.add_protections().await?;
            print_summary(&summary);
            Ok(!summary.has_failures())
        }
        Command::AddLabel(args) => {
            let summary = runner.add_label(args.into()).await?;
            print_summary(&summary);
            Ok(!summary.has_failures())
        }
    }
}

/// Validates the global flags and resolves the token and settings.
fn build_config(args: GlobalArgs) -> Result<RunnerConfig, RunnerError> {
    let start_date = parse_start_date(&args.start_date)?;
    validate_release_branch(&args.release_branch)?;
    let token = resolve_token(args.token.as_deref())?;

    let settings = match &args.config {
        Some(path) => TrackerSettings::load(path)?,
        None => TrackerSettings::default(),
    };

    Ok(
        RunnerConfig::new(token, args.organization, args.release_branch, start_date)
            .with_repo_names(args.repos)
            .with_settings(settings),
    )
}

fn parse_format(value: &str) -> Result<OutputFormat, RunnerError> {
    Ok(value.parse::<OutputFormat>()?)
}

fn print_listing(prs: &PrMap, format: OutputFormat) -> Result<(), RunnerError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    print_pr_list(prs, format, &mut out)?;
    Ok(())
}

/// Logs the final run summary.
fn print_summary(summary: &RunSummary) {
    info!("Summary:");
    if !summary.protected.is_empty() {
        info!("  Protected: {}", summary.protected.len());
        for repo in &summary.protected {
            info!("    {repo}");
        }
    }
    if summary.labels_created + summary.labels_updated + summary.labels_skipped > 0 {
        info!("  Labels created: {}", summary.labels_created);
        info!("  Labels updated: {}", summary.labels_updated);
        info!("  Labels skipped: {}", summary.labels_skipped);
    }
    info!("  Failed: {}", summary.failed.len());
    for repo in &summary.failed {
        info!("    {repo}");
    }
}
