//! pin-updater - pull requests for outdated pinned dependencies
//!
//! CLI binary meant to run inside a CI job of the repository that owns the
//! pin manifest. Every option can also be supplied through the environment.

use clap::{ArgAction, Parser};
use pin_updater::config::{UpdateOptions, parse_comma_list, parse_line_list};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "pin-updater")]
#[command(about = "Open one pull request per outdated pinned dependency")]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Host repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// GitHub Enterprise hostname
    #[arg(long, env = "GH_HOST")]
    api_host: Option<String>,

    /// Path of the pin manifest inside the repository
    #[arg(long, env = "INPUT_SOURCES_FILE", default_value = pin_updater::config::DEFAULT_SOURCES_FILE)]
    sources_file: String,

    /// Only process these dependencies (comma-separated)
    #[arg(long, env = "INPUT_ALLOWLIST", default_value = "")]
    allowlist: String,

    /// Never process these dependencies (comma-separated)
    #[arg(long, env = "INPUT_DENYLIST", default_value = "")]
    denylist: String,

    /// Labels for created PRs (newline-separated)
    #[arg(long, env = "INPUT_LABELS", default_value = "")]
    labels: String,

    /// Skip dependencies only reachable over SSH
    #[arg(long, env = "INPUT_SKIP_SSH_REPOS")]
    skip_ssh_repos: bool,

    /// Skip dependencies pinned to a version label instead of a commit hash
    #[arg(
        long,
        env = "INPUT_SKIP_VERSIONED_REVISIONS",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    skip_versioned_revisions: bool,

    /// Prefix for update branch names
    #[arg(long, env = "INPUT_BRANCH_PREFIX", default_value = pin_updater::config::DEFAULT_BRANCH_PREFIX)]
    branch_prefix: String,

    /// Prefix for PR titles
    #[arg(long, env = "INPUT_TITLE_PREFIX", default_value = "")]
    title_prefix: String,

    /// Branch PRs target (defaults to the triggering branch)
    #[arg(long, env = "INPUT_PULL_REQUEST_BASE")]
    pull_request_base: Option<String>,

    /// Ref that triggered the run
    #[arg(long, env = "GITHUB_REF")]
    triggering_ref: Option<String>,

    /// Text placed before the changelog
    #[arg(long, env = "INPUT_MESSAGE_PREFIX", default_value = "")]
    message_prefix: String,

    /// Text placed after the changelog
    #[arg(long, env = "INPUT_MESSAGE_SUFFIX", default_value = "")]
    message_suffix: String,

    /// Keep merge commits in changelogs
    #[arg(long, env = "INPUT_SHOW_MERGES")]
    show_merges: bool,

    /// Pin-update tool executable
    #[arg(long, env = "INPUT_PIN_TOOL", default_value = "niv")]
    pin_tool: String,

    /// Upper bound in seconds for each API call and tool invocation
    #[arg(long, env = "INPUT_TIMEOUT_SECS", default_value_t = 300)]
    timeout_secs: u64,

    /// Dry run - show what would be done without making changes
    #[arg(long, env = "INPUT_DRY_RUN")]
    dry_run: bool,

    /// Debug-level logging
    #[arg(long, env = "INPUT_DEBUG_OUTPUT")]
    debug: bool,

    /// Emit workflow annotations for warnings and errors
    #[arg(long, env = "GITHUB_ACTIONS", hide = true)]
    annotations: bool,
}

impl Cli {
    fn options(&self) -> UpdateOptions {
        UpdateOptions {
            sources_file: self.sources_file.clone(),
            allowlist: parse_comma_list(&self.allowlist),
            denylist: parse_comma_list(&self.denylist),
            labels: parse_line_list(&self.labels),
            skip_ssh_repos: self.skip_ssh_repos,
            skip_versioned_revisions: self.skip_versioned_revisions,
            branch_prefix: self.branch_prefix.clone(),
            title_prefix: self.title_prefix.clone(),
            message_prefix: self.message_prefix.clone(),
            message_suffix: self.message_suffix.clone(),
            show_merges: self.show_merges,
            pull_request_base: self.pull_request_base.clone(),
            triggering_ref: self.triggering_ref.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            dry_run: self.dry_run,
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pin_updater=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pin_updater=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let request = cli::UpdateRequest {
        repository: cli.repository.clone(),
        api_host: cli.api_host.clone(),
        pin_tool: cli.pin_tool.clone(),
        options: cli.options(),
        annotations: cli.annotations,
    };

    match cli::run_update(request).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report_fatal(&e, cli.annotations);
            ExitCode::FAILURE
        }
    }
}
