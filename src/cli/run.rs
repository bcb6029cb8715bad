//! Update command - propose updates for every outdated pin

use crate::cli::escape_annotation;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, cross};
use anstream::{eprintln, println};
use anyhow::{Context, Result};
use pin_updater::auth::get_github_auth;
use pin_updater::config::UpdateOptions;
use pin_updater::platform::{GitHubService, PlatformService, parse_repo_spec};
use pin_updater::tool::NivTool;
use pin_updater::update::{UpdateSummary, run_updates};
use tracing::debug;

/// Everything the update command needs from the command line
pub struct UpdateRequest {
    /// Host repository as `owner/repo`
    pub repository: String,
    /// Enterprise hostname, if any
    pub api_host: Option<String>,
    /// Pin-update tool executable
    pub pin_tool: String,
    /// Run configuration
    pub options: UpdateOptions,
    /// Emit workflow annotations
    pub annotations: bool,
}

/// Run the update command
pub async fn run_update(request: UpdateRequest) -> Result<()> {
    let config = parse_repo_spec(&request.repository, request.api_host)
        .context("invalid --repository")?;
    let auth = get_github_auth().await?;
    debug!("Using GitHub token from {:?}", auth.source);

    let timeout = request.options.timeout;
    let tool = NivTool::new(&request.pin_tool, Some(auth.token.clone()), timeout)
        .with_host(config.host.clone());
    let platform = GitHubService::new(&auth.token, config, timeout)?;
    let progress = CliProgress::new(request.annotations);

    let repo = platform.config();
    println!(
        "Updating pins in {} ({})",
        format!("{}/{}", repo.owner, repo.repo).accent(),
        request.options.sources_file.muted()
    );

    let dry_run = request.options.dry_run;
    let summary = run_updates(request.options, &platform, &tool, &progress)
        .await
        .context("update run aborted")?;
    print_summary(&summary, dry_run);
    Ok(())
}

fn print_summary(summary: &UpdateSummary, dry_run: bool) {
    let verb = if dry_run { "proposable" } else { "proposed" };
    println!();
    println!(
        "{} {verb}, {} skipped, {} failed",
        summary.updated_count().accent(),
        summary.skipped_count(),
        summary.errored_count()
    );
}

/// Report an error that aborted the run
pub fn report_fatal(error: &anyhow::Error, annotations: bool) {
    eprintln!("{} {}: {error:#}", cross(), "error".error());
    if annotations {
        println!("::error::{}", escape_annotation(&format!("{error:#}")));
    }
}
