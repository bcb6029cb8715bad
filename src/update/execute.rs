//! Run execution
//!
//! Resolves the run context once, then processes every selected dependency in
//! order. A dependency ends in exactly one [`DependencyOutcome`]; only the
//! fatal tier (manifest unreadable, base unresolvable, branch creation
//! failing) stops the run.

use crate::config::UpdateOptions;
use crate::error::{Error, Result};
use crate::platform::{PlatformService, hosted_repo};
use crate::tool::PinTool;
use crate::types::{PinEntry, PullRequest, RepoSlug};
use crate::update::changelog::{build_changelog, compose_message, pr_title};
use crate::update::manifest::{ManifestSnapshot, read_manifest};
use crate::update::probe::{ProbeOutcome, Workspace, probe_update};
use crate::update::publish::{Published, apply_labels, publish_update};
use crate::update::rewrite::{SourceAction, plan_source, restore_source, rewrite_source};
use crate::update::select::{
    RevisionKind, already_proposed, classify_revision, select_dependencies, update_branch_name,
};
use crate::update::{Phase, ProgressCallback};
use std::fmt;
use tracing::{debug, info, warn};

/// Process-scoped state for one run, fixed after initialization
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Run configuration
    pub options: UpdateOptions,
    /// Branch PRs target and the manifest is read from
    pub base_branch: String,
    /// Commit every update branch forks from
    pub base_commit: String,
    /// Manifest at `base_commit`
    pub manifest: ManifestSnapshot,
}

impl RunContext {
    /// Resolve the base branch and commit, and read the manifest there
    pub async fn initialize(
        options: UpdateOptions,
        platform: &dyn PlatformService,
    ) -> Result<Self> {
        let base_branch = options.base_branch()?;
        let base_commit = platform
            .branch_head(&base_branch)
            .await?
            .ok_or_else(|| Error::BranchNotFound(base_branch.clone()))?;
        debug!("Base {base_branch} resolved to {base_commit}");

        let manifest = read_manifest(platform, &options.sources_file, &base_commit).await?;

        Ok(Self {
            options,
            base_branch,
            base_commit,
            manifest,
        })
    }
}

/// Why a dependency was not proposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Listed in the deny-list
    Denied,
    /// Allow-listed but not in the manifest
    NotInManifest,
    /// Pin has no revision
    MissingRevision,
    /// An update branch for the current revision already exists
    AlreadyProposed(String),
    /// Revision is a version label and those are skipped
    VersionLikeRevision(String),
    /// SSH-hosted source and those are skipped
    SshSource,
    /// No newer revision
    UpToDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied => write!(f, "deny-listed"),
            Self::NotInManifest => write!(f, "not in the pin manifest"),
            Self::MissingRevision => write!(f, "pin has no revision"),
            Self::AlreadyProposed(branch) => write!(f, "branch {branch} already exists"),
            Self::VersionLikeRevision(rev) => write!(f, "revision {rev} is not a commit hash"),
            Self::SshSource => write!(f, "SSH-hosted source"),
            Self::UpToDate => write!(f, "already up to date"),
        }
    }
}

/// A proposed (or, in a dry run, proposable) update
#[derive(Debug, Clone)]
pub struct UpdateRecord {
    /// Update branch
    pub branch: String,
    /// Revision before the update
    pub old_revision: String,
    /// Revision after the update
    pub new_revision: String,
    /// Created PR; `None` in a dry run
    pub pull_request: Option<PullRequest>,
}

/// Terminal state of one dependency
#[derive(Debug, Clone)]
pub enum DependencyOutcome {
    /// Not proposed, for a known reason
    Skipped(SkipReason),
    /// Proposed
    Updated(UpdateRecord),
    /// Failed; nothing is left behind
    Errored(String),
}

/// Everything needed to publish one update
#[derive(Debug, Clone)]
pub struct UpdateCandidate {
    /// Dependency name
    pub name: String,
    /// Pin as read from the base commit
    pub entry: PinEntry,
    /// Update branch
    pub branch: String,
    /// Revision before the update
    pub old_revision: String,
    /// Revision after the update
    pub new_revision: String,
    /// Full manifest with only this pin changed
    pub new_content: String,
    /// PR title
    pub title: String,
    /// PR body, also used as the commit message
    pub body: String,
}

/// Results of a run, in processing order
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    /// `(dependency, outcome)` pairs
    pub outcomes: Vec<(String, DependencyOutcome)>,
}

impl UpdateSummary {
    /// PRs created during the run
    pub fn created_prs(&self) -> Vec<&PullRequest> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                DependencyOutcome::Updated(record) => record.pull_request.as_ref(),
                _ => None,
            })
            .collect()
    }

    /// Number of updated dependencies (proposable ones in a dry run)
    pub fn updated_count(&self) -> usize {
        self.count(|o| matches!(o, DependencyOutcome::Updated(_)))
    }

    /// Number of skipped dependencies
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, DependencyOutcome::Skipped(_)))
    }

    /// Number of dependencies that failed
    pub fn errored_count(&self) -> usize {
        self.count(|o| matches!(o, DependencyOutcome::Errored(_)))
    }

    /// Outcome recorded for `name`
    pub fn outcome(&self, name: &str) -> Option<&DependencyOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&DependencyOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Initialize a run and process every selected dependency
pub async fn run_updates(
    options: UpdateOptions,
    platform: &dyn PlatformService,
    tool: &dyn PinTool,
    progress: &dyn ProgressCallback,
) -> Result<UpdateSummary> {
    progress.on_phase(Phase::Resolving).await;
    let ctx = RunContext::initialize(options, platform).await?;
    execute_updates(&ctx, platform, tool, progress).await
}

/// Process the working set one dependency at a time
pub async fn execute_updates(
    ctx: &RunContext,
    platform: &dyn PlatformService,
    tool: &dyn PinTool,
    progress: &dyn ProgressCallback,
) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();

    progress.on_phase(Phase::Selecting).await;
    let selection = select_dependencies(&ctx.manifest.manifest, &ctx.options);
    for name in selection.denied {
        progress.on_skipped(&name, &SkipReason::Denied).await;
        summary
            .outcomes
            .push((name, DependencyOutcome::Skipped(SkipReason::Denied)));
    }

    if ctx.options.dry_run {
        progress
            .on_message("Dry run - no branches or PRs will be created")
            .await;
    }

    progress.on_phase(Phase::Updating).await;
    for name in selection.names {
        progress.on_dependency(&name).await;

        let outcome = process_dependency(ctx, platform, tool, progress, &name).await?;
        match &outcome {
            DependencyOutcome::Skipped(reason) => progress.on_skipped(&name, reason).await,
            DependencyOutcome::Errored(reason) => {
                warn!("{name}: {reason}");
                progress.on_warning(&format!("{name}: {reason}")).await;
            }
            DependencyOutcome::Updated(_) => {}
        }
        summary.outcomes.push((name, outcome));
    }

    progress.on_phase(Phase::Complete).await;
    Ok(summary)
}

/// Take one dependency to a terminal state
///
/// `Err` is reserved for failures that must abort the whole run.
#[allow(clippy::too_many_lines)]
pub async fn process_dependency(
    ctx: &RunContext,
    platform: &dyn PlatformService,
    tool: &dyn PinTool,
    progress: &dyn ProgressCallback,
    name: &str,
) -> Result<DependencyOutcome> {
    let entry = match ctx.manifest.manifest.entry(name) {
        Ok(Some(entry)) => entry,
        Ok(None) => return Ok(DependencyOutcome::Skipped(SkipReason::NotInManifest)),
        Err(e) => return Ok(DependencyOutcome::Errored(e.to_string())),
    };
    let Some(old_revision) = entry.revision().map(ToString::to_string) else {
        return Ok(DependencyOutcome::Skipped(SkipReason::MissingRevision));
    };
    let Some(location) = entry.location() else {
        return Ok(DependencyOutcome::Errored(
            "pin has neither owner/repo nor url".to_string(),
        ));
    };

    let branch = update_branch_name(&ctx.options.branch_prefix, name, &old_revision);
    match already_proposed(platform, &branch).await {
        Ok(true) => return Ok(DependencyOutcome::Skipped(SkipReason::AlreadyProposed(branch))),
        Ok(false) => {}
        Err(e) => {
            return Ok(DependencyOutcome::Errored(format!(
                "could not check for branch {branch}: {e}"
            )));
        }
    }

    if ctx.options.skip_versioned_revisions
        && classify_revision(&old_revision) == RevisionKind::VersionLike
    {
        return Ok(DependencyOutcome::Skipped(SkipReason::VersionLikeRevision(
            old_revision,
        )));
    }

    let enterprise_host = platform.config().host.as_deref();
    let rewrite = match plan_source(&location, ctx.options.skip_ssh_repos, enterprise_host) {
        SourceAction::Skip => return Ok(DependencyOutcome::Skipped(SkipReason::SshSource)),
        SourceAction::Rewrite(repo) => Some(repo),
        SourceAction::Keep => None,
        SourceAction::Unreachable(repo) => {
            return Ok(DependencyOutcome::Errored(format!(
                "SSH source {} is on {}, which the configured token does not cover",
                repo.full_name(),
                repo.host.as_deref().unwrap_or("github.com")
            )));
        }
    };

    let probed = match probe(ctx, tool, name, &entry, &old_revision, rewrite.as_ref()).await {
        Ok(probed) => probed,
        Err(e) => return Ok(DependencyOutcome::Errored(e.to_string())),
    };
    let (new_revision, new_content) = match probed {
        Probed::Updated {
            new_revision,
            new_content,
        } => (new_revision, new_content),
        Probed::Unchanged => return Ok(DependencyOutcome::Skipped(SkipReason::UpToDate)),
        Probed::Failed(reason) => {
            return Ok(DependencyOutcome::Errored(format!(
                "pin tool could not update: {reason}"
            )));
        }
    };
    info!("{name}: {old_revision} -> {new_revision}");

    let changelog = build_changelog(
        platform,
        name,
        hosted_repo(&location, enterprise_host).as_ref(),
        &old_revision,
        &new_revision,
        ctx.options.show_merges,
    )
    .await;

    let candidate = UpdateCandidate {
        name: name.to_string(),
        title: pr_title(&ctx.options.title_prefix, name, &old_revision, &new_revision),
        body: compose_message(
            &ctx.options.message_prefix,
            &changelog,
            &ctx.options.message_suffix,
        ),
        entry,
        branch,
        old_revision,
        new_revision,
        new_content,
    };

    if ctx.options.dry_run {
        progress
            .on_message(&format!(
                "Would create {} targeting {}: {}",
                candidate.branch, ctx.base_branch, candidate.title
            ))
            .await;
        return Ok(DependencyOutcome::Updated(record(candidate, None)));
    }

    match publish_update(platform, ctx, &candidate).await? {
        Published::Created(pr) => {
            progress.on_pr_created(name, &pr).await;
            if let Some(warning) = apply_labels(platform, &pr, &ctx.options.labels).await {
                progress.on_warning(&warning).await;
            }
            Ok(DependencyOutcome::Updated(record(candidate, Some(pr))))
        }
        Published::RolledBack(reason) => Ok(DependencyOutcome::Errored(reason)),
    }
}

enum Probed {
    Updated {
        new_revision: String,
        new_content: String,
    },
    Unchanged,
    Failed(String),
}

/// Probe inside a scratch workspace that is gone when this returns
async fn probe(
    ctx: &RunContext,
    tool: &dyn PinTool,
    name: &str,
    entry: &PinEntry,
    old_revision: &str,
    rewrite: Option<&RepoSlug>,
) -> Result<Probed> {
    let workspace = Workspace::create(&ctx.manifest.file.content)?;

    if let Some(repo) = rewrite {
        rewrite_source(tool, &workspace, name, repo, old_revision, entry.tracked_ref()).await?;
    }

    let new_revision = match probe_update(tool, &workspace, name, old_revision).await? {
        ProbeOutcome::Updated { new_revision } => new_revision,
        ProbeOutcome::Unchanged => return Ok(Probed::Unchanged),
        ProbeOutcome::Failed(reason) => return Ok(Probed::Failed(reason)),
    };

    if rewrite.is_some() {
        restore_source(tool, &workspace, name, &new_revision).await?;
    }

    Ok(Probed::Updated {
        new_content: workspace.read_working()?,
        new_revision,
    })
}

fn record(candidate: UpdateCandidate, pull_request: Option<PullRequest>) -> UpdateRecord {
    UpdateRecord {
        branch: candidate.branch,
        old_revision: candidate.old_revision,
        new_revision: candidate.new_revision,
        pull_request,
    }
}
