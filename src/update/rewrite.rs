//! Token-authenticated rewriting of SSH-hosted pins
//!
//! A pin at `ssh://git@github.com/owner/repo` cannot be probed without SSH
//! keys. The same repository pinned as `owner/repo` can, using the API token.
//! The working copy is rewritten to that form for the probe, and restored to
//! the SSH form (with only the revision changed) before anything is published.

use crate::error::Result;
use crate::platform::{on_instance, ssh_hosted_repo};
use crate::tool::PinTool;
use crate::types::{PinLocation, RepoSlug};
use crate::update::probe::Workspace;
use tracing::debug;

/// What to do with a pin's location before probing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAction {
    /// Probe the pin as it is
    Keep,
    /// Skip the dependency entirely
    Skip,
    /// Probe via the token-authenticated `owner/repo` form
    Rewrite(RepoSlug),
    /// SSH source on a GitHub instance the run's token does not belong to
    Unreachable(RepoSlug),
}

/// Decide how to treat a pin's location
///
/// `enterprise_host` is the instance the token and the pin tool are
/// configured for (`None` for github.com).
pub fn plan_source(
    location: &PinLocation,
    skip_ssh_repos: bool,
    enterprise_host: Option<&str>,
) -> SourceAction {
    match ssh_hosted_repo(location, enterprise_host) {
        Some(_) if skip_ssh_repos => SourceAction::Skip,
        Some(repo) if on_instance(&repo, enterprise_host) => SourceAction::Rewrite(repo),
        Some(repo) => SourceAction::Unreachable(repo),
        None => SourceAction::Keep,
    }
}

/// Replace the pin with its token-authenticated equivalent in the working copy
pub async fn rewrite_source(
    tool: &dyn PinTool,
    workspace: &Workspace,
    name: &str,
    repo: &RepoSlug,
    revision: &str,
    tracked_ref: Option<&str>,
) -> Result<()> {
    debug!("{name}: probing as {} instead of SSH", repo.full_name());

    let manifest = workspace.working_path();
    tool.drop_pin(manifest, name).await?;
    tool.add_pin(manifest, name, repo, revision, tracked_ref)
        .await
}

/// Restore the original pin and move it to `new_revision`
pub async fn restore_source(
    tool: &dyn PinTool,
    workspace: &Workspace,
    name: &str,
    new_revision: &str,
) -> Result<()> {
    workspace.reset_working()?;
    tool.modify_pin(workspace.working_path(), name, new_revision)
        .await
}
