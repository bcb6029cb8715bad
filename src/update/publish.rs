//! Publishing: branch, commit, pull request, labels
//!
//! Each step after branch creation rolls the branch back on failure, so a
//! failed attempt never leaves an orphaned branch behind (best effort).

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::PullRequest;
use crate::update::{RunContext, UpdateCandidate};
use tracing::{info, warn};

/// Outcome of a publish attempt that did not abort the run
#[derive(Debug, Clone)]
pub enum Published {
    /// Branch, commit and PR all exist
    Created(PullRequest),
    /// A later step failed and the branch was (if possible) deleted
    RolledBack(String),
}

/// Create the update branch, commit the new manifest and open a PR
///
/// Failure to create the branch is returned as `Err` and aborts the run;
/// later failures are rolled back and reported as [`Published::RolledBack`].
pub async fn publish_update(
    platform: &dyn PlatformService,
    ctx: &RunContext,
    candidate: &UpdateCandidate,
) -> Result<Published> {
    let branch = &candidate.branch;

    platform
        .create_branch(branch, &ctx.base_commit)
        .await
        .map_err(|e| Error::BranchCreation {
            branch: branch.clone(),
            source: Box::new(e),
        })?;
    info!("Created branch {branch} at {}", ctx.base_commit);

    let file = &ctx.manifest.file;
    if let Err(e) = platform
        .update_file(branch, &file.path, &candidate.new_content, &file.sha, &candidate.body)
        .await
    {
        let cleanup = rollback(platform, branch).await;
        return Ok(Published::RolledBack(format!(
            "failed to commit {} to {branch}: {e}{cleanup}",
            file.path
        )));
    }

    match platform
        .create_pr(branch, &ctx.base_branch, &candidate.title, &candidate.body)
        .await
    {
        Ok(pr) => {
            info!("Opened PR #{} for {}", pr.number, candidate.name);
            Ok(Published::Created(pr))
        }
        Err(e) => {
            let cleanup = rollback(platform, branch).await;
            Ok(Published::RolledBack(format!(
                "failed to open a pull request from {branch}: {e}{cleanup}"
            )))
        }
    }
}

/// Delete a just-created branch; returns a note to append if that failed
async fn rollback(platform: &dyn PlatformService, branch: &str) -> String {
    match platform.delete_branch(branch).await {
        Ok(()) => {
            info!("Deleted branch {branch}");
            String::new()
        }
        Err(e) => {
            warn!("Could not delete branch {branch}: {e}");
            format!(" (branch {branch} was left behind: {e})")
        }
    }
}

/// Attach the configured labels to a new PR
///
/// Labels are best effort; a failure is returned as a warning message.
pub async fn apply_labels(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    labels: &[String],
) -> Option<String> {
    if labels.is_empty() {
        return None;
    }

    match platform.add_labels(pr.number, labels).await {
        Ok(()) => None,
        Err(e) => {
            let message = format!("failed to label PR #{}: {e}", pr.number);
            warn!("{message}");
            Some(message)
        }
    }
}
