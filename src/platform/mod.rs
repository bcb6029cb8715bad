//! Hosting-provider services
//!
//! Provides the hosting-API operations the update workflow consumes.

mod detection;
mod github;

pub use detection::{
    hosted_repo, is_github_host, on_instance, parse_repo_spec, repo_from_url, ssh_hosted_repo,
};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CompareCommit, PlatformConfig, PullRequest, RepoFile, RepoSlug};
use async_trait::async_trait;

/// Hosting service trait for branch, file and PR operations
///
/// Every method acts on the host repository named by [`Self::config`], except
/// [`Self::compare_commits`], which takes the repository to compare in.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Head commit of a branch, or `None` if the branch does not exist
    async fn branch_head(&self, branch: &str) -> Result<Option<String>>;

    /// Read a file and its blob SHA at a ref
    async fn get_file(&self, path: &str, git_ref: &str) -> Result<RepoFile>;

    /// Commits reachable from `head` but not from `base`, oldest first
    async fn compare_commits(
        &self,
        repo: &RepoSlug,
        base: &str,
        head: &str,
    ) -> Result<Vec<CompareCommit>>;

    /// Create a branch pointing at `sha`
    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()>;

    /// Delete a branch
    async fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Replace a file on a branch with a single commit
    ///
    /// `blob_sha` must be the SHA of the file being replaced.
    async fn update_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        blob_sha: &str,
        message: &str,
    ) -> Result<()>;

    /// Create a new PR
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Attach labels to a PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
