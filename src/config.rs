//! Run configuration
//!
//! [`UpdateOptions`] is built once by the binary and passed by reference into
//! every component. Nothing in the library reads the environment on its own.

use crate::error::{Error, Result};
use std::time::Duration;

/// Default branch-name prefix for proposed updates
pub const DEFAULT_BRANCH_PREFIX: &str = "update/";

/// Default manifest path inside the host repository
pub const DEFAULT_SOURCES_FILE: &str = "nix/sources.json";

/// Default bound on each external call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Immutable configuration for one run
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateOptions {
    /// Manifest path inside the host repository
    pub sources_file: String,
    /// Explicit working set; empty means every manifest entry
    pub allowlist: Vec<String>,
    /// Names never processed
    pub denylist: Vec<String>,
    /// Labels attached to created PRs
    pub labels: Vec<String>,
    /// Skip sources reachable only over SSH
    pub skip_ssh_repos: bool,
    /// Skip revisions that are not content hashes
    pub skip_versioned_revisions: bool,
    /// Prefix for created branch names
    pub branch_prefix: String,
    /// Prefix for PR titles
    pub title_prefix: String,
    /// Text placed before the changelog
    pub message_prefix: String,
    /// Text placed after the changelog
    pub message_suffix: String,
    /// Keep merge commits in the changelog
    pub show_merges: bool,
    /// Explicit PR base branch
    pub pull_request_base: Option<String>,
    /// Ref that triggered the run (`refs/heads/<name>` or a bare name)
    pub triggering_ref: Option<String>,
    /// Bound on each hosting-API call and pin-tool invocation
    pub timeout: Duration,
    /// Probe only; publish nothing
    pub dry_run: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            sources_file: DEFAULT_SOURCES_FILE.to_string(),
            allowlist: Vec::new(),
            denylist: Vec::new(),
            labels: Vec::new(),
            skip_ssh_repos: false,
            skip_versioned_revisions: true,
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            title_prefix: String::new(),
            message_prefix: String::new(),
            message_suffix: String::new(),
            show_merges: false,
            pull_request_base: None,
            triggering_ref: None,
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
        }
    }
}

impl UpdateOptions {
    /// Branch that PRs target and the manifest is read from
    ///
    /// The explicit base wins; otherwise the triggering ref with any
    /// `refs/heads/` prefix removed.
    pub fn base_branch(&self) -> Result<String> {
        if let Some(base) = self.pull_request_base.as_deref().filter(|b| !b.is_empty()) {
            return Ok(base.to_string());
        }

        self.triggering_ref
            .as_deref()
            .map(|r| r.strip_prefix("refs/heads/").unwrap_or(r))
            .filter(|r| !r.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| {
                Error::Config(
                    "no pull request base configured and no triggering ref available".to_string(),
                )
            })
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones
pub fn parse_comma_list(raw: &str) -> Vec<String> {
    split_list(raw, ',')
}

/// Split a newline-separated list, trimming items and dropping empty ones
pub fn parse_line_list(raw: &str) -> Vec<String> {
    split_list(raw, '\n')
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}
