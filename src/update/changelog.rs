//! Changelog rendering for update PRs

use crate::platform::{PlatformService, on_instance};
use crate::types::{CompareCommit, RepoSlug};
use regex::{Captures, Regex};
use std::fmt::Write;
use std::sync::LazyLock;
use tracing::warn;

// A bare `#123`, not already qualified as `owner/repo#123`.
static ISSUE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w/.-])#(\d+)\b").expect("valid regex"));

/// First 8 characters of a revision
pub fn short_rev(rev: &str) -> &str {
    rev.get(..8).unwrap_or(rev)
}

/// PR title for an update of `name`
pub fn pr_title(title_prefix: &str, name: &str, old_rev: &str, new_rev: &str) -> String {
    format!(
        "{title_prefix}{name}: update {} -> {}",
        short_rev(old_rev),
        short_rev(new_rev)
    )
}

/// Wrap a changelog with the configured prefix and suffix
///
/// Each non-empty wrapper gets its own trailing line break.
pub fn compose_message(prefix: &str, changelog: &str, suffix: &str) -> String {
    let mut message = String::new();
    if !prefix.is_empty() {
        message.push_str(prefix);
        message.push('\n');
    }
    message.push_str(changelog);
    if !suffix.is_empty() {
        message.push_str(suffix);
        message.push('\n');
    }
    message
}

/// Placeholder used when the source is not on the run's GitHub instance
pub fn unavailable_changelog(name: &str, instance_host: Option<&str>) -> String {
    format!(
        "No changelog available for {name}: the source is not hosted on {}.\n",
        instance_host.unwrap_or("github.com")
    )
}

/// Render a commit range as a condensed markdown list
pub fn render_changelog(
    name: &str,
    repo: &RepoSlug,
    old_rev: &str,
    new_rev: &str,
    commits: &[CompareCommit],
    show_merges: bool,
) -> String {
    let full_name = repo.full_name();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "## Changelog for {name}: [{full_name}@{}...{}]({}/compare/{old_rev}...{new_rev})",
        short_rev(old_rev),
        short_rev(new_rev),
        repo.web_url()
    );
    out.push('\n');

    for commit in commits.iter().filter(|c| show_merges || !c.is_merge()) {
        let subject = commit.message.lines().next().unwrap_or_default();
        let _ = writeln!(
            out,
            "* [`{}`]({}) {}",
            short_rev(&commit.sha),
            commit.html_url,
            qualify_issue_refs(subject, &full_name)
        );
    }

    out
}

/// Fetch the commit range and render it
///
/// Only repositories on the platform's own instance are compared. A failed
/// comparison yields an empty list rather than an error.
pub async fn build_changelog(
    platform: &dyn PlatformService,
    name: &str,
    repo: Option<&RepoSlug>,
    old_rev: &str,
    new_rev: &str,
    show_merges: bool,
) -> String {
    let instance_host = platform.config().host.as_deref();
    let Some(repo) = repo.filter(|r| on_instance(r, instance_host)) else {
        return unavailable_changelog(name, instance_host);
    };

    let commits = match platform.compare_commits(repo, old_rev, new_rev).await {
        Ok(commits) => commits,
        Err(e) => {
            warn!("Could not compare {old_rev}...{new_rev} in {}: {e}", repo.full_name());
            Vec::new()
        }
    };

    render_changelog(name, repo, old_rev, new_rev, &commits, show_merges)
}

/// Rewrite `#123` to `owner/repo#123`
fn qualify_issue_refs(subject: &str, full_name: &str) -> String {
    ISSUE_REF_RE
        .replace_all(subject, |caps: &Captures| {
            format!("{}{full_name}#{}", &caps[1], &caps[2])
        })
        .into_owned()
}
