//! Source location detection
//!
//! Decides whether a pin lives on the hosting provider and, if so, which
//! repository it names.

use crate::error::{Error, Result};
use crate::types::{PinLocation, PlatformConfig, RepoSlug};
use regex::Regex;
use std::sync::LazyLock;

// scp-like form: git@host:owner/repo.git
static RE_SCP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@/]+@([^:/]+):(.+)$").expect("valid regex"));

/// Whether `hostname` is GitHub or the configured enterprise host
pub fn is_github_host(hostname: &str, enterprise_host: Option<&str>) -> bool {
    is_public_github(hostname) || enterprise_host.is_some_and(|h| hostname.eq_ignore_ascii_case(h))
}

fn is_public_github(hostname: &str) -> bool {
    hostname.eq_ignore_ascii_case("github.com")
        || hostname.to_ascii_lowercase().ends_with(".github.com")
}

/// Whether `repo` lives on the GitHub instance the run talks to
///
/// `instance_host` is `None` for github.com. Only repositories on that
/// instance can be reached with the run's token.
pub fn on_instance(repo: &RepoSlug, instance_host: Option<&str>) -> bool {
    match (repo.host.as_deref(), instance_host) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Parse an `owner/repo` repository spec for the host repository
pub fn parse_repo_spec(spec: &str, host: Option<String>) -> Result<PlatformConfig> {
    let parts: Vec<&str> = spec.trim().split('/').collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(PlatformConfig {
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
            host: host.filter(|h| h != "github.com"),
        }),
        _ => Err(Error::Parse(format!(
            "invalid repository {spec:?}, expected owner/repo"
        ))),
    }
}

/// Repository named by a Git or archive URL, if it is hosted on GitHub
///
/// Accepts `https://`, `ssh://` and scp-like URLs. Only the first two path
/// segments are used, so archive URLs resolve to their repository.
pub fn repo_from_url(url: &str, enterprise_host: Option<&str>) -> Option<RepoSlug> {
    let (hostname, path) = split_url(url)?;
    if !is_github_host(&hostname, enterprise_host) {
        return None;
    }

    let mut segments = path.trim_matches('/').split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }

    Some(RepoSlug {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (!is_public_github(&hostname)).then_some(hostname),
    })
}

/// Repository a pin location resolves to on the hosting provider
///
/// An `owner`/`repo` pin carries no host; the pin tool resolves it against
/// the instance it is pointed at, which is `enterprise_host` when set.
pub fn hosted_repo(location: &PinLocation, enterprise_host: Option<&str>) -> Option<RepoSlug> {
    match location {
        PinLocation::Repo { owner, repo } => Some(RepoSlug {
            owner: owner.clone(),
            repo: repo.clone(),
            host: enterprise_host.map(ToString::to_string),
        }),
        PinLocation::Url(url) => repo_from_url(url, enterprise_host),
    }
}

/// Repository behind an `ssh://git@<host>/` location on the hosting provider
pub fn ssh_hosted_repo(location: &PinLocation, enterprise_host: Option<&str>) -> Option<RepoSlug> {
    match location {
        PinLocation::Url(url) if url.starts_with("ssh://git@") => {
            repo_from_url(url, enterprise_host)
        }
        _ => None,
    }
}

fn split_url(url: &str) -> Option<(String, String)> {
    if !url.contains("://") {
        let caps = RE_SCP.captures(url)?;
        return Some((caps[1].to_string(), caps[2].to_string()));
    }

    let parsed = url::Url::parse(url).ok()?;
    let hostname = parsed.host_str()?.to_string();
    Some((hostname, parsed.path().to_string()))
}
