//! Core types for pin-updater

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a pinned dependency is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinLocation {
    /// Hosting-provider form (`owner` + `repo` fields)
    Repo {
        /// Repository owner (user or organization)
        owner: String,
        /// Repository name
        repo: String,
    },
    /// Arbitrary Git URL, possibly `ssh://`
    Url(String),
}

/// A single pin as stored in the manifest
///
/// Every field is optional on the wire; accessors turn the raw fields into the
/// shapes the workflow needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinEntry {
    /// Repository owner (hosting-provider form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository name, or a Git URL for plain git pins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Pinned revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Tracked branch or tag
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Tracked branch (older field name for `ref`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Pin type discriminator
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl PinEntry {
    /// Resolve the entry's location
    ///
    /// `owner` + `repo` wins; otherwise `url`, then a URL-shaped `repo`.
    pub fn location(&self) -> Option<PinLocation> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                return Some(PinLocation::Repo {
                    owner: owner.clone(),
                    repo: repo.clone(),
                });
            }
            _ => {}
        }

        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.repo.as_deref().filter(|r| r.contains("://")))
            .map(|u| PinLocation::Url(u.to_string()))
    }

    /// Current revision, if present and non-empty
    pub fn revision(&self) -> Option<&str> {
        self.rev.as_deref().filter(|r| !r.is_empty())
    }

    /// Tracked branch or tag, if any
    pub fn tracked_ref(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .or(self.branch.as_deref())
            .filter(|r| !r.is_empty())
    }
}

/// The pin manifest: dependency name to raw pin object, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinManifest {
    entries: Map<String, Value>,
}

impl PinManifest {
    /// Decode manifest JSON; the top level must be an object
    pub fn parse(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(Error::Manifest(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Dependency names in manifest order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Typed view of one entry; `Ok(None)` if the name is absent
    pub fn entry(&self, name: &str) -> Result<Option<PinEntry>> {
        self.entries
            .get(name)
            .map(|raw| serde_json::from_value::<PinEntry>(raw.clone()))
            .transpose()
            .map_err(|e| Error::Manifest(format!("invalid pin entry {name}: {e}")))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A file read from the host repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    /// Path inside the repository
    pub path: String,
    /// Decoded file content
    pub content: String,
    /// Blob SHA; required to update this exact file
    pub sha: String,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// One commit from a commit-range comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareCommit {
    /// Full commit SHA
    pub sha: String,
    /// Web URL for the commit
    pub html_url: String,
    /// Full commit message
    pub message: String,
    /// Number of parent commits
    pub parent_count: usize,
}

impl CompareCommit {
    /// Merge commits have more than one parent
    pub const fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}

/// A repository on a hosting provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl RepoSlug {
    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Browser URL of the repository
    pub fn web_url(&self) -> String {
        format!(
            "https://{}/{}/{}",
            self.host.as_deref().unwrap_or("github.com"),
            self.owner,
            self.repo
        )
    }
}

/// Platform configuration for the host repository
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
