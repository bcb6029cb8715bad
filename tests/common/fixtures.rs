//! Test data factories

#![allow(dead_code)]

use pin_updater::config::UpdateOptions;
use pin_updater::types::{CompareCommit, PlatformConfig};
use serde_json::{Map, Value, json};

pub const BASE_BRANCH: &str = "main";
pub const BASE_COMMIT: &str = "base0000base0000base0000base0000base0000";
pub const SOURCES_FILE: &str = "nix/sources.json";
pub const SOURCES_BLOB: &str = "blob1111";

pub const REV_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const REV_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const REV_C: &str = "cccccccccccccccccccccccccccccccccccccccc";

/// Config of the host repository
pub fn make_config() -> PlatformConfig {
    PlatformConfig {
        owner: "acme".to_string(),
        repo: "infra".to_string(),
        host: None,
    }
}

/// Options targeting [`BASE_BRANCH`]
pub fn make_options() -> UpdateOptions {
    UpdateOptions {
        pull_request_base: Some(BASE_BRANCH.to_string()),
        ..UpdateOptions::default()
    }
}

/// A pin hosted at `owner/repo`
pub fn github_pin(owner: &str, repo: &str, rev: &str) -> Value {
    json!({
        "branch": "main",
        "owner": owner,
        "repo": repo,
        "rev": rev,
        "type": "tarball",
        "url": format!("https://github.com/{owner}/{repo}/archive/{rev}.tar.gz"),
    })
}

/// A git pin reachable only over SSH
pub fn ssh_pin(url: &str, rev: &str) -> Value {
    json!({
        "branch": "main",
        "repo": url,
        "rev": rev,
        "type": "git",
    })
}

/// Manifest text with pins in the given order
///
/// Formatted the way the fake tool writes, so untouched pins round-trip
/// byte for byte.
pub fn manifest_json(pins: &[(&str, Value)]) -> String {
    let map: Map<String, Value> = pins
        .iter()
        .map(|(name, pin)| ((*name).to_string(), pin.clone()))
        .collect();
    serde_json::to_string_pretty(&Value::Object(map)).unwrap()
}

pub fn make_commit(sha: &str, message: &str, parent_count: usize) -> CompareCommit {
    CompareCommit {
        sha: sha.to_string(),
        html_url: format!("https://github.com/x/y/commit/{sha}"),
        message: message.to_string(),
        parent_count,
    }
}
