//! Working-set selection, revision classification and duplicate detection

use crate::config::UpdateOptions;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PinManifest;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

// Abbreviated (7+) up to full SHA-1 (40) or SHA-256 (64) object ids.
static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,64}$").expect("valid regex"));

/// Dependencies chosen for this run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Names to process, in order
    pub names: Vec<String>,
    /// Names removed by the deny-list, in order
    pub denied: Vec<String>,
}

/// What kind of revision a pin carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    /// A content hash; eligible for update checks
    HashLike,
    /// A human-assigned version label
    VersionLike,
}

/// Compute the working set
///
/// The allow-list, when non-empty, is the working set in its own order;
/// otherwise every manifest key in manifest order. Deny-listed names are
/// removed in both cases.
pub fn select_dependencies(manifest: &PinManifest, options: &UpdateOptions) -> Selection {
    let candidates: Vec<String> = if options.allowlist.is_empty() {
        manifest.names().map(ToString::to_string).collect()
    } else {
        options.allowlist.clone()
    };

    let mut selection = Selection::default();
    for name in candidates {
        if options.denylist.iter().any(|denied| *denied == name) {
            info!("Skipping {name}: deny-listed");
            selection.denied.push(name);
        } else {
            selection.names.push(name);
        }
    }

    debug!("Selected dependencies: {:?}", selection.names);
    selection
}

/// Classify a revision string
pub fn classify_revision(revision: &str) -> RevisionKind {
    if HASH_RE.is_match(revision) {
        RevisionKind::HashLike
    } else {
        RevisionKind::VersionLike
    }
}

/// Branch name proposing an update of `name` away from `revision`
pub fn update_branch_name(prefix: &str, name: &str, revision: &str) -> String {
    format!("{prefix}{name}-{revision}")
}

/// Whether an update branch was already proposed
///
/// A fresh query every time; there is no cache and no claim, so two runs
/// started together can both see `false`.
pub async fn already_proposed(platform: &dyn PlatformService, branch: &str) -> Result<bool> {
    Ok(platform.branch_head(branch).await?.is_some())
}
