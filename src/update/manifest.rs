//! Pin manifest reader

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{PinManifest, RepoFile};
use tracing::debug;

/// The manifest as read from the host repository at the base commit
#[derive(Debug, Clone)]
pub struct ManifestSnapshot {
    /// Raw file, including the blob SHA needed to write it back
    pub file: RepoFile,
    /// Decoded entries
    pub manifest: PinManifest,
}

/// Fetch and decode the manifest at `git_ref`
///
/// Any failure here aborts the run: nothing can be proposed without it.
pub async fn read_manifest(
    platform: &dyn PlatformService,
    path: &str,
    git_ref: &str,
) -> Result<ManifestSnapshot> {
    let file = platform
        .get_file(path, git_ref)
        .await
        .map_err(|e| Error::Manifest(format!("cannot fetch {path} at {git_ref}: {e}")))?;

    let manifest = PinManifest::parse(&file.content)
        .map_err(|e| Error::Manifest(format!("cannot decode {path}: {e}")))?;

    debug!(
        "Read {} pins from {path} at {git_ref} (blob {})",
        manifest.len(),
        file.sha
    );

    Ok(ManifestSnapshot { file, manifest })
}
