//! External pin-update tool
//!
//! The tool resolves the latest revision of a source; the workflow only ever
//! asks it to edit a manifest file in place.

mod niv;

pub use niv::NivTool;

use crate::error::Result;
use crate::types::RepoSlug;
use async_trait::async_trait;
use std::path::Path;

/// Operations the workflow needs from the pin-update tool
///
/// Every call edits `manifest` in place and returns `Err` if the tool reported
/// failure.
#[async_trait]
pub trait PinTool: Send + Sync {
    /// Remove the pin `name`
    async fn drop_pin(&self, manifest: &Path, name: &str) -> Result<()>;

    /// Add `name` as a hosting-provider pin at an exact revision
    ///
    /// Fails if `repo` is not on the instance the tool resolves against.
    async fn add_pin(
        &self,
        manifest: &Path,
        name: &str,
        repo: &RepoSlug,
        revision: &str,
        branch: Option<&str>,
    ) -> Result<()>;

    /// Move the pin `name` to the latest revision of what it tracks
    async fn update_pin(&self, manifest: &Path, name: &str) -> Result<()>;

    /// Set the revision of `name` without touching its location
    async fn modify_pin(&self, manifest: &Path, name: &str, revision: &str) -> Result<()>;
}
