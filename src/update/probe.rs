//! Update probing in a scratch workspace

use crate::error::{Error, Result};
use crate::tool::PinTool;
use crate::types::PinManifest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const ORIGINAL_FILE: &str = "sources.original.json";
const WORKING_FILE: &str = "sources.json";

/// Scratch directory holding two copies of the manifest
///
/// `original` is never edited; the pin tool only ever sees `working`. The
/// directory is removed when the workspace is dropped.
pub struct Workspace {
    dir: TempDir,
    original: PathBuf,
    working: PathBuf,
}

impl Workspace {
    /// Seed a new scratch directory with `content`
    pub fn create(content: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("pin-updater-").tempdir()?;
        let original = dir.path().join(ORIGINAL_FILE);
        let working = dir.path().join(WORKING_FILE);
        fs::write(&original, content)?;
        fs::write(&working, content)?;

        Ok(Self {
            dir,
            original,
            working,
        })
    }

    /// Working copy handed to the pin tool
    pub fn working_path(&self) -> &Path {
        &self.working
    }

    /// Untouched copy of the manifest
    pub fn read_original(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.original)?)
    }

    /// Current working copy
    pub fn read_working(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.working)?)
    }

    /// Overwrite the working copy with the original
    pub fn reset_working(&self) -> Result<()> {
        fs::copy(&self.original, &self.working)?;
        Ok(())
    }
}

/// Result of asking the pin tool for a newer revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The tool failed; nothing was published
    Failed(String),
    /// Same content, or same revision
    Unchanged,
    /// A newer revision exists
    Updated {
        /// Revision after the update
        new_revision: String,
    },
}

/// Run the pin tool's update for one dependency and compare the result
pub async fn probe_update(
    tool: &dyn PinTool,
    workspace: &Workspace,
    name: &str,
    old_revision: &str,
) -> Result<ProbeOutcome> {
    if let Err(e) = tool.update_pin(workspace.working_path(), name).await {
        return Ok(ProbeOutcome::Failed(e.to_string()));
    }

    let before = workspace.read_original()?;
    let after = workspace.read_working()?;
    if before == after {
        debug!("{name}: manifest unchanged after update");
        return Ok(ProbeOutcome::Unchanged);
    }

    let new_revision = PinManifest::parse(&after)?
        .entry(name)?
        .and_then(|entry| entry.revision().map(ToString::to_string))
        .ok_or_else(|| Error::PinTool(format!("{name} has no revision after update")))?;

    if new_revision == old_revision {
        debug!("{name}: manifest changed but revision is still {old_revision}");
        return Ok(ProbeOutcome::Unchanged);
    }

    Ok(ProbeOutcome::Updated { new_revision })
}
