//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, CI annotations, tests) to
//! receive progress updates while dependencies are processed.

use crate::types::PullRequest;
use crate::update::SkipReason;
use async_trait::async_trait;
use std::fmt;

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Resolving the base commit and reading the manifest
    Resolving,
    /// Computing the working set
    Selecting,
    /// Probing and publishing dependencies
    Updating,
    /// Run complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolving => write!(f, "Reading pin manifest"),
            Self::Selecting => write!(f, "Selecting dependencies"),
            Self::Updating => write!(f, "Checking for updates"),
            Self::Complete => write!(f, "Done"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during a run.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when a dependency starts processing
    async fn on_dependency(&self, name: &str);

    /// Called when a dependency is skipped
    async fn on_skipped(&self, name: &str, reason: &SkipReason);

    /// Called when a PR is created
    async fn on_pr_created(&self, name: &str, pr: &PullRequest);

    /// Called for a non-fatal problem
    async fn on_warning(&self, message: &str);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_dependency(&self, _name: &str) {}
    async fn on_skipped(&self, _name: &str, _reason: &SkipReason) {}
    async fn on_pr_created(&self, _name: &str, _pr: &PullRequest) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_message(&self, _message: &str) {}
}
