//! Error types for pin-updater

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the update workflow and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// No usable hosting-provider token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Hosting API rejected a request
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Hosting API transport or decoding failure
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Generic platform failure (used by alternative service implementations)
    #[error("platform error: {0}")]
    Platform(String),

    /// The pin manifest could not be read or decoded
    #[error("pin manifest error: {0}")]
    Manifest(String),

    /// A branch needed by the run does not exist
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// An update branch could not be created
    #[error("failed to create branch {branch}: {source}")]
    BranchCreation {
        /// Branch that was being created
        branch: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The external pin-update tool reported failure
    #[error("pin tool failed: {0}")]
    PinTool(String),

    /// An external call did not finish in time
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        /// What was being waited on
        operation: String,
        /// The bound that expired
        after: Duration,
    },

    /// Malformed input that could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem failure in the scratch workspace
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Run `fut` with an upper bound on how long it may take
pub async fn with_timeout<T, F>(operation: &str, after: Duration, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| Error::Timeout {
            operation: operation.to_string(),
            after,
        })?
}
