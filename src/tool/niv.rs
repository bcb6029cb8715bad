//! `niv` subprocess implementation

use crate::error::{Error, Result, with_timeout};
use crate::platform::on_instance;
use crate::tool::PinTool;
use crate::types::RepoSlug;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs `niv` against an explicit sources file
pub struct NivTool {
    program: OsString,
    token: Option<String>,
    host: Option<String>,
    timeout: Duration,
}

impl NivTool {
    /// Create a tool runner
    ///
    /// `token` is exported as `GITHUB_TOKEN` so owner/repo pins of private
    /// repositories can be resolved.
    pub fn new(program: impl Into<OsString>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            token,
            host: None,
            timeout,
        }
    }

    /// Resolve `owner/repo` pins against a GitHub Enterprise host
    #[must_use]
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    async fn run(&self, manifest: &Path, args: &[&str]) -> Result<()> {
        debug!("running {:?} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command
            .arg("--sources-file")
            .arg(manifest)
            .args(args)
            .kill_on_drop(true);
        if let Some(dir) = manifest.parent() {
            command.current_dir(dir);
        }
        if let Some(token) = &self.token {
            command.env("GITHUB_TOKEN", token);
        }
        // niv's API location; the Actions runner sets its own GITHUB_PATH
        match &self.host {
            Some(host) => {
                command
                    .env("GITHUB_HOST", host)
                    .env("GITHUB_API_HOST", host)
                    .env("GITHUB_PATH", "/api/v3");
            }
            None => {
                command
                    .env_remove("GITHUB_HOST")
                    .env_remove("GITHUB_API_HOST")
                    .env_remove("GITHUB_PATH");
            }
        }

        let operation = format!("pin tool `{}`", args.first().copied().unwrap_or_default());
        let output = with_timeout(&operation, self.timeout, async {
            command.output().await.map_err(Error::from)
        })
        .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(Error::PinTool(format!(
            "`{}` exited with {}: {}",
            args.join(" "),
            output.status,
            stderr.trim()
        )))
    }
}

#[async_trait]
impl PinTool for NivTool {
    async fn drop_pin(&self, manifest: &Path, name: &str) -> Result<()> {
        self.run(manifest, &["drop", name]).await
    }

    async fn add_pin(
        &self,
        manifest: &Path,
        name: &str,
        repo: &RepoSlug,
        revision: &str,
        branch: Option<&str>,
    ) -> Result<()> {
        if !on_instance(repo, self.host.as_deref()) {
            return Err(Error::PinTool(format!(
                "{} is on {} but niv resolves against {}",
                repo.full_name(),
                repo.host.as_deref().unwrap_or("github.com"),
                self.host.as_deref().unwrap_or("github.com")
            )));
        }

        let owner_repo = repo.full_name();
        let mut args = vec!["add", &owner_repo, "--name", name, "--rev", revision];
        if let Some(branch) = branch {
            args.extend(["--branch", branch]);
        }
        self.run(manifest, &args).await
    }

    async fn update_pin(&self, manifest: &Path, name: &str) -> Result<()> {
        self.run(manifest, &["update", name]).await
    }

    async fn modify_pin(&self, manifest: &Path, name: &str, revision: &str) -> Result<()> {
        let attribute = format!("rev={revision}");
        self.run(manifest, &["modify", name, "--attribute", &attribute])
            .await
    }
}
