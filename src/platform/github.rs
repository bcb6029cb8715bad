//! GitHub platform service implementation

use crate::error::{Error, Result, with_timeout};
use crate::platform::PlatformService;
use crate::types::{CompareCommit, PlatformConfig, PullRequest, RepoFile, RepoSlug};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use serde::Deserialize;
use std::time::Duration;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    timeout: Duration,
}

#[derive(Deserialize)]
struct BranchResponse {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Deserialize)]
struct CompareResponse {
    #[serde(default)]
    commits: Vec<CompareCommitResponse>,
}

#[derive(Deserialize)]
struct CompareCommitResponse {
    sha: String,
    html_url: String,
    commit: CommitDetails,
    #[serde(default)]
    parents: Vec<CommitRef>,
}

#[derive(Deserialize)]
struct CommitDetails {
    message: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// A custom `host` is treated as GitHub Enterprise (`https://{host}/api/v3`).
    pub fn new(token: &str, config: PlatformConfig, timeout: Duration) -> Result<Self> {
        let base_uri = config.host.as_ref().map(|h| format!("https://{h}/api/v3"));
        Self::build(token, config, base_uri.as_deref(), timeout)
    }

    /// Create a service talking to an explicit API root
    pub fn with_base_uri(
        token: &str,
        config: PlatformConfig,
        base_uri: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Self::build(token, config, Some(base_uri), timeout)
    }

    fn build(
        token: &str,
        config: PlatformConfig,
        base_uri: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config,
            timeout,
        })
    }

    fn repo_route(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.config.owner, self.config.repo)
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn decode_content(path: &str, response: ContentResponse) -> Result<RepoFile> {
    let raw = response
        .content
        .ok_or_else(|| Error::GitHubApi(format!("{path} has no inline content")))?;

    if let Some(encoding) = response.encoding.as_deref().filter(|e| *e != "base64") {
        return Err(Error::GitHubApi(format!(
            "{path} uses unsupported encoding {encoding}"
        )));
    }

    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| Error::Parse(format!("{path} is not valid base64: {e}")))?;
    let content =
        String::from_utf8(bytes).map_err(|e| Error::Parse(format!("{path} is not UTF-8: {e}")))?;

    Ok(RepoFile {
        path: path.to_string(),
        content,
        sha: response.sha,
    })
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn branch_head(&self, branch: &str) -> Result<Option<String>> {
        let route = self.repo_route(&format!("/branches/{}", urlencoding::encode(branch)));

        with_timeout("branch lookup", self.timeout, async {
            match self.client.get::<BranchResponse, _, ()>(route, None).await {
                Ok(found) => Ok(Some(found.commit.sha)),
                Err(e) if is_not_found(&e) => Ok(None),
                Err(e) => Err(Error::from(e)),
            }
        })
        .await
    }

    async fn get_file(&self, path: &str, git_ref: &str) -> Result<RepoFile> {
        let route = self.repo_route(&format!("/contents/{}", path.trim_start_matches('/')));

        let response: ContentResponse = with_timeout("file read", self.timeout, async {
            self.client
                .get(route, Some(&[("ref", git_ref)]))
                .await
                .map_err(Error::from)
        })
        .await?;

        decode_content(path, response)
    }

    async fn compare_commits(
        &self,
        repo: &RepoSlug,
        base: &str,
        head: &str,
    ) -> Result<Vec<CompareCommit>> {
        let route = format!("/repos/{}/{}/compare/{base}...{head}", repo.owner, repo.repo);

        let response: CompareResponse = with_timeout("commit comparison", self.timeout, async {
            self.client
                .get(route, None::<&()>)
                .await
                .map_err(Error::from)
        })
        .await?;

        Ok(response
            .commits
            .into_iter()
            .map(|c| CompareCommit {
                sha: c.sha,
                html_url: c.html_url,
                message: c.commit.message,
                parent_count: c.parents.len(),
            })
            .collect())
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        with_timeout("branch creation", self.timeout, async {
            self.client
                .repos(&self.config.owner, &self.config.repo)
                .create_ref(&Reference::Branch(branch.to_string()), sha)
                .await
                .map(|_| ())
                .map_err(Error::from)
        })
        .await
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        with_timeout("branch deletion", self.timeout, async {
            self.client
                .repos(&self.config.owner, &self.config.repo)
                .delete_ref(&Reference::Branch(branch.to_string()))
                .await
                .map_err(Error::from)
        })
        .await
    }

    async fn update_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        blob_sha: &str,
        message: &str,
    ) -> Result<()> {
        with_timeout("file upload", self.timeout, async {
            self.client
                .repos(&self.config.owner, &self.config.repo)
                .update_file(path, message, content, blob_sha)
                .branch(branch)
                .send()
                .await
                .map(|_| ())
                .map_err(Error::from)
        })
        .await
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        let pr = with_timeout("pull request creation", self.timeout, async {
            self.client
                .pulls(&self.config.owner, &self.config.repo)
                .create(title, head, base)
                .body(body)
                .send()
                .await
                .map_err(Error::from)
        })
        .await?;

        Ok(PullRequest {
            number: pr.number,
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            title: pr.title.as_deref().unwrap_or_default().to_string(),
        })
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        with_timeout("label update", self.timeout, async {
            self.client
                .issues(&self.config.owner, &self.config.repo)
                .add_labels(pr_number, labels)
                .await
                .map(|_| ())
                .map_err(Error::from)
        })
        .await
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
