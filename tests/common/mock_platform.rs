//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use pin_updater::error::{Error, Result};
use pin_updater::platform::PlatformService;
use pin_updater::types::{CompareCommit, PlatformConfig, PullRequest, RepoFile, RepoSlug};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `update_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFileCall {
    pub branch: String,
    pub path: String,
    pub content: String,
    pub blob_sha: String,
    pub message: String,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// In-memory hosting service
///
/// Branches live in a map so `create_branch`/`delete_branch` are observable
/// through `branch_head`. Any operation can be made to fail.
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    branches: Mutex<HashMap<String, String>>,
    files: Mutex<HashMap<String, RepoFile>>,
    compare_responses: Mutex<HashMap<String, Vec<CompareCommit>>>,
    // Call tracking
    branch_head_calls: Mutex<Vec<String>>,
    get_file_calls: Mutex<Vec<(String, String)>>,
    compare_calls: Mutex<Vec<(RepoSlug, String, String)>>,
    create_branch_calls: Mutex<Vec<(String, String)>>,
    delete_branch_calls: Mutex<Vec<String>>,
    update_file_calls: Mutex<Vec<UpdateFileCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    // Error injection
    error_on_get_file: Mutex<Option<String>>,
    error_on_compare: Mutex<Option<String>>,
    error_on_create_branch: Mutex<Option<String>>,
    error_on_delete_branch: Mutex<Option<String>>,
    error_on_update_file: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            branches: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            compare_responses: Mutex::new(HashMap::new()),
            branch_head_calls: Mutex::new(Vec::new()),
            get_file_calls: Mutex::new(Vec::new()),
            compare_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            delete_branch_calls: Mutex::new(Vec::new()),
            update_file_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            error_on_get_file: Mutex::new(None),
            error_on_compare: Mutex::new(None),
            error_on_create_branch: Mutex::new(None),
            error_on_delete_branch: Mutex::new(None),
            error_on_update_file: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Make a branch exist at `sha`
    pub fn set_branch(&self, branch: &str, sha: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert(branch.to_string(), sha.to_string());
    }

    /// Serve `content` for `path` (at any ref)
    pub fn set_file(&self, path: &str, content: &str, sha: &str) {
        self.files.lock().unwrap().insert(
            path.to_string(),
            RepoFile {
                path: path.to_string(),
                content: content.to_string(),
                sha: sha.to_string(),
            },
        );
    }

    /// Commits returned when comparing in `full_name`
    pub fn set_compare_response(&self, full_name: &str, commits: Vec<CompareCommit>) {
        self.compare_responses
            .lock()
            .unwrap()
            .insert(full_name.to_string(), commits);
    }

    // === Error injection methods ===

    pub fn fail_get_file(&self, msg: &str) {
        *self.error_on_get_file.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_compare(&self, msg: &str) {
        *self.error_on_compare.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_delete_branch(&self, msg: &str) {
        *self.error_on_delete_branch.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_update_file(&self, msg: &str) {
        *self.error_on_update_file.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn has_branch(&self, branch: &str) -> bool {
        self.branches.lock().unwrap().contains_key(branch)
    }

    pub fn get_branch_head_calls(&self) -> Vec<String> {
        self.branch_head_calls.lock().unwrap().clone()
    }

    pub fn get_file_calls(&self) -> Vec<(String, String)> {
        self.get_file_calls.lock().unwrap().clone()
    }

    pub fn get_compare_calls(&self) -> Vec<(RepoSlug, String, String)> {
        self.compare_calls.lock().unwrap().clone()
    }

    pub fn get_create_branch_calls(&self) -> Vec<(String, String)> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    pub fn get_delete_branch_calls(&self) -> Vec<String> {
        self.delete_branch_calls.lock().unwrap().clone()
    }

    pub fn get_update_file_calls(&self) -> Vec<UpdateFileCall> {
        self.update_file_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// Number of calls that change the remote
    pub fn write_call_count(&self) -> usize {
        self.get_create_branch_calls().len()
            + self.get_delete_branch_calls().len()
            + self.get_update_file_calls().len()
            + self.get_create_pr_calls().len()
            + self.get_add_labels_calls().len()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that the remote was never changed
    pub fn assert_no_writes(&self) {
        assert_eq!(
            self.write_call_count(),
            0,
            "Expected no write calls, got branches {:?}, files {:?}, PRs {:?}",
            self.get_create_branch_calls(),
            self.get_update_file_calls(),
            self.get_create_pr_calls()
        );
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::Platform(msg.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn branch_head(&self, branch: &str) -> Result<Option<String>> {
        self.branch_head_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        Ok(self.branches.lock().unwrap().get(branch).cloned())
    }

    async fn get_file(&self, path: &str, git_ref: &str) -> Result<RepoFile> {
        self.get_file_calls
            .lock()
            .unwrap()
            .push((path.to_string(), git_ref.to_string()));
        injected(&self.error_on_get_file)?;

        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("{path} not found")))
    }

    async fn compare_commits(
        &self,
        repo: &RepoSlug,
        base: &str,
        head: &str,
    ) -> Result<Vec<CompareCommit>> {
        self.compare_calls
            .lock()
            .unwrap()
            .push((repo.clone(), base.to_string(), head.to_string()));
        injected(&self.error_on_compare)?;

        Ok(self
            .compare_responses
            .lock()
            .unwrap()
            .get(&repo.full_name())
            .cloned()
            .unwrap_or_default())
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push((branch.to_string(), sha.to_string()));
        injected(&self.error_on_create_branch)?;

        self.set_branch(branch, sha);
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        injected(&self.error_on_delete_branch)?;

        self.branches.lock().unwrap().remove(branch);
        Ok(())
    }

    async fn update_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        blob_sha: &str,
        message: &str,
    ) -> Result<()> {
        self.update_file_calls.lock().unwrap().push(UpdateFileCall {
            branch: branch.to_string(),
            path: path.to_string(),
            content: content.to_string(),
            blob_sha: blob_sha.to_string(),
            message: message.to_string(),
        });
        injected(&self.error_on_update_file)
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        injected(&self.error_on_create_pr)?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            pr_number,
            labels: labels.to_vec(),
        });
        injected(&self.error_on_add_labels)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
