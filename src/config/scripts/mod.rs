mod migration;
mod resolver_audit;
mod test_patcher;

pub use migration::MigrationConfig;
pub use resolver_audit::ResolverAuditConfig;
pub use test_patcher::TestPatcherConfig;

use serde::{Deserialize, Serialize};

/// Settings shared by the pipelines that end with commit, push and pull request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishSettings {
    /// `false`: push only. `true`: push and open a pull request.
    pub open_pr: bool,
    /// Local branch pushed to `remote_branch` (also the PR head).
    pub local_branch: String,
    pub remote_branch: String,
    /// PR base branch.
    pub base: String,
    /// Commit message; reused as PR title when `title` is empty.
    pub message: String,
    pub title: String,
    pub body: String,
    /// `git [commit_extra_before] commit ...`, e.g. `["-c", "user.name=invenio-toaster-bot"]`.
    pub commit_extra_before: Vec<String>,
    /// `git ... commit ... [commit_extra_after]`, e.g. `["--no-gpg-sign"]`.
    pub commit_extra_after: Vec<String>,
    /// `git status -s` lines (trimmed, in order) that must be observed before committing.
    pub expected: Vec<String>,
    pub force_push: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            open_pr: true,
            local_branch: "master".to_string(),
            remote_branch: "master".to_string(),
            base: "master".to_string(),
            message: String::new(),
            title: String::new(),
            body: String::new(),
            commit_extra_before: Vec::new(),
            commit_extra_after: Vec::new(),
            expected: Vec::new(),
            force_push: false,
        }
    }
}

impl PublishSettings {
    pub fn pr_title(&self) -> &str {
        if self.title.is_empty() {
            &self.message
        } else {
            &self.title
        }
    }
}
