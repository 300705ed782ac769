use toaster_patch_core::status_matches;
use toaster_schema::{CreatePullRequest, PullRequest};
use tracing::info;

use super::git::GitRunner;
use super::local::LocalRepository;
use crate::config::PublishSettings;
use crate::error::WorkflowError;
use crate::github::{HostingApi, RepositoryRef};

/// Everything the commit → push → pull request sequence needs for one repository.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub repository: RepositoryRef,
    pub remote: String,
    pub open_pr: bool,
    pub expected: Vec<String>,
    pub local_branch: String,
    pub remote_branch: String,
    pub base: String,
    pub message: String,
    pub title: String,
    pub body: String,
    pub commit_extra_before: Vec<String>,
    pub commit_extra_after: Vec<String>,
    pub force: bool,
}

impl PublishRequest {
    pub fn from_settings(
        repository: RepositoryRef,
        remote: &str,
        settings: &PublishSettings,
    ) -> Self {
        Self {
            repository,
            remote: remote.to_string(),
            open_pr: settings.open_pr,
            expected: settings.expected.clone(),
            local_branch: settings.local_branch.clone(),
            remote_branch: settings.remote_branch.clone(),
            base: settings.base.clone(),
            message: settings.message.clone(),
            title: settings.pr_title().to_string(),
            body: settings.body.clone(),
            commit_extra_before: settings.commit_extra_before.clone(),
            commit_extra_after: settings.commit_extra_after.clone(),
            force: settings.force_push,
        }
    }
}

impl<G: GitRunner> LocalRepository<G> {
    /// Check status, commit, push and optionally open a pull request, stopping
    /// at the first failing stage.
    ///
    /// Returns the opened pull request in PR mode.
    pub async fn publish(
        &self,
        hosting: &dyn HostingApi,
        request: &PublishRequest,
    ) -> Result<Option<PullRequest>, WorkflowError> {
        let observed = self.status().map_err(WorkflowError::Status)?;
        if !status_matches(&observed, &request.expected) {
            return Err(WorkflowError::ReviewModifications {
                expected: request.expected.clone(),
                observed,
            });
        }
        info!(repository = %self.name(), "has to be committed");

        self.commit(
            &request.message,
            &request.commit_extra_before,
            &request.commit_extra_after,
        )
        .map_err(WorkflowError::Commit)?;

        self.push(
            &request.remote,
            &request.local_branch,
            &request.remote_branch,
            request.force,
        )
        .map_err(WorkflowError::Push)?;

        if !request.open_pr {
            return Ok(None);
        }

        let pr = hosting
            .open_pull_request(
                &request.repository,
                &CreatePullRequest {
                    title: request.title.clone(),
                    body: request.body.clone(),
                    head: request.remote_branch.clone(),
                    base: request.base.clone(),
                },
            )
            .await
            .map_err(WorkflowError::PullRequest)?;
        info!(repository = %self.name(), number = pr.number, "PR has been opened");
        Ok(Some(pr))
    }
}
