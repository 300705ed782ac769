//! Access to the hosting platform: REST API and raw file host.

mod client;
mod raw;

pub use client::{GithubClient, build_http_client};
pub use raw::RawContent;

use async_trait::async_trait;
use toaster_schema::{CreatePullRequest, GithubRepository, PullRequest};
use url::Url;

use crate::error::ToasterError;

/// An organization/repository pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub organization: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
        }
    }

    /// `org/name`, as used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.organization, self.name)
    }

    /// `{base}/{org}/{name}`.
    pub fn clone_url(&self, base: &Url) -> String {
        format!(
            "{}/{}/{}",
            base.as_str().trim_end_matches('/'),
            self.organization,
            self.name
        )
    }
}

/// Operations the pipelines need from the hosting platform.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Names of every repository visible under `organization`.
    async fn list_organization_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<String>, ToasterError>;

    async fn open_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &CreatePullRequest,
    ) -> Result<PullRequest, ToasterError>;

    async fn create_repository(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<GithubRepository, ToasterError>;

    /// Repositories of `organization` whose name starts with `prefix`.
    async fn list_modules(
        &self,
        organization: &str,
        prefix: &str,
    ) -> Result<Vec<String>, ToasterError> {
        let names = self.list_organization_repositories(organization).await?;
        Ok(names
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect())
    }
}
