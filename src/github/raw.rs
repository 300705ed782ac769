use tracing::debug;
use url::Url;

use super::RepositoryRef;
use crate::error::ToasterError;

/// Files served by the raw content host (`raw.githubusercontent.com`).
pub struct RawContent {
    http: reqwest::Client,
    base: Url,
}

impl RawContent {
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self { http, base }
    }

    /// `{base}/{org}/{repo}/{branch}/{file}`.
    pub fn file_url(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        file: &str,
    ) -> Result<Url, ToasterError> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/{}/{}/{branch}/{file}",
            repository.organization, repository.name
        ))?)
    }

    /// Body of `url`, `None` on a non-2xx response.
    pub async fn fetch_text(&self, url: &Url) -> Result<Option<String>, ToasterError> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(%status, url = %url, "raw file unavailable");
            return Ok(None);
        }
        Ok(Some(resp.text().await?))
    }

    /// A 2xx answer for `url`; repositories without `.travis.yml` are already migrated.
    pub async fn file_exists(&self, url: &Url) -> Result<bool, ToasterError> {
        let resp = self.http.get(url.clone()).send().await?;
        Ok(resp.status().is_success())
    }
}
