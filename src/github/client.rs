use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use toaster_schema::{
    CreatePullRequest, CreateRepository, GithubErrorBody, GithubRepository, PullRequest,
};
use tracing::{debug, info, warn};
use url::Url;

use super::{HostingApi, RepositoryRef};
use crate::config::GithubConfig;
use crate::error::ToasterError;
use crate::utils::logging::with_pretty_json_debug;

const PER_PAGE: usize = 100;
const BODY_PREVIEW_CHARS: usize = 300;
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Shared reqwest client with the GitHub headers and optional proxy.
pub fn build_http_client(cfg: &GithubConfig) -> Result<reqwest::Client, ToasterError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
    headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

    let mut builder = reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .default_headers(headers);
    if let Some(proxy) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
    }
    Ok(builder.build()?)
}

/// GitHub REST client.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_url: cfg.api_url.clone(),
            token: cfg.token.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ToasterError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ToasterError> {
        let mut builder = self.http.request(method, self.endpoint(path)?);
        if let Some(token) = self.token.as_deref() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(builder)
    }

    pub fn build_list_page_request(
        &self,
        organization: &str,
        page: usize,
    ) -> Result<reqwest::Request, ToasterError> {
        Ok(self
            .request(Method::GET, &format!("orgs/{organization}/repos"))?
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .build()?)
    }

    pub fn build_pull_request(
        &self,
        repository: &RepositoryRef,
        body: &CreatePullRequest,
    ) -> Result<reqwest::Request, ToasterError> {
        Ok(self
            .request(
                Method::POST,
                &format!("repos/{}/pulls", repository.full_name()),
            )?
            .json(body)
            .build()?)
    }

    async fn send_json<T>(&self, request: reqwest::Request) -> Result<T, ToasterError>
    where
        T: serde::de::DeserializeOwned,
    {
        let method = request.method().clone();
        let url = request.url().clone();
        let resp = self.http.execute(request).await?;
        if !resp.status().is_success() {
            return Err(classify_error(&method, &url, resp).await);
        }
        Ok(resp.json::<T>().await?)
    }
}

/// Map a non-2xx response to a closed error kind, keeping GitHub's message.
async fn classify_error(method: &Method, url: &Url, resp: reqwest::Response) -> ToasterError {
    let status = resp.status();
    let bytes = resp.bytes().await.unwrap_or_default();

    let message = match serde_json::from_slice::<GithubErrorBody>(&bytes) {
        Ok(body) => {
            with_pretty_json_debug(&body, |pretty| {
                debug!(%status, %method, url = %url, body = %pretty, "GitHub structured error");
            });
            body.summary()
        }
        Err(_) => {
            let raw = String::from_utf8_lossy(&bytes);
            debug!(%status, %method, url = %url, "GitHub unstructured error");
            format!("{:.len$}", raw, len = BODY_PREVIEW_CHARS)
        }
    };

    match status {
        StatusCode::NOT_FOUND => ToasterError::NotFound(format!("{url}: {message}")),
        _ => ToasterError::RemoteRejected { status, message },
    }
}

#[async_trait]
impl HostingApi for GithubClient {
    async fn list_organization_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<String>, ToasterError> {
        let mut names = Vec::new();
        for page in 1.. {
            let request = self.build_list_page_request(organization, page)?;
            let repositories: Vec<GithubRepository> =
                self.send_json(request).await.inspect_err(|error| {
                    warn!(organization, page, error = %error, "failed to list repositories");
                })?;
            if repositories.is_empty() {
                break;
            }
            let last_page = repositories.len() < PER_PAGE;
            names.extend(repositories.into_iter().map(|repo| repo.name));
            if last_page {
                break;
            }
        }
        info!(organization, count = names.len(), "listed repositories");
        Ok(names)
    }

    async fn open_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &CreatePullRequest,
    ) -> Result<PullRequest, ToasterError> {
        let http_request = self.build_pull_request(repository, request)?;
        let pr: PullRequest = self.send_json(http_request).await?;
        info!(
            repository = %repository.full_name(),
            number = pr.number,
            url = %pr.html_url,
            "pull request opened"
        );
        Ok(pr)
    }

    async fn create_repository(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<GithubRepository, ToasterError> {
        let request = self
            .request(Method::POST, &format!("orgs/{organization}/repos"))?
            .json(&CreateRepository::named(name))
            .build()?;
        let repo: GithubRepository = self.send_json(request).await?;
        info!(organization, name = %repo.name, "repository created");
        Ok(repo)
    }
}
