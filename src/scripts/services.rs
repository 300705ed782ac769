use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::info;

use crate::error::ToasterError;
use crate::github::{RawContent, RepositoryRef};

/// Backing services a repository's test suite needs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepositoryServices {
    pub db: bool,
    pub cache: bool,
    pub search: bool,
    pub mq: bool,
}

static DOCKER_SERVICES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"docker-services-cli up .*(DB|postgresql)",
        r"docker-services-cli up .*(CACHE|redis)",
        r"docker-services-cli up .*(SEARCH|ES|\bes\b)",
        r"docker-services-cli up .*(MQ|rabbitmq)",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid service regex"))
});

const TRAVIS_SERVICES: [&str; 4] = ["postgres", "- redis", "elasticsearch", "rabbitmq-server"];

impl RepositoryServices {
    fn from_flags([db, cache, search, mq]: [bool; 4]) -> Self {
        Self {
            db,
            cache,
            search,
            mq,
        }
    }

    /// Services started by `docker-services-cli up` in `run-tests.sh`.
    pub fn from_run_tests(script: &str) -> Self {
        Self::from_flags(DOCKER_SERVICES.each_ref().map(|re| re.is_match(script)))
    }

    /// Whether any backing service is needed at all.
    pub fn any(&self) -> bool {
        self.db || self.cache || self.search || self.mq
    }

    /// Services listed in a `.travis.yml`.
    pub fn from_travis(travis: &str) -> Self {
        Self::from_flags(TRAVIS_SERVICES.map(|term| travis.contains(term)))
    }
}

/// Probe the default branch of `repository` on the raw content host.
///
/// A repository without `.travis.yml` counts as already migrated and its
/// `run-tests.sh` is inspected instead.
pub async fn probe_services(
    raw: &RawContent,
    repository: &RepositoryRef,
    branch: &str,
) -> Result<RepositoryServices, ToasterError> {
    let travis_url = raw.file_url(repository, branch, ".travis.yml")?;
    let services = if raw.file_exists(&travis_url).await? {
        info!(repository = %repository.full_name(), "not migrated; reading .travis.yml");
        raw.fetch_text(&travis_url)
            .await?
            .map(|travis| RepositoryServices::from_travis(&travis))
            .unwrap_or_default()
    } else {
        info!(repository = %repository.full_name(), "already migrated; reading run-tests.sh");
        let script_url = raw.file_url(repository, branch, "run-tests.sh")?;
        raw.fetch_text(&script_url)
            .await?
            .map(|script| RepositoryServices::from_run_tests(&script))
            .unwrap_or_default()
    };
    info!(
        repository = %repository.full_name(),
        db = services.db,
        cache = services.cache,
        search = services.search,
        mq = services.mq,
        "services detected"
    );
    Ok(services)
}
