use std::path::{Path, PathBuf};
use toaster_schema::{PullRequest, TravisConfig};
use tracing::info;

use super::repository_name;
use crate::config::{Config, MigrationConfig};
use crate::error::{ScriptError, ToasterError};
use crate::github::{HostingApi, RepositoryRef};
use crate::patch::{
    add_line, append_to_file, delete_file, delete_line, download_file, file_contains, read_yaml,
    replace_list, replace_regex, replace_simple,
};
use crate::repository::{LocalRepository, PublishRequest, clone_repository};

const TRAVIS_FILE: &str = ".travis.yml";
const WORKFLOWS_DIR: &str = ".github/workflows";

/// What the migration of one checkout did beyond the fixed edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub repository: String,
    /// A PyPI publish workflow was installed.
    pub pypi_publish: bool,
    /// Files removed by the `.travis.yml` and `*.bak` cleanup.
    pub deleted_files: usize,
}

fn pytest_addopts(module: &str) -> String {
    format!(
        "${{1}} --isort --pydocstyle --pycodestyle --doctest-glob=\"*.rst\" \
         --doctest-modules --cov={module} --cov-report=term-missing"
    )
}

/// Migrate the checkout at `path` from Travis CI to GitHub Actions.
pub async fn migrate_repo(
    http: &reqwest::Client,
    cfg: &MigrationConfig,
    path: &Path,
) -> Result<MigrationReport, ToasterError> {
    let repository = repository_name(path)?;
    let module = repository.replace('-', "_");
    info!(repository = %repository, path = %path.display(), "migrating");

    let travis: Option<TravisConfig> = read_yaml(&path.join(TRAVIS_FILE))?;
    let pypi_publish = travis.as_ref().is_some_and(|t| t.deploys_to("pypi"));
    if pypi_publish {
        download_file(
            http,
            &cfg.pypi_publish_yaml_url,
            &path.join(WORKFLOWS_DIR).join("pypi-publish.yml"),
        )
        .await?;
    }

    replace_simple(
        TRAVIS_FILE,
        ".github/workflows/*.yml",
        &path.join(".editorconfig"),
    )?;

    let readme = path.join("README.rst");
    replace_regex(
        r"https://img\.shields\.io/travis/([a-z]*/[a-z-]*)\.svg",
        "https://github.com/${1}/workflows/CI/badge.svg",
        &readme,
    )?;
    replace_regex(
        r"https://travis-ci\.org/([a-z]*/[a-z-]*)",
        "https://github.com/${1}/actions?query=workflow%3ACI",
        &readme,
    )?;

    replace_regex(
        r"https://travis-ci\.(org|com)/([a-z]*/[a-z-]*)/pull_requests",
        "https://github.com/${2}/actions?query=event%3Apull_request",
        &path.join("CONTRIBUTING.rst"),
    )?;

    let run_tests = path.join("run-tests.sh");
    delete_line("isort", &run_tests)?;
    replace_simple(
        r#"check-manifest --ignore ".travis-*""#,
        r#"check-manifest --ignore ".*-requirements.txt""#,
        &run_tests,
    )?;

    download_file(
        http,
        &cfg.tests_yaml_url,
        &path.join(WORKFLOWS_DIR).join("tests.yml"),
    )
    .await?;

    let pytest_ini = path.join("pytest.ini");
    delete_line("pep8ignore", &pytest_ini)?;
    replace_regex("(addopts =).*", &pytest_addopts(&module), &pytest_ini)?;
    if file_contains("testpaths", &pytest_ini)? == Some(false) {
        append_to_file(&format!("testpaths = tests {module}\n"), &pytest_ini)?;
    }

    add_line(
        "recursive-include .github/workflows *.yml",
        &path.join("MANIFEST.in"),
    )?;

    let root = glob::Pattern::escape(&path.to_string_lossy());
    let mut deleted_files = delete_file(&format!("{root}/{TRAVIS_FILE}"))?;
    deleted_files += delete_file(&format!("{root}/*.bak"))?;

    replace_list(
        &path.join("setup.py"),
        &cfg.tests_require_locator,
        &cfg.tests_require_denylist,
        &cfg.tests_require_allowlist,
        "tests_require",
    )?;

    info!(repository = %repository, pypi_publish, "migration applied");
    Ok(MigrationReport {
        repository,
        pypi_publish,
        deleted_files,
    })
}

/// Migrate every configured checkout, stopping at the first failure.
pub async fn migrate_all(
    http: &reqwest::Client,
    cfg: &MigrationConfig,
    paths: &[PathBuf],
) -> Result<Vec<MigrationReport>, ToasterError> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        reports.push(migrate_repo(http, cfg, path).await?);
    }
    Ok(reports)
}

/// Clone `name` into the cache, branch, migrate and optionally publish.
pub async fn migrate_repository(
    cfg: &Config,
    http: &reqwest::Client,
    hosting: &dyn HostingApi,
    name: &str,
    publish: bool,
) -> Result<Option<PullRequest>, ScriptError> {
    let target = cfg.repository_path(name);
    clone_repository(&cfg.github, name, &target)?;

    let repo = LocalRepository::at(name, target)?;
    repo.create_branch(&cfg.migration.branch)?;
    migrate_repo(http, &cfg.migration, repo.root()).await?;

    if !publish {
        info!(repository = name, path = %repo.root().display(), "migrated locally; not published");
        return Ok(None);
    }

    let request = PublishRequest::from_settings(
        RepositoryRef::new(cfg.github.organization.clone(), name),
        &cfg.github.remote,
        &cfg.migration.publish,
    );
    Ok(repo.publish(hosting, &request).await?)
}
