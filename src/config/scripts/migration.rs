use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use super::PublishSettings;

const TEMPLATES_BASE: &str =
    "https://raw.githubusercontent.com/inveniosoftware/invenio-formatter/master/.github/workflows";

/// Travis CI to GitHub Actions migration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Checkouts migrated when neither `--targetpath` nor `--repository` is given.
    pub repo_paths: Vec<PathBuf>,
    /// Template written to `.github/workflows/tests.yml`.
    pub tests_yaml_url: Url,
    /// Template written to `.github/workflows/pypi-publish.yml` for repositories deploying to PyPI.
    pub pypi_publish_yaml_url: Url,
    /// Branch created in freshly cloned repositories before patching.
    pub branch: String,
    /// Locator of the `tests_require` assignment in `setup.py`; group 1 is the list literal.
    pub tests_require_locator: String,
    /// Packages already provided by `pytest-invenio`.
    pub tests_require_denylist: Vec<String>,
    pub tests_require_allowlist: Vec<String>,
    /// Root of the `services/` and `serviceless/` template trees used by `build-template`.
    pub templates_dir: PathBuf,
    pub publish: PublishSettings,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        let branch = "ga-migration".to_string();
        Self {
            repo_paths: vec![
                PathBuf::from("../invenio-accounts-rest"),
                PathBuf::from("../invenio-i18n"),
            ],
            tests_yaml_url: template_url("tests.yml"),
            pypi_publish_yaml_url: template_url("pypi-release.yml"),
            branch: branch.clone(),
            tests_require_locator: r"tests_require\s*=\s*(\[(?:[^\[\]]|\[[^\[\]]*\])*\])"
                .to_string(),
            tests_require_denylist: [
                "check-manifest",
                "coverage",
                "docker-services-cli",
                "pytest-celery",
                "pytest-cov",
                "pytest-flask",
                "pytest-isort",
                "pytest-pycodestyle",
                "pytest-pydocstyle",
                "pytest",
                "selenium",
                // replaced by pytest-pycodestyle and pytest-isort
                "pytest-pep8",
                "isort",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            tests_require_allowlist: vec!["pytest-invenio>=1.4.0".to_string()],
            templates_dir: PathBuf::from("templates"),
            publish: PublishSettings {
                local_branch: branch.clone(),
                remote_branch: branch,
                message: "global: migrate CI to gh-actions".to_string(),
                body: "Replaces Travis CI with GitHub Actions workflows.".to_string(),
                expected: [
                    "M .editorconfig",
                    "D .travis.yml",
                    "M CONTRIBUTING.rst",
                    "M MANIFEST.in",
                    "M README.rst",
                    "M pytest.ini",
                    "M run-tests.sh",
                    "M setup.py",
                    "?? .github/",
                ]
                .into_iter()
                .map(str::to_string)
                .collect(),
                ..PublishSettings::default()
            },
        }
    }
}

fn template_url(file: &str) -> Url {
    Url::parse(&format!("{TEMPLATES_BASE}/{file}")).expect("valid template url")
}
