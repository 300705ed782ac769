mod basic;
mod github;
mod scripts;

pub use basic::BasicConfig;
pub use github::GithubConfig;
pub use scripts::{MigrationConfig, PublishSettings, ResolverAuditConfig, TestPatcherConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ToasterError;

/// Application configuration managed by Figment.
///
/// Loaded once in `main` and passed by reference to every component.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging and local cache (see `basic` table in toaster.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Organization, remote and API endpoints (see `github` table).
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub migration: MigrationConfig,

    #[serde(default)]
    pub test_patcher: TestPatcherConfig,

    #[serde(default)]
    pub resolver_audit: ResolverAuditConfig,
}

const DEFAULT_CONFIG_FILE: &str = "toaster.toml";
const ENV_PREFIX: &str = "TOASTER_";

impl Config {
    /// Builds a Figment that merges defaults, a TOML file and `TOASTER_*` variables.
    ///
    /// Nested keys use a double underscore: `TOASTER_GITHUB__ORGANIZATION=zenodo`.
    pub fn figment(file: &Path) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if file.is_file() {
            figment.merge(Toml::file(file))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from `file`, or from `toaster.toml` when present.
    ///
    /// An explicitly requested file must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ToasterError> {
        let path = match file {
            Some(path) if !path.is_file() => {
                return Err(ToasterError::PreconditionFailed(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let mut cfg: Self = Self::figment(&path).extract()?;
        if cfg.github.token.is_none() {
            cfg.github.token = std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty());
        }
        Ok(cfg)
    }

    /// `{basic.cache_path}/{repository}`.
    pub fn repository_path(&self, repository: &str) -> PathBuf {
        self.basic.cache_path.join(repository)
    }
}
