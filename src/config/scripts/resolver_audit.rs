use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// pip resolver audit settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverAuditConfig {
    /// Scratch directory for one virtualenv per audited repository.
    pub virtualenvs_path: PathBuf,
    /// Interpreter passed to `virtualenv -p`.
    pub python_version: String,
    /// Clone the modules into the cache before auditing.
    pub download_locally: bool,
    /// Pass `--use-feature=2020-resolver` to pip.
    pub use_2020_resolver: bool,
}

impl Default for ResolverAuditConfig {
    fn default() -> Self {
        Self {
            virtualenvs_path: PathBuf::from("Virtualenvs"),
            python_version: "python3.6".to_string(),
            download_locally: false,
            use_2020_resolver: true,
        }
    }
}
