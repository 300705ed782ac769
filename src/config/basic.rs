use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`. `RUST_LOG` takes precedence.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Directory holding one clone per repository of the organization.
    /// TOML: `basic.cache_path`. Default: `inveniosoftware_cache`.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            cache_path: default_cache_path(),
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("inveniosoftware_cache")
}
