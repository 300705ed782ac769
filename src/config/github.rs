use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Hosting (GitHub) settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    /// Organization owning every repository the scripts touch.
    /// TOML: `github.organization`. Default: `inveniosoftware`.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Git remote name used for pushes and `set-url`.
    /// TOML: `github.remote`. Default: `origin`.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// REST API root. TOML: `github.api_url`. Default: `https://api.github.com`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Prefix of clone URLs (`{clone_base_url}/{org}/{repo}`).
    /// TOML: `github.clone_base_url`. Default: `https://github.com`.
    #[serde(default = "default_clone_base_url")]
    pub clone_base_url: Url,

    /// Raw content host used to probe default branches and fetch templates.
    /// TOML: `github.raw_base_url`. Default: `https://raw.githubusercontent.com`.
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: Url,

    /// Personal access token sent as a bearer token.
    /// TOML: `github.token`. Falls back to the `GITHUB_TOKEN` environment variable.
    #[serde(default, deserialize_with = "deserialize_token_lax")]
    pub token: Option<String>,

    /// Repository name prefix identifying the organization's modules.
    /// TOML: `github.module_prefix`. Default: `invenio-`.
    #[serde(default = "default_module_prefix")]
    pub module_prefix: String,

    /// `User-Agent` header; GitHub rejects requests without one.
    /// TOML: `github.user_agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional HTTP proxy for reqwest clients.
    /// TOML: `github.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            remote: default_remote(),
            api_url: default_api_url(),
            clone_base_url: default_clone_base_url(),
            raw_base_url: default_raw_base_url(),
            token: None,
            module_prefix: default_module_prefix(),
            user_agent: default_user_agent(),
            proxy: None,
        }
    }
}

fn deserialize_token_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for github.token",
        )),
    }
}

fn default_organization() -> String {
    "inveniosoftware".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_api_url() -> Url {
    Url::parse("https://api.github.com").expect("valid default API url")
}

fn default_clone_base_url() -> Url {
    Url::parse("https://github.com").expect("valid default clone url")
}

fn default_raw_base_url() -> Url {
    Url::parse("https://raw.githubusercontent.com").expect("valid default raw url")
}

fn default_module_prefix() -> String {
    "invenio-".to_string()
}

fn default_user_agent() -> String {
    concat!("toaster/", env!("CARGO_PKG_VERSION")).to_string()
}
