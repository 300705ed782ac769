use serde::{Deserialize, Serialize};

/// Subset of the repository object returned by `GET /orgs/{org}/repos`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubRepository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Body of `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
}

impl CreateRepository {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            private: false,
        }
    }
}
