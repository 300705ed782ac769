use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
