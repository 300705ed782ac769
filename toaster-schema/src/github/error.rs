use serde::{Deserialize, Serialize};

/// Error payload returned by the GitHub REST API on non-2xx responses.
///
/// Example: `{"message":"Validation Failed","errors":[{"message":"A pull request already exists for org:branch."}]}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GithubErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GithubErrorBody {
    /// Top-level message joined with any detail messages.
    pub fn summary(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|detail| detail.message.as_deref().or(detail.code.as_deref()))
            .collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.message, details.join("; "))
        }
    }
}
