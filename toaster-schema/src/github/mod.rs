mod error;
mod pull_request;
mod repository;

pub use error::{GithubErrorBody, GithubErrorDetail};
pub use pull_request::{CreatePullRequest, PullRequest};
pub use repository::{CreateRepository, GithubRepository};
