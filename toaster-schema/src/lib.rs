pub mod github;
pub mod travis;

pub use github::{
    CreatePullRequest, CreateRepository, GithubErrorBody, GithubErrorDetail, GithubRepository,
    PullRequest,
};
pub use travis::{TravisConfig, TravisDeploy, TravisProvider};
