//! Local clones: cloning, git operations and the commit → push → PR workflow.

mod clone;
mod git;
mod local;
mod workflow;

pub use clone::{clone_all, clone_repository};
pub use git::{GitCli, GitRunner};
pub use local::LocalRepository;
pub use workflow::PublishRequest;
