use thiserror::Error as ThisError;

use super::{Classify, ErrorKind, ToasterError};

/// Failure of one stage of commit → push → pull request.
///
/// Stages before the failing one stay applied.
#[derive(Debug, ThisError)]
pub enum WorkflowError {
    #[error("Please review modifications: expected {expected:?}, found {observed:?}")]
    ReviewModifications {
        expected: Vec<String>,
        observed: Vec<String>,
    },

    #[error("Please review modifications: status unavailable: {0}")]
    Status(#[source] ToasterError),

    #[error("Failed to commit: {0}")]
    Commit(#[source] ToasterError),

    #[error("Failed to push: {0}")]
    Push(#[source] ToasterError),

    #[error("PR has not been opened: {0}")]
    PullRequest(#[source] ToasterError),
}

impl Classify for WorkflowError {
    fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::ReviewModifications { .. } => ErrorKind::PreconditionFailed,
            WorkflowError::Status(source)
            | WorkflowError::Commit(source)
            | WorkflowError::Push(source)
            | WorkflowError::PullRequest(source) => source.kind(),
        }
    }
}
