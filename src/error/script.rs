use thiserror::Error as ThisError;

use super::{Classify, ErrorKind, ToasterError, WorkflowError};

/// Failure of a whole pipeline run for one repository.
#[derive(Debug, ThisError)]
pub enum ScriptError {
    #[error(transparent)]
    Toaster(#[from] ToasterError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl Classify for ScriptError {
    fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Toaster(error) => error.kind(),
            ScriptError::Workflow(error) => error.kind(),
        }
    }
}
