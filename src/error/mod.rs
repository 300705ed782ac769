mod script;
mod toaster;
mod workflow;

pub use script::ScriptError;
pub use toaster::ToasterError;
pub use workflow::WorkflowError;

/// Closed classification of failures, independent of the underlying library error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote or local resource does not exist.
    NotFound,
    /// The host or a VCS command refused the operation.
    RemoteRejected,
    /// A precondition of the run does not hold (existing destination, missing list, bad input).
    PreconditionFailed,
    /// Local I/O, network transport or decoding failure.
    Io,
}

pub trait Classify {
    fn kind(&self) -> ErrorKind;
}
