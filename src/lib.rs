pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod patch;
pub mod repository;
pub mod scripts;
pub mod utils;

pub use config::Config;
pub use error::{Classify, ErrorKind, ScriptError, ToasterError, WorkflowError};
