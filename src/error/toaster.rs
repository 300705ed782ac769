use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use toaster_patch_core::ListParseError;

use super::{Classify, ErrorKind};

#[derive(Debug, ThisError)]
pub enum ToasterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid regex: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Invalid glob pattern: {0}")]
    GlobError(#[from] glob::PatternError),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote rejected the request with status {status}: {message}")]
    RemoteRejected { status: StatusCode, message: String },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("No `{variable}` list found in {}", path.display())]
    ListNotFound { variable: String, path: PathBuf },

    #[error("Cannot parse `{variable}` in {}: {source}", path.display())]
    ListParse {
        variable: String,
        path: PathBuf,
        #[source]
        source: ListParseError,
    },

    #[error("Command `{command}` failed with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl From<figment::Error> for ToasterError {
    fn from(error: figment::Error) -> Self {
        ToasterError::ConfigError(Box::new(error))
    }
}

impl Classify for ToasterError {
    fn kind(&self) -> ErrorKind {
        match self {
            ToasterError::NotFound(_) => ErrorKind::NotFound,
            ToasterError::RemoteRejected { .. } | ToasterError::CommandFailed { .. } => {
                ErrorKind::RemoteRejected
            }
            ToasterError::PreconditionFailed(_)
            | ToasterError::ListNotFound { .. }
            | ToasterError::ListParse { .. }
            | ToasterError::ConfigError(_)
            | ToasterError::RegexError(_)
            | ToasterError::GlobError(_)
            | ToasterError::UrlError(_) => ErrorKind::PreconditionFailed,
            ToasterError::TemplateError(error)
                if error.kind() == minijinja::ErrorKind::TemplateNotFound =>
            {
                ErrorKind::NotFound
            }
            ToasterError::TemplateError(_) => ErrorKind::PreconditionFailed,
            ToasterError::ReqwestError(error) if error.status() == Some(StatusCode::NOT_FOUND) => {
                ErrorKind::NotFound
            }
            ToasterError::IoError(error) if error.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            ToasterError::IoError(_)
            | ToasterError::ReqwestError(_)
            | ToasterError::JsonError(_)
            | ToasterError::YamlError(_) => ErrorKind::Io,
        }
    }
}
