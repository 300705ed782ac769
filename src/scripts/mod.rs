//! Bulk pipelines run over many repositories.
//!
//! Each pipeline is a fixed sequence of [`crate::patch`] primitives followed,
//! where it publishes, by [`crate::repository::LocalRepository::publish`].

pub mod ci_migration;
pub mod resolver_audit;
pub mod services;
pub mod templates;
pub mod test_patcher;

use std::fs;
use std::path::Path;

use crate::error::ToasterError;

/// Last path component, used as the repository name of a checkout.
///
/// Paths ending in `.` or `..` are resolved against the filesystem first.
pub(crate) fn repository_name(path: &Path) -> Result<String, ToasterError> {
    let resolved;
    let named = if path.file_name().is_some() {
        path
    } else {
        resolved = fs::canonicalize(path)?;
        resolved.as_path()
    };
    match named.file_name().map(|name| name.to_string_lossy()) {
        Some(name) if !name.is_empty() => Ok(name.into_owned()),
        _ => Err(ToasterError::PreconditionFailed(format!(
            "cannot derive a repository name from {}",
            path.display()
        ))),
    }
}
