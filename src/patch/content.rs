use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ToasterError;

/// Path of `filename` inside the cached clone of `repository`.
pub fn file_path(cache: &Path, repository: &str, filename: &str) -> PathBuf {
    cache.join(repository).join(filename)
}

/// Full text of `path`, `None` when it does not exist.
pub fn read_content(path: &Path) -> Result<Option<String>, ToasterError> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// Deserialize a YAML file, `None` when it does not exist.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ToasterError> {
    match read_content(path)? {
        Some(content) => {
            info!(path = %path.display(), "found YAML file");
            Ok(Some(serde_yaml::from_str(&content)?))
        }
        None => {
            info!(path = %path.display(), "skipped: no such file");
            Ok(None)
        }
    }
}

/// Sorted names of the directories directly under `parent`.
pub fn list_directory_names(parent: &Path) -> Result<Vec<String>, ToasterError> {
    if !parent.is_dir() {
        return Err(ToasterError::PreconditionFailed(format!(
            "{} is not a directory",
            parent.display()
        )));
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Repositories cloned in the local cache.
pub fn list_local_repository_names(cache: &Path) -> Result<Vec<String>, ToasterError> {
    list_directory_names(cache)
}
