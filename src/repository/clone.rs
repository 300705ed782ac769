use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::GithubConfig;
use crate::error::ToasterError;
use crate::github::RepositoryRef;
use crate::utils::process;

/// Clone `name` from the organization into `target`, which must not exist yet.
pub fn clone_repository(
    cfg: &GithubConfig,
    name: &str,
    target: &Path,
) -> Result<PathBuf, ToasterError> {
    if target.exists() {
        return Err(ToasterError::PreconditionFailed(format!(
            "{} already exists",
            target.display()
        )));
    }
    let url = RepositoryRef::new(cfg.organization.clone(), name).clone_url(&cfg.clone_base_url);
    info!(url = %url, target = %target.display(), "cloning");
    let target_arg = target.to_string_lossy().into_owned();
    process::run_checked("git", &["clone", url.as_str(), target_arg.as_str()], None)?;
    Ok(target.to_path_buf())
}

/// Clone every repository of `names` under a new `destination` directory.
///
/// Fails before cloning anything if `destination` already exists.
pub fn clone_all(
    cfg: &GithubConfig,
    names: &[String],
    destination: &Path,
) -> Result<Vec<PathBuf>, ToasterError> {
    if destination.exists() {
        return Err(ToasterError::PreconditionFailed(format!(
            "folder {} already exists",
            destination.display()
        )));
    }
    fs::create_dir_all(destination)?;

    names
        .iter()
        .map(|name| clone_repository(cfg, name, &destination.join(name)))
        .collect()
}
