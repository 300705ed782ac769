use std::path::{Path, PathBuf};
use toaster_patch_core::{parse_short_status, status_matches};
use tracing::info;

use super::git::{GitCli, GitRunner};
use crate::error::ToasterError;

/// One cloned repository. Every operation runs against `root`; the process
/// working directory is never changed.
#[derive(Debug, Clone)]
pub struct LocalRepository<G = GitCli> {
    name: String,
    root: PathBuf,
    git: G,
}

impl LocalRepository<GitCli> {
    /// Bind to `{cache}/{name}`, which must be an existing directory.
    pub fn open(cache: &Path, name: &str) -> Result<Self, ToasterError> {
        let root = cache.join(name);
        Self::at(name, root)
    }

    /// Bind to an arbitrary checkout path.
    pub fn at(name: &str, root: PathBuf) -> Result<Self, ToasterError> {
        if !root.is_dir() {
            return Err(ToasterError::NotFound(format!(
                "no local clone at {}",
                root.display()
            )));
        }
        let git = GitCli::new(root.clone());
        Ok(Self::with_runner(name, root, git))
    }
}

impl<G: GitRunner> LocalRepository<G> {
    pub fn with_runner(name: &str, root: PathBuf, git: G) -> Self {
        Self {
            name: name.to_string(),
            root,
            git,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String, ToasterError> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        self.git.git(&args)
    }

    /// Trimmed `git status -s` lines.
    pub fn status(&self) -> Result<Vec<String>, ToasterError> {
        Ok(parse_short_status(&self.git(&["status", "-s"])?))
    }

    /// Whether the working tree changes are exactly `expected`, in order.
    pub fn check_status<S: AsRef<str>>(&self, expected: &[S]) -> Result<bool, ToasterError> {
        Ok(status_matches(&self.status()?, expected))
    }

    /// `git add .` then `git [extra_before] commit -m <message> [extra_after]`.
    pub fn commit(
        &self,
        message: &str,
        extra_before: &[String],
        extra_after: &[String],
    ) -> Result<(), ToasterError> {
        self.git(&["add", "."])?;

        let mut commit: Vec<String> = extra_before.to_vec();
        commit.extend(["commit", "-m", message].map(str::to_string));
        commit.extend_from_slice(extra_after);
        self.git.git(&commit)?;
        info!(repository = %self.name, message, "committed");
        Ok(())
    }

    /// `git push <remote> <local_branch>:<remote_branch> [--force]`.
    pub fn push(
        &self,
        remote: &str,
        local_branch: &str,
        remote_branch: &str,
        force: bool,
    ) -> Result<(), ToasterError> {
        let refspec = format!("{local_branch}:{remote_branch}");
        let mut args = vec!["push", remote, refspec.as_str()];
        if force {
            args.push("--force");
        }
        self.git(&args)?;
        info!(repository = %self.name, remote, refspec = %refspec, force, "pushed");
        Ok(())
    }

    /// `git remote set-url <remote> <url>`.
    pub fn set_origin(&self, remote: &str, url: &str) -> Result<(), ToasterError> {
        self.git(&["remote", "set-url", remote, url])?;
        Ok(())
    }

    /// `git checkout -b <branch>`.
    pub fn create_branch(&self, branch: &str) -> Result<(), ToasterError> {
        self.git(&["checkout", "-b", branch])?;
        info!(repository = %self.name, branch, "branch created");
        Ok(())
    }
}
