use std::path::PathBuf;

use crate::error::ToasterError;
use crate::utils::process;

/// Runs `git` subcommands inside one working tree and returns stdout.
pub trait GitRunner {
    fn git(&self, args: &[String]) -> Result<String, ToasterError>;
}

/// The `git` executable, invoked with `current_dir` set to the clone.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl GitRunner for GitCli {
    fn git(&self, args: &[String]) -> Result<String, ToasterError> {
        Ok(process::run_checked("git", args, Some(&self.root))?.stdout)
    }
}
