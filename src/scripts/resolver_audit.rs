use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::ResolverAuditConfig;
use crate::error::ToasterError;
use crate::utils::process::{self, CommandOutput};

/// How a `pip install` of one repository went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallVerdict {
    /// pip reported resolver errors but exited successfully.
    NeedsFix,
    Clean,
    CommandFailed,
}

/// Any output line, stdout or stderr, starting with `ERROR` means the
/// dependency set has to be fixed.
pub fn classify_install_output(output: &CommandOutput) -> InstallVerdict {
    if !output.success() {
        return InstallVerdict::CommandFailed;
    }
    let has_error = output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .any(|line| line.trim().starts_with("ERROR"));
    if has_error {
        InstallVerdict::NeedsFix
    } else {
        InstallVerdict::Clean
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub need_fix: Vec<String>,
    pub clean: Vec<String>,
    pub command_fails: Vec<String>,
}

impl AuditReport {
    fn record(&mut self, repository: &str, verdict: InstallVerdict) {
        let bucket = match verdict {
            InstallVerdict::NeedsFix => &mut self.need_fix,
            InstallVerdict::Clean => &mut self.clean,
            InstallVerdict::CommandFailed => &mut self.command_fails,
        };
        bucket.push(repository.to_string());
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Following repositories have to be fixed", &self.need_fix),
            ("Following repositories have failed", &self.command_fails),
            ("Following repositories are clean", &self.clean),
        ];
        for (title, repositories) in sections {
            writeln!(f, "{title}")?;
            for repository in repositories {
                writeln!(f, "{repository}")?;
            }
        }
        Ok(())
    }
}

fn pip_install_args(cfg: &ResolverAuditConfig, source: &Path) -> Vec<String> {
    let mut args = vec!["install".to_string(), source.to_string_lossy().into_owned()];
    if cfg.use_2020_resolver {
        args.push("--use-feature=2020-resolver".to_string());
    }
    args
}

fn audit_one(
    cfg: &ResolverAuditConfig,
    cache: &Path,
    repository: &str,
) -> Result<InstallVerdict, ToasterError> {
    let env_dir = cfg.virtualenvs_path.join(repository);
    let env_arg = env_dir.to_string_lossy().into_owned();
    process::run_checked(
        "virtualenv",
        &["-p", cfg.python_version.as_str(), env_arg.as_str()],
        None,
    )?;

    let pip = env_dir.join("bin").join("pip");
    let args = pip_install_args(cfg, &cache.join(repository));
    let verdict = match process::run(&pip.to_string_lossy(), &args, None) {
        Ok(output) => classify_install_output(&output),
        Err(error) => {
            warn!(repository, error = %error, "pip could not be started");
            InstallVerdict::CommandFailed
        }
    };

    fs::remove_dir_all(&env_dir)?;
    Ok(verdict)
}

/// Install every cached repository into its own fresh virtualenv and sort
/// them by outcome.
pub fn audit(
    cfg: &ResolverAuditConfig,
    cache: &Path,
    repositories: &[String],
) -> Result<AuditReport, ToasterError> {
    if cfg.virtualenvs_path.exists() {
        fs::remove_dir_all(&cfg.virtualenvs_path)?;
    }
    fs::create_dir_all(&cfg.virtualenvs_path)?;

    let mut report = AuditReport::default();
    for repository in repositories {
        info!(repository = %repository, "auditing");
        let verdict = audit_one(cfg, cache, repository)?;
        info!(repository = %repository, ?verdict, "audited");
        report.record(repository, verdict);
    }
    Ok(report)
}
