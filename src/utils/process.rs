use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::ToasterError;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

fn display_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(
        args.iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Run `program` to completion, capturing both streams.
///
/// A non-zero exit is returned as output, not as an error; use [`run_checked`] for that.
pub fn run<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandOutput, ToasterError> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    debug!(
        command = %display_command(program, args),
        cwd = %cwd.map(|p| p.display().to_string()).unwrap_or_default(),
        "running command"
    );
    let output = command.output()?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Like [`run`], mapping a non-zero exit to [`ToasterError::CommandFailed`].
pub fn run_checked<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandOutput, ToasterError> {
    let output = run(program, args, cwd)?;
    if output.success() {
        Ok(output)
    } else {
        Err(ToasterError::CommandFailed {
            command: display_command(program, args),
            status: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}
