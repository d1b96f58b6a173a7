//! Subprocess execution utilities.

use anyhow::{Context, Result};
use camino::Utf8Path;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Combined stdout + stderr, in stream order
    pub output: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
}

/// Run a program, merging stderr into stdout and capturing the whole stream.
///
/// A non-zero exit is reported through `success`/`exit_code`, not as an `Err`;
/// the caller decides what a failure means. There is no timeout: a hung child
/// hangs the run.
pub fn run_captured(program: &Utf8Path, args: &[String]) -> Result<CommandResult> {
    let output = duct::cmd(program.as_str(), args)
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run()
        .with_context(|| format!("failed to execute {}", program))?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        output: String::from_utf8_lossy(&output.stdout).to_string(),
        success: output.status.success(),
    })
}

/// Check if a command exists in PATH.
pub fn command_exists(cmd: &str) -> bool {
    duct::cmd("which", [cmd])
        .stdout_null()
        .stderr_null()
        .unchecked()
        .run()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Check if the file at `path` exists and carries an execute bit.
#[cfg(unix)]
pub fn is_executable(path: &Utf8Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Check if the file at `path` exists (execute bits have no meaning here).
#[cfg(not(unix))]
pub fn is_executable(path: &Utf8Path) -> bool {
    path.is_file()
}
