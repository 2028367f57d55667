//! External editor process launcher
//!
//! The call blocks until the editor exits; there is no timeout.

use std::io;
use std::path::Path;
use std::process::Command;

pub trait EditorLauncher {
    /// Run `command` on `file` and wait. `Ok(code)` is the exit code
    /// (`-1` when the process was killed by a signal).
    fn launch(&self, command: &str, file: &Path) -> io::Result<i32>;
}

/// Spawns the editor inheriting stdin/stdout/stderr.
///
/// The command may carry arguments (`code --wait`); it is handed to the shell
/// with the file as a separate positional argument so the path is never
/// re-parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEditor;

impl EditorLauncher for SystemEditor {
    fn launch(&self, command: &str, file: &Path) -> io::Result<i32> {
        let status = shell_command(command, file).status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(unix)]
fn shell_command(command: &str, file: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(format!("{command} \"$@\""))
        .arg(command)
        .arg(file);
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str, file: &Path) -> Command {
    let mut parts = command.split_whitespace();
    let mut cmd = Command::new(parts.next().unwrap_or(crate::consts::DEFAULT_EDITOR));
    cmd.args(parts).arg(file);
    cmd
}
