//! Fallback command launching
//!
//! The command runs through `<shell> -c` (`sh` unless configured) as an
//! independent child that inherits this process's stdin, stdout and
//! stderr. It is never waited on.

use std::process::Stdio;
use tokio::process::Command as AsyncCommand;

/// Start `command` through `shell` in the background and return its pid
pub fn spawn_fallback(shell: &str, command: &str) -> std::io::Result<Option<u32>> {
    let child = AsyncCommand::new(shell)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(false)
        .spawn()?;

    let pid = child.id();
    tracing::info!(shell, command, pid, "Launched fallback command");
    Ok(pid)
}

/// Normalise a user-supplied command, empty means "no fallback"
pub fn normalize_command(command: Option<&str>) -> Option<String> {
    command
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
