//! Scoped, synchronous invocation of external tools.
//!
//! Each call spawns one process, drains stdout and stderr to memory and waits
//! for it to exit before returning. Nothing is left running afterwards.
//!
//! There is no timeout: a tool that hangs blocks the whole run.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Output of a finished external process.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// `true` when stdout holds anything besides whitespace.
    pub fn has_stdout(&self) -> bool {
        !self.stdout.trim().is_empty()
    }
}

/// Runs `command` to completion with stdin closed, capturing both streams.
///
/// # Errors
///
/// Returns the [`std::io::Error`] from spawning or waiting, e.g. when the
/// binary does not exist. A non-zero exit status is **not** an error.
pub fn run_captured(command: &mut Command) -> std::io::Result<Captured> {
    tracing::debug!(command = ?command, "spawning");
    let output = command.stdin(Stdio::null()).output()?;
    let captured = Captured {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    tracing::debug!(
        status = ?captured.status.code(),
        stdout_bytes = captured.stdout.len(),
        stderr_bytes = captured.stderr.len(),
        "process finished"
    );
    Ok(captured)
}

/// Returns `true` if an executable named `cmd` exists on `PATH`.
///
/// On Unix the file must also have an executable permission bit set.
/// On Windows the usual executable extensions are tried as well.
pub fn which_exists(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|dir| is_executable_in(&dir, cmd)))
        .unwrap_or(false)
}

fn is_executable_in(dir: &Path, cmd: &str) -> bool {
    #[cfg(windows)]
    {
        ["", ".exe", ".cmd", ".bat"]
            .iter()
            .any(|ext| dir.join(format!("{cmd}{ext}")).is_file())
    }
    #[cfg(not(windows))]
    {
        let candidate = dir.join(cmd);
        if !candidate.is_file() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(&candidate)
                .map(|m| m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        }
        #[cfg(not(unix))]
        {
            true
        }
    }
}
