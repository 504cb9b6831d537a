//! Shell script linting via [ShellCheck](https://www.shellcheck.net/).
//!
//! Requires the `shellcheck` binary on `PATH`.
//!
//! # How it works
//!
//! 1. With `--fix`, runs `shellcheck --format=diff <file>`, writes the diff to
//!    a temporary file and applies it with `git apply --allow-empty`.
//! 2. Runs `shellcheck --format=tty <file>`. A non-zero exit with output on
//!    stdout means issues remain; the output is printed verbatim.
//!
//! Fixing needs `git` on `PATH`. When it is missing, or the patch does not
//! apply, the fix step prints a warning and the file is reported with its
//! remaining findings.

use crate::config::ShellCheckConfig;
use crate::error::EnvironmentError;
use crate::linters::Linter;
use crate::process::{run_captured, which_exists};
use crate::report::Reporter;
use std::io::Write;
use std::path::Path;
use std::process::Command;

const TOOL: &str = "shellcheck";
const INSTALL_HINT: &str = "Install it: https://github.com/koalaman/shellcheck#installing";

/// External linter wrapper for ShellCheck.
pub struct ShellCheckLinter {
    config: ShellCheckConfig,
}

impl ShellCheckLinter {
    pub fn new(config: ShellCheckConfig) -> Self {
        ShellCheckLinter { config }
    }

    /// Base `shellcheck` invocation with the configured severity and
    /// source-following flags, producing `format` output for `path`.
    fn command(&self, format: &str, path: &Path) -> Command {
        let mut cmd = Command::new(TOOL);
        if self.config.follow_sources {
            cmd.arg("-x");
        }
        cmd.arg(format!("--severity={}", self.config.severity))
            .arg(format!("--format={format}"))
            .arg(path);
        cmd
    }

    /// Applies ShellCheck's suggested fixes to `path` in place.
    fn try_fix(&self, path: &Path, report: &mut Reporter) {
        let diff = match run_captured(&mut self.command("diff", path)) {
            Ok(out) => out.stdout,
            Err(e) => {
                report.warning(format!("Error during fix for {}: {e}", path.display()));
                return;
            }
        };
        if diff.is_empty() {
            return;
        }

        match apply_patch(&diff) {
            Ok(out) if out.success() => report.fixed(path.display()),
            Ok(out) => {
                report.warning(format!("Could not apply fixes to {}", path.display()));
                report.line(out.stderr.trim_end());
            }
            Err(e) => {
                report.warning(format!("Error during fix for {}: {e}", path.display()));
            }
        }
    }
}

/// Writes `diff` to a temporary file and runs `git apply` on it.
fn apply_patch(diff: &str) -> std::io::Result<crate::process::Captured> {
    let mut patch = tempfile::Builder::new()
        .prefix("shlint-")
        .suffix(".patch")
        .tempfile()?;
    patch.write_all(diff.as_bytes())?;
    patch.flush()?;

    run_captured(
        Command::new("git")
            .arg("apply")
            .arg("--allow-empty")
            .arg(patch.path()),
    )
}

impl Linter for ShellCheckLinter {
    fn name(&self) -> &'static str {
        "ShellCheck"
    }

    fn default_pattern(&self) -> &'static str {
        "**/*.sh"
    }

    fn check_installed(&self, _report: &mut Reporter) -> Result<(), EnvironmentError> {
        if which_exists(TOOL) {
            Ok(())
        } else {
            Err(EnvironmentError::ToolMissing {
                tool: "ShellCheck",
                hint: Some(INSTALL_HINT),
            })
        }
    }

    fn lint_file(&self, path: &Path, fix: bool, report: &mut Reporter) -> bool {
        if fix {
            self.try_fix(path, report);
        }

        let out = match run_captured(&mut self.command("tty", path)) {
            Ok(out) => out,
            Err(e) => {
                report.warning(format!("Error running {TOOL} on {}: {e}", path.display()));
                return true;
            }
        };

        // shellcheck exits non-zero when it reports findings; that is expected.
        if !out.success() && out.has_stdout() {
            report.file_issues(path.display(), &out.stdout);
            return true;
        }

        report.file_ok(path.display());
        false
    }
}
