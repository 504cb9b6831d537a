//! PowerShell script linting via
//! [PSScriptAnalyzer](https://github.com/PowerShell/PSScriptAnalyzer).
//!
//! Requires `pwsh` on `PATH`. The `PSScriptAnalyzer` module is installed for
//! the current user on first use if it is missing.
//!
//! # How it works
//!
//! 1. With `--fix`, runs `Invoke-ScriptAnalyzer -Fix`, which rewrites the
//!    file in place.
//! 2. Runs `Invoke-ScriptAnalyzer` again, formatting any findings as a table.
//!    Non-empty output means issues remain.
//!
//! A settings file is passed through when one is configured, or when
//! `.PSScriptAnalyzerSettings.psd1` sits in the parent of the directory the
//! executable was installed into.

use crate::config::PwshConfig;
use crate::error::EnvironmentError;
use crate::linters::Linter;
use crate::process::{run_captured, which_exists, Captured};
use crate::report::Reporter;
use std::path::{Path, PathBuf};
use std::process::Command;

const HOST: &str = "pwsh";
const MODULE: &str = "PSScriptAnalyzer";
const SETTINGS_FILE: &str = ".PSScriptAnalyzerSettings.psd1";

/// External linter wrapper for PSScriptAnalyzer, driven through `pwsh`.
pub struct PwshLinter {
    settings: Option<PathBuf>,
}

impl PwshLinter {
    /// Builds the linter, resolving the settings file once up front.
    pub fn new(config: PwshConfig) -> Self {
        PwshLinter {
            settings: resolve_settings(config.settings),
        }
    }

    /// Returns the settings file passed to the analyzer, if one exists.
    pub fn settings_file(&self) -> Option<&Path> {
        self.settings.as_deref()
    }

    /// Builds the `Invoke-ScriptAnalyzer` call for `path`.
    fn analyzer_script(&self, path: &Path, fix: bool) -> String {
        let mut script = format!("Invoke-ScriptAnalyzer -Path {}", quote(path));
        if fix {
            script.push_str(" -Fix");
        }
        if let Some(settings) = self.settings_file() {
            script.push_str(&format!(" -Settings {}", quote(settings)));
        }
        script.push_str(" -ErrorAction SilentlyContinue");
        script
    }

    /// Installs the analyzer module if `pwsh` cannot find it.
    fn ensure_module(&self, report: &mut Reporter) -> Result<(), EnvironmentError> {
        let check = run_pwsh(&format!("Get-Module -ListAvailable -Name {MODULE}"))
            .map_err(|source| EnvironmentError::Launch { tool: HOST, source })?;
        if check.success() && check.has_stdout() {
            return Ok(());
        }

        report.notice(format!("Installing {MODULE}..."));
        let install = run_pwsh(&format!(
            "Install-Module -Name {MODULE} -Force -Scope CurrentUser \
             -SkipPublisherCheck -ErrorAction Stop"
        ))
        .map_err(|source| EnvironmentError::Launch { tool: HOST, source })?;

        if !install.success() {
            return Err(EnvironmentError::ProvisionFailed {
                tool: MODULE,
                detail: install.stderr.trim().to_string(),
            });
        }
        report.ok(format!("{MODULE} installed successfully"));
        Ok(())
    }
}

/// A configured path wins; otherwise the file is looked up relative to the
/// running executable.
fn resolve_settings(configured: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(configured) = configured {
        if configured.is_file() {
            return Some(configured);
        }
        tracing::warn!(path = %configured.display(), "configured settings file not found");
        return None;
    }

    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.parent()?.join(SETTINGS_FILE);
    candidate.is_file().then_some(candidate)
}

/// Runs `script` in a non-interactive PowerShell host.
fn run_pwsh(script: &str) -> std::io::Result<Captured> {
    run_captured(
        Command::new(HOST)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(script),
    )
}

/// Wraps `path` in a PowerShell single-quoted literal.
///
/// Single-quoted strings are not interpolated; an embedded `'` is escaped by
/// doubling it.
pub fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

impl Linter for PwshLinter {
    fn name(&self) -> &'static str {
        MODULE
    }

    fn default_pattern(&self) -> &'static str {
        "**/*.ps1"
    }

    fn check_installed(&self, report: &mut Reporter) -> Result<(), EnvironmentError> {
        if !which_exists(HOST) {
            return Err(EnvironmentError::ToolMissing {
                tool: "PowerShell (pwsh)",
                hint: None,
            });
        }
        self.ensure_module(report)
    }

    fn lint_file(&self, path: &Path, fix: bool, report: &mut Reporter) -> bool {
        if fix {
            if let Err(e) = run_pwsh(&self.analyzer_script(path, true)) {
                report.warning(format!("Error during fix for {}: {e}", path.display()));
            }
        }

        let script = format!(
            "{} | Format-Table -Property Line, Severity, RuleName, Message -AutoSize | \
             Out-String -Width 4096",
            self.analyzer_script(path, false)
        );
        let out = match run_pwsh(&script) {
            Ok(out) => out,
            Err(e) => {
                report.warning(format!("Error running {HOST} on {}: {e}", path.display()));
                return true;
            }
        };

        if out.success() && out.has_stdout() {
            report.file_issues(path.display(), out.stdout.trim());
            return true;
        }

        report.file_ok(path.display());
        false
    }
}
