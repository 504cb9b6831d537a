//! Pluggable linter backends.
//!
//! Every backend implements the [`Linter`] trait. The orchestrator depends
//! only on that trait; the concrete tools live in [`shellcheck`] and
//! [`pwsh`], and each delegates the actual analysis to an external process.
//!
//! Use [`LinterKind::build`] to obtain a configured backend.

pub mod pwsh;
pub mod shellcheck;

use crate::config::Config;
use crate::error::EnvironmentError;
use crate::report::Reporter;
use std::path::Path;

/// A file linter backed by an external tool.
///
/// # Implementing a custom linter
///
/// ```rust,ignore
/// use scriptlint::linters::Linter;
///
/// pub struct MyLinter;
///
/// impl Linter for MyLinter {
///     fn name(&self) -> &'static str { "MyLint" }
///     fn default_pattern(&self) -> &'static str { "**/*.my" }
///     fn check_installed(&self, report: &mut Reporter) -> Result<(), EnvironmentError> { Ok(()) }
///     fn lint_file(&self, path: &Path, fix: bool, report: &mut Reporter) -> bool {
///         // ... run the tool, print its output ...
///         # todo!()
///     }
/// }
/// ```
pub trait Linter {
    /// Display name used in progress and summary lines.
    fn name(&self) -> &'static str;

    /// Glob used when the caller names no files.
    fn default_pattern(&self) -> &'static str;

    /// Verifies the external tool is usable, provisioning it if the backend
    /// knows how.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvironmentError`] when the tool is absent and cannot be
    /// provisioned. The run stops before any file is discovered.
    fn check_installed(&self, report: &mut Reporter) -> Result<(), EnvironmentError>;

    /// Lints one file and returns `true` if issues remain.
    ///
    /// With `fix` set, the tool's own fixer is run first and the returned
    /// value reflects the file after fixing. Findings are printed, never
    /// raised; a tool that fails to launch is reported as a warning.
    fn lint_file(&self, path: &Path, fix: bool, report: &mut Reporter) -> bool;
}

/// The built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinterKind {
    ShellCheck,
    Pwsh,
}

impl LinterKind {
    /// Builds the backend for this kind from `config`.
    pub fn build(self, config: &Config) -> Box<dyn Linter> {
        match self {
            LinterKind::ShellCheck => {
                Box::new(shellcheck::ShellCheckLinter::new(config.shellcheck.clone()))
            }
            LinterKind::Pwsh => Box::new(pwsh::PwshLinter::new(config.pwsh.clone())),
        }
    }
}
