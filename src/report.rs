//! Colored console reporting.
//!
//! Every user-facing line goes through a [`Reporter`], which wraps any
//! [`Write`] sink. The binaries hand it `stdout`; tests hand it a `Vec<u8>`.
//!
//! Colors come from [`colored`], so `NO_COLOR`, `CLICOLOR_FORCE` and
//! [`colored::control::set_override`] all apply.

use colored::Colorize;
use std::fmt::Display;
use std::io::Write;

/// Line-oriented writer for lint progress, warnings and the run summary.
///
/// Write errors (for example a closed pipe) are ignored: a broken console
/// must not change the exit status of a lint run.
pub struct Reporter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> Reporter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Reporter { out }
    }

    /// Writes a line without any styling.
    pub fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{text}");
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    /// A file that passed analysis.
    pub fn file_ok(&mut self, path: impl Display) {
        self.line(format!("  OK: {path}").bright_black());
    }

    /// A file with findings: the path in white, then the tool's own output.
    pub fn file_issues(&mut self, path: impl Display, output: &str) {
        self.line(path.to_string().white());
        self.line(output.trim_end());
    }

    /// A file the external fixer rewrote in place.
    pub fn fixed(&mut self, path: impl Display) {
        self.line(format!("  Fixed: {path}").white());
    }

    /// A non-fatal problem tied to a single file.
    pub fn warning(&mut self, message: impl Display) {
        self.line(format!("  Warning: {message}").yellow());
    }

    /// An informational notice, such as "nothing to lint".
    pub fn notice(&mut self, message: impl Display) {
        self.line(message.to_string().yellow());
    }

    /// A fatal condition, marked `[FAIL]`.
    pub fn fail(&mut self, message: impl Display) {
        self.line(format!("[FAIL] {message}").red());
    }

    /// A positive outcome, marked `[OK]`.
    pub fn ok(&mut self, message: impl Display) {
        self.line(format!("[OK] {message}").green());
    }

    /// A non-fatal run-level outcome, marked `[WARN]`.
    pub fn warn(&mut self, message: impl Display) {
        self.line(format!("[WARN] {message}").yellow());
    }
}
