//! Lint run orchestration.
//!
//! [`run`] drives a single [`Linter`] over a set of files:
//!
//! 1. Verify the external tool with [`Linter::check_installed`]. On failure
//!    the run stops with [`RunStatus::EnvironmentError`] and nothing else
//!    happens.
//! 2. Resolve files with [`find_files`], using the linter's
//!    [`default_pattern`](Linter::default_pattern) when no patterns are given.
//! 3. Stop with [`RunStatus::Clean`] if there is nothing to lint.
//! 4. Lint every file in sorted order, one at a time. A failure on one file
//!    never skips the rest.
//! 5. Print the summary and reduce the results to a [`RunStatus`].

use crate::linters::Linter;
use crate::matcher::find_files;
use crate::report::Reporter;

/// Per-run options, already merged from the command line and config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// File paths or glob patterns. Empty means "use the default pattern".
    pub patterns: Vec<String>,
    /// Attempt automatic fixes before the final check.
    pub fix: bool,
    /// Directory names ignored on top of the built-in set.
    pub ignore: Vec<String>,
}

/// Outcome of a lint run, reduced to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file is clean, or there was nothing to lint.
    Clean,
    /// At least one file still has issues.
    IssuesFound,
    /// The external tool is missing or could not be provisioned.
    EnvironmentError,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::IssuesFound => 1,
            RunStatus::EnvironmentError => 2,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub files_checked: usize,
    pub files_with_issues: usize,
}

impl RunSummary {
    fn stopped(status: RunStatus) -> Self {
        RunSummary {
            status,
            files_checked: 0,
            files_with_issues: 0,
        }
    }
}

/// Returns the patterns a run will resolve: the caller's, or the linter's
/// default when the caller gave none.
pub fn effective_patterns(linter: &dyn Linter, patterns: &[String]) -> Vec<String> {
    if patterns.is_empty() {
        vec![linter.default_pattern().to_string()]
    } else {
        patterns.to_vec()
    }
}

/// Runs `linter` according to `options`, reporting through `report`.
///
/// # Examples
///
/// ```rust,no_run
/// use scriptlint::config::Config;
/// use scriptlint::linters::LinterKind;
/// use scriptlint::orchestrator::{run, RunOptions};
/// use scriptlint::report::Reporter;
///
/// let linter = LinterKind::ShellCheck.build(&Config::default());
/// let mut stdout = std::io::stdout();
/// let summary = run(linter.as_ref(), &RunOptions::default(), &mut Reporter::new(&mut stdout));
///
/// std::process::exit(summary.status.exit_code());
/// ```
pub fn run(linter: &dyn Linter, options: &RunOptions, report: &mut Reporter) -> RunSummary {
    if let Err(e) = linter.check_installed(report) {
        tracing::debug!(linter = linter.name(), error = %e, "environment check failed");
        report.fail(&e);
        if let Some(hint) = e.hint() {
            report.line(hint);
        }
        return RunSummary::stopped(RunStatus::EnvironmentError);
    }

    let patterns = effective_patterns(linter, &options.patterns);
    tracing::debug!(?patterns, ignore = ?options.ignore, "resolving files");
    let files = find_files(&patterns, &options.ignore);

    if files.is_empty() {
        report.notice(format!("No {} files found to lint", linter.name()));
        return RunSummary::stopped(RunStatus::Clean);
    }

    report.line(format!("{}: Linting files...", linter.name()));
    report.blank();

    let mut files_with_issues = 0;
    for file in &files {
        if linter.lint_file(file, options.fix, report) {
            files_with_issues += 1;
        }
    }

    report.blank();
    report.line(format!("Checked {} file(s)", files.len()));

    let status = if files_with_issues == 0 {
        report.ok("All files are clean");
        RunStatus::Clean
    } else if options.fix {
        report.blank();
        report.warn("Some issues could not be auto-fixed");
        report.line("Please review and fix them manually");
        RunStatus::IssuesFound
    } else {
        report.fail(format!("{} found issues", linter.name()));
        report.line("Run with --fix to apply automatic fixes");
        RunStatus::IssuesFound
    };

    RunSummary {
        status,
        files_checked: files.len(),
        files_with_issues,
    }
}
