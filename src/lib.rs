//! # scriptlint
//!
//! Uniform command-line front end for external script linters.
//!
//! `scriptlint` does no analysis of its own. It resolves which files to lint,
//! hands each one to an external tool, prints the tool's findings with a
//! consistent colored layout, optionally runs the tool's fixer first, and
//! reduces the whole run to an exit code.
//!
//! ## Binaries
//!
//! | Binary | External tool | Default pattern |
//! |--------|---------------|-----------------|
//! | `shlint` | [shellcheck] (+ `git apply` for `--fix`) | `**/*.sh` |
//! | `pwshlint` | [PSScriptAnalyzer] via `pwsh` | `**/*.ps1` |
//!
//! Exit codes: `0` clean or nothing to lint, `1` issues remain, `2` the
//! external tool is missing or the configuration is invalid.
//!
//! ## Architecture
//!
//! 1. **[`cli`]**: shared argument parsing and process entry point.
//! 2. **[`config`]**: optional `scriptlint.toml`.
//! 3. **[`matcher`]**: literal paths and globs to a sorted file list.
//! 4. **[`linters`]**: the [`linters::Linter`] trait and its backends.
//! 5. **[`orchestrator`]**: the run loop and exit status.
//! 6. **[`report`]**: colored console output.
//!
//! [shellcheck]: https://www.shellcheck.net/
//! [PSScriptAnalyzer]: https://github.com/PowerShell/PSScriptAnalyzer

pub mod cli;
pub mod config;
pub mod error;
pub mod linters;
pub mod matcher;
pub mod orchestrator;
pub mod process;
pub mod report;
