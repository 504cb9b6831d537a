//! End-to-end runs of `shlint` and `pwshlint` against fake external tools.
//!
//! The fakes are small `/bin/sh` scripts placed first on `PATH`, so these
//! tests neither need nor touch a real shellcheck, git or PowerShell.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// `shellcheck` stand-in: files containing `BAD` have findings; `--format=diff`
/// prints the file path as the "patch" when the file contains `FIXABLE`.
///
/// Uses shell builtins only, so it also works with nothing else on `PATH`.
const FAKE_SHELLCHECK: &str = r#"#!/bin/sh
for last; do :; done
content=""
while IFS= read -r line || [ -n "$line" ]; do content="$content$line
"; done < "$last"
case "$*" in
  *--format=diff*)
    case "$content" in *FIXABLE*) echo "$last" ;; esac
    exit 1 ;;
esac
case "$content" in
  *BAD*)
    echo "In $last line 1:"
    echo "SC2086 (info): Double quote to prevent globbing and word splitting."
    exit 1 ;;
esac
exit 0
"#;

/// `shellcheck` stand-in that deletes itself while producing the diff, so
/// the check that follows cannot launch it.
const FAKE_SHELLCHECK_VANISHING: &str = r#"#!/bin/sh
case "$*" in
  *--format=diff*) /bin/rm -f "$0"; exit 1 ;;
esac
exit 0
"#;

/// `git` stand-in: `apply` rewrites the file named in the patch to clean content.
const FAKE_GIT: &str = r#"#!/bin/sh
for last; do :; done
target=$(head -n 1 "$last")
echo 'echo "fixed"' > "$target"
exit 0
"#;

/// `git` stand-in whose `apply` always fails.
const FAKE_GIT_FAILING: &str = r#"#!/bin/sh
echo "error: patch failed: test.sh:1" >&2
exit 1
"#;

/// `pwsh` stand-in: the module is present, and files containing `BAD` yield a table.
const FAKE_PWSH: &str = r#"#!/bin/sh
script="$4"
case "$script" in
  Get-Module*) echo "ModuleType Version Name"; echo "Script 1.22.0 PSScriptAnalyzer"; exit 0 ;;
  Install-Module*) exit 0 ;;
esac
path=$(printf '%s' "$script" | sed "s/^Invoke-ScriptAnalyzer -Path '\([^']*\)'.*/\1/")
case "$script" in
  *" -Fix"*) sed 's/BAD/good/' "$path" > "$path.tmp" && mv "$path.tmp" "$path"; exit 0 ;;
esac
if grep -q BAD "$path"; then
  echo "Line Severity RuleName              Message"
  echo "---- -------- --------              -------"
  echo "   1 Warning  PSAvoidUsingWriteHost Avoid Write-Host"
fi
exit 0
"#;

/// `pwsh` stand-in without the module, whose install fails.
const FAKE_PWSH_NO_MODULE: &str = r#"#!/bin/sh
case "$4" in
  Get-Module*) exit 0 ;;
  Install-Module*) echo "Unable to reach PSGallery" >&2; exit 1 ;;
esac
exit 0
"#;

/// `pwsh` stand-in without the module, whose install succeeds.
const FAKE_PWSH_INSTALLS: &str = r#"#!/bin/sh
case "$4" in
  Get-Module*) exit 0 ;;
  Install-Module*) exit 0 ;;
esac
exit 0
"#;

/// `pwsh` stand-in that reports the module, then deletes itself.
const FAKE_PWSH_VANISHING: &str = r#"#!/bin/sh
case "$4" in
  Get-Module*) echo "Script 1.22.0 PSScriptAnalyzer"; /bin/rm -f "$0"; exit 0 ;;
esac
exit 0
"#;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Sandbox {
    /// Working directory holding the scripts to lint.
    work: tempfile::TempDir,
    /// Directory holding the fake tools.
    bin: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Sandbox {
            work: tempfile::tempdir().unwrap(),
            bin: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.work.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn tool(&self, name: &str, script: &str) {
        let path = self.bin.path().join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// `PATH` with the fake tools first, followed by the system directories
    /// the fakes themselves need (`grep`, `sed`, `head`, `mv`).
    fn path_env(&self) -> std::ffi::OsString {
        let system = std::env::var_os("PATH").unwrap_or_default();
        let mut dirs = vec![self.bin.path().to_path_buf()];
        dirs.extend(std::env::split_paths(&system));
        std::env::join_paths(dirs).unwrap()
    }

    fn cmd(&self, bin: &str) -> Command {
        let mut cmd = match bin {
            "shlint" => assert_cmd::cargo::cargo_bin_cmd!("shlint"),
            _ => assert_cmd::cargo::cargo_bin_cmd!("pwshlint"),
        };
        cmd.current_dir(self.work.path())
            .env("PATH", self.path_env())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// A command whose `PATH` holds only the fake-tool directory.
    fn cmd_isolated(&self, bin: &str) -> Command {
        let mut cmd = self.cmd(bin);
        cmd.env("PATH", self.bin.path());
        cmd
    }
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ---------------------------------------------------------------------------
// shlint: discovery
// ---------------------------------------------------------------------------

#[test]
fn explicit_patterns_skip_ignored_dirs_and_sort() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("a.sh", "echo ok\n");
    sb.file("sub/x.sh", "echo ok\n");
    sb.file("sub/deeper/y.sh", "echo ok\n");
    sb.file("sub/node_modules/x.sh", "echo BAD\n");
    sb.file("other.sh", "echo BAD\n");

    let output = sb
        .cmd("shlint")
        .args(["sub/**/*.sh", "a.sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 3 file(s)"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains("other.sh").not())
        .get_output()
        .stdout
        .clone();

    let out = String::from_utf8(output).unwrap();
    let a = position(&out, "OK: a.sh");
    let deeper = position(&out, "OK: sub/deeper/y.sh");
    let x = position(&out, "OK: sub/x.sh");
    assert!(a < deeper && deeper < x, "files out of order:\n{out}");
}

#[test]
fn no_arguments_use_default_pattern() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("top.sh", "echo ok\n");
    sb.file("nested/n.sh", "echo ok\n");
    sb.file("nested/readme.md", "BAD\n");
    sb.file("build/b.sh", "echo BAD\n");

    sb.cmd("shlint")
        .assert()
        .success()
        .stdout(predicate::str::contains("ShellCheck: Linting files..."))
        .stdout(predicate::str::contains("Checked 2 file(s)"))
        .stdout(predicate::str::contains("[OK] All files are clean"));
}

#[test]
fn nothing_to_lint_exits_0() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("readme.md", "nothing here\n");

    sb.cmd("shlint")
        .assert()
        .success()
        .stdout(predicate::str::contains("No ShellCheck files found to lint"));
}

#[test]
fn ignore_flag_is_repeatable() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("keep.sh", "echo ok\n");
    sb.file("gen/a.sh", "echo BAD\n");
    sb.file("third_party/b.sh", "echo BAD\n");

    sb.cmd("shlint")
        .args(["--ignore", "gen", "--ignore", "third_party"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 file(s)"));
}

#[test]
fn config_file_ignores_are_merged() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("scriptlint.toml", "[ignore]\ndirs = [\"gen\"]\n");
    sb.file("keep.sh", "echo ok\n");
    sb.file("gen/a.sh", "echo BAD\n");

    sb.cmd("shlint")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 file(s)"));
}

#[test]
fn malformed_config_exits_2() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("bad.toml", "[ignore\n");
    sb.file("a.sh", "echo ok\n");

    sb.cmd("shlint")
        .args(["--config", "bad.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[FAIL] Configuration error"))
        .stdout(predicate::str::contains("Linting files").not());
}

// ---------------------------------------------------------------------------
// shlint: findings & exit codes
// ---------------------------------------------------------------------------

#[test]
fn findings_exit_1_and_suggest_fix() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.file("a.sh", "echo ok\n");
    sb.file("b.sh", "echo BAD\n");
    sb.file("c.sh", "echo ok\n");

    sb.cmd("shlint")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SC2086"))
        .stdout(predicate::str::contains("OK: c.sh"))
        .stdout(predicate::str::contains("Checked 3 file(s)"))
        .stdout(predicate::str::contains("[FAIL] ShellCheck found issues"))
        .stdout(predicate::str::contains("Run with --fix to apply automatic fixes"));
}

#[test]
fn missing_shellcheck_exits_2() {
    let sb = Sandbox::new();
    sb.file("a.sh", "echo ok\n");

    sb.cmd_isolated("shlint")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[FAIL] ShellCheck is not installed"))
        .stdout(predicate::str::contains("koalaman/shellcheck#installing"))
        .stdout(predicate::str::contains("Checked").not());
}

// ---------------------------------------------------------------------------
// shlint: --fix
// ---------------------------------------------------------------------------

#[test]
fn fix_applies_patch_and_passes() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.tool("git", FAKE_GIT);
    let file = sb.file("a.sh", "echo $BAD # FIXABLE\n");

    sb.cmd("shlint")
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed: a.sh"))
        .stdout(predicate::str::contains("[OK] All files are clean"));

    assert_eq!(read(&file), "echo \"fixed\"\n");
}

#[test]
fn failed_patch_warns_and_exits_1() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.tool("git", FAKE_GIT_FAILING);
    let file = sb.file("a.sh", "echo $BAD # FIXABLE\n");
    sb.file("b.sh", "echo ok\n");

    sb.cmd("shlint")
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Warning: Could not apply fixes to a.sh"))
        .stdout(predicate::str::contains("patch failed"))
        .stdout(predicate::str::contains("OK: b.sh"))
        .stdout(predicate::str::contains("[WARN] Some issues could not be auto-fixed"));

    assert_eq!(read(&file), "echo $BAD # FIXABLE\n");
}

#[test]
fn without_fix_files_are_untouched() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    sb.tool("git", FAKE_GIT);
    let file = sb.file("a.sh", "echo $BAD # FIXABLE\n");

    sb.cmd("shlint").assert().code(1);

    assert_eq!(read(&file), "echo $BAD # FIXABLE\n");
}

#[test]
fn fix_without_git_warns_and_leaves_file() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK);
    let file = sb.file("a.sh", "echo $BAD # FIXABLE\n");

    sb.cmd_isolated("shlint")
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Warning: Error during fix for a.sh"))
        .stdout(predicate::str::contains("SC2086"))
        .stdout(predicate::str::contains("Fixed:").not());

    assert_eq!(read(&file), "echo $BAD # FIXABLE\n");
}

#[test]
fn shellcheck_gone_before_check_counts_as_issue() {
    let sb = Sandbox::new();
    sb.tool("shellcheck", FAKE_SHELLCHECK_VANISHING);
    sb.file("a.sh", "echo ok\n");

    sb.cmd_isolated("shlint")
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Warning: Error running shellcheck on a.sh"))
        .stdout(predicate::str::contains("OK: a.sh").not())
        .stdout(predicate::str::contains("Checked 1 file(s)"));
}

// ---------------------------------------------------------------------------
// pwshlint
// ---------------------------------------------------------------------------

#[test]
fn pwsh_clean_and_dirty_files() {
    let sb = Sandbox::new();
    sb.tool("pwsh", FAKE_PWSH);
    sb.file("ok.ps1", "Write-Output 'hi'\n");
    sb.file("scripts/dirty.ps1", "BAD\n");

    sb.cmd("pwshlint")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PSScriptAnalyzer: Linting files..."))
        .stdout(predicate::str::contains("OK: ok.ps1"))
        .stdout(predicate::str::contains("PSAvoidUsingWriteHost"))
        .stdout(predicate::str::contains("Checked 2 file(s)"))
        .stdout(predicate::str::contains("[FAIL] PSScriptAnalyzer found issues"));
}

#[test]
fn pwsh_fix_rewrites_in_place() {
    let sb = Sandbox::new();
    sb.tool("pwsh", FAKE_PWSH);
    let file = sb.file("dirty.ps1", "BAD\n");

    sb.cmd("pwshlint")
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] All files are clean"));

    assert_eq!(read(&file), "good\n");
}

#[test]
fn pwsh_gone_after_provisioning_warns_and_exits_1() {
    let sb = Sandbox::new();
    sb.tool("pwsh", FAKE_PWSH_VANISHING);
    sb.file("a.ps1", "Write-Output 'hi'\n");

    sb.cmd_isolated("pwshlint")
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Warning: Error during fix for a.ps1"))
        .stdout(predicate::str::contains("Warning: Error running pwsh on a.ps1"))
        .stdout(predicate::str::contains("OK: a.ps1").not());
}

#[test]
fn pwsh_missing_host_exits_2() {
    let sb = Sandbox::new();
    sb.file("a.ps1", "Write-Output 'hi'\n");

    sb.cmd_isolated("pwshlint")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[FAIL] PowerShell (pwsh) is not installed"));
}

#[test]
fn pwsh_failed_provisioning_exits_2() {
    let sb = Sandbox::new();
    sb.tool("pwsh", FAKE_PWSH_NO_MODULE);
    sb.file("a.ps1", "Write-Output 'hi'\n");

    sb.cmd("pwshlint")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Installing PSScriptAnalyzer..."))
        .stdout(predicate::str::contains(
            "[FAIL] Failed to install PSScriptAnalyzer: Unable to reach PSGallery",
        ))
        .stdout(predicate::str::contains("Linting files").not());
}

#[test]
fn pwsh_provisioning_then_lints() {
    let sb = Sandbox::new();
    sb.tool("pwsh", FAKE_PWSH_INSTALLS);
    sb.file("a.ps1", "Write-Output 'hi'\n");

    sb.cmd("pwshlint")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] PSScriptAnalyzer installed successfully"))
        .stdout(predicate::str::contains("Checked 1 file(s)"));
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn help_lists_shared_options() {
    assert_cmd::cargo::cargo_bin_cmd!("shlint")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fix"))
        .stdout(predicate::str::contains("--ignore"))
        .stdout(predicate::str::contains("ShellCheck"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    assert_cmd::cargo::cargo_bin_cmd!("pwshlint")
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}
