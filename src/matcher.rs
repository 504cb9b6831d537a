//! File discovery.
//!
//! [`find_files`] turns a list of literal paths and glob patterns into a
//! sorted, deduplicated list of regular files, skipping anything that lives
//! under an ignored directory.
//!
//! # Pattern semantics
//!
//! - A pattern naming an existing file is taken as-is, so callers never need
//!   to escape `[`, `*` or `?` in real file names.
//! - Anything else is a glob: `*`, `?` and `[...]` stay inside one path
//!   component, and a `**` component matches zero or more directories.
//!   A `**` inside a component (`**.sh`, `s**`) acts as a plain `*`.
//! - Wildcards do not match a leading `.`; hidden files and directories are
//!   only found when the pattern spells out the dot.
//! - A pattern that matches nothing is not an error.
//! - Matching runs against walked directory entries, which never contain
//!   `..`; a `..` after the first wildcard (`*/../a.sh`) matches nothing.

use glob::{MatchOptions, Pattern};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directory names that are always excluded from discovery.
pub const DEFAULT_IGNORES: &[&str] = &[
    "__pycache__",
    ".git",
    ".husky",
    ".venv",
    "build",
    "dist",
    "node_modules",
    "target",
    "vendor",
    "venv",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: cfg!(not(windows)),
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Directory names excluded from discovery.
///
/// Matching is exact equality against a single path component: `build`
/// ignores `build/x.sh` and `a/build/x.sh`, but not `rebuild/x.sh`.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: HashSet<OsString>,
}

impl IgnoreSet {
    /// The built-in [`DEFAULT_IGNORES`] plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = DEFAULT_IGNORES
            .iter()
            .map(OsString::from)
            .chain(extra.into_iter().map(|s| OsString::from(s.as_ref())))
            .collect();
        IgnoreSet { names }
    }

    /// `true` if `name` is exactly one of the ignored directory names.
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// `true` if any component of `path` is an ignored name.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.components().any(|c| match c {
            Component::Normal(name) => self.contains(name),
            _ => false,
        })
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        IgnoreSet::with_extra(std::iter::empty::<&str>())
    }
}

/// Resolves `patterns` to the set of files they name.
///
/// `extra_ignores` is added to [`DEFAULT_IGNORES`]. The result is normalized
/// with [`normalize_path`], deduplicated, and sorted byte-wise. An empty
/// `patterns` slice yields an empty result.
///
/// # Examples
///
/// ```rust,no_run
/// use scriptlint::matcher::find_files;
///
/// let files = find_files(&["install.sh", "scripts/**/*.sh"], &["third_party"]);
/// for file in &files {
///     println!("{}", file.display());
/// }
/// ```
pub fn find_files<P, I>(patterns: &[P], extra_ignores: &[I]) -> Vec<PathBuf>
where
    P: AsRef<str>,
    I: AsRef<str>,
{
    let ignores = IgnoreSet::with_extra(extra_ignores);
    let mut found: BTreeSet<OsString> = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let literal = Path::new(pattern);

        if literal.is_file() {
            if !ignores.is_ignored(literal) {
                found.insert(normalize_path(literal).into_os_string());
            }
            continue;
        }

        for path in expand_glob(pattern, &ignores) {
            if !ignores.is_ignored(&path) {
                found.insert(normalize_path(&path).into_os_string());
            }
        }
    }

    tracing::debug!(patterns = patterns.len(), files = found.len(), "files resolved");
    found.into_iter().map(PathBuf::from).collect()
}

/// Lexically normalizes `path`.
///
/// Drops `.` components and repeated separators and folds `dir/..` pairs.
/// A leading `..` is kept, and `..` directly under the root is dropped. An
/// empty result becomes `.`. The filesystem is never consulted, so symlinks
/// are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Splits `pattern` into its literal directory prefix and the wildcard rest.
///
/// `"sub/dir/**/*.sh"` becomes `("sub/dir/", "**/*.sh")`. The prefix is empty
/// when the first component already holds a wildcard.
fn split_literal_prefix(pattern: &str) -> (&str, &str) {
    let mut offset = 0;
    for segment in pattern.split('/') {
        if has_wildcard(segment) {
            break;
        }
        offset += segment.len() + 1;
    }
    pattern.split_at(offset.min(pattern.len()))
}

/// Rewrites every `**` that is not a whole path component to `*`.
///
/// The glob parser only accepts `**` as a complete component.
fn collapse_inline_double_star(pattern: &str) -> Cow<'_, str> {
    if !pattern.split('/').any(|seg| seg != "**" && seg.contains("**")) {
        return Cow::Borrowed(pattern);
    }

    let segments: Vec<String> = pattern
        .split('/')
        .map(|seg| {
            if seg == "**" {
                return seg.to_string();
            }
            let mut out = String::with_capacity(seg.len());
            for c in seg.chars() {
                if c == '*' && out.ends_with('*') {
                    continue;
                }
                out.push(c);
            }
            out
        })
        .collect();
    Cow::Owned(segments.join("/"))
}

/// Expands a glob pattern to the regular files it matches.
///
/// The walk starts at the literal prefix, skips ignored directories, and is
/// depth-bounded unless the pattern contains `**`.
fn expand_glob(pattern: &str, ignores: &IgnoreSet) -> Vec<PathBuf> {
    if !has_wildcard(pattern) {
        return vec![];
    }

    let (base, rest) = split_literal_prefix(pattern);
    let rest = collapse_inline_double_star(rest);
    let rest: &str = &rest;
    let compiled = match Pattern::new(rest) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(pattern, error = %e, "ignoring invalid glob pattern");
            return vec![];
        }
    };

    let root = if base.is_empty() { Path::new(".") } else { Path::new(base) };
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
    if !rest.split('/').any(|segment| segment == "**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    walker
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !ignores.contains(entry.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .is_ok_and(|relative| compiled.matches_path_with(relative, MATCH_OPTIONS))
        })
        .map(|entry| {
            if base.is_empty() {
                entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf()
            } else {
                entry.into_path()
            }
        })
        .collect()
}
