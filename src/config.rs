//! Configuration loading.
//!
//! The default configuration file is `scriptlint.toml` in the current working
//! directory. Every field has a default, so the file can be omitted entirely.
//!
//! ```toml
//! [ignore]
//! dirs = ["third_party"]
//!
//! [shellcheck]
//! severity = "warning"
//! follow_sources = true
//!
//! [pwsh]
//! settings = "tools/PSScriptAnalyzerSettings.psd1"
//! ```

use crate::error::EnvironmentError;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "scriptlint.toml";

/// Main configuration shared by both linters.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ignore: IgnoreConfig,
    pub shellcheck: ShellCheckConfig,
    pub pwsh: PwshConfig,
}

/// Extra directory names excluded from discovery.
///
/// These are added to the built-in ignore set and to any `--ignore` flags;
/// they never replace them.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IgnoreConfig {
    pub dirs: Vec<String>,
}

/// Options passed through to `shellcheck`.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellCheckConfig {
    /// Minimum severity reported (`error`, `warning`, `info` or `style`).
    pub severity: String,
    /// Follow `source` statements (`shellcheck -x`).
    pub follow_sources: bool,
}

impl Default for ShellCheckConfig {
    fn default() -> Self {
        ShellCheckConfig {
            severity: "style".to_string(),
            follow_sources: true,
        }
    }
}

/// Options passed through to PSScriptAnalyzer.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PwshConfig {
    /// Explicit settings file. When unset, the linter looks for
    /// `.PSScriptAnalyzerSettings.psd1` next to its own install directory.
    pub settings: Option<PathBuf>,
}

const SEVERITIES: &[&str] = &["error", "warning", "info", "style"];

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. Otherwise try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::Config`] when the explicit path does not
    /// exist, the file cannot be read, the TOML fails to parse, or the
    /// ShellCheck severity is not one it accepts.
    pub fn load(path: Option<&Path>) -> Result<Config, EnvironmentError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                return Err(EnvironmentError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )))
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            return Ok(Config::default());
        };

        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path).map_err(|e| {
            EnvironmentError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            EnvironmentError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EnvironmentError> {
        if !SEVERITIES.contains(&self.shellcheck.severity.as_str()) {
            return Err(EnvironmentError::Config(format!(
                "Unknown shellcheck severity '{}' (expected one of: {})",
                self.shellcheck.severity,
                SEVERITIES.join(", ")
            )));
        }
        Ok(())
    }
}
