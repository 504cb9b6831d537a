//! Fatal precondition failures.
//!
//! Lint findings are never errors; they flow back to the orchestrator as a
//! plain `bool`. The only failures that stop a run are the ones in
//! [`EnvironmentError`], and every one of them maps to exit code `2`.

use thiserror::Error;

/// A required external tool is unusable, or the run could not be configured.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("{tool} is not installed")]
    ToolMissing {
        tool: &'static str,
        /// Optional installation hint printed below the failure line.
        hint: Option<&'static str>,
    },

    #[error("Failed to install {tool}: {detail}")]
    ProvisionFailed { tool: &'static str, detail: String },

    #[error("Failed to run {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnvironmentError {
    /// Returns the installation hint attached to a missing tool, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            EnvironmentError::ToolMissing { hint, .. } => *hint,
            _ => None,
        }
    }
}
