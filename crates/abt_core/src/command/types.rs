//! Result types for command construction and execution.

use thiserror::Error;

/// Errors from building a bundletool command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandConfigError {
    #[error("BundleTool path missing")]
    MissingToolPath,

    #[error("AAB file path missing")]
    MissingAabPath,
}

/// Outcome of running one external command.
///
/// Produced once per invocation and never mutated. Failures are data, not
/// panics: nothing in the execution layer throws across this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Process exited with code 0.
    Success {
        /// Trimmed stdout of the process.
        output: String,
        /// Wall-clock duration of the run in milliseconds.
        duration_ms: u64,
    },
    /// Process exited nonzero, or could not be launched at all.
    Failure {
        /// Captured stderr, launch error text, or `"Unknown error"`.
        error: String,
        /// Exit code when the process ran; `None` on launch failure.
        exit_code: Option<i32>,
    },
}

impl CommandOutcome {
    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A formatted command paired with its final outcome.
///
/// `command` is what was (or would have been) executed; when the config was
/// invalid it holds the literal text `"Invalid command configuration"` and
/// no process was spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub command: String,
    pub outcome: CommandOutcome,
}
