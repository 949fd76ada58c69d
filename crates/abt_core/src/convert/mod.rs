//! Conversion orchestrator.
//!
//! Composes the command builder, the process executor, and the output
//! post-processor into the one operation the UI cares about:
//!
//! ```text
//! build_command -> execute -> handle_bundletool_output
//!      |fail          |fail          |fail
//!      v              v              v
//!   Failure        Failure        Failure
//! ```
//!
//! Exactly one external process runs per call; there are no retries and no
//! timeout.

use std::path::Path;

use crate::command::{
    build_command, BundleToolConfig, CommandExecutor, CommandOutcome, ConversionResult,
};
use crate::postprocess::handle_bundletool_output;

/// Command string reported when the config never produced a runnable
/// command.
pub const INVALID_CONFIG_COMMAND: &str = "Invalid command configuration";

/// Runs bundletool conversions through a pluggable executor.
pub struct BundleToolRunner<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> BundleToolRunner<E> {
    /// Create a runner around the given executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Full pipeline: format, execute, post-process.
    ///
    /// A config error short-circuits before any process is spawned. A
    /// post-processing failure replaces the tool's own success output with
    /// the post-process error.
    pub fn execute_bundle_tool(&self, config: &BundleToolConfig) -> ConversionResult {
        let command = match build_command(config) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Rejected conversion config: {}", e);
                return ConversionResult {
                    command: INVALID_CONFIG_COMMAND.to_string(),
                    outcome: CommandOutcome::Failure {
                        error: e.to_string(),
                        exit_code: None,
                    },
                };
            }
        };

        let outcome = match self.executor.execute(&command) {
            CommandOutcome::Success {
                output,
                duration_ms,
            } => {
                // The artifact lands next to the bundle, named after it.
                let aab = Path::new(&config.aab_path);
                let directory = aab.parent().unwrap_or_else(|| Path::new("."));
                let file_name = aab
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| config.aab_path.clone());

                match handle_bundletool_output(directory, &file_name, config.mode.is_universal())
                {
                    Ok(message) => CommandOutcome::Success {
                        output: format!("{}\n{}", output, message),
                        duration_ms,
                    },
                    Err(e) => CommandOutcome::Failure {
                        error: e.to_string(),
                        exit_code: None,
                    },
                }
            }
            failure => failure,
        };

        ConversionResult { command, outcome }
    }

    /// Test-only access to the wrapped executor (spy assertions).
    #[cfg(test)]
    pub(crate) fn executor(&self) -> &E {
        &self.executor
    }

    /// Escape hatch: run an arbitrary command string as-is.
    ///
    /// No formatting, no post-processing - power users get exactly what
    /// they typed.
    pub fn execute_command(&self, raw_command: &str) -> CommandOutcome {
        self.executor.execute(raw_command)
    }
}
