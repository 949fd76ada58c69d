//! Child-process execution of command strings.

use std::process::Command;
use std::time::Instant;

use super::types::CommandOutcome;

/// Seam for running external commands.
///
/// The orchestrator and session are generic over this, which is what makes
/// them testable without spawning real processes.
pub trait CommandExecutor: Send + Sync {
    /// Run `command` to completion and report the outcome.
    ///
    /// Blocking: callers must keep this off any UI/event thread. A
    /// bundletool run can take seconds to minutes for large bundles, and no
    /// timeout is imposed here.
    fn execute(&self, command: &str) -> CommandOutcome;
}

/// Executes commands as real OS child processes.
///
/// The command string is split on whitespace; there is no shell involved,
/// so quoting and expansion are not available.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsExecutor;

impl CommandExecutor for OsExecutor {
    fn execute(&self, command: &str) -> CommandOutcome {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return CommandOutcome::Failure {
                error: "Empty command".to_string(),
                exit_code: None,
            };
        };

        tracing::debug!("Executing: {}", command);
        let start = Instant::now();

        // `output()` drains stdout and stderr fully before reaping the
        // child, so a chatty process cannot deadlock on a full pipe.
        let output = match Command::new(program).args(parts).output() {
            Ok(output) => output,
            Err(e) => {
                return CommandOutcome::Failure {
                    error: e.to_string(),
                    exit_code: None,
                };
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            CommandOutcome::Success {
                output: stdout.trim().to_string(),
                duration_ms,
            }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let error = if stderr.is_empty() {
                "Unknown error".to_string()
            } else {
                stderr
            };
            CommandOutcome::Failure {
                error,
                exit_code: output.status.code(),
            }
        }
    }
}
