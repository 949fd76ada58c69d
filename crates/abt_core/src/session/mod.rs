//! Conversion session: the glue between a front-end and the pipeline.
//!
//! Owns the [`AppState`] behind a mutex (the single serialized update
//! point), persists user selections through the [`ConfigManager`], and
//! runs conversions through a [`BundleToolRunner`]. One conversion or one
//! custom command at a time: `convert` refuses to start while a run is in
//! flight, and the front-end is expected to disable the trigger control
//! while `is_converting` is set.
//!
//! `convert` and `run_custom_command` block for the duration of the child
//! process; call them from a worker thread, never from the UI thread.

use parking_lot::Mutex;

use crate::command::{BundleToolConfig, CommandExecutor, CommandOutcome, KeystoreConfig, OsExecutor};
use crate::config::{ConfigManager, ConfigResult, Settings, SigningSettings};
use crate::convert::BundleToolRunner;
use crate::models::SigningMode;
use crate::state::{AppEvent, AppState, SigningState};

/// Drives conversions and keeps UI state and persisted config in sync.
pub struct ConversionSession<E: CommandExecutor> {
    state: Mutex<AppState>,
    config: Mutex<ConfigManager>,
    runner: BundleToolRunner<E>,
}

/// Result of one session-driven run: the final state snapshot plus the
/// structured outcome, so callers map exit status from the outcome rather
/// than scraping the log text.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub state: AppState,
    pub outcome: CommandOutcome,
}

impl ConversionSession<OsExecutor> {
    /// Create a session backed by real OS processes, restoring persisted
    /// state from `config_path`.
    pub fn open(config_path: impl Into<std::path::PathBuf>) -> ConfigResult<Self> {
        Self::with_executor(config_path, OsExecutor)
    }
}

impl<E: CommandExecutor> ConversionSession<E> {
    /// Create a session with a custom executor (tests use a spy here).
    pub fn with_executor(
        config_path: impl Into<std::path::PathBuf>,
        executor: E,
    ) -> ConfigResult<Self> {
        let mut config = ConfigManager::new(config_path);
        config.load_or_create()?;

        let state = state_from_settings(config.settings());
        tracing::info!("Session restored from {}", config.path().display());

        Ok(Self {
            state: Mutex::new(state),
            config: Mutex::new(config),
            runner: BundleToolRunner::new(executor),
        })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.lock().clone()
    }

    /// Apply a front-end event.
    ///
    /// Path and signing-mode selections are persisted immediately; the
    /// output mode and credential keystrokes ride along with the next
    /// eager save or when a conversion starts.
    pub fn handle_event(&self, event: AppEvent) {
        tracing::debug!("Received event: {:?}", event);

        let persist = matches!(
            event,
            AppEvent::SelectAabFile(_)
                | AppEvent::SelectBundleToolPath(_)
                | AppEvent::SelectOutputDir(_)
                | AppEvent::SelectSigningMode(_)
                | AppEvent::SelectKeystorePath(_)
        );

        {
            let mut state = self.state.lock();
            *state = state.clone().reduce(event);
        }

        if persist {
            if let Err(e) = self.persist_current_state() {
                tracing::error!("Failed to persist config: {}", e);
            }
        }
    }

    /// Clear the user-visible conversion log.
    pub fn clear_log(&self) {
        self.handle_event(AppEvent::ClearLog);
    }

    /// Run the full conversion pipeline for the current state.
    ///
    /// Blocking. Returns the final state snapshot and the outcome, so a CLI
    /// caller can print the log and derive an exit code without polling.
    pub fn convert(&self) -> SessionRun {
        {
            let mut state = self.state.lock();
            if state.is_converting {
                tracing::warn!("Conversion already in flight, ignoring trigger");
                return SessionRun {
                    state: state.clone(),
                    outcome: CommandOutcome::Failure {
                        error: "Conversion already in progress".into(),
                        exit_code: None,
                    },
                };
            }
            *state = state
                .clone()
                .reduce(AppEvent::ConversionStarted("Starting conversion...\n".into()));
        }

        let snapshot = self.state();
        tracing::info!("Starting conversion for AAB: {}", snapshot.aab_path);

        if let Err(e) = self.persist_current_state() {
            tracing::error!("Failed to persist config: {}", e);
        }

        let config = invocation_config(&snapshot);
        let result = self.runner.execute_bundle_tool(&config);

        self.apply(AppEvent::AppendLog(format!("\n> {}\n", result.command)));
        match &result.outcome {
            CommandOutcome::Success {
                output,
                duration_ms,
            } => {
                tracing::info!("Conversion finished in {} ms", duration_ms);
                self.apply(AppEvent::AppendLog(format!(
                    "\n{}\nCompleted in {}ms",
                    output, duration_ms
                )));
            }
            CommandOutcome::Failure { error, exit_code } => {
                tracing::error!("Conversion failed (exit code {:?}): {}", exit_code, error);
                self.apply(AppEvent::AppendLog(format!("\nError: {}", error)));
            }
        }
        self.apply(AppEvent::ConversionFinished);

        SessionRun {
            state: self.state(),
            outcome: result.outcome,
        }
    }

    /// Run an arbitrary command through the executor, no post-processing.
    ///
    /// Blocking, like `convert`.
    pub fn run_custom_command(&self, command: &str) -> SessionRun {
        tracing::info!("Running custom command: {}", command);
        self.apply(AppEvent::AppendLog(format!("\n> {}\n", command)));

        let outcome = self.runner.execute_command(command);
        match &outcome {
            CommandOutcome::Success {
                output,
                duration_ms,
            } => {
                self.apply(AppEvent::AppendLog(format!(
                    "{}\nDone in {}ms\n",
                    output, duration_ms
                )));
            }
            CommandOutcome::Failure { error, .. } => {
                self.apply(AppEvent::AppendLog(format!("Error: {}\n", error)));
            }
        }

        SessionRun {
            state: self.state(),
            outcome,
        }
    }

    fn apply(&self, event: AppEvent) {
        let mut state = self.state.lock();
        *state = state.clone().reduce(event);
    }

    fn persist_current_state(&self) -> ConfigResult<()> {
        let snapshot = self.state();
        let mut config = self.config.lock();
        *config.settings_mut() = settings_from_state(&snapshot);
        config.save()
    }
}

/// Restore screen state from the persisted settings.
fn state_from_settings(settings: &Settings) -> AppState {
    AppState {
        aab_path: settings.aab_path.clone(),
        bundle_tool_path: settings.bundle_tool_path.clone(),
        output_dir: settings.output_dir.clone(),
        mode: settings.mode,
        signing: SigningState {
            signing_mode: settings.signing.signing_mode,
            keystore_path: settings.signing.keystore_path.clone(),
            keystore_password: settings.signing.keystore_password.clone(),
            key_alias: settings.signing.key_alias.clone(),
            key_password: settings.signing.key_password.clone(),
        },
        ..AppState::default()
    }
}

/// Project screen state down to the persisted settings record.
fn settings_from_state(state: &AppState) -> Settings {
    Settings {
        bundle_tool_path: state.bundle_tool_path.clone(),
        aab_path: state.aab_path.clone(),
        output_dir: state.output_dir.clone(),
        mode: state.mode,
        signing: SigningSettings {
            signing_mode: state.signing.signing_mode,
            keystore_path: state.signing.keystore_path.clone(),
            keystore_password: state.signing.keystore_password.clone(),
            key_alias: state.signing.key_alias.clone(),
            key_password: state.signing.key_password.clone(),
        },
    }
}

/// Build the bundletool invocation for the current screen state.
///
/// The keystore rides along only in Release mode; Debug lets bundletool
/// fall back to its own signing.
fn invocation_config(state: &AppState) -> BundleToolConfig {
    BundleToolConfig {
        bundle_tool_path: state.bundle_tool_path.clone(),
        aab_path: state.aab_path.clone(),
        output_path: if state.output_dir.is_empty() {
            None
        } else {
            Some(state.output_dir.clone())
        },
        mode: state.mode,
        keystore: if state.signing.signing_mode == SigningMode::Release {
            Some(KeystoreConfig {
                path: state.signing.keystore_path.clone(),
                password: state.signing.keystore_password.clone(),
                key_alias: state.signing.key_alias.clone(),
                key_password: state.signing.key_password.clone(),
            })
        } else {
            None
        },
        device_id: None,
        overwrite: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    use crate::models::OutputMode;

    /// Always succeeds; counts invocations.
    struct StubExecutor {
        calls: Mutex<Vec<String>>,
    }

    impl StubExecutor {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandExecutor for StubExecutor {
        fn execute(&self, command: &str) -> CommandOutcome {
            self.calls.lock().push(command.to_string());
            CommandOutcome::Success {
                output: "ok".into(),
                duration_ms: 7,
            }
        }
    }

    fn session_in(dir: &std::path::Path) -> ConversionSession<StubExecutor> {
        ConversionSession::with_executor(dir.join("config.toml"), StubExecutor::new()).unwrap()
    }

    #[test]
    fn open_creates_config_and_idle_state() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        assert!(dir.path().join("config.toml").exists());
        let state = session.state();
        assert!(!state.is_converting);
        assert!(!state.is_ready());
    }

    #[test]
    fn selection_events_are_persisted() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        session.handle_event(AppEvent::SelectAabFile("/builds/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));

        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(content.contains("/builds/app.aab"));
        assert!(content.contains("/opt/bundletool"));
    }

    #[test]
    fn mode_selection_is_not_persisted_on_its_own() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        session.handle_event(AppEvent::SelectMode(OutputMode::ApkSet));
        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(!content.contains("ApkSet"));

        // The next eagerly-saved selection flushes the mode along with it.
        session.handle_event(AppEvent::SelectAabFile("/builds/app.aab".into()));
        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(content.contains("ApkSet"));
    }

    #[test]
    fn state_is_restored_across_sessions() {
        let dir = tempdir().unwrap();
        {
            let session = session_in(dir.path());
            session.handle_event(AppEvent::SelectAabFile("/builds/app.aab".into()));
            session.handle_event(AppEvent::SelectSigningMode(SigningMode::Release));
        }

        let session = session_in(dir.path());
        let state = session.state();
        assert_eq!(state.aab_path, "/builds/app.aab");
        assert_eq!(state.signing.signing_mode, SigningMode::Release);
    }

    #[test]
    fn convert_with_invalid_config_spawns_nothing() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        let run = session.convert();

        assert!(session.runner_calls().is_empty());
        assert!(!run.outcome.is_success());
        assert!(!run.state.is_converting);
        assert!(run.state.log.contains("> Invalid command configuration"));
        assert!(run.state.log.contains("Error: BundleTool path missing"));
    }

    #[test]
    fn convert_is_refused_while_a_run_is_in_flight() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));
        session.handle_event(AppEvent::ConversionStarted("Starting conversion...\n".into()));

        let run = session.convert();

        assert!(session.runner_calls().is_empty());
        assert!(run.state.is_converting);
        assert_eq!(run.state.log, "Starting conversion...\n");
        match run.outcome {
            CommandOutcome::Failure { error, exit_code } => {
                assert_eq!(error, "Conversion already in progress");
                assert_eq!(exit_code, None);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn convert_non_universal_appends_output_and_duration() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));
        session.handle_event(AppEvent::SelectMode(OutputMode::ApkSet));

        let run = session.convert();

        assert_eq!(session.runner_calls().len(), 1);
        assert!(run.outcome.is_success());
        assert!(run.state.log.starts_with("Starting conversion...\n"));
        assert!(run.state.log.contains("Skipped file operations (not universal mode)."));
        assert!(run.state.log.contains("Completed in 7ms"));
    }

    #[test]
    fn convert_persists_credentials_with_the_run() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));
        session.handle_event(AppEvent::SelectMode(OutputMode::ApkSet));
        // Credential keystrokes alone are not flushed to disk...
        session.handle_event(AppEvent::SelectKeyAlias("upload".into()));
        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(!content.contains("upload"));

        // ...but starting a conversion saves the full record.
        session.convert();
        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(content.contains("upload"));
    }

    #[test]
    fn release_mode_attaches_keystore_to_command() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));
        session.handle_event(AppEvent::SelectMode(OutputMode::ApkSet));
        session.handle_event(AppEvent::SelectSigningMode(SigningMode::Release));
        session.handle_event(AppEvent::SelectKeystorePath("/keys/release.jks".into()));
        session.handle_event(AppEvent::SelectKeyAlias("upload".into()));

        session.convert();

        let calls = session.runner_calls();
        assert!(calls[0].contains("--ks=/keys/release.jks"));
        assert!(calls[0].contains("--ks-key-alias=upload"));
    }

    #[test]
    fn debug_mode_omits_keystore_from_command() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.handle_event(AppEvent::SelectBundleToolPath("/opt/bundletool".into()));
        session.handle_event(AppEvent::SelectMode(OutputMode::ApkSet));
        session.handle_event(AppEvent::SelectKeystorePath("/keys/release.jks".into()));

        session.convert();

        assert!(!session.runner_calls()[0].contains("--ks="));
    }

    #[test]
    fn custom_command_goes_straight_through() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        let run = session.run_custom_command("adb devices");

        assert_eq!(session.runner_calls().as_slice(), &["adb devices".to_string()]);
        assert!(run.outcome.is_success());
        assert!(run.state.log.contains("> adb devices"));
        assert!(run.state.log.contains("Done in 7ms"));
    }

    #[test]
    fn clear_log_resets_the_log_only() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.handle_event(AppEvent::SelectAabFile("/tmp/app.aab".into()));
        session.run_custom_command("adb devices");

        session.clear_log();

        let state = session.state();
        assert_eq!(state.log, "");
        assert_eq!(state.aab_path, "/tmp/app.aab");
    }

    impl ConversionSession<StubExecutor> {
        /// Peek at the spy inside the runner.
        fn runner_calls(&self) -> Vec<String> {
            self.runner.executor().calls.lock().clone()
        }
    }
}
