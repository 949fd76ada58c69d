//! UI-facing state, modeled as an immutable struct plus a pure reducer.
//!
//! Whatever front-end sits on top (GUI or CLI) holds one [`AppState`] and
//! routes every change through [`AppState::reduce`]. The reducer never
//! performs I/O; persistence and process execution live in
//! [`crate::session`], which is also the single serialized update point.

use crate::models::{OutputMode, SigningMode};

/// Default log contents before the first conversion.
pub const IDLE_LOG: &str = "Waiting to start conversion...";

/// Everything the conversion screen displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Selected `.aab` file.
    pub aab_path: String,
    /// Selected bundletool executable.
    pub bundle_tool_path: String,
    /// Explicit output path, empty for the default.
    pub output_dir: String,
    /// Signing fields.
    pub signing: SigningState,
    /// Selected output mode.
    pub mode: OutputMode,
    /// A conversion is in flight; the trigger control is disabled.
    pub is_converting: bool,
    /// Running, user-visible conversion log.
    pub log: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            aab_path: String::new(),
            bundle_tool_path: String::new(),
            output_dir: String::new(),
            signing: SigningState::default(),
            mode: OutputMode::default(),
            is_converting: false,
            log: IDLE_LOG.to_string(),
        }
    }
}

/// Signing fields of the conversion screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SigningState {
    pub signing_mode: SigningMode,
    pub keystore_path: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

/// Events the front-end can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SelectAabFile(String),
    SelectBundleToolPath(String),
    SelectOutputDir(String),
    SelectMode(OutputMode),
    SelectSigningMode(SigningMode),
    SelectKeystorePath(String),
    SelectKeystorePassword(String),
    SelectKeyAlias(String),
    SelectKeyPassword(String),
    /// A conversion started; replaces the log with the opening line.
    ConversionStarted(String),
    ConversionFinished,
    AppendLog(String),
    ClearLog,
}

impl AppState {
    /// Apply one event, producing the next state.
    ///
    /// Pure: no I/O, no side effects, total over all events.
    pub fn reduce(self, event: AppEvent) -> AppState {
        match event {
            AppEvent::SelectAabFile(path) => AppState {
                aab_path: path,
                ..self
            },
            AppEvent::SelectBundleToolPath(path) => AppState {
                bundle_tool_path: path,
                ..self
            },
            AppEvent::SelectOutputDir(path) => AppState {
                output_dir: path,
                ..self
            },
            AppEvent::SelectMode(mode) => AppState { mode, ..self },
            AppEvent::SelectSigningMode(signing_mode) => AppState {
                signing: SigningState {
                    signing_mode,
                    ..self.signing
                },
                ..self
            },
            AppEvent::SelectKeystorePath(keystore_path) => AppState {
                signing: SigningState {
                    keystore_path,
                    ..self.signing
                },
                ..self
            },
            AppEvent::SelectKeystorePassword(keystore_password) => AppState {
                signing: SigningState {
                    keystore_password,
                    ..self.signing
                },
                ..self
            },
            AppEvent::SelectKeyAlias(key_alias) => AppState {
                signing: SigningState {
                    key_alias,
                    ..self.signing
                },
                ..self
            },
            AppEvent::SelectKeyPassword(key_password) => AppState {
                signing: SigningState {
                    key_password,
                    ..self.signing
                },
                ..self
            },
            AppEvent::ConversionStarted(opening) => AppState {
                is_converting: true,
                log: opening,
                ..self
            },
            AppEvent::ConversionFinished => AppState {
                is_converting: false,
                ..self
            },
            AppEvent::AppendLog(line) => AppState {
                log: format!("{}{}", self.log, line),
                ..self
            },
            AppEvent::ClearLog => AppState {
                log: String::new(),
                ..self
            },
        }
    }

    /// Whether a conversion can be triggered (an AAB is selected).
    pub fn is_ready(&self) -> bool {
        !self.aab_path.trim().is_empty()
    }
}
