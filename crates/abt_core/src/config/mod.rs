//! Persisted application configuration.
//!
//! Settings live in a TOML file under the platform config directory and
//! round-trip losslessly; unknown keys are ignored and every field has a
//! default, so a partial or missing file degrades to an empty
//! configuration instead of an error.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{Settings, SigningSettings};

use std::path::PathBuf;

use directories::ProjectDirs;

/// Default config file location under the platform config directory.
///
/// Falls back to a relative path when the platform provides no home
/// directory (e.g. stripped-down containers).
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("", "", "aab2apk")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("aab2apk-config.toml"))
}
