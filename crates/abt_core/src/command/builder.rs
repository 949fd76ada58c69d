//! Builds the `bundletool build-apks` command line.
//!
//! Pure string construction: nothing here touches the filesystem or spawns
//! a process, so it can be exercised exhaustively in unit tests.

use std::path::Path;

use crate::models::OutputMode;

use super::types::CommandConfigError;

/// Configuration for one bundletool invocation.
///
/// Immutable value object; required fields are validated by
/// [`build_command`], not on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BundleToolConfig {
    /// Path to the bundletool executable (or wrapper script).
    pub bundle_tool_path: String,
    /// Path to the input `.aab` file.
    pub aab_path: String,
    /// Explicit `--output` path. Defaults to the AAB path with its
    /// extension replaced by `.apks` when empty.
    pub output_path: Option<String>,
    /// Output mode; only `Universal` adds `--mode=universal`.
    pub mode: OutputMode,
    /// Release signing credentials, if any.
    pub keystore: Option<KeystoreConfig>,
    /// Target device serial for device-specific builds.
    pub device_id: Option<String>,
    /// Ask bundletool to overwrite an existing output.
    pub overwrite: bool,
}

/// Keystore credentials passed through to bundletool's `--ks*` flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeystoreConfig {
    pub path: String,
    pub password: String,
    pub key_alias: String,
    pub key_password: String,
}

/// Build the command line for `config`.
///
/// Fails when the tool path or the AAB path is blank; everything else has
/// a usable default. The caller decides what to do with the string - this
/// function only logs it at debug level.
pub fn build_command(config: &BundleToolConfig) -> Result<String, CommandConfigError> {
    if config.bundle_tool_path.trim().is_empty() {
        return Err(CommandConfigError::MissingToolPath);
    }
    if config.aab_path.trim().is_empty() {
        return Err(CommandConfigError::MissingAabPath);
    }

    let output = match &config.output_path {
        Some(path) if !path.is_empty() => path.clone(),
        _ => default_output_path(&config.aab_path),
    };

    let mut cmd = format!(
        "{} build-apks --bundle={} --output={} ",
        config.bundle_tool_path, config.aab_path, output
    );

    if config.mode.is_universal() {
        cmd.push_str("--mode=universal ");
    }
    if config.overwrite {
        cmd.push_str("--overwrite ");
    }
    if let Some(ks) = &config.keystore {
        cmd.push_str(&format!("--ks={} ", ks.path));
        cmd.push_str(&format!("--ks-pass=pass:{} ", ks.password));
        cmd.push_str(&format!("--ks-key-alias={} ", ks.key_alias));
        cmd.push_str(&format!("--key-pass=pass:{} ", ks.key_password));
    }
    if let Some(device_id) = &config.device_id {
        cmd.push_str(&format!("--device-id={} ", device_id));
    }
    // The trailing --overwrite is always appended, so the flag can appear
    // twice; bundletool tolerates the repeat.
    cmd.push_str("--overwrite");

    tracing::debug!("Built bundletool command: {}", cmd);
    Ok(cmd)
}

/// Default `--output`: the AAB path with its extension swapped for `.apks`.
fn default_output_path(aab_path: &str) -> String {
    Path::new(aab_path)
        .with_extension("apks")
        .to_string_lossy()
        .into_owned()
}
