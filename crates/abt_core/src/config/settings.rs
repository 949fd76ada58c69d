//! Settings struct persisted between sessions.
//!
//! Mirrors what the user last entered on the conversion screen: tool and
//! bundle paths, output mode, and the signing section. Every field carries
//! a serde default so old or hand-edited files keep loading as the schema
//! grows.

use serde::{Deserialize, Serialize};

use crate::models::{OutputMode, SigningMode};

/// Root settings structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the bundletool executable.
    #[serde(default)]
    pub bundle_tool_path: String,

    /// Path to the last selected `.aab` file.
    #[serde(default)]
    pub aab_path: String,

    /// Explicit output path, empty for the default next to the bundle.
    #[serde(default)]
    pub output_dir: String,

    /// Selected output mode.
    #[serde(default)]
    pub mode: OutputMode,

    /// Signing configuration.
    #[serde(default)]
    pub signing: SigningSettings,
}

/// Signing section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SigningSettings {
    /// Debug (bundletool default) or Release (user keystore).
    #[serde(default)]
    pub signing_mode: SigningMode,

    /// Path to the release keystore.
    #[serde(default)]
    pub keystore_path: String,

    /// Keystore password.
    #[serde(default)]
    pub keystore_password: String,

    /// Key alias within the keystore.
    #[serde(default)]
    pub key_alias: String,

    /// Password for the key itself.
    #[serde(default)]
    pub key_password: String,
}
