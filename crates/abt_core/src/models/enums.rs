//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Output mode for the bundletool `build-apks` invocation.
///
/// Only `Universal` triggers the rename/unzip post-processing; the other
/// modes produce a container bundletool already names correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Single device-agnostic APK packaged inside a `.apks` container.
    #[default]
    Universal,
    /// Full APK set with per-device splits.
    ApkSet,
    /// APKs matched to a connected device (`--device-id`).
    DeviceSpecific,
}

impl OutputMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Universal => "Universal",
            Self::ApkSet => "APK Set",
            Self::DeviceSpecific => "Device Specific",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [OutputMode] {
        &[Self::Universal, Self::ApkSet, Self::DeviceSpecific]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this mode (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }

    /// Whether this mode produces the universal `.apks` container.
    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Universal)
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the produced APKs are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SigningMode {
    /// Let bundletool fall back to its debug signing.
    #[default]
    Debug,
    /// Sign with a user-supplied keystore.
    Release,
}

impl SigningMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [SigningMode] {
        &[Self::Debug, Self::Release]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this mode (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }
}

impl std::fmt::Display for SigningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_round_trips() {
        let json = serde_json::to_string(&OutputMode::DeviceSpecific).unwrap();
        assert_eq!(json, "\"DeviceSpecific\"");
        let mode: OutputMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, OutputMode::DeviceSpecific);
    }

    #[test]
    fn output_mode_defaults_to_universal() {
        assert_eq!(OutputMode::default(), OutputMode::Universal);
        assert!(OutputMode::Universal.is_universal());
        assert!(!OutputMode::ApkSet.is_universal());
    }

    #[test]
    fn index_helpers_are_consistent() {
        for mode in OutputMode::all() {
            assert_eq!(OutputMode::from_index(mode.to_index()), *mode);
        }
        for mode in SigningMode::all() {
            assert_eq!(SigningMode::from_index(mode.to_index()), *mode);
        }
        // Out-of-range falls back to the default
        assert_eq!(OutputMode::from_index(99), OutputMode::Universal);
    }
}
