//! abt_core - Backend logic for aab2apk
//!
//! This crate contains all business logic for driving Google's `bundletool`
//! to convert Android App Bundles (.aab) into installable APKs, with zero
//! UI dependencies. It can be used by a GUI application or a CLI tool.
//!
//! The conversion pipeline is:
//! 1. Build a `bundletool build-apks` command line from a config
//! 2. Run it as a child process and capture the outcome
//! 3. In universal mode, rename the produced `.apks` container to `.zip`,
//!    extract it next to the bundle, and remove the archive

pub mod command;
pub mod config;
pub mod convert;
pub mod logging;
pub mod models;
pub mod postprocess;
pub mod session;
pub mod state;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
