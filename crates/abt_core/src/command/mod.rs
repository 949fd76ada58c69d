//! Command construction and execution.
//!
//! This module is the lowest layer of the conversion pipeline:
//! - `builder` turns a [`BundleToolConfig`] into a `bundletool build-apks`
//!   command line
//! - `executor` runs an arbitrary command string as a child process and
//!   reports a [`CommandOutcome`]
//!
//! Neither half knows about the other; the orchestrator in
//! [`crate::convert`] composes them.

mod builder;
mod executor;
mod types;

pub use builder::{build_command, BundleToolConfig, KeystoreConfig};
pub use executor::{CommandExecutor, OsExecutor};
pub use types::{CommandConfigError, CommandOutcome, ConversionResult};
