//! Data model types shared across the application.

mod enums;

pub use enums::{OutputMode, SigningMode};
