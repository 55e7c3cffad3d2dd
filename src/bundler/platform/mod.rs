//! Platform-specific bundle processing.

pub mod macos;
