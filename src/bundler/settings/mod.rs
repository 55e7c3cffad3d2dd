//! Configuration structures for fixup runs.
//!
//! This module provides the immutable [`Settings`] value, the builder that
//! assembles it from CLI arguments and an optional config file, and the
//! macOS-specific sub-settings.

mod builder;
mod core;
mod file;
mod macos;

// Re-export all public types
pub use builder::{DEFAULT_PRODUCT_NAME, SettingsBuilder};
pub use core::Settings;
pub use file::FixupConfig;
pub use macos::{
    AD_HOC_IDENTITY, DEFAULT_FALLBACK_RPATHS, DEFAULT_PLUGINS, DmgSettings, MacOsSettings,
};
