//! macOS application bundle fixup library
//!
//! This library makes a CMake-built `.app` bundle self-contained:
//! - third-party dylibs and frameworks copied into `Contents/Frameworks`
//! - Qt plugins deployed into `Contents/PlugIns`
//! - load commands and search paths rewritten to `@rpath`
//! - ad-hoc (or identity) signing and optional DMG packaging
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{CliError, FixupError, Result};
