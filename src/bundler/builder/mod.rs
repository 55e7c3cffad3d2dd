//! Fixup orchestration and coordination.
//!
//! This module provides the main [`Fixup`] orchestrator that runs the
//! pipeline steps in order against one build directory.
//!
//! # Overview
//!
//! The orchestrator:
//! 1. Locates the bundle and reads the Qt installation from the build cache
//! 2. Checks the required command-line tools
//! 3. Bundles the executable's library closure and the Qt plugins
//! 4. Normalizes search paths, removes headers and signs
//! 5. Optionally creates a DMG, returning a [`FixupReport`]
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_fixup::bundler::{Fixup, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_fixup::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .build_dir("build")
//!     .dmg(true)
//!     .build()?;
//!
//! let report = Fixup::new(settings).run().await?;
//! println!("Bundled {} libraries", report.bundled.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`orchestrator`] - Main [`Fixup`] struct and pipeline
//! - [`tool_detection`] - External tool availability checking

mod orchestrator;
mod tool_detection;

pub use orchestrator::{Fixup, FixupReport};
pub use tool_detection::ensure_tools_available;
