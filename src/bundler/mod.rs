//! macOS application bundle fixup.
//!
//! This module turns the `.app` a CMake build leaves behind into a bundle
//! that runs on machines without the build's libraries installed: every
//! non-system dylib and framework is copied into `Contents/Frameworks`, the
//! Qt plugins are deployed into `Contents/PlugIns`, load commands are
//! rewritten to `@rpath`, and the result is signed and optionally packed
//! into a DMG.
//!
//! # Configuration
//!
//! Everything has a default; a TOML file can override the defaults and CLI
//! flags override the file:
//!
//! ```toml
//! product_name = "melonDS"
//! signing_identity = "-"
//! plugins = ["styles/libqmacstyle.dylib", "platforms/libqcocoa.dylib"]
//! fallback_rpaths = ["/opt/homebrew/lib"]
//! dmg_format = "UDBZ"
//! ```
//!
//! # Integration
//!
//! ```no_run
//! use kodegen_bundler_fixup::bundler::{Fixup, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_fixup::bundler::Result<()> {
//! let settings = SettingsBuilder::new().build_dir("build").build()?;
//! let report = Fixup::new(settings).run().await?;
//! println!("{} plugins deployed", report.plugins.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The pipeline mutates binaries only through [`BinaryTools`], so it can be
//! driven against an in-memory implementation.

#![warn(missing_docs)]

mod builder;
mod error;
pub mod platform;
mod settings;
pub mod utils;

// Public re-exports
pub use builder::{Fixup, FixupReport, ensure_tools_available};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::macos::{
    dylib::{
        BinaryTools, DylibWalker, FrameworkPath, LinkedLibraries, ReferenceKind, Resolution,
        ResolveContext, ResolvedDependency, XcodeTools, is_system_library,
    },
    layout::{BUILD_CACHE_FILE, BundleLayout},
    rpath::CANONICAL_RPATH,
};
pub use settings::{
    AD_HOC_IDENTITY,
    DEFAULT_FALLBACK_RPATHS,
    DEFAULT_PLUGINS,
    DEFAULT_PRODUCT_NAME,
    DmgSettings,
    // Configuration file
    FixupConfig,
    MacOsSettings,
    // Main configuration types
    Settings,
    SettingsBuilder,
};
