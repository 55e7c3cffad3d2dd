//! macOS DMG disk image creator.
//!
//! Creates drag-to-install DMG files using the native hdiutil tool.
//! The DMG includes the .app bundle and an Applications symlink for easy installation.

mod creation;

pub use creation::{HDIUTIL, create_dmg, create_dmg_with};
