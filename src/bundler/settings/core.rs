//! Core Settings struct and implementations.

use super::{DmgSettings, MacOsSettings};
use std::path::{Path, PathBuf};

/// Main settings for a fixup run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and only
/// read afterwards; every pipeline step receives it by reference.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_fixup::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_fixup::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .build_dir("build")
///     .product_name("melonDS")
///     .dmg(true)
///     .build()?;
/// assert_eq!(settings.product_name(), "melonDS");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// CMake build directory containing `<product>.app` and `CMakeCache.txt`.
    build_dir: PathBuf,

    /// Bundle, executable and DMG volume name.
    product_name: String,

    /// Bundle fixup configuration.
    macos: MacOsSettings,

    /// Disk image configuration.
    dmg: DmgSettings,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the build directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Returns the macOS fixup settings.
    pub fn macos(&self) -> &MacOsSettings {
        &self.macos
    }

    /// Returns the DMG settings.
    pub fn dmg(&self) -> &DmgSettings {
        &self.dmg
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        build_dir: PathBuf,
        product_name: String,
        macos: MacOsSettings,
        dmg: DmgSettings,
    ) -> Self {
        Self {
            build_dir,
            product_name,
            macos,
            dmg,
        }
    }
}
