//! Builder for constructing Settings.

use super::{DmgSettings, FixupConfig, MacOsSettings, Settings};
use std::path::{Path, PathBuf};

/// Default product name, matching the CMake target that produces the bundle.
pub const DEFAULT_PRODUCT_NAME: &str = "melonDS";

/// Builder for constructing [`Settings`].
///
/// Values set directly on the builder win over values from a
/// [`FixupConfig`], which win over built-in defaults.
///
/// # See Also
///
/// - [`Settings`] - The built settings struct
#[derive(Default)]
pub struct SettingsBuilder {
    build_dir: Option<PathBuf>,
    product_name: Option<String>,
    signing_identity: Option<String>,
    plugins: Option<Vec<String>>,
    extra_fallback_rpaths: Vec<PathBuf>,
    dmg: bool,
    config: FixupConfig,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the build directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the product name.
    ///
    /// Default: config file value, then [`DEFAULT_PRODUCT_NAME`]
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Sets the codesign identity.
    ///
    /// Default: config file value, then "-" (ad-hoc)
    pub fn signing_identity(mut self, identity: impl Into<String>) -> Self {
        self.signing_identity = Some(identity.into());
        self
    }

    /// Replaces the plugin list.
    ///
    /// An empty list is ignored so clap's "no values given" keeps the default.
    pub fn plugins(mut self, plugins: Vec<String>) -> Self {
        if !plugins.is_empty() {
            self.plugins = Some(plugins);
        }
        self
    }

    /// Appends fallback `@rpath` directories after the built-in ones.
    pub fn extra_fallback_rpaths(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_fallback_rpaths.extend(dirs);
        self
    }

    /// Enables disk image creation.
    pub fn dmg(mut self, enabled: bool) -> Self {
        self.dmg = enabled;
        self
    }

    /// Layers a config file under the explicitly set values.
    pub fn config(mut self, config: FixupConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `build_dir` is missing or the product name is empty.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let config = self.config;
        let build_dir = self.build_dir.context("build_dir is required")?;

        let product_name = self
            .product_name
            .or(config.product_name)
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
        if product_name.trim().is_empty() {
            crate::bail!("product name cannot be empty");
        }

        let mut macos = MacOsSettings::default();
        if let Some(identity) = self.signing_identity.or(config.signing_identity) {
            macos.signing_identity = identity;
        }
        if let Some(plugins) = self.plugins.or(config.plugins) {
            macos.plugins = plugins;
        }
        macos.fallback_rpaths.extend(config.fallback_rpaths);
        macos.fallback_rpaths.extend(self.extra_fallback_rpaths);

        let mut dmg = DmgSettings {
            enabled: self.dmg,
            ..Default::default()
        };
        if let Some(format) = config.dmg_format {
            dmg.format = format;
        }

        Ok(Settings::new(build_dir, product_name, macos, dmg))
    }
}
