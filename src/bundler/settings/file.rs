//! Optional TOML configuration file.

use crate::bundler::error::{Context, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// On-disk configuration, every key optional.
///
/// ```toml
/// product_name = "melonDS"
/// signing_identity = "-"
/// plugins = ["styles/libqmacstyle.dylib", "platforms/libqcocoa.dylib"]
/// fallback_rpaths = ["/opt/homebrew/lib"]
/// dmg_format = "UDZO"
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixupConfig {
    /// Name of the `.app` bundle and its main executable.
    #[serde(default)]
    pub product_name: Option<String>,

    /// Code signing identity.
    #[serde(default)]
    pub signing_identity: Option<String>,

    /// Replaces the default plugin list.
    #[serde(default)]
    pub plugins: Option<Vec<String>>,

    /// Appended to the built-in fallback directories.
    #[serde(default)]
    pub fallback_rpaths: Vec<PathBuf>,

    /// hdiutil format for the disk image.
    #[serde(default)]
    pub dmg_format: Option<String>,
}

impl FixupConfig {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).fs_context("reading config file", path)?;
        Self::parse(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses config file contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
