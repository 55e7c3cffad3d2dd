//! macOS platform-specific settings.

use std::path::PathBuf;

/// Directories searched for `@rpath` references after a binary's own
/// search paths are exhausted.
pub const DEFAULT_FALLBACK_RPATHS: &[&str] = &["/usr/local/lib", "/opt/local/lib"];

/// Qt plugins every build needs at runtime, relative to the plugin root.
pub const DEFAULT_PLUGINS: &[&str] = &[
    "styles/libqmacstyle.dylib",
    "platforms/libqcocoa.dylib",
    "imageformats/libqsvg.dylib",
];

/// Ad-hoc signature marker understood by `codesign`.
pub const AD_HOC_IDENTITY: &str = "-";

/// macOS application bundle (.app) fixup configuration.
///
/// # Configuration
///
/// ```toml
/// signing_identity = "-"
/// plugins = ["platforms/libqcocoa.dylib"]
/// fallback_rpaths = ["/opt/homebrew/lib"]
/// ```
#[derive(Clone, Debug)]
pub struct MacOsSettings {
    /// Code signing identity name.
    ///
    /// Use "-" for ad-hoc signing.
    ///
    /// Default: "-"
    pub signing_identity: String,

    /// Plugin modules to deploy, relative to the Qt plugin root
    /// (`<category>/<file>`).
    ///
    /// Default: [`DEFAULT_PLUGINS`]
    pub plugins: Vec<String>,

    /// Fallback directories for `@rpath` resolution, in search order.
    ///
    /// The built-in directories come first, then user supplied ones. The Qt
    /// library directory discovered from the build cache is appended at run
    /// time.
    pub fallback_rpaths: Vec<PathBuf>,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            signing_identity: AD_HOC_IDENTITY.to_string(),
            plugins: DEFAULT_PLUGINS.iter().map(|p| p.to_string()).collect(),
            fallback_rpaths: DEFAULT_FALLBACK_RPATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl MacOsSettings {
    /// Whether the identity is the ad-hoc marker.
    pub fn is_ad_hoc(&self) -> bool {
        self.signing_identity == AD_HOC_IDENTITY
    }
}

/// macOS DMG disk image configuration.
#[derive(Clone, Debug)]
pub struct DmgSettings {
    /// Whether to produce `<build-dir>/<product>.dmg` at all.
    pub enabled: bool,

    /// hdiutil image format.
    ///
    /// Default: "UDBZ" (bzip2 compressed, read-only)
    pub format: String,

    /// Filesystem of the image.
    ///
    /// Default: "HFS+"
    pub filesystem: String,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            format: "UDBZ".to_string(),
            filesystem: "HFS+".to_string(),
        }
    }
}
