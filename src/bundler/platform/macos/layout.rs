//! Locating the `.app` bundle inside a CMake build directory.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File whose presence marks a configured, built CMake tree.
pub const BUILD_CACHE_FILE: &str = "CMakeCache.txt";

/// Every path of the bundle the pipeline touches.
///
/// ```text
/// <build>/<product>.app/Contents/MacOS/<product>
/// <build>/<product>.app/Contents/Frameworks/
/// <build>/<product>.app/Contents/PlugIns/<category>/<plugin>
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleLayout {
    build_dir: PathBuf,
    product_name: String,
    bundle: PathBuf,
}

impl BundleLayout {
    /// Derives the layout without touching the filesystem.
    pub fn new(build_dir: impl Into<PathBuf>, product_name: &str) -> Self {
        let build_dir = build_dir.into();
        let bundle = build_dir.join(format!("{}.app", product_name));
        Self {
            build_dir,
            product_name: product_name.to_string(),
            bundle,
        }
    }

    /// Derives the layout and checks that `build_dir` holds a finished build:
    /// the directory, the `.app` bundle and the CMake cache must all exist.
    pub fn locate(build_dir: impl Into<PathBuf>, product_name: &str) -> Result<Self> {
        let layout = Self::new(build_dir, product_name);

        if !layout.build_dir.exists() {
            return Err(Error::InvalidBuildDirectory {
                path: layout.build_dir.clone(),
                reason: format!("{} doesn't exist", layout.build_dir.display()),
            });
        }

        if !layout.bundle.exists() || !layout.build_cache().exists() {
            return Err(Error::InvalidBuildDirectory {
                path: layout.build_dir.clone(),
                reason: format!(
                    "{} doesn't look like a valid build directory",
                    layout.build_dir.display()
                ),
            });
        }

        log::debug!("Found bundle at {}", layout.bundle.display());
        Ok(layout)
    }

    /// The CMake build directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Name of the bundle and its executable.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// `<build>/<product>.app`
    pub fn bundle(&self) -> &Path {
        &self.bundle
    }

    /// `<bundle>/Contents`
    pub fn contents_dir(&self) -> PathBuf {
        self.bundle.join("Contents")
    }

    /// `<bundle>/Contents/MacOS`
    pub fn macos_dir(&self) -> PathBuf {
        self.contents_dir().join("MacOS")
    }

    /// `<bundle>/Contents/Frameworks`
    pub fn frameworks_dir(&self) -> PathBuf {
        self.contents_dir().join("Frameworks")
    }

    /// `<bundle>/Contents/PlugIns`
    pub fn plugins_dir(&self) -> PathBuf {
        self.contents_dir().join("PlugIns")
    }

    /// `<bundle>/Contents/MacOS/<product>`
    pub fn executable(&self) -> PathBuf {
        self.macos_dir().join(&self.product_name)
    }

    /// `<build>/CMakeCache.txt`
    pub fn build_cache(&self) -> PathBuf {
        self.build_dir.join(BUILD_CACHE_FILE)
    }

    /// `<build>/<product>.dmg`
    pub fn dmg_path(&self) -> PathBuf {
        self.build_dir.join(format!("{}.dmg", self.product_name))
    }
}
