//! Qt installation discovery from the CMake build cache.

use crate::bundler::{Error, ErrorExt, Result};
use path_absolutize::Absolutize;
use regex::Regex;
use std::path::{Path, PathBuf};

/// `Qt<major>_DIR:PATH=<qt>/lib/cmake/Qt<major>`
const QT_DIR_ENTRY: &str = r"^Qt(\d)_DIR:PATH=(.+)$";

/// A Qt installation as configured for the build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolkitInstall {
    /// Qt major version, e.g. 6
    pub major: u32,

    /// Installation prefix, the directory containing `lib/` and `plugins/`
    pub root: PathBuf,
}

impl ToolkitInstall {
    /// Reads the Qt installation from a `CMakeCache.txt`.
    pub fn from_cmake_cache(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).fs_context("reading build cache", path)?;
        Self::parse(&contents, path)
    }

    /// Finds the first `Qt<N>_DIR:PATH=` entry in cache `contents`.
    ///
    /// The entry names Qt's CMake package directory
    /// (`<prefix>/lib/cmake/Qt<N>`), so the prefix is three levels up.
    /// `path` is only used for the error.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let entry = Regex::new(QT_DIR_ENTRY)?;

        let (major, cmake_dir) = contents
            .lines()
            .find_map(|line| {
                let captures = entry.captures(line.trim_end())?;
                let major = captures[1].parse::<u32>().ok()?;
                Some((major, captures[2].to_string()))
            })
            .ok_or_else(|| Error::ToolkitNotFound(path.to_path_buf()))?;

        let prefix = Path::new(&cmake_dir).join("../../..");
        let root = prefix
            .absolutize()
            .map(|p| p.into_owned())
            .fs_context("resolving Qt prefix", &prefix)?;

        log::info!("Found Qt {} at {}", major, root.display());
        Ok(Self { major, root })
    }

    /// `<root>/lib`, searched for `@rpath` references.
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Plugin directories in the layouts Homebrew, the Qt installer and
    /// distribution packages use, in the order they are tried.
    pub fn plugin_candidates(&self) -> Vec<PathBuf> {
        vec![
            self.root
                .join("libexec")
                .join(format!("qt{}", self.major))
                .join("plugins"),
            self.root.join("plugins"),
            self.root.join("share").join("qt").join("plugins"),
        ]
    }
}
