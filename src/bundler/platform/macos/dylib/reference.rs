//! Classification and resolution of Mach-O library references.
//!
//! Everything here is independent of Mach-O parsing: references come in as
//! plain strings and resolve to filesystem paths using only existence checks.

use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};

/// Marker substituted by dyld with each `LC_RPATH` entry.
pub const RPATH_MARKER: &str = "@rpath";
/// Marker substituted by dyld with the directory of the loading binary.
pub const LOADER_PATH_MARKER: &str = "@loader_path";
/// Marker substituted by dyld with the directory of the main executable.
pub const EXECUTABLE_PATH_MARKER: &str = "@executable_path";

/// Directory prefixes owned by the OS. Libraries there are never bundled.
const SYSTEM_PREFIXES: &[&str] = &["/usr/lib", "/System"];

/// How a reference is anchored, decided by its textual prefix alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `@rpath/...`
    Rpath,
    /// `@loader_path/...`
    LoaderPath,
    /// `@executable_path/...`
    ExecutablePath,
    /// Anything else, taken as a filesystem path.
    Absolute,
}

impl ReferenceKind {
    /// Classifies a reference and returns the remainder after the marker.
    ///
    /// ```
    /// use kodegen_bundler_fixup::bundler::ReferenceKind;
    ///
    /// assert_eq!(
    ///     ReferenceKind::classify("@rpath/QtCore.framework/Versions/A/QtCore"),
    ///     (ReferenceKind::Rpath, "QtCore.framework/Versions/A/QtCore"),
    /// );
    /// assert_eq!(
    ///     ReferenceKind::classify("/usr/lib/libc++.1.dylib"),
    ///     (ReferenceKind::Absolute, "/usr/lib/libc++.1.dylib"),
    /// );
    /// ```
    pub fn classify(reference: &str) -> (Self, &str) {
        let markers = [
            (Self::Rpath, RPATH_MARKER),
            (Self::LoaderPath, LOADER_PATH_MARKER),
            (Self::ExecutablePath, EXECUTABLE_PATH_MARKER),
        ];

        for (kind, marker) in markers {
            if let Some(rest) = reference
                .strip_prefix(marker)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                return (kind, rest);
            }
        }

        (Self::Absolute, reference)
    }
}

/// A reference that was matched to a concrete path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// How the match was found. Decides whether the reference gets rewritten.
    pub kind: ReferenceKind,
    /// Filesystem path of the dependency.
    pub path: PathBuf,
}

/// Outcome of resolving one reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The reference points at `path`.
    Resolved(ResolvedDependency),
    /// No candidate location exists.
    Unresolved,
}

impl Resolution {
    fn found(kind: ReferenceKind, path: PathBuf) -> Self {
        Self::Resolved(ResolvedDependency { kind, path })
    }

    fn if_exists(kind: ReferenceKind, path: PathBuf) -> Self {
        if path.exists() {
            Self::found(kind, path)
        } else {
            Self::Unresolved
        }
    }
}

/// Everything a reference is resolved against.
///
/// `context_binary` is the binary as it was before copying: a copied
/// library keeps resolving relative to where it came from.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    /// Original location of the binary carrying the reference.
    pub context_binary: &'a Path,
    /// `LC_RPATH` entries of `context_binary`, in load-command order.
    pub search_paths: &'a [String],
    /// `Contents/MacOS` of the bundle, i.e. the main executable's directory.
    pub macos_dir: &'a Path,
    /// Fallback directories tried after the search paths.
    pub fallback_dirs: &'a [PathBuf],
}

impl ResolveContext<'_> {
    /// Resolves a reference to a dependency path.
    ///
    /// `@rpath` precedence: each search path entry in order (an entry starting
    /// with `@executable_path` is mapped into the bundle and trusted without an
    /// existence check), then each fallback directory, then the directory of
    /// the context binary.
    pub fn resolve(&self, reference: &str) -> Resolution {
        let (kind, name) = ReferenceKind::classify(reference);

        match kind {
            ReferenceKind::Rpath => self.resolve_rpath(name),
            ReferenceKind::ExecutablePath => {
                Resolution::if_exists(kind, normalize(&self.macos_dir.join(name)))
            }
            ReferenceKind::LoaderPath => {
                Resolution::if_exists(kind, normalize(&self.context_dir().join(name)))
            }
            ReferenceKind::Absolute => Resolution::found(kind, normalize(Path::new(name))),
        }
    }

    fn resolve_rpath(&self, name: &str) -> Resolution {
        for entry in self.search_paths {
            let candidate = Path::new(entry).join(name);
            if candidate.exists() {
                return Resolution::found(ReferenceKind::Rpath, candidate);
            }
            if let Some(relative) = entry.strip_prefix(EXECUTABLE_PATH_MARKER) {
                let chained = PathBuf::from(format!(
                    "{}{}/{}",
                    self.macos_dir.display(),
                    relative,
                    name
                ));
                return Resolution::found(ReferenceKind::ExecutablePath, normalize(&chained));
            }
        }

        if let Some(found) = self
            .fallback_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.exists())
        {
            return Resolution::found(ReferenceKind::Rpath, found);
        }

        Resolution::if_exists(ReferenceKind::Rpath, self.context_dir().join(name))
    }

    fn context_dir(&self) -> &Path {
        self.context_binary.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Whether a dependency lives under an OS-owned directory.
///
/// Matches on the textual prefix of the containing directory, so
/// `/usr/lib/swift/libswiftCore.dylib` and `/System/Library/Frameworks/...`
/// are system libraries while `/usr/local/lib/...` is not.
pub fn is_system_library(path: &Path) -> bool {
    let Some(dir) = path.parent() else {
        return false;
    };
    let dir = dir.to_string_lossy();
    SYSTEM_PREFIXES.iter().any(|prefix| dir.starts_with(prefix))
}

/// Location of a library inside a `.framework` directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameworkPath {
    /// The `Foo.framework` directory itself.
    pub root: PathBuf,
    /// Directory name, e.g. `QtCore.framework`.
    pub name: String,
    /// Library path relative to `root`, e.g. `Versions/A/QtCore`.
    pub inner: PathBuf,
}

impl FrameworkPath {
    /// Splits a library path at its last `*.framework` component.
    ///
    /// Returns `None` for plain libraries and for a bare framework directory.
    pub fn from_path(path: &Path) -> Option<Self> {
        let components: Vec<Component<'_>> = path.components().collect();
        let index = components.iter().rposition(|component| match component {
            Component::Normal(name) => name.to_string_lossy().ends_with(".framework"),
            _ => false,
        })?;

        let inner: PathBuf = components[index + 1..].iter().collect();
        if inner.as_os_str().is_empty() {
            return None;
        }

        let root: PathBuf = components[..=index].iter().collect();
        let name = components[index].as_os_str().to_string_lossy().into_owned();

        Some(Self { root, name, inner })
    }

    /// The bundle-relative reference for this library:
    /// `@rpath/<Name.framework>/<inner>`.
    pub fn rpath_reference(&self) -> String {
        format!("{}/{}/{}", RPATH_MARKER, self.name, self.inner.display())
    }
}

/// The bundle-relative reference for a plain library file name.
pub fn rpath_reference(file_name: &str) -> String {
    format!("{}/{}", RPATH_MARKER, file_name)
}

/// Lexically normalizes a path: `..` and `.` are folded, relative paths are
/// anchored at the working directory. Falls back to the input if the working
/// directory is unknown.
fn normalize(path: &Path) -> PathBuf {
    path.absolutize()
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_path_buf())
}
