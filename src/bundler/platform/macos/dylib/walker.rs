//! The recursive dependency-closure walk.

use super::{
    reference::{
        FrameworkPath, ReferenceKind, Resolution, ResolveContext, ResolvedDependency,
        is_system_library, rpath_reference,
    },
    tools::BinaryTools,
};
use crate::bundler::{
    error::{Error, Result},
    platform::macos::layout::BundleLayout,
    utils::fs,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Copies every non-system dependency of a binary into the bundle and
/// rewrites its references to be `@rpath` relative.
///
/// One walker is used for the whole run so that each destination under
/// `Contents/Frameworks` is copied and recursed into at most once, no matter
/// how many binaries reference it.
pub struct DylibWalker<'a, T: BinaryTools> {
    tools: &'a T,
    layout: &'a BundleLayout,
    fallback_dirs: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
    copied: Vec<PathBuf>,
}

/// A dependency that survived resolution and the system filter.
struct Dependency {
    reference: String,
    kind: ReferenceKind,
    path: PathBuf,
}

impl<'a, T: BinaryTools> DylibWalker<'a, T> {
    /// Creates a walker. `fallback_dirs` are tried, in order, for `@rpath`
    /// references the context binary's own search paths can't satisfy.
    pub fn new(tools: &'a T, layout: &'a BundleLayout, fallback_dirs: Vec<PathBuf>) -> Self {
        Self {
            tools,
            layout,
            fallback_dirs,
            visited: HashSet::new(),
            copied: Vec::new(),
        }
    }

    /// The tools used to read and rewrite binaries.
    pub fn tools(&self) -> &'a T {
        self.tools
    }

    /// The bundle being filled.
    pub fn layout(&self) -> &'a BundleLayout {
        self.layout
    }

    /// Destinations referenced so far, including ones that were already in
    /// the bundle.
    pub fn visited(&self) -> &HashSet<PathBuf> {
        &self.visited
    }

    /// Destinations this walker copied into the bundle, in copy order.
    pub fn copied(&self) -> &[PathBuf] {
        &self.copied
    }

    /// Marks `dest` as handled. Returns `true` only the first time and only
    /// if nothing is on disk there yet; the caller then copies it.
    fn claim(&mut self, dest: &Path) -> bool {
        let first_visit = self.visited.insert(dest.to_path_buf());
        if first_visit && !dest.exists() {
            self.copied.push(dest.to_path_buf());
            return true;
        }
        false
    }

    /// Fixes up `binary` in place.
    ///
    /// `context` is where the binary originally came from. Relative
    /// references (`@rpath`, `@loader_path`) and the search paths used for
    /// them are taken from it, so a freshly copied library still resolves
    /// against its source tree. For a binary that is fixed where it lies,
    /// pass the same path twice.
    pub async fn fixup(&mut self, binary: &Path, context: &Path) -> Result<()> {
        if !binary.exists() {
            return Err(Error::MissingBinary(binary.to_path_buf()));
        }

        log::info!("Fixing up {}", binary.display());

        let file_name = file_name_of(binary);
        let libraries = self.tools.linked_libraries(binary).await?;
        let dependencies = self
            .resolve_dependencies(&libraries.dependencies, context, &file_name)
            .await?;

        fs::make_writable(binary).await?;
        self.tools.strip_symbols(binary).await?;

        if let Some(install_name) = &libraries.install_name {
            self.fix_install_name(binary, install_name, &file_name)
                .await?;
        }

        for dependency in dependencies {
            let dep_name = file_name_of(&dependency.path);

            if dep_name == file_name {
                self.fix_self_reference(binary, &dependency, &dep_name)
                    .await?;
            } else if let Some(framework) = FrameworkPath::from_path(&dependency.path) {
                self.bundle_framework(binary, &dependency, &framework)
                    .await?;
            } else {
                self.bundle_library(binary, &dependency, &dep_name).await?;
            }
        }

        Ok(())
    }

    /// Resolves the linked libraries of a binary against `context` and drops
    /// system libraries. Nothing is mutated, so an unresolved reference
    /// aborts before the binary is touched.
    ///
    /// A reference carrying the binary's own file name only gets rewritten,
    /// so it does not have to exist.
    async fn resolve_dependencies(
        &self,
        references: &[String],
        context: &Path,
        file_name: &str,
    ) -> Result<Vec<Dependency>> {
        let search_paths = if context.exists() {
            self.tools.search_paths(context).await?
        } else {
            Vec::new()
        };

        let macos_dir = self.layout.macos_dir();
        let resolver = ResolveContext {
            context_binary: context,
            search_paths: &search_paths,
            macos_dir: &macos_dir,
            fallback_dirs: &self.fallback_dirs,
        };

        let mut dependencies = Vec::new();
        for reference in references {
            let unresolved = || Error::UnresolvedReference {
                reference: reference.clone(),
                binary: context.to_path_buf(),
            };

            let ResolvedDependency { kind, path } = match resolver.resolve(reference) {
                Resolution::Resolved(resolved) => resolved,
                Resolution::Unresolved => return Err(unresolved()),
            };

            if is_system_library(&path) {
                log::debug!("  {} (system, skipped)", reference);
                continue;
            }

            // Absolute and @executable_path chained paths are not checked
            // while resolving.
            if !path.exists() && file_name_of(&path) != file_name {
                return Err(unresolved());
            }

            log::debug!("  {} -> {} ({:?})", reference, path.display(), kind);
            dependencies.push(Dependency {
                reference: reference.clone(),
                kind,
                path,
            });
        }

        Ok(dependencies)
    }

    /// Makes an absolute install name bundle relative. Relative install
    /// names are left alone.
    async fn fix_install_name(
        &self,
        binary: &Path,
        install_name: &str,
        file_name: &str,
    ) -> Result<()> {
        let (kind, _) = ReferenceKind::classify(install_name);
        if kind != ReferenceKind::Absolute {
            return Ok(());
        }

        let new_name = match FrameworkPath::from_path(binary) {
            Some(framework) => framework.rpath_reference(),
            None => rpath_reference(file_name),
        };
        self.tools.set_install_name(binary, &new_name).await
    }

    /// A linked library with the binary's own file name, e.g. a stale copy of
    /// itself from the build tree. Rewritten, never recursed into.
    async fn fix_self_reference(
        &self,
        binary: &Path,
        dependency: &Dependency,
        file_name: &str,
    ) -> Result<()> {
        if dependency.kind != ReferenceKind::Absolute {
            return Ok(());
        }

        self.rewrite(binary, &dependency.reference, &rpath_reference(file_name))
            .await
    }

    /// Changes a reference unless it already reads `new`.
    async fn rewrite(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        self.tools.change_reference(binary, old, new).await
    }

    async fn bundle_framework(
        &mut self,
        binary: &Path,
        dependency: &Dependency,
        framework: &FrameworkPath,
    ) -> Result<()> {
        if dependency.kind != ReferenceKind::Rpath {
            self.rewrite(binary, &dependency.reference, &framework.rpath_reference())
                .await?;
        }

        let dest = self.layout.frameworks_dir().join(&framework.name);
        if !self.claim(&dest) {
            return Ok(());
        }

        log::info!("Bundling framework {}", framework.name);
        fs::copy_dir(&framework.root, &dest).await?;
        fs::make_writable_recursive(&dest).await?;

        Box::pin(self.fixup(&dest.join(&framework.inner), &dependency.path)).await
    }

    async fn bundle_library(
        &mut self,
        binary: &Path,
        dependency: &Dependency,
        file_name: &str,
    ) -> Result<()> {
        if dependency.kind == ReferenceKind::Absolute {
            self.rewrite(binary, &dependency.reference, &rpath_reference(file_name))
                .await?;
        }

        let dest = self.layout.frameworks_dir().join(file_name);
        if !self.claim(&dest) {
            return Ok(());
        }

        log::info!("Bundling {}", file_name);
        fs::copy_file(&dependency.path, &dest).await?;
        fs::make_writable(&dest).await?;

        Box::pin(self.fixup(&dest, &dependency.path)).await
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
