//! Reading and rewriting Mach-O load commands.
//!
//! [`BinaryTools`] is the seam between the closure walker and the binaries it
//! mutates. [`XcodeTools`] reads load commands in-process with goblin and
//! mutates through the Xcode command-line tools.

use crate::bundler::{
    error::{Context, Error, ErrorExt, Result},
    platform::macos::sign,
    utils::process,
};
use goblin::mach::{Mach, MachO};
use std::ffi::OsStr;
use std::path::Path;

/// Libraries a binary links against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkedLibraries {
    /// `LC_ID_DYLIB` of a dylib, `None` for executables and bundles.
    pub install_name: Option<String>,
    /// `LC_LOAD_DYLIB` and friends, in load-command order.
    pub dependencies: Vec<String>,
}

/// Inspection and in-place rewriting of Mach-O binaries.
///
/// Every mutating call is fatal on failure, except [`strip_symbols`]
/// which implementations may treat as best effort.
///
/// [`strip_symbols`]: BinaryTools::strip_symbols
#[allow(async_fn_in_trait)]
pub trait BinaryTools {
    /// Install name and linked libraries. The install name is never repeated
    /// in `dependencies`.
    async fn linked_libraries(&self, binary: &Path) -> Result<LinkedLibraries>;

    /// `LC_RPATH` entries, in load-command order.
    async fn search_paths(&self, binary: &Path) -> Result<Vec<String>>;

    /// Rewrites the dependency `old` to `new`.
    async fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()>;

    /// Rewrites the binary's own install name.
    async fn set_install_name(&self, binary: &Path, name: &str) -> Result<()>;

    /// Appends an `LC_RPATH` entry.
    async fn add_search_path(&self, binary: &Path, entry: &str) -> Result<()>;

    /// Removes the first `LC_RPATH` entry equal to `entry`.
    async fn delete_search_path(&self, binary: &Path, entry: &str) -> Result<()>;

    /// Removes debug and local symbols.
    async fn strip_symbols(&self, binary: &Path) -> Result<()>;

    /// Signs a whole bundle, nested code included.
    async fn sign_bundle(&self, bundle: &Path, identity: &str) -> Result<()>;

    /// Checks that everything the implementation shells out to is present.
    fn preflight(&self, _needs_dmg: bool) -> Result<()> {
        Ok(())
    }
}

/// [`BinaryTools`] backed by goblin, `install_name_tool`, `strip` and
/// `codesign`.
#[derive(Clone, Copy, Debug, Default)]
pub struct XcodeTools;

impl XcodeTools {
    async fn install_name_tool(&self, binary: &Path, args: &[&str]) -> Result<()> {
        let mut argv: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
        argv.push(binary.as_os_str());
        process::run("install_name_tool", argv).await?;
        Ok(())
    }
}

impl BinaryTools for XcodeTools {
    async fn linked_libraries(&self, binary: &Path) -> Result<LinkedLibraries> {
        let buffer = tokio::fs::read(binary)
            .await
            .fs_context("reading binary", binary)?;
        with_macho(&buffer, binary, |macho| LinkedLibraries {
            install_name: macho.name.map(str::to_string),
            // libs[0] is goblin's slot for the image itself: "self", or the
            // LC_ID_DYLIB name when there is one.
            dependencies: macho.libs.iter().skip(1).map(|lib| lib.to_string()).collect(),
        })
    }

    async fn search_paths(&self, binary: &Path) -> Result<Vec<String>> {
        let buffer = tokio::fs::read(binary)
            .await
            .fs_context("reading binary", binary)?;
        with_macho(&buffer, binary, |macho| {
            macho.rpaths.iter().map(|rpath| rpath.to_string()).collect()
        })
    }

    async fn change_reference(&self, binary: &Path, old: &str, new: &str) -> Result<()> {
        log::debug!("  Rewriting: {} -> {}", old, new);
        self.install_name_tool(binary, &["-change", old, new]).await
    }

    async fn set_install_name(&self, binary: &Path, name: &str) -> Result<()> {
        log::debug!("  Setting install name: {}", name);
        self.install_name_tool(binary, &["-id", name]).await
    }

    async fn add_search_path(&self, binary: &Path, entry: &str) -> Result<()> {
        log::debug!("  Adding rpath: {}", entry);
        self.install_name_tool(binary, &["-add_rpath", entry]).await
    }

    async fn delete_search_path(&self, binary: &Path, entry: &str) -> Result<()> {
        log::debug!("  Deleting rpath: {}", entry);
        self.install_name_tool(binary, &["-delete_rpath", entry]).await
    }

    async fn strip_symbols(&self, binary: &Path) -> Result<()> {
        let result = process::capture("strip", [OsStr::new("-Sx"), binary.as_os_str()]).await?;
        if !result.success() {
            log::warn!(
                "strip failed for {} (status {:?}): {}",
                binary.display(),
                result.status,
                result.output.trim()
            );
        } else if !result.output.trim().is_empty() {
            log::info!("{}", result.output.trim());
        }
        Ok(())
    }

    async fn sign_bundle(&self, bundle: &Path, identity: &str) -> Result<()> {
        sign::sign_bundle(bundle, identity).await
    }

    fn preflight(&self, needs_dmg: bool) -> Result<()> {
        crate::bundler::builder::ensure_tools_available(needs_dmg)
    }
}

/// Parses a thin or fat Mach-O and applies `f` to it. Fat binaries use their
/// first architecture; every slice of a universal build links the same
/// libraries.
fn with_macho<T>(buffer: &[u8], binary: &Path, f: impl FnOnce(&MachO<'_>) -> T) -> Result<T> {
    let mach = Mach::parse(buffer)
        .map_err(Error::from)
        .with_context(|| format!("parsing {}", binary.display()))?;
    match mach {
        Mach::Binary(macho) => Ok(f(&macho)),
        Mach::Fat(fat) => {
            let arch = fat
                .iter_arches()
                .next()
                .transpose()
                .map_err(Error::from)?
                .with_context(|| format!("{} is a fat binary without slices", binary.display()))?;
            let macho = MachO::parse(buffer, arch.offset as usize)
                .map_err(Error::from)
                .with_context(|| format!("parsing {}", binary.display()))?;
            Ok(f(&macho))
        }
    }
}
