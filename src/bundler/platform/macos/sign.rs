//! Final cleanup and code signing of the bundle.

use crate::bundler::{
    error::Result,
    utils::{fs, process},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Removes every `Headers` entry under `frameworks_dir`.
///
/// Framework headers are copied along with the framework but are useless
/// at runtime. Directories are removed recursively and the top-level
/// `Headers` symlinks are unlinked. Returns the number of matches.
pub async fn remove_headers(frameworks_dir: &Path) -> Result<usize> {
    let pattern = format!(
        "{}/**/Headers",
        glob::Pattern::escape(&frameworks_dir.to_string_lossy())
    );

    let matches = glob::glob(&pattern)?.collect::<std::result::Result<Vec<PathBuf>, _>>()?;

    for path in &matches {
        log::debug!("Removing {}", path.display());
        fs::remove_path(path).await?;
    }

    Ok(matches.len())
}

/// Signs the whole bundle with `identity` (`-` for an ad-hoc signature).
///
/// A failing codesign is reported but does not fail the run.
pub async fn sign_bundle(bundle: &Path, identity: &str) -> Result<()> {
    log::info!("Signing {} with identity {}", bundle.display(), identity);

    let result = process::capture(
        "codesign",
        [
            OsStr::new("-s"),
            OsStr::new(identity),
            OsStr::new("-f"),
            OsStr::new("--deep"),
            bundle.as_os_str(),
        ],
    )
    .await?;

    let output = result.output.trim();
    if !output.is_empty() {
        log::info!("{}", output);
    }

    if !result.success() {
        log::warn!(
            "codesign exited with status {:?}, the bundle may not launch on other machines",
            result.status
        );
    }

    Ok(())
}
