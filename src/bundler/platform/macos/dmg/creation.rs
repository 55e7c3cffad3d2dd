//! Core DMG creation logic using hdiutil.
//!
//! Handles the fundamental DMG creation workflow including:
//! - Staging the bundle in a scratch directory inside the build directory
//! - Creating Applications symlink
//! - Running hdiutil to generate the DMG

use crate::bundler::{
    error::{Context, Error, Result},
    platform::macos::layout::BundleLayout,
    settings::DmgSettings,
    utils::{fs, process},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Default imaging tool.
pub const HDIUTIL: &str = "hdiutil";

/// Create `<build-dir>/<product>.dmg` from the finished bundle using hdiutil.
///
/// # DMG Creation Steps
/// 1. Remove an old DMG if one exists
/// 2. Create a scratch staging directory inside the build directory
/// 3. Copy the .app bundle into it, symlinks preserved
/// 4. Create Applications symlink: `staging/Applications -> /Applications`
/// 5. Run `hdiutil create` with the configured filesystem and format
/// 6. Remove the staging directory, whether hdiutil succeeded or not
///
/// # Returns
/// PathBuf to created DMG file
pub async fn create_dmg(layout: &BundleLayout, dmg: &DmgSettings) -> Result<PathBuf> {
    create_dmg_with(HDIUTIL, layout, dmg).await
}

/// [`create_dmg`] with an explicit imaging program, e.g. a full path to
/// hdiutil.
pub async fn create_dmg_with(
    hdiutil: &str,
    layout: &BundleLayout,
    dmg: &DmgSettings,
) -> Result<PathBuf> {
    let dmg_path = layout.dmg_path();

    // Remove old DMG if exists
    fs::remove_path(&dmg_path).await?;

    let temp_dir = tempfile::Builder::new()
        .prefix("dmg.")
        .tempdir_in(layout.build_dir())
        .map_err(|e| {
            Error::GenericError(format!(
                "Failed to create staging directory for DMG contents in {}: {}",
                layout.build_dir().display(),
                e
            ))
        })?;

    let result = stage_and_create(hdiutil, layout, dmg, temp_dir.path(), &dmg_path).await;

    let staging = temp_dir.path().to_path_buf();
    if let Err(e) = temp_dir.close() {
        log::warn!(
            "Failed to remove DMG staging directory {}: {}",
            staging.display(),
            e
        );
    }

    result?;
    log::info!("✓ Created {} DMG: {}", dmg.format, dmg_path.display());
    Ok(dmg_path)
}

async fn stage_and_create(
    hdiutil: &str,
    layout: &BundleLayout,
    dmg: &DmgSettings,
    staging: &Path,
    dmg_path: &Path,
) -> Result<()> {
    let app_name = layout
        .bundle()
        .file_name()
        .ok_or_else(|| Error::GenericError("Invalid app bundle path".into()))?;
    let staged_app = staging.join(app_name);

    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(layout.bundle(), &staged_app)
        .await
        .with_context(|| {
            format!(
                "copying .app bundle to staging directory: {}",
                staged_app.display()
            )
        })?;

    // Drag-to-install target
    fs::symlink(Path::new("/Applications"), &staging.join("Applications")).await?;

    log::info!("Creating DMG with format {}...", dmg.format);

    let args: [&OsStr; 11] = [
        OsStr::new("create"),
        OsStr::new("-fs"),
        OsStr::new(&dmg.filesystem),
        OsStr::new("-volname"),
        OsStr::new(layout.product_name()),
        OsStr::new("-srcfolder"),
        staging.as_os_str(),
        OsStr::new("-ov"),
        OsStr::new("-format"),
        OsStr::new(&dmg.format),
        dmg_path.as_os_str(),
    ];

    let output = process::run(hdiutil, args).await?;
    if !output.trim().is_empty() {
        log::info!("{}", output.trim());
    }
    Ok(())
}
