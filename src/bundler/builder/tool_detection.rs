//! External tool detection and availability checking.
//!
//! Every step that rewrites or packages the bundle shells out to an Xcode
//! command-line tool. They are looked up once, before anything is modified,
//! so a missing tool can't leave a half-processed bundle behind.

use crate::bundler::error::{Error, Result};
use std::sync::LazyLock;

/// Check if install_name_tool is available for rewriting load commands.
///
/// Cached result to avoid repeated PATH lookups.
pub static HAS_INSTALL_NAME_TOOL: LazyLock<bool> =
    LazyLock::new(|| is_available("install_name_tool"));

/// Check if strip is available for removing debug symbols.
pub static HAS_STRIP: LazyLock<bool> = LazyLock::new(|| is_available("strip"));

/// Check if codesign is available for signing the bundle.
pub static HAS_CODESIGN: LazyLock<bool> = LazyLock::new(|| is_available("codesign"));

/// Check if hdiutil is available for DMG creation.
pub static HAS_HDIUTIL: LazyLock<bool> = LazyLock::new(|| is_available("hdiutil"));

fn is_available(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Fails with [`Error::MissingTool`] naming the first required tool that is
/// not on `PATH`. hdiutil is only required when a DMG is requested.
pub fn ensure_tools_available(needs_dmg: bool) -> Result<()> {
    let required: [(&'static str, bool); 3] = [
        ("install_name_tool", *HAS_INSTALL_NAME_TOOL),
        ("strip", *HAS_STRIP),
        ("codesign", *HAS_CODESIGN),
    ];

    for (tool, available) in required {
        if !available {
            return Err(Error::MissingTool(tool));
        }
    }

    if needs_dmg && !*HAS_HDIUTIL {
        return Err(Error::MissingTool("hdiutil"));
    }

    log::info!("✓ Xcode command-line tools available");
    Ok(())
}
