//! Qt plugin deployment.
//!
//! Plugins are loaded by Qt at runtime rather than linked, so the closure
//! walk from the executable never reaches them. Each one is copied into
//! `Contents/PlugIns/<category>/` and walked on its own.

use super::dylib::{BinaryTools, DylibWalker};
use crate::bundler::{
    error::{Error, Result},
    utils::fs,
};
use std::io;
use std::path::{Path, PathBuf};

/// Returns the first existing plugin directory among `candidates`.
pub fn find_plugin_root(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|candidate| candidate.is_dir())
        .cloned()
        .ok_or_else(|| Error::PluginsNotFound {
            tried: candidates.to_vec(),
        })
}

/// Copies each plugin (`<category>/<file>`, relative to `plugin_root`) into
/// the bundle and fixes it up. Returns the deployed paths.
pub async fn deploy_plugins<T: BinaryTools>(
    walker: &mut DylibWalker<'_, T>,
    plugin_root: &Path,
    plugins: &[String],
) -> Result<Vec<PathBuf>> {
    let plugins_dir = walker.layout().plugins_dir();
    let mut deployed = Vec::with_capacity(plugins.len());

    for plugin in plugins {
        let source = plugin_root.join(plugin);
        if !source.is_file() {
            return Err(Error::Fs {
                context: "finding plugin",
                path: source,
                error: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        let dest = plugins_dir.join(plugin);
        if let Some(category_dir) = dest.parent() {
            fs::create_dir_all(category_dir).await?;
        }

        log::info!("Deploying plugin {}", plugin);
        fs::copy_file(&source, &dest).await?;
        fs::make_writable(&dest).await?;

        walker.fixup(&dest, &source).await?;
        deployed.push(dest);
    }

    Ok(deployed)
}
