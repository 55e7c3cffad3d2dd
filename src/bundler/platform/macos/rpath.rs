//! Search-path (`LC_RPATH`) normalization of the main executable.

use super::dylib::BinaryTools;
use crate::bundler::error::{Error, Result};
use std::path::Path;

/// The only search path a fixed-up executable carries.
pub const CANONICAL_RPATH: &str = "@executable_path/../Frameworks";

/// Leaves `executable` with exactly one search path, [`CANONICAL_RPATH`].
///
/// Every other entry and every duplicate of the canonical one is deleted,
/// then the canonical entry is added if it was missing. The result is read
/// back and checked. Running this twice is a no-op the second time.
pub async fn normalize_rpaths<T: BinaryTools>(tools: &T, executable: &Path) -> Result<()> {
    let entries = tools.search_paths(executable).await?;

    let mut has_canonical = false;
    for entry in &entries {
        if entry == CANONICAL_RPATH && !has_canonical {
            has_canonical = true;
            continue;
        }
        tools.delete_search_path(executable, entry).await?;
    }

    if !has_canonical {
        tools.add_search_path(executable, CANONICAL_RPATH).await?;
    }

    let found = tools.search_paths(executable).await?;
    if found != [CANONICAL_RPATH] {
        return Err(Error::RpathNormalization {
            binary: executable.to_path_buf(),
            found,
        });
    }

    log::debug!("Search paths of {} normalized", executable.display());
    Ok(())
}
