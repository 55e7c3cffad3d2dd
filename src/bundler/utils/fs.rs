//! File system utilities for bundling.
//!
//! Provides safe file operations with automatic directory creation,
//! symlink preservation, and comprehensive error handling.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    os::unix::fs::{self as unix_fs, PermissionsExt},
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates a directory and all of its parents. Succeeds if it exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes whatever lives at `path`: symlinks are unlinked (never followed),
/// directories are removed recursively, files are deleted.
///
/// A path that no longer exists is not an error.
pub async fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("inspecting", path),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing", path),
    }
}

/// Creates a symlink at `link` pointing to `target`.
///
/// The target does not need to exist (e.g. `/Applications` on a build host
/// without one).
pub async fn symlink(target: &Path, link: &Path) -> Result<()> {
    let target_owned = target.to_path_buf();
    let link_owned = link.to_path_buf();
    tokio::task::spawn_blocking(move || unix_fs::symlink(&target_owned, &link_owned))
        .await
        .map_err(|e| Error::GenericError(format!("Symlink task panicked: {}", e)))?
        .fs_context("creating symlink", link)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Permissions are carried over. Fails if the source path is a directory or
/// doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks (framework `Versions/Current` links must stay links)
/// and file permissions.
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_dir_blocking(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

fn copy_dir_blocking(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path())
                .fs_context("reading symlink", entry.path())?;
            unix_fs::symlink(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

/// Adds the owner write bit to a file (`chmod u+w`).
pub async fn make_writable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .await
        .fs_context("reading permissions", path)?;
    let mut permissions = metadata.permissions();
    add_owner_write(&mut permissions);
    fs::set_permissions(path, permissions)
        .await
        .fs_context("setting permissions", path)
}

/// Adds the owner write bit to every file and directory under `root`
/// (`chmod -R u+w`). Symlinks are skipped.
pub async fn make_writable_recursive(root: &Path) -> Result<()> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        for entry in walkdir::WalkDir::new(&root) {
            let entry = entry?;
            if entry.file_type().is_symlink() {
                continue;
            }
            let path: PathBuf = entry.path().to_path_buf();
            let mut permissions = entry.metadata()?.permissions();
            add_owner_write(&mut permissions);
            std::fs::set_permissions(&path, permissions)
                .fs_context("setting permissions", &path)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Permission task panicked: {}", e)))?
}

fn add_owner_write(permissions: &mut std::fs::Permissions) {
    permissions.set_mode(permissions.mode() | 0o200);
}
