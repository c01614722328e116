//! Existence-gated subtree mirroring
//!
//! A subtree is copied in full the first time and never re-examined while its
//! destination exists. The copy goes to a sibling staging directory that is
//! renamed into place at the end, so an interrupted copy never leaves a
//! destination that later runs would mistake for complete.

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

use super::{IgnorePatterns, SyncOutcome};

/// Mirror `source` to `destination` unless `destination` already exists
pub fn sync_subtree(
    source: &Utf8Path,
    destination: &Utf8Path,
    ignore: &IgnorePatterns,
) -> Result<SyncOutcome> {
    let name = destination.file_name().unwrap_or(destination.as_str());

    if destination.exists() {
        tracing::info!("Skipping {}", name);
        return Ok(SyncOutcome::Skipped);
    }

    tracing::info!("Copying {}", name);

    let staging = staging_path(destination);
    if staging.exists() {
        tracing::debug!(path = %staging, "Removing leftover staging directory");
        std::fs::remove_dir_all(&staging)?;
    }

    copy_tree(source, &staging, ignore)?;
    std::fs::rename(&staging, destination).map_err(|e| {
        Error::sync(
            format!("Failed to move {} into place at {}: {}", staging, destination, e),
            "Check that the bundle directory is writable",
        )
    })?;

    Ok(SyncOutcome::Copied)
}

fn staging_path(destination: &Utf8Path) -> Utf8PathBuf {
    let name = destination.file_name().unwrap_or("subtree");
    destination.with_file_name(format!(".{}.partial", name))
}

/// Recursively copy `src` to `dst`, pruning entries whose base name matches
/// `ignore`. Symlinks are followed and their targets copied, so links that
/// point outside the tree stay valid in the bundle.
fn copy_tree(src: &Utf8Path, dst: &Utf8Path, ignore: &IgnorePatterns) -> Result<()> {
    tracing::debug!(source = %src, ignore = ?ignore.patterns(), "Mirroring subtree");

    let walker = WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !ignore.is_match(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            Error::sync(
                format!("Failed to read directory entry under {}: {}", src, e),
                "Check that the toolchain root contains the support library and has no dangling links",
            )
        })?;

        let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
            Error::sync(
                format!("Path is not valid UTF-8: {:?}", entry.path()),
                "Ensure all file paths contain only valid UTF-8 characters",
            )
        })?;

        let rel_path = src_path.strip_prefix(src).map_err(|_| {
            Error::sync(
                format!("Failed to strip source prefix from {}", src_path),
                "This is an unexpected internal error",
            )
        })?;

        let dst_path = dst.join(rel_path);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dst_path)?;
        } else {
            if let Some(parent) = dst_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(src_path, &dst_path).map_err(|e| {
                Error::sync(
                    format!("Failed to copy {} to {}: {}", src_path, dst_path, e),
                    "Check disk space and permissions on the bundle directory",
                )
            })?;
        }
    }

    Ok(())
}
