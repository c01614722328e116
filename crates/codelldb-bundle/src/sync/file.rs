//! Single-file sync with an mtime/size freshness check

use camino::{Utf8Path, Utf8PathBuf};

use crate::{Error, Result};

use super::SyncOutcome;

/// Whether a file needs copying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Skip,
    Copy,
}

/// The path a file is copied to.
///
/// An existing directory receives the source's base name; anything else is
/// taken as the literal destination path.
pub fn effective_destination(source: &Utf8Path, destination: &Utf8Path) -> Utf8PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

/// Decide whether `destination` is stale relative to `source`.
///
/// Any stat failure, on either side, means copy: a missing destination is
/// the common case, and a broken source surfaces as a copy error.
pub fn decide(source: &Utf8Path, destination: &Utf8Path) -> SyncDecision {
    let (Ok(src), Ok(dst)) = (std::fs::metadata(source), std::fs::metadata(destination)) else {
        return SyncDecision::Copy;
    };

    if src.len() != dst.len() {
        return SyncDecision::Copy;
    }

    match (src.modified(), dst.modified()) {
        (Ok(src_mtime), Ok(dst_mtime)) if dst_mtime >= src_mtime => SyncDecision::Skip,
        _ => SyncDecision::Copy,
    }
}

/// Copy `source` into `destination` unless the destination is fresh
pub fn sync_file(source: &Utf8Path, destination: &Utf8Path) -> Result<SyncOutcome> {
    let target = effective_destination(source, destination);
    let name = source.file_name().unwrap_or(source.as_str());

    match decide(source, &target) {
        SyncDecision::Skip => {
            tracing::info!("Skipping {}", name);
            Ok(SyncOutcome::Skipped)
        }
        SyncDecision::Copy => {
            tracing::info!("Copying {}", name);
            std::fs::copy(source, &target).map_err(|e| {
                Error::sync(
                    format!("Failed to copy {} to {}: {}", source, target, e),
                    "Check that the artifact was built and the bundle directory is writable",
                )
            })?;
            Ok(SyncOutcome::Copied)
        }
    }
}
