//! Incremental synchronization of bundle artifacts
//!
//! This module provides:
//! - File sync: copy a file only when the destination is missing, has a
//!   different size, or is older than the source
//! - Subtree sync: mirror a whole directory once, gated on the destination
//!   not existing yet, with glob-based ignores
//!
//! The destination tree is the only state; every run re-evaluates each
//! artifact from scratch.

mod file;
mod ignore;
mod subtree;

pub use file::{SyncDecision, decide, effective_destination, sync_file};
pub use ignore::IgnorePatterns;
pub use subtree::sync_subtree;

/// What a sync call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Copied,
    Skipped,
}

/// Names of the artifacts copied and skipped during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

impl SyncReport {
    /// Record the outcome for `name`
    pub fn record(&mut self, name: impl Into<String>, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Copied => self.copied.push(name.into()),
            SyncOutcome::Skipped => self.skipped.push(name.into()),
        }
    }

    /// True when nothing had to be copied
    pub fn is_up_to_date(&self) -> bool {
        self.copied.is_empty()
    }
}
