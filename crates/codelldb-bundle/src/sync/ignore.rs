//! Glob-based ignore patterns for subtree mirrors
//!
//! Patterns are matched against the base name of each entry, the way
//! `*.pyc` or `_lldb.*` would be written in an ignore list.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::{Error, Result};

/// Compiled set of ignore patterns
#[derive(Debug, Clone)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnorePatterns {
    /// Compile `patterns`
    ///
    /// # Errors
    /// Returns a config error if any pattern is not a valid glob.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();

        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::config(
                    format!("Invalid ignore pattern '{}': {}", pattern, e),
                    "Ignore patterns use glob syntax, e.g. `_lldb.*`",
                )
            })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|e| {
            Error::config(
                format!("Failed to compile ignore patterns: {}", e),
                "Check the ignore patterns for syntax errors",
            )
        })?;

        Ok(Self { patterns, set })
    }

    /// Whether an entry with base name `name` is ignored
    pub fn is_match(&self, name: impl AsRef<Path>) -> bool {
        self.set.is_match(name.as_ref())
    }

    /// The source patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
