//! Error types for codelldb-bundle

// This warning is a false positive from thiserror macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for bundle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for codelldb-bundle
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration error, raised before any side effect
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[help]
        help: String,
    },

    /// The build command failed or could not be started
    #[error("Build error: {message}")]
    Build {
        message: String,
        #[help]
        help: String,
    },

    /// Copying an artifact or subtree into the bundle failed
    #[error("Sync error: {message}")]
    Sync {
        message: String,
        #[help]
        help: String,
    },

    /// Composing or running the debug launcher failed
    #[error("Launch error: {message}")]
    Launch {
        message: String,
        #[help]
        help: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a build error
    pub fn build(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a sync error
    pub fn sync(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Sync {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a launch error
    pub fn launch(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
            help: help.into(),
        }
    }
}
