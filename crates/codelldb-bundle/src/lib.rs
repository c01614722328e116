//! codelldb-bundle - assembles the CodeLLDB adapter bundle
//!
//! This crate provides both a library and CLI, including:
//! - Configuration loading with environment overrides and fail-fast validation
//! - Declarative per-platform profiles of the bundle contents
//! - Artifact location for flat and split destination layouts
//! - Incremental file sync (mtime/size) and existence-gated subtree mirroring
//! - The adapter build step
//! - A launcher that runs Python scripts under LLDB's embedded interpreter

pub mod build;
pub mod bundle;
pub mod commands;
pub mod config;
pub mod error;
pub mod launcher;
pub mod locate;
pub mod platform;
pub mod sync;

pub use error::{Error, Result};
