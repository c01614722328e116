//! The adapter build step
//!
//! The compiler invocation is opaque: a configured program and arguments run
//! in the workspace root, inheriting stdio. A non-zero exit aborts the run
//! before anything is copied.

use camino::{Utf8Path, Utf8PathBuf};
use std::process::Command;

use crate::config::CONFIG_FILE;
use crate::{Error, Result};

/// A configured build command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    program: String,
    args: Vec<String>,
    working_dir: Utf8PathBuf,
}

impl BuildStep {
    /// Create a build step from a `[program, args...]` command line
    pub fn from_command(command: &[String], working_dir: &Utf8Path) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            Error::config(
                "Build command is empty",
                format!(
                    "Set `[build] command` in {} or use `[build] skip = true`",
                    CONFIG_FILE
                ),
            )
        })?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        })
    }

    /// The command line, for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the build and wait for it
    pub fn run(&self) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);

        tracing::info!("Building: {}", self.command_line());
        tracing::debug!("Running: {:?}", cmd);

        let status = cmd.status().map_err(|e| {
            Error::build(
                format!("Failed to start `{}`: {}", self.command_line(), e),
                "Check that the build tool is installed and on PATH",
            )
        })?;

        if !status.success() {
            return Err(Error::build(
                format!(
                    "`{}` failed with exit code: {:?}",
                    self.command_line(),
                    status.code()
                ),
                "Fix the build errors above; nothing was copied",
            ));
        }

        Ok(())
    }
}
