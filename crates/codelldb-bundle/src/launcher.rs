//! Debug launcher for Python scripts
//!
//! Composes a short Python snippet that keeps a handle on the original
//! `__main__` module as `sys.orig_main`, replaces `sys.argv`, and runs the
//! target script as `__main__`. The snippet runs inside LLDB's embedded
//! interpreter through a one-shot batch session:
//! `lldb -b -O "script <statements>"`.
//!
//! Forwarded arguments travel one of two ways:
//! - [`ArgvChannel::Environment`] (default): JSON in `CODELLDB_LAUNCH_ARGV`,
//!   target path in `CODELLDB_LAUNCH_TARGET`; no argument text is embedded in
//!   the script source.
//! - [`ArgvChannel::Inline`]: a quoted list literal inside the script.
//!   Arguments containing a quote or backslash are rejected, not escaped.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::process::Command;

use crate::{Error, Result};

/// Environment variable carrying the JSON-encoded argument list
pub const ARGV_VAR: &str = "CODELLDB_LAUNCH_ARGV";

/// Environment variable carrying the target script path
pub const TARGET_VAR: &str = "CODELLDB_LAUNCH_TARGET";

/// Separator between statements of the one-line script
pub const STATEMENT_SEPARATOR: &str = "; ";

const QUOTE: char = '\'';

/// How the argument list reaches the launched script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgvChannel {
    #[default]
    Environment,
    Inline,
}

impl std::str::FromStr for ArgvChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "environment" | "env" => Ok(ArgvChannel::Environment),
            "inline" => Ok(ArgvChannel::Inline),
            _ => Err(Error::config(
                format!("Unknown argv channel: {}", s),
                "Supported channels: environment, inline",
            )),
        }
    }
}

impl std::fmt::Display for ArgvChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgvChannel::Environment => write!(f, "environment"),
            ArgvChannel::Inline => write!(f, "inline"),
        }
    }
}

/// A composed launcher script plus the environment it expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherScript {
    statements: Vec<String>,
    environment: Vec<(String, String)>,
}

impl LauncherScript {
    /// Compose the script that runs `target` with `forwarded_args` as
    /// `sys.argv`. By convention `forwarded_args[0]` is `target` itself.
    pub fn compose(target: &str, forwarded_args: &[String], channel: ArgvChannel) -> Result<Self> {
        match channel {
            ArgvChannel::Environment => Self::compose_environment(target, forwarded_args),
            ArgvChannel::Inline => Self::compose_inline(target, forwarded_args),
        }
    }

    fn compose_environment(target: &str, forwarded_args: &[String]) -> Result<Self> {
        let argv = serde_json::to_string(forwarded_args).map_err(|e| {
            Error::launch(
                format!("Failed to encode arguments: {}", e),
                "This is likely a bug in codelldb-bundle",
            )
        })?;

        Ok(Self {
            statements: vec![
                "import sys,os,json,runpy,__main__".to_string(),
                "sys.orig_main = __main__".to_string(),
                format!("sys.argv = json.loads(os.environ['{}'])", ARGV_VAR),
                format!(
                    "runpy.run_path(os.environ['{}'], run_name='__main__')",
                    TARGET_VAR
                ),
            ],
            environment: vec![
                (ARGV_VAR.to_string(), argv),
                (TARGET_VAR.to_string(), target.to_string()),
            ],
        })
    }

    fn compose_inline(target: &str, forwarded_args: &[String]) -> Result<Self> {
        for value in std::iter::once(target).chain(forwarded_args.iter().map(String::as_str)) {
            if value.contains([QUOTE, '\\', '\n', '\r']) {
                return Err(Error::launch(
                    format!("Argument cannot be embedded inline: {:?}", value),
                    "Quotes, backslashes and newlines are not escaped; use `--argv-channel environment`",
                ));
            }
        }

        let quoted: Vec<String> = forwarded_args
            .iter()
            .map(|arg| format!("{QUOTE}{arg}{QUOTE}"))
            .collect();

        Ok(Self {
            statements: vec![
                "import sys,runpy,__main__".to_string(),
                "sys.orig_main = __main__".to_string(),
                format!("sys.argv=[{}]", quoted.join(",")),
                format!("runpy.run_path({QUOTE}{target}{QUOTE}, run_name='__main__')"),
            ],
            environment: Vec::new(),
        })
    }

    /// The statements, in execution order
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Environment variables the script reads
    pub fn environment(&self) -> &[(String, String)] {
        &self.environment
    }

    /// The statements joined into one line
    pub fn to_script(&self) -> String {
        self.statements.join(STATEMENT_SEPARATOR)
    }
}

/// The LLDB command-line driver
#[derive(Debug, Clone)]
pub struct DebuggerShell {
    executable: Utf8PathBuf,
}

impl DebuggerShell {
    pub fn new(executable: impl Into<Utf8PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// Build the batch-mode invocation that runs `script` and exits
    pub fn command(&self, script: &LauncherScript) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-b")
            .arg("-O")
            .arg(format!("script {}", script.to_script()));
        cmd.envs(script.environment().iter().map(|(k, v)| (k, v)));
        cmd
    }

    /// Run `script` and return the debugger's exit code
    pub fn run(&self, script: &LauncherScript) -> Result<i32> {
        let mut cmd = self.command(script);
        tracing::debug!("Running: {:?}", cmd);

        let status = cmd.status().map_err(|e| {
            Error::launch(
                format!("Failed to start {}: {}", self.executable(), e),
                "Check that LLDB_EXECUTABLE points at the lldb driver",
            )
        })?;

        Ok(status.code().unwrap_or_else(|| {
            tracing::warn!("Debugger terminated by a signal");
            1
        }))
    }
}
