//! Configuration file parsing, environment overrides and validation
//!
//! This module handles parsing of `codelldb-bundle.toml` and
//! `codelldb-bundle.local.toml`, applies the `LLDB_ROOT` / `LLDB_EXECUTABLE`
//! environment overrides, and validates the result once into [`Roots`]
//! before anything touches the filesystem.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::launcher::ArgvChannel;
use crate::platform::DestinationLayout;
use crate::{Error, Result};

/// Base configuration file name, looked up in the workspace root
pub const CONFIG_FILE: &str = "codelldb-bundle.toml";

/// Local override file, merged over [`CONFIG_FILE`]
pub const LOCAL_CONFIG_FILE: &str = "codelldb-bundle.local.toml";

/// Environment variable overriding `toolchain.root`
pub const TOOLCHAIN_ROOT_VAR: &str = "LLDB_ROOT";

/// Environment variable overriding `launcher.debugger_shell`
pub const DEBUGGER_SHELL_VAR: &str = "LLDB_EXECUTABLE";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace-relative locations
    pub paths: PathsConfig,

    /// Debugger toolchain settings
    pub toolchain: ToolchainConfig,

    /// Build step settings
    pub build: BuildConfig,

    /// Debug launcher settings
    pub launcher: LauncherConfig,
}

/// Paths relative to the workspace root (absolute paths are used as-is)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the compiled adapter (default: "target/debug")
    pub build_output: Utf8PathBuf,

    /// Bundle output directory (default: "out/adapter2")
    pub bundle_dir: Utf8PathBuf,

    /// Directory holding the helper scripts (default: "adapter2")
    pub scripts_dir: Utf8PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build_output: Utf8PathBuf::from("target/debug"),
            bundle_dir: Utf8PathBuf::from("out/adapter2"),
            scripts_dir: Utf8PathBuf::from("adapter2"),
        }
    }
}

/// Debugger toolchain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Root of the toolchain distribution (no default; see `LLDB_ROOT`)
    pub root: Option<Utf8PathBuf>,

    /// Destination layout for toolchain files (default: flat)
    pub layout: DestinationLayout,

    /// Toolchain subdirectory name in the split layout (default: "lldb")
    pub subdir: Utf8PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            root: None,
            layout: DestinationLayout::default(),
            subdir: Utf8PathBuf::from("lldb"),
        }
    }
}

/// Build step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Program and arguments that produce the adapter (default: cargo build)
    pub command: Vec<String>,

    /// Skip the build step entirely (default: false)
    pub skip: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: vec!["cargo".to_string(), "build".to_string()],
            skip: false,
        }
    }
}

/// Debug launcher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Debugger shell executable (no default; see `LLDB_EXECUTABLE`)
    pub debugger_shell: Option<Utf8PathBuf>,

    /// How forwarded arguments reach the launched script
    pub argv_channel: ArgvChannel,
}

/// Validated root paths, all absolute or workspace-joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub workspace: Utf8PathBuf,
    pub build_output: Utf8PathBuf,
    pub toolchain: Utf8PathBuf,
    pub bundle_dir: Utf8PathBuf,
    pub scripts_dir: Utf8PathBuf,
}

impl Config {
    /// Load configuration from a workspace directory.
    ///
    /// This loads `codelldb-bundle.toml` and merges `codelldb-bundle.local.toml`
    /// over it when present. Missing files yield the defaults.
    pub fn load(workspace_root: &Utf8Path) -> Result<Self> {
        let config_path = workspace_root.join(CONFIG_FILE);
        let local_config_path = workspace_root.join(LOCAL_CONFIG_FILE);

        let base_config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<toml::Value>(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let local_config = if local_config_path.exists() {
            let content = std::fs::read_to_string(&local_config_path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        } else {
            None
        };

        let merged = if let Some(local) = local_config {
            merge_toml_values(base_config, local)
        } else {
            base_config
        };

        let config: Config = merged.try_into()?;
        tracing::debug!(?config, "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from a string (for testing)
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = non_empty(TOOLCHAIN_ROOT_VAR) {
            self.toolchain.root = Some(Utf8PathBuf::from(root));
        }
        if let Some(shell) = non_empty(DEBUGGER_SHELL_VAR) {
            self.launcher.debugger_shell = Some(Utf8PathBuf::from(shell));
        }
    }

    /// Validate the configured roots against `workspace_root`.
    ///
    /// Fails when the toolchain root is unset, empty or not a directory.
    pub fn roots(&self, workspace_root: &Utf8Path) -> Result<Roots> {
        let toolchain = self
            .toolchain
            .root
            .as_ref()
            .filter(|root| !root.as_str().trim().is_empty())
            .ok_or_else(|| {
                Error::config(
                    "Toolchain root is not set",
                    format!(
                        "Set {} or `[toolchain] root` in {}",
                        TOOLCHAIN_ROOT_VAR, CONFIG_FILE
                    ),
                )
            })?;
        let toolchain = resolve_path(workspace_root, toolchain);

        if !toolchain.is_dir() {
            return Err(Error::config(
                format!("Toolchain root is not a directory: {}", toolchain),
                format!("Point {} at an unpacked LLDB distribution", TOOLCHAIN_ROOT_VAR),
            ));
        }

        Ok(Roots {
            workspace: workspace_root.to_path_buf(),
            build_output: resolve_path(workspace_root, &self.paths.build_output),
            toolchain,
            bundle_dir: resolve_path(workspace_root, &self.paths.bundle_dir),
            scripts_dir: resolve_path(workspace_root, &self.paths.scripts_dir),
        })
    }

    /// The debugger shell executable; only required by the launcher
    pub fn debugger_shell(&self) -> Result<&Utf8Path> {
        self.launcher
            .debugger_shell
            .as_deref()
            .filter(|shell| !shell.as_str().trim().is_empty())
            .ok_or_else(|| {
                Error::config(
                    "Debugger shell executable is not set",
                    format!(
                        "Set {} or `[launcher] debugger_shell` in {}",
                        DEBUGGER_SHELL_VAR, CONFIG_FILE
                    ),
                )
            })
    }
}

fn resolve_path(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Merge two TOML values:
/// - Tables: recursively merged
/// - Arrays: local replaces base (not merged)
/// - Primitives: local overrides base
fn merge_toml_values(base: toml::Value, local: toml::Value) -> toml::Value {
    match (base, local) {
        (toml::Value::Table(mut base_table), toml::Value::Table(local_table)) => {
            for (key, local_value) in local_table {
                if let Some(base_value) = base_table.remove(&key) {
                    base_table.insert(key, merge_toml_values(base_value, local_value));
                } else {
                    base_table.insert(key, local_value);
                }
            }
            toml::Value::Table(base_table)
        }
        (_, local) => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.paths.build_output, Utf8PathBuf::from("target/debug"));
        assert_eq!(config.paths.bundle_dir, Utf8PathBuf::from("out/adapter2"));
        assert_eq!(config.paths.scripts_dir, Utf8PathBuf::from("adapter2"));
        assert!(config.toolchain.root.is_none());
        assert_eq!(config.toolchain.layout, DestinationLayout::Flat);
        assert_eq!(config.build.command, vec!["cargo", "build"]);
        assert!(!config.build.skip);
        assert_eq!(config.launcher.argv_channel, ArgvChannel::Environment);
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[paths]
build_output = "target/release"
bundle_dir = "dist"

[toolchain]
root = "/opt/lldb"
layout = "split"
subdir = "toolchain"

[build]
command = ["cargo", "build", "--release"]

[launcher]
debugger_shell = "/opt/lldb/bin/lldb"
argv_channel = "inline"
"#;

        let config = Config::parse(content).unwrap();

        assert_eq!(config.paths.build_output, Utf8PathBuf::from("target/release"));
        assert_eq!(config.paths.bundle_dir, Utf8PathBuf::from("dist"));
        assert_eq!(config.paths.scripts_dir, Utf8PathBuf::from("adapter2"));
        assert_eq!(config.toolchain.root, Some(Utf8PathBuf::from("/opt/lldb")));
        assert_eq!(config.toolchain.layout, DestinationLayout::Split);
        assert_eq!(config.toolchain.subdir, Utf8PathBuf::from("toolchain"));
        assert_eq!(config.build.command, vec!["cargo", "build", "--release"]);
        assert_eq!(config.launcher.argv_channel, ArgvChannel::Inline);
    }

    #[test]
    fn test_local_config_overrides_base() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workspace_root = Utf8Path::from_path(temp_dir.path()).unwrap();

        std::fs::write(
            workspace_root.join(CONFIG_FILE),
            r#"
[toolchain]
root = "/opt/lldb"
layout = "split"

[build]
command = ["make", "adapter"]
"#,
        )
        .unwrap();
        std::fs::write(
            workspace_root.join(LOCAL_CONFIG_FILE),
            r#"
[toolchain]
root = "/home/dev/lldb"

[build]
command = ["cargo", "build"]
"#,
        )
        .unwrap();

        let config = Config::load(workspace_root).unwrap();

        assert_eq!(
            config.toolchain.root,
            Some(Utf8PathBuf::from("/home/dev/lldb"))
        );
        // Not overridden locally
        assert_eq!(config.toolchain.layout, DestinationLayout::Split);
        // Arrays are replaced, not concatenated
        assert_eq!(config.build.command, vec!["cargo", "build"]);
    }

    #[test]
    fn test_load_missing_config_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workspace_root = Utf8Path::from_path(temp_dir.path()).unwrap();

        let config = Config::load(workspace_root).unwrap();

        assert!(config.toolchain.root.is_none());
        assert_eq!(config.build.command, vec!["cargo", "build"]);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::parse("[toolchain]\nroot = \"/from/file\"").unwrap();
        config.apply_env(env_of(&[
            (TOOLCHAIN_ROOT_VAR, "/from/env"),
            (DEBUGGER_SHELL_VAR, "/usr/bin/lldb"),
        ]));

        assert_eq!(config.toolchain.root, Some(Utf8PathBuf::from("/from/env")));
        assert_eq!(config.debugger_shell().unwrap(), "/usr/bin/lldb");
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config = Config::parse("[toolchain]\nroot = \"/from/file\"").unwrap();
        config.apply_env(env_of(&[(TOOLCHAIN_ROOT_VAR, "")]));

        assert_eq!(config.toolchain.root, Some(Utf8PathBuf::from("/from/file")));
    }

    #[test]
    fn test_roots_requires_toolchain_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workspace_root = Utf8Path::from_path(temp_dir.path()).unwrap();

        let err = Config::default().roots(workspace_root).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let mut config = Config::default();
        config.toolchain.root = Some(Utf8PathBuf::from("  "));
        assert!(matches!(
            config.roots(workspace_root),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_roots_rejects_missing_toolchain_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workspace_root = Utf8Path::from_path(temp_dir.path()).unwrap();

        let mut config = Config::default();
        config.toolchain.root = Some(workspace_root.join("no-such-lldb"));

        assert!(matches!(
            config.roots(workspace_root),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_roots_resolves_relative_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workspace_root = Utf8Path::from_path(temp_dir.path()).unwrap();
        std::fs::create_dir_all(workspace_root.join("vendor/lldb")).unwrap();

        let mut config = Config::default();
        config.toolchain.root = Some(Utf8PathBuf::from("vendor/lldb"));

        let roots = config.roots(workspace_root).unwrap();
        assert_eq!(roots.toolchain, workspace_root.join("vendor/lldb"));
        assert_eq!(roots.build_output, workspace_root.join("target/debug"));
        assert_eq!(roots.bundle_dir, workspace_root.join("out/adapter2"));
        assert_eq!(roots.scripts_dir, workspace_root.join("adapter2"));
    }

    #[test]
    fn test_debugger_shell_missing() {
        let config = Config::default();
        assert!(matches!(
            config.debugger_shell(),
            Err(Error::Config { .. })
        ));
    }
}
