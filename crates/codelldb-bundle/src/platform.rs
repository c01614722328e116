//! Platform profiles
//!
//! Each supported operating system is described by a static [`PlatformProfile`]:
//! the adapter's file names, the toolchain files to vendor and where the
//! interpreter support library lives. The locator evaluates these tables with
//! one generic routine instead of branching per platform.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Operating systems the bundle can be assembled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// Every supported platform
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::MacOs, Platform::Windows];

    /// The platform this process runs on.
    ///
    /// # Panics
    /// Panics when the host is not one of the supported platforms; the
    /// profile table has to be extended before the tool can run there.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            other => panic!("no platform profile for host OS '{}'", other),
        }
    }

    /// The static profile for this platform
    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            Platform::Linux => &LINUX,
            Platform::MacOs => &MACOS,
            Platform::Windows => &WINDOWS,
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "windows" | "win32" => Ok(Platform::Windows),
            _ => Err(Error::config(
                format!("Unknown platform: {}", s),
                "Supported platforms: linux, macos, windows",
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// Where toolchain files land inside the bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationLayout {
    /// Toolchain binaries and libraries are merged into the bundle root
    #[default]
    Flat,
    /// Toolchain files go under a subdirectory that mirrors the toolchain's
    /// own `bin/` and `lib/` children
    Split,
}

impl std::str::FromStr for DestinationLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(DestinationLayout::Flat),
            "split" => Ok(DestinationLayout::Split),
            _ => Err(Error::config(
                format!("Unknown destination layout: {}", s),
                "Supported layouts: flat, split",
            )),
        }
    }
}

impl std::fmt::Display for DestinationLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationLayout::Flat => write!(f, "flat"),
            DestinationLayout::Split => write!(f, "split"),
        }
    }
}

/// What an artifact is, for reporting and for the optional-file policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    AdapterBinary,
    AdapterLibrary,
    HelperScript,
    ToolchainBinary,
    ToolchainLibrary,
    /// Debug symbols; may be missing from a toolchain distribution
    DebugSymbols,
}

impl ArtifactRole {
    /// Whether a missing source is tolerated
    pub fn is_optional(self) -> bool {
        matches!(self, ArtifactRole::DebugSymbols)
    }
}

/// A file taken from the toolchain root
#[derive(Debug, Clone, Copy)]
pub struct ToolchainFile {
    /// Path relative to the toolchain root, always `/`-separated
    pub path: &'static str,
    pub role: ArtifactRole,
}

/// The interpreter's third-party package tree shipped with the toolchain
#[derive(Debug, Clone, Copy)]
pub struct SupportLibrary {
    /// Path relative to the toolchain root
    pub source: &'static str,
    /// Destination relative to the bundle directory in the flat layout.
    /// The split layout mirrors `source` under the toolchain subdirectory.
    pub flat_destination: &'static str,
}

/// Declarative description of one platform's bundle contents
#[derive(Debug)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Adapter executable name inside the build output directory
    pub adapter_binary: &'static str,
    /// Adapter shared library name inside the build output directory
    pub adapter_library: &'static str,
    pub toolchain_files: &'static [ToolchainFile],
    pub support_library: Option<SupportLibrary>,
}

/// Native extension of the debugger's scripting bridge. The synchronized
/// toolchain library provides it, so the support-library mirror skips it.
pub const NATIVE_BRIDGE_PATTERN: &str = "_lldb.*";

/// Helper scripts copied from the workspace on every platform
pub const HELPER_SCRIPTS: &[&str] = &["codelldb.py", "rust.py", "value.py"];

static LINUX: PlatformProfile = PlatformProfile {
    platform: Platform::Linux,
    adapter_binary: "codelldb",
    adapter_library: "libcodelldb.so",
    toolchain_files: &[
        ToolchainFile {
            path: "bin/lldb",
            role: ArtifactRole::ToolchainBinary,
        },
        ToolchainFile {
            path: "bin/lldb-server",
            role: ArtifactRole::ToolchainBinary,
        },
        ToolchainFile {
            path: "lib/liblldb.so",
            role: ArtifactRole::ToolchainLibrary,
        },
    ],
    support_library: Some(SupportLibrary {
        source: "lib/python2.7/site-packages",
        flat_destination: "python2.7/site-packages",
    }),
};

static MACOS: PlatformProfile = PlatformProfile {
    platform: Platform::MacOs,
    adapter_binary: "codelldb",
    adapter_library: "libcodelldb.dylib",
    toolchain_files: &[
        ToolchainFile {
            path: "bin/lldb",
            role: ArtifactRole::ToolchainBinary,
        },
        ToolchainFile {
            path: "lib/liblldb.dylib",
            role: ArtifactRole::ToolchainLibrary,
        },
    ],
    support_library: Some(SupportLibrary {
        source: "lib/python2.7/site-packages",
        flat_destination: "python2.7/site-packages",
    }),
};

// liblldb.dll lives in bin/ on Windows and expects site-packages at ../lib.
static WINDOWS: PlatformProfile = PlatformProfile {
    platform: Platform::Windows,
    adapter_binary: "codelldb.exe",
    adapter_library: "codelldb.dll",
    toolchain_files: &[
        ToolchainFile {
            path: "bin/lldb.exe",
            role: ArtifactRole::ToolchainBinary,
        },
        ToolchainFile {
            path: "bin/lldb.pdb",
            role: ArtifactRole::DebugSymbols,
        },
        ToolchainFile {
            path: "bin/liblldb.dll",
            role: ArtifactRole::ToolchainLibrary,
        },
        ToolchainFile {
            path: "bin/liblldb.pdb",
            role: ArtifactRole::DebugSymbols,
        },
    ],
    support_library: Some(SupportLibrary {
        source: "lib/site-packages",
        flat_destination: "../lib/site-packages",
    }),
};
