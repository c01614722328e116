//! Artifact location
//!
//! Resolves which source files and subtrees make up the bundle for a
//! platform, and where each of them lands.

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Roots;
use crate::platform::{
    ArtifactRole, DestinationLayout, HELPER_SCRIPTS, NATIVE_BRIDGE_PATTERN, Platform,
};
use crate::{Error, Result};

/// A single file required in the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub role: ArtifactRole,
    /// Absolute source path
    pub source: Utf8PathBuf,
    /// Directory the file is copied into
    pub destination_dir: Utf8PathBuf,
}

impl ArtifactSpec {
    /// Base name of the source file
    pub fn file_name(&self) -> &str {
        self.source.file_name().unwrap_or(self.source.as_str())
    }

    /// Full path the file will have inside the bundle
    pub fn destination_path(&self) -> Utf8PathBuf {
        self.destination_dir.join(self.file_name())
    }

    /// Whether a missing source is tolerated
    pub fn is_optional(&self) -> bool {
        self.role.is_optional()
    }
}

/// A directory mirrored wholesale into the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeSpec {
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    /// Glob patterns matched against entry base names
    pub ignore: Vec<String>,
}

/// Where toolchain files go inside the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    pub layout: DestinationLayout,
    /// Toolchain subdirectory, used by the split layout only
    pub toolchain_subdir: Utf8PathBuf,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layout: DestinationLayout::Flat,
            toolchain_subdir: Utf8PathBuf::from("lldb"),
        }
    }
}

/// The resolved contents of a bundle
#[derive(Debug, Clone)]
pub struct BundlePlan {
    pub platform: Platform,
    pub artifacts: Vec<ArtifactSpec>,
    pub subtrees: Vec<SubtreeSpec>,
}

impl BundlePlan {
    /// Every directory files are copied into, in first-use order
    pub fn destination_dirs(&self) -> Vec<&Utf8Path> {
        let mut dirs: Vec<&Utf8Path> = Vec::new();
        for artifact in &self.artifacts {
            if !dirs.contains(&artifact.destination_dir.as_path()) {
                dirs.push(&artifact.destination_dir);
            }
        }
        dirs
    }
}

/// Resolve the bundle contents for `platform`
pub fn resolve(platform: Platform, roots: &Roots, options: &LayoutOptions) -> Result<BundlePlan> {
    for (name, root) in [
        ("workspace", &roots.workspace),
        ("build output", &roots.build_output),
        ("toolchain", &roots.toolchain),
        ("bundle", &roots.bundle_dir),
        ("scripts", &roots.scripts_dir),
    ] {
        if root.as_str().trim().is_empty() {
            return Err(Error::config(
                format!("The {} root path is empty", name),
                "Check the [paths] and [toolchain] sections of the configuration",
            ));
        }
    }

    let profile = platform.profile();
    let bundle = &roots.bundle_dir;
    let mut artifacts = Vec::new();

    for script in HELPER_SCRIPTS {
        artifacts.push(ArtifactSpec {
            role: ArtifactRole::HelperScript,
            source: roots.scripts_dir.join(script),
            destination_dir: bundle.clone(),
        });
    }

    artifacts.push(ArtifactSpec {
        role: ArtifactRole::AdapterBinary,
        source: roots.build_output.join(profile.adapter_binary),
        destination_dir: bundle.clone(),
    });
    artifacts.push(ArtifactSpec {
        role: ArtifactRole::AdapterLibrary,
        source: roots.build_output.join(profile.adapter_library),
        destination_dir: bundle.clone(),
    });

    for file in profile.toolchain_files {
        let relative = Utf8Path::new(file.path);
        let destination_dir = match options.layout {
            DestinationLayout::Flat => bundle.clone(),
            DestinationLayout::Split => {
                let parent = relative.parent().unwrap_or(Utf8Path::new(""));
                bundle.join(&options.toolchain_subdir).join(parent)
            }
        };
        artifacts.push(ArtifactSpec {
            role: file.role,
            source: roots.toolchain.join(relative),
            destination_dir,
        });
    }

    let subtrees = profile
        .support_library
        .iter()
        .map(|support| SubtreeSpec {
            source: roots.toolchain.join(support.source),
            destination: match options.layout {
                DestinationLayout::Flat => bundle.join(support.flat_destination),
                DestinationLayout::Split => bundle
                    .join(&options.toolchain_subdir)
                    .join(support.source),
            },
            ignore: vec![NATIVE_BRIDGE_PATTERN.to_string()],
        })
        .collect();

    tracing::debug!(
        %platform,
        layout = %options.layout,
        artifacts = artifacts.len(),
        "Resolved bundle plan"
    );

    Ok(BundlePlan {
        platform,
        artifacts,
        subtrees,
    })
}
