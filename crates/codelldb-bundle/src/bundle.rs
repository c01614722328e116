//! Bundle orchestration
//!
//! Runs the pipeline in a fixed order: resolve the plan, run the build step,
//! create destination directories, then synchronize files and subtrees.
//! Anything that can fail on configuration alone fails before the build.

use crate::build::BuildStep;
use crate::config::{Config, Roots};
use crate::locate::{self, BundlePlan, LayoutOptions};
use crate::platform::Platform;
use crate::sync::{self, IgnorePatterns, SyncReport};
use crate::Result;

/// Per-invocation bundle options
#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub platform: Platform,
    pub layout: LayoutOptions,
    pub skip_build: bool,
}

impl BundleOptions {
    /// Options taken from `config`, for `platform` or else the host
    pub fn from_config(config: &Config, platform: Option<Platform>) -> Self {
        Self {
            platform: platform.unwrap_or_else(Platform::host),
            layout: LayoutOptions {
                layout: config.toolchain.layout,
                toolchain_subdir: config.toolchain.subdir.clone(),
            },
            skip_build: config.build.skip,
        }
    }
}

/// Assembles the adapter bundle
pub struct BundleManager {
    roots: Roots,
    build_step: Option<BuildStep>,
    options: BundleOptions,
}

impl BundleManager {
    /// Create a manager; validates the build command up front
    pub fn new(config: &Config, roots: Roots, options: BundleOptions) -> Result<Self> {
        let build_step = if options.skip_build {
            None
        } else {
            Some(BuildStep::from_command(&config.build.command, &roots.workspace)?)
        };

        Ok(Self {
            roots,
            build_step,
            options,
        })
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    pub fn build_step(&self) -> Option<&BuildStep> {
        self.build_step.as_ref()
    }

    /// Resolve what the bundle should contain
    pub fn plan(&self) -> Result<BundlePlan> {
        locate::resolve(self.options.platform, &self.roots, &self.options.layout)
    }

    /// Build the adapter and synchronize the bundle
    pub fn run(&self) -> Result<SyncReport> {
        let plan = self.plan()?;
        self.execute(&plan)
    }

    /// Build the adapter and synchronize the bundle against `plan`.
    ///
    /// Ignore patterns are compiled before the build so a bad pattern fails
    /// without building.
    pub fn execute(&self, plan: &BundlePlan) -> Result<SyncReport> {
        let ignores = compile_ignores(plan)?;

        if let Some(step) = &self.build_step {
            step.run()?;
        } else {
            tracing::info!("Skipping build step");
        }

        self.synchronize(plan, &ignores)
    }

    fn synchronize(&self, plan: &BundlePlan, ignores: &[IgnorePatterns]) -> Result<SyncReport> {
        for dir in plan.destination_dirs() {
            std::fs::create_dir_all(dir)?;
        }

        let mut report = SyncReport::default();

        for artifact in &plan.artifacts {
            if artifact.is_optional() && !artifact.source.exists() {
                tracing::warn!(path = %artifact.source, "Optional artifact not found, skipping");
                continue;
            }
            let outcome = sync::sync_file(&artifact.source, &artifact.destination_dir)?;
            report.record(artifact.file_name(), outcome);
        }

        for (subtree, ignore) in plan.subtrees.iter().zip(ignores) {
            let outcome = sync::sync_subtree(&subtree.source, &subtree.destination, ignore)?;
            let name = subtree
                .destination
                .file_name()
                .unwrap_or(subtree.destination.as_str());
            report.record(name, outcome);
        }

        tracing::debug!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            "Synchronization finished"
        );
        Ok(report)
    }
}

fn compile_ignores(plan: &BundlePlan) -> Result<Vec<IgnorePatterns>> {
    plan.subtrees
        .iter()
        .map(|subtree| IgnorePatterns::new(subtree.ignore.iter().cloned()))
        .collect()
}
