//! Build command implementation
//!
//! Runs the adapter build and synchronizes the bundle directory.

use camino::Utf8Path;
use clap::Args;
use miette::Result;

use crate::bundle::{BundleManager, BundleOptions};
use crate::config::Config;
use crate::platform::{DestinationLayout, Platform};

/// Arguments for the build command
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Target platform (linux, macos, windows); defaults to the host
    #[arg(long)]
    pub platform: Option<String>,

    /// Destination layout for toolchain files (flat, split)
    #[arg(long)]
    pub layout: Option<String>,

    /// Skip the build step and only synchronize
    #[arg(long)]
    pub skip_build: bool,

    /// Dry run - show what would be copied
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the build command
pub fn run(workspace_root: &Utf8Path, args: BuildArgs) -> Result<()> {
    let mut config = Config::load(workspace_root)?;
    config.apply_process_env();

    let platform = match args.platform {
        Some(ref platform) => Some(platform.parse::<Platform>()?),
        None => None,
    };
    let mut options = BundleOptions::from_config(&config, platform);
    if let Some(ref layout) = args.layout {
        options.layout.layout = layout.parse::<DestinationLayout>()?;
    }
    options.skip_build |= args.skip_build;

    let roots = config.roots(workspace_root)?;
    let manager = BundleManager::new(&config, roots, options)?;

    if args.dry_run {
        let plan = manager.plan()?;
        if let Some(step) = manager.build_step() {
            println!("Would run: {}", step.command_line());
        }
        println!("Would synchronize for {}:", plan.platform);
        for artifact in &plan.artifacts {
            let note = if artifact.is_optional() { " (optional)" } else { "" };
            println!(
                "  {} -> {}{}",
                artifact.source,
                artifact.destination_path(),
                note
            );
        }
        for subtree in &plan.subtrees {
            println!(
                "  {}/ -> {}/ (ignoring {})",
                subtree.source,
                subtree.destination,
                subtree.ignore.join(", ")
            );
        }
        return Ok(());
    }

    let report = manager.run()?;

    if report.is_up_to_date() {
        tracing::info!("Bundle is up to date");
    } else {
        tracing::info!(
            "Copied {} item(s), skipped {}",
            report.copied.len(),
            report.skipped.len()
        );
    }
    tracing::info!("Bundle ready at {}", manager.roots().bundle_dir);

    Ok(())
}
