//! codelldb-bundle CLI

use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use codelldb_bundle::commands;

/// codelldb-bundle - assemble the CodeLLDB adapter bundle
#[derive(Debug, Parser)]
#[command(name = "codelldb-bundle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace root directory
    #[arg(short = 'w', long, global = true)]
    workspace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the adapter and synchronize the bundle directory
    Build(commands::build::BuildArgs),

    /// Run a Python script under LLDB's embedded interpreter
    Launch(commands::launch::LaunchArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();

    // Determine workspace root
    let workspace_root = if let Some(ref path) = cli.workspace {
        camino::Utf8PathBuf::from(path)
    } else {
        std::env::current_dir()
            .ok()
            .and_then(|p| camino::Utf8PathBuf::try_from(p).ok())
            .unwrap_or_else(|| camino::Utf8PathBuf::from("."))
    };

    match cli.command {
        Commands::Build(args) => commands::build::run(&workspace_root, args),
        Commands::Launch(args) => {
            let code = commands::launch::run(&workspace_root, args)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
