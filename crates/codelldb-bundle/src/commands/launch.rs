//! Launch command implementation

use camino::Utf8Path;
use clap::Args;
use miette::Result;

use crate::config::Config;
use crate::launcher::{ArgvChannel, DebuggerShell, LauncherScript};

/// Arguments for the launch command
#[derive(Debug, Args)]
pub struct LaunchArgs {
    /// How arguments reach the script (environment, inline)
    #[arg(long)]
    pub argv_channel: Option<String>,

    /// Python script to run as __main__
    pub target: String,

    /// Arguments forwarded to the script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Run the launch command, returning the debugger's exit code
pub fn run(workspace_root: &Utf8Path, args: LaunchArgs) -> Result<i32> {
    let mut config = Config::load(workspace_root)?;
    config.apply_process_env();

    let shell = DebuggerShell::new(config.debugger_shell()?);
    let channel = match args.argv_channel {
        Some(ref channel) => channel.parse::<ArgvChannel>()?,
        None => config.launcher.argv_channel,
    };

    // sys.argv[0] is the script itself, as if it had been run directly
    let mut forwarded = Vec::with_capacity(args.args.len() + 1);
    forwarded.push(args.target.clone());
    forwarded.extend(args.args);

    let script = LauncherScript::compose(&args.target, &forwarded, channel)?;
    tracing::debug!(
        debugger = %shell.executable(),
        channel = %channel,
        script = %script.to_script(),
        "Composed launcher"
    );

    Ok(shell.run(&script)?)
}
