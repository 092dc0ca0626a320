mod bus;
mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Writing a sample config must not require a valid one
        Command::InitConfig(args) => {
            let _guard = logging::init(cli.global.verbose, None, cli.global.log_file.as_deref())?;
            commands::init_config::handle(&args, &cli.global)
        }

        // Everything else runs against the loaded, validated config
        cmd => {
            let config = rngbridge_config::load_config(cli.global.config.as_deref())?;
            let _guard = logging::init(
                cli.global.verbose,
                Some(&config.log_level),
                cli.global.log_file.as_deref(),
            )?;
            let bridge_config = config.to_bridge_config()?;

            debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, bridge_config).await
        }
    }
}
