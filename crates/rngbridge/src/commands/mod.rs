//! Command dispatch: config-bound commands to their handlers.

pub mod init_config;
pub mod probe;
pub mod run;

use rngbridge_core::BridgeConfig;

use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a command that needs a validated bridge config.
pub async fn dispatch(cmd: Command, config: BridgeConfig) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(&args, config).await,
        Command::Probe(args) => probe::handle(&args, &config).await,
        // Handled before the config is loaded
        Command::InitConfig(_) => Ok(()),
    }
}
