//! `rngbridge init-config`: write a sample config file.

use rngbridge_config::{Config, config_path, save_config};

use crate::cli::{GlobalOpts, InitConfigArgs};
use crate::error::CliError;
use crate::output::print_output;

pub fn handle(args: &InitConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);

    if path.exists() && !args.force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    save_config(&Config::sample(), &path)?;
    print_output(&format!(
        "Wrote sample config to {}\nEdit device_instance, custom_name, serial and on_premise.host before running.",
        path.display()
    ));
    Ok(())
}
