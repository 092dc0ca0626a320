//! Clap derive structures for the `rngbridge` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rngbridge -- publish an RNG bridge charge controller on the bus
#[derive(Debug, Parser)]
#[command(
    name = "rngbridge",
    version,
    about = "Bridge an RNG bridge solar charge controller onto the solarcharger bus",
    long_about = "Polls the RNG bridge HTTP/JSON API and keeps a \
        com.victronenergy.solarcharger service in sync with it.\n\n\
        Settings are read once from a TOML file and RNGBRIDGE_* environment variables.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "RNGBRIDGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, env = "RNGBRIDGE_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv); overrides log_level from the config
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bridge until interrupted
    Run(RunArgs),

    /// Fetch the device once and show what would be published
    Probe(ProbeArgs),

    /// Write a sample config file
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Run a single sync cycle, print every property and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table
    Table,
    /// Pretty-printed JSON
    Json,
}
