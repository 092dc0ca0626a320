//! CLI error types with miette diagnostics.
//!
//! Maps config, core and device errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rngbridge_config::ConfigError;
use rngbridge_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(rngbridge::no_config),
        help("Create one with: rngbridge init-config --config {path}")
    )]
    NoConfig { path: String },

    #[error("Missing required setting '{key}'")]
    #[diagnostic(
        code(rngbridge::missing_key),
        help(
            "Add '{key}' to the config file, or set it in the environment \
             (RNGBRIDGE_ prefix, '__' between nested keys).\n\
             Run: rngbridge init-config to write a sample."
        )
    )]
    MissingKey { key: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(rngbridge::config))]
    InvalidConfig { message: String },

    #[error("Config file already exists: {path}")]
    #[diagnostic(
        code(rngbridge::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("Could not read from RNGBridge at {endpoint}")]
    #[diagnostic(
        code(rngbridge::device),
        help("Check network connectivity and that on_premise.host points at the bridge.")
    )]
    Device {
        endpoint: String,
        #[source]
        source: rngbridge_api::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(rngbridge::bridge))]
    Bridge(CoreError),

    // ── Logging ──────────────────────────────────────────────────────

    #[error("Could not set up logging: {message}")]
    #[diagnostic(
        code(rngbridge::logging),
        help("Check log_level / RUST_LOG and that --log-file is writable.")
    )]
    Logging { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(rngbridge::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a core error raised while talking to the device at `endpoint`.
    pub fn at_endpoint(err: CoreError, endpoint: &str) -> Self {
        match err {
            CoreError::Device(source) => Self::Device {
                endpoint: endpoint.to_string(),
                source,
            },
            other => Self::Bridge(other),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } => exit_code::NOT_FOUND,
            Self::MissingKey { .. } | Self::InvalidConfig { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Device { source, .. } if source.is_timeout() => exit_code::TIMEOUT,
            Self::Device { .. } | Self::Bridge(CoreError::Device(_)) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::MissingKey { key } => Self::MissingKey { key },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::InvalidConfig {
                message: other.to_string(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::Bridge(err)
    }
}
