//! Configuration for the rngbridge service.
//!
//! One TOML file, overridable from `RNGBRIDGE_`-prefixed environment
//! variables, loaded once at startup and translated into
//! `rngbridge_core::BridgeConfig`. Nothing re-reads the file at runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use rngbridge_core::{BridgeConfig, ServiceIdentity};

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `RNGBRIDGE_ON_PREMISE__HOST`.
pub const ENV_PREFIX: &str = "RNGBRIDGE_";

/// The only supported access type.
pub const ACCESS_TYPE_ON_PREMISE: &str = "OnPremise";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config key '{key}'")]
    MissingKey { key: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unsupported access_type '{value}' (expected 'OnPremise')")]
    UnsupportedAccessType { value: String },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
///
/// Identity keys are optional at the serde level so that a missing key
/// surfaces as [`ConfigError::MissingKey`] naming the key, not as a
/// generic deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Bus device instance, also used in the service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_instance: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    /// How the device is reached. Only `OnPremise` is supported.
    #[serde(default = "default_access_type")]
    pub access_type: String,

    /// Sign-of-life log interval in minutes. `0` disables it.
    #[serde(default)]
    pub sign_of_life_log: u64,

    /// Default log filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub on_premise: OnPremise,
}

/// Settings for [`ACCESS_TYPE_ON_PREMISE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OnPremise {
    /// Hostname or IP of the bridge, without scheme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_instance: None,
            custom_name: None,
            serial: None,
            access_type: default_access_type(),
            sign_of_life_log: 0,
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            on_premise: OnPremise::default(),
        }
    }
}

fn default_access_type() -> String {
    ACCESS_TYPE_ON_PREMISE.into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_request_timeout_secs() -> u64 {
    5
}

impl Config {
    /// A filled-in example, written by `rngbridge init-config`.
    pub fn sample() -> Self {
        Self {
            device_instance: Some(40),
            custom_name: Some("RNG MPPT".into()),
            serial: Some("RNG-0001".into()),
            sign_of_life_log: 5,
            on_premise: OnPremise {
                host: Some("192.168.1.50".into()),
            },
            ..Self::default()
        }
    }

    /// Device API root for the configured access type.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        if self.access_type != ACCESS_TYPE_ON_PREMISE {
            return Err(ConfigError::UnsupportedAccessType {
                value: self.access_type.clone(),
            });
        }

        let host = required(self.on_premise.host.as_deref(), "on_premise.host")?;
        Url::parse(&format!("http://{host}/api/")).map_err(|e| ConfigError::Validation {
            field: "on_premise.host".into(),
            reason: format!("'{host}' does not form a valid URL: {e}"),
        })
    }

    /// Validate and translate into the core runtime config.
    pub fn to_bridge_config(&self) -> Result<BridgeConfig, ConfigError> {
        let device_instance = self.device_instance.ok_or_else(|| ConfigError::MissingKey {
            key: "device_instance".into(),
        })?;
        let custom_name = required(self.custom_name.as_deref(), "custom_name")?;
        let serial = required(self.serial.as_deref(), "serial")?;
        let base_url = self.base_url()?;

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "request_timeout_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        let identity = ServiceIdentity::new(device_instance, custom_name.into(), serial.into());
        let mut config = BridgeConfig::new(base_url, identity);
        config.poll_interval = Duration::from_millis(self.poll_interval_ms);
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.sign_of_life_interval = Duration::from_secs(self.sign_of_life_log.saturating_mul(60));
        Ok(config)
    }
}

/// A present, non-blank string value.
fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingKey { key: key.into() })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "rngbridge", "rngbridge").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rngbridge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from file + environment.
///
/// An explicit `path` must exist. Without one, the default path is used
/// if present, so a config supplied entirely through the environment
/// still works.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
