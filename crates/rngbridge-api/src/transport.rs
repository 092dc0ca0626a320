// Shared transport configuration for building reqwest::Client instances.
//
// The device speaks plain HTTP on the local network, so the only knobs
// are the hard request timeout and the connect timeout.

use std::time::Duration;

use crate::error::Error;

/// Default hard timeout for a single device request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on a whole request, connect through body.
    pub timeout: Duration,
    /// Upper bound on TCP connect alone. Never larger than `timeout`.
    pub connect_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: None,
        }
    }
}

impl TransportConfig {
    /// Transport config with the given hard request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("rngbridge/", env!("CARGO_PKG_VERSION")));

        if let Some(connect) = self.connect_timeout {
            builder = builder.connect_timeout(connect.min(self.timeout));
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
