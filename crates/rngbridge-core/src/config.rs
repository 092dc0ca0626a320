// ── Runtime bridge configuration ──
//
// These types describe *what* device to poll and *how* to present it on
// the bus. They never touch disk: `rngbridge-config` loads the file once
// at startup and hands a `BridgeConfig` in by value.

use std::time::Duration;

use url::Url;

/// Default cadence of the sync loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Bus service name prefix for solar chargers.
pub const SERVICE_NAME_PREFIX: &str = "com.victronenergy.solarcharger";

/// Identity metadata published once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub device_instance: u32,
    pub custom_name: String,
    pub serial: String,
    pub product_name: String,
    /// Human-readable description of the upstream connection.
    pub connection: String,
    pub process_name: String,
    pub process_version: String,
}

impl ServiceIdentity {
    /// Identity with the standard product, connection, and process fields.
    pub fn new(device_instance: u32, custom_name: String, serial: String) -> Self {
        Self {
            device_instance,
            custom_name,
            serial,
            product_name: "RNGBridge".into(),
            connection: "RNGBridge HTTP JSON service".into(),
            process_name: "rngbridge".into(),
            process_version: format!("Version {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Bus service name, e.g. `com.victronenergy.solarcharger.http_40`.
    pub fn service_name(&self) -> String {
        format!("{SERVICE_NAME_PREFIX}.http_{:02}", self.device_instance)
    }
}

/// Everything the bridge needs to run.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Device API root, e.g. `http://192.168.1.50/api/`.
    pub base_url: Url,
    pub identity: ServiceIdentity,
    /// Minimum delay between the end of one sync cycle and the start of the next.
    pub poll_interval: Duration,
    /// Hard timeout for a single device request.
    pub request_timeout: Duration,
    /// Heartbeat log cadence. `Duration::ZERO` disables it.
    pub sign_of_life_interval: Duration,
}

impl BridgeConfig {
    /// Config with default cadence and timeouts and the heartbeat disabled.
    pub fn new(base_url: Url, identity: ServiceIdentity) -> Self {
        Self {
            base_url,
            identity,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: rngbridge_api::DEFAULT_REQUEST_TIMEOUT,
            sign_of_life_interval: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_pads_instance_to_two_digits() {
        let id = ServiceIdentity::new(7, "Shed".into(), "RNG-1".into());
        assert_eq!(id.service_name(), "com.victronenergy.solarcharger.http_07");

        let id = ServiceIdentity::new(140, "Shed".into(), "RNG-1".into());
        assert_eq!(id.service_name(), "com.victronenergy.solarcharger.http_140");
    }
}
