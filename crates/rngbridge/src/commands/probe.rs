//! `rngbridge probe`: one-shot device read without starting the bridge.
//!
//! Unlike the sync loop, fetch errors are reported, not masked by
//! fallback values.

use serde::Serialize;
use tracing::warn;

use rngbridge_api::{DeviceClient, StateResponse, TransportConfig};
use rngbridge_core::{BridgeConfig, DeviceSnapshot, PropertyStore, paths, register_service};

use crate::cli::{OutputFormat, ProbeArgs};
use crate::error::CliError;
use crate::output::{self, PropertyRow};

#[derive(Serialize)]
struct ProbeReport {
    service: String,
    endpoint: String,
    /// `None` if the device's `config` endpoint did not answer.
    device_config: Option<serde_json::Value>,
    state: StateResponse,
    published: Vec<PropertyRow>,
}

pub async fn handle(args: &ProbeArgs, config: &BridgeConfig) -> Result<(), CliError> {
    let endpoint = config.base_url.to_string();
    let device_error = |source| CliError::Device {
        endpoint: endpoint.clone(),
        source,
    };

    let transport = TransportConfig::with_timeout(config.request_timeout);
    let client = DeviceClient::new(config.base_url.clone(), &transport).map_err(device_error)?;

    let device_config = match client.get_config().await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "device config endpoint unavailable");
            None
        }
    };
    let state = client.get_state().await.map_err(device_error)?;
    let snapshot = DeviceSnapshot::try_from(&state)?;

    // Render through the same formatters the bus service uses.
    let store = PropertyStore::new();
    register_service(&store, &config.identity)?;
    for (path, value) in snapshot.to_properties() {
        store.set(path, value)?;
    }
    let published = output::property_rows(&store, paths::PUBLISHED)?;

    let rendered = match args.output {
        OutputFormat::Table => {
            let config_text = match &device_config {
                Some(value) => output::render_json(value)?,
                None => "(unavailable)".into(),
            };
            format!(
                "Service:      {}\nEndpoint:     {}\nCharge state: {} (device code {})\n\n\
                 Device config:\n{}\n\n{}",
                config.identity.service_name(),
                endpoint,
                snapshot.charge_state,
                snapshot.charge_state.code(),
                config_text,
                output::render_table(&published),
            )
        }
        OutputFormat::Json => output::render_json(&ProbeReport {
            service: config.identity.service_name(),
            endpoint: endpoint.clone(),
            device_config,
            state,
            published,
        })?,
    };

    output::print_output(&rendered);
    Ok(())
}
