// Device HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and response
// classification. Every request goes through `get_json`, which turns the
// three distinct ways a device can fail to answer (error status, empty
// body, undecodable body) into typed errors.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::StateResponse;
use crate::transport::TransportConfig;

/// Maximum number of body characters kept in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for a single RNG bridge device.
///
/// The `base_url` is the device API root, e.g. `http://192.168.1.50/api/`.
/// Endpoint names are joined onto it, so a missing trailing slash is added
/// on construction.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a new device client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a device client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// The device API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for an endpoint under the API root.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch live electrical state.
    ///
    /// `GET {base}/state`
    pub async fn get_state(&self) -> Result<StateResponse, Error> {
        let url = self.endpoint_url("state")?;
        self.get_json(url).await
    }

    /// Fetch the device's own configuration.
    ///
    /// `GET {base}/config`
    ///
    /// Returns loosely-typed JSON because the field set varies by
    /// firmware version.
    pub async fn get_config(&self) -> Result<serde_json::Value, Error> {
        let url = self.endpoint_url("config")?;
        self.get_json(url).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::NoResponse {
                url: url.to_string(),
                reason: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "received body");

        if body.trim().is_empty() {
            return Err(Error::NoResponse {
                url: url.to_string(),
                reason: "empty body".into(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| malformed(&url, &e, &body))?;

        if is_empty_json(&value) {
            return Err(Error::MalformedResponse {
                url: url.to_string(),
                message: "Converting response to JSON failed (empty document)".into(),
                body,
            });
        }

        serde_json::from_value(value).map_err(|e| malformed(&url, &e, &body))
    }
}

fn malformed(url: &Url, err: &serde_json::Error, body: &str) -> Error {
    Error::MalformedResponse {
        url: url.to_string(),
        message: format!("{err} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    }
}

/// JSON that parses but carries no data: `null`, `{}`, `[]`, `""`.
fn is_empty_json(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> DeviceClient {
        DeviceClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_url_joins_under_api_root() {
        let c = client("http://192.168.1.50/api/");
        assert_eq!(
            c.endpoint_url("state").unwrap().as_str(),
            "http://192.168.1.50/api/state"
        );
    }

    #[test]
    fn missing_trailing_slash_is_added() {
        let c = client("http://192.168.1.50/api");
        assert_eq!(c.base_url().as_str(), "http://192.168.1.50/api/");
        assert_eq!(
            c.endpoint_url("config").unwrap().as_str(),
            "http://192.168.1.50/api/config"
        );
    }

    #[test]
    fn empty_documents_are_detected() {
        assert!(is_empty_json(&serde_json::json!({})));
        assert!(is_empty_json(&serde_json::json!(null)));
        assert!(is_empty_json(&serde_json::json!([])));
        assert!(!is_empty_json(&serde_json::json!({ "p": {} })));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
