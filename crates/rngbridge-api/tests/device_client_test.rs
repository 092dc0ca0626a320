#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `DeviceClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rngbridge_api::{DeviceClient, Error, FaultKind, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    let client = DeviceClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn state_body() -> serde_json::Value {
    json!({
        "p": { "vo": 40.0, "cu": 5.0 },
        "c": { "st": 3 },
        "b": { "to": 123_000, "ge": 4500, "vo": 26.0, "cu": 4.8 },
        "o": { "l": true },
        "l": { "cu": 1.2 }
    })
}

// ── State endpoint ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_state_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_body()))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.get_state().await.unwrap();

    assert_eq!(state.pv.voltage, 40.0);
    assert_eq!(state.pv.current, 5.0);
    assert_eq!(state.controller.state, 3);
    assert_eq!(state.battery.voltage, 26.0);
    assert_eq!(state.battery.current, 4.8);
    assert!(state.output.load);
    assert_eq!(state.load.current, 1.2);
}

#[tokio::test]
async fn test_get_state_non_json_body_is_malformed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rebooting</html>"))
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();

    assert!(
        matches!(err, Error::MalformedResponse { ref body, .. } if body.contains("rebooting")),
        "expected MalformedResponse, got: {err:?}"
    );
    assert_eq!(err.fault_kind(), Some(FaultKind::MalformedResponse));
}

#[tokio::test]
async fn test_get_state_unexpected_shape_is_malformed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "p": { "vo": 40.0 } })),
        )
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();
    assert_eq!(err.fault_kind(), Some(FaultKind::MalformedResponse));
}

#[tokio::test]
async fn test_get_state_empty_object_is_malformed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();
    assert_eq!(err.fault_kind(), Some(FaultKind::MalformedResponse));
}

#[tokio::test]
async fn test_get_state_empty_body_is_no_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();
    assert!(
        matches!(err, Error::NoResponse { ref reason, .. } if reason == "empty body"),
        "expected NoResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn test_get_state_server_error_is_no_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();

    assert_eq!(err.fault_kind(), Some(FaultKind::NoResponse));
    assert!(err.to_string().contains("/api/state"), "got: {err}");
}

#[tokio::test]
async fn test_get_state_timeout_is_network_unavailable() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    let transport = TransportConfig::with_timeout(Duration::from_millis(200));
    let client = DeviceClient::new(base_url, &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(state_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get_state().await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert_eq!(err.fault_kind(), Some(FaultKind::NetworkUnavailable));
}

#[tokio::test]
async fn test_get_state_connection_refused_is_network_unavailable() {
    // Grab a free port, then close it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let base_url = Url::parse(&format!("http://127.0.0.1:{port}/api/")).unwrap();
    let client = DeviceClient::new(base_url, &TransportConfig::default()).unwrap();

    let err = client.get_state().await.unwrap_err();
    assert_eq!(err.fault_kind(), Some(FaultKind::NetworkUnavailable));
}

// ── Config endpoint ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.4.2",
            "mqtt": { "enabled": false },
            "modbus": { "address": 255 }
        })))
        .mount(&server)
        .await;

    let config = client.get_config().await.unwrap();

    assert_eq!(config["version"], "1.4.2");
    assert_eq!(config["modbus"]["address"], 255);
}
