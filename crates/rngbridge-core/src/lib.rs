//! Synchronization core between `rngbridge-api` and the property bus.
//!
//! This crate owns the property store, the device-to-bus mapping and the
//! timer-driven lifecycle of one bridged solar charger:
//!
//! - **[`Bridge`]**: scheduler facade. [`Bridge::new`] registers the bus
//!   service, [`Bridge::start`] spawns the sync and sign-of-life timers,
//!   [`Bridge::shutdown`] cancels and joins them.
//!
//! - **[`PropertyStore`]**: concurrent table of named properties
//!   (`DashMap` + `ArcSwap`), each with a formatter. Every write is
//!   broadcast to subscribers; internal and external writers race on a
//!   last-write-wins basis.
//!
//! - **[`SyncLoop`]**: one fetch-map-publish cycle per tick. Recoverable
//!   device faults publish zero/off defaults; unhandled faults leave the
//!   store untouched. `/UpdateIndex` advances on every completed cycle.
//!
//! - **[`HeartbeatReporter`]**: read-only periodic liveness log.
//!
//! - **Domain model** ([`model`]): [`DeviceSnapshot`], the
//!   [`ChargeState`] to [`PublishedState`] table and [`PropertyValue`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod model;
pub mod paths;
pub mod service;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::Bridge;
pub use config::{BridgeConfig, DEFAULT_POLL_INTERVAL, SERVICE_NAME_PREFIX, ServiceIdentity};
pub use error::CoreError;
pub use heartbeat::{Heartbeat, HeartbeatReporter};
pub use model::{
    ChargeState, DeviceSnapshot, PropertyValue, PublishedState, ValueKind, fallback_properties,
};
pub use service::register_service;
pub use store::{ChangeOrigin, PropertyChange, PropertyReader, PropertyStore};
pub use sync::{CycleOutcome, StateSource, SyncLoop};

// The device client is part of the public surface of `Bridge<DeviceClient>`.
pub use rngbridge_api::{DeviceClient, FaultKind};
