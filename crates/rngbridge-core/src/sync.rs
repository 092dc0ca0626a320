// ── Device-state synchronization ──
//
// One cycle: fetch `state`, decode and map it, write every published
// path, advance `/UpdateIndex`. Recoverable faults publish safe defaults
// and still advance the index; anything else leaves the store untouched.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rngbridge_api::{DeviceClient, FaultKind, StateResponse};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::model::{DeviceSnapshot, PropertyValue, fallback_properties};
use crate::paths;
use crate::store::PropertyStore;

/// Where the sync loop gets device state from.
///
/// Implemented by [`DeviceClient`]; tests substitute scripted sources.
pub trait StateSource: Send + Sync + 'static {
    /// Human-readable endpoint for log lines.
    fn endpoint(&self) -> String;

    /// Fetch one state document. Must be bounded by a hard timeout.
    fn fetch_state(
        &self,
    ) -> impl Future<Output = Result<StateResponse, rngbridge_api::Error>> + Send;
}

impl StateSource for DeviceClient {
    fn endpoint(&self) -> String {
        self.endpoint_url("state")
            .map_or_else(|_| self.base_url().to_string(), |u| u.to_string())
    }

    async fn fetch_state(&self) -> Result<StateResponse, rngbridge_api::Error> {
        self.get_state().await
    }
}

/// Result of a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Device values published.
    Published { update_index: u8 },
    /// Device unavailable; defaults published.
    Recovered { fault: FaultKind, update_index: u8 },
    /// Unhandled fault; nothing written.
    Aborted,
}

/// Keeps the published paths in sync with the device.
pub struct SyncLoop<S> {
    source: S,
    store: Arc<PropertyStore>,
    update_index: u8,
    last_success: watch::Sender<Option<DateTime<Utc>>>,
}

impl<S: StateSource> SyncLoop<S> {
    /// Build a sync loop over an already-registered store.
    ///
    /// Fails with `NotFound` if any published path or `/UpdateIndex` is
    /// missing, so a misassembled bridge fails at startup rather than on
    /// the first cycle.
    pub fn new(source: S, store: Arc<PropertyStore>) -> Result<Self, CoreError> {
        for path in paths::PUBLISHED.iter().chain([&paths::UPDATE_INDEX]) {
            store.get(path)?;
        }

        let update_index = store
            .get(paths::UPDATE_INDEX)?
            .as_i64()
            .and_then(|i| u8::try_from(i).ok())
            .unwrap_or(0);
        let (last_success, _) = watch::channel(None);

        Ok(Self {
            source,
            store,
            update_index,
            last_success,
        })
    }

    /// Wall-clock time of the last successful cycle.
    pub fn last_success(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_success.subscribe()
    }

    pub fn update_index(&self) -> u8 {
        self.update_index
    }

    pub fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    /// Run one fetch-map-publish cycle. Never fails; the outcome says what
    /// happened.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let result = match self.source.fetch_state().await {
            Ok(state) => self.publish_state(&state),
            Err(err) => match err.fault_kind() {
                Some(fault) => {
                    error!(
                        endpoint = %self.source.endpoint(),
                        fault = %fault,
                        error = %err,
                        "Error getting data from RNGBridge - check network or RNGBridge status. \
                         Setting power values to 0"
                    );
                    self.publish_fallback(fault)
                }
                None => Err(CoreError::from(err)),
            },
        };

        result.unwrap_or_else(|err| {
            error!(
                endpoint = %self.source.endpoint(),
                error = %err,
                error_debug = ?err,
                "unhandled error in update cycle; properties left untouched"
            );
            CycleOutcome::Aborted
        })
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn publish_state(&mut self, state: &StateResponse) -> Result<CycleOutcome, CoreError> {
        // Decode fully before writing anything.
        let snapshot = DeviceSnapshot::try_from(state)?;

        for (path, value) in snapshot.to_properties() {
            self.store.set(path, value)?;
        }

        debug!("PV Power (/Yield/Power): {}", snapshot.pv_power());
        debug!("Battery Voltage (/Dc/0/Voltage): {}", snapshot.battery_voltage);
        debug!("Battery Current (/Dc/0/Current): {}", snapshot.battery_current);

        let update_index = self.advance_index()?;
        self.last_success.send_replace(Some(Utc::now()));
        Ok(CycleOutcome::Published { update_index })
    }

    fn publish_fallback(&mut self, fault: FaultKind) -> Result<CycleOutcome, CoreError> {
        for (path, value) in fallback_properties() {
            self.store.set(path, value)?;
        }
        let update_index = self.advance_index()?;
        Ok(CycleOutcome::Recovered {
            fault,
            update_index,
        })
    }

    fn advance_index(&mut self) -> Result<u8, CoreError> {
        let next = self.update_index.wrapping_add(1);
        self.store.set(paths::UPDATE_INDEX, PropertyValue::from(next))?;
        self.update_index = next;
        Ok(next)
    }
}
