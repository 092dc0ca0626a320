//! Bus-side adapter for store change notifications.
//!
//! Emits every property change as a `PropertiesChanged` trace event
//! carrying the service name, path, value and text.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use rngbridge_core::PropertyStore;

/// Forward store changes until the store is dropped or the task is aborted.
pub fn spawn(store: &PropertyStore, service: String) -> JoinHandle<()> {
    let mut changes = store.subscribe();

    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => trace!(
                    service = %service,
                    path = %change.path,
                    value = %change.value,
                    text = %change.text,
                    origin = ?change.origin,
                    "PropertiesChanged"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "bus adapter fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
