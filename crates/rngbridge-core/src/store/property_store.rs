// ── Bus property store ──
//
// Concurrent table of named properties with push-based change
// notification. Internal writers (the sync loop) and external bus clients
// go through the same per-property atomic swap; last write wins.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{broadcast, watch};
use tracing::debug;

use super::format::Formatter;
use super::property::Property;
use crate::error::CoreError;
use crate::model::PropertyValue;

const CHANGE_CHANNEL_SIZE: usize = 256;

/// Who wrote a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// The bridge itself (startup registration or a sync cycle).
    Internal,
    /// A bus client.
    External,
}

/// A single property change, as broadcast to bus subscribers.
#[derive(Debug, Clone)]
pub struct PropertyChange {
    pub path: String,
    pub value: Arc<PropertyValue>,
    pub text: String,
    pub origin: ChangeOrigin,
}

/// In-memory table of bus properties.
///
/// Reads are wait-free; writes take a per-shard lock inside `DashMap` only
/// long enough to clone the property handle, then swap the value
/// atomically. Every write is broadcast to subscribers and bumps a version
/// counter.
pub struct PropertyStore {
    properties: DashMap<String, Arc<Property>>,
    changes: broadcast::Sender<PropertyChange>,
    version: watch::Sender<u64>,
}

impl PropertyStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_SIZE);
        let (version, _) = watch::channel(0u64);

        Self {
            properties: DashMap::new(),
            changes,
            version,
        }
    }

    /// Register a path once at startup.
    pub fn register(
        &self,
        path: impl Into<String>,
        initial: impl Into<PropertyValue>,
        formatter: Formatter,
        writable: bool,
    ) -> Result<(), CoreError> {
        let path = path.into();
        match self.properties.entry(path.clone()) {
            Entry::Occupied(_) => Err(CoreError::DuplicatePath { path }),
            Entry::Vacant(slot) => {
                let initial = initial.into();
                debug!(path = %path, value = %initial, "registered property");
                slot.insert(Arc::new(Property::new(path, initial, formatter, writable)));
                Ok(())
            }
        }
    }

    /// Current value of a registered path.
    pub fn get(&self, path: &str) -> Result<Arc<PropertyValue>, CoreError> {
        Ok(self.lookup(path)?.value())
    }

    /// Current value rendered through the path's formatter.
    pub fn text(&self, path: &str) -> Result<String, CoreError> {
        Ok(self.lookup(path)?.text())
    }

    /// Overwrite a value from inside the bridge.
    pub fn set(&self, path: &str, value: impl Into<PropertyValue>) -> Result<(), CoreError> {
        let property = self.lookup(path)?;
        self.apply(&property, value.into(), ChangeOrigin::Internal);
        Ok(())
    }

    /// Accept a write from a bus client.
    ///
    /// No validation or type check: any value is taken as-is for a writable
    /// path. The next sync cycle overwrites device-backed paths anyway.
    pub fn write_external(
        &self,
        path: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), CoreError> {
        let property = self.lookup(path)?;
        if !property.is_writable() {
            return Err(CoreError::ReadOnly { path: path.into() });
        }
        let value = value.into();
        debug!("someone else updated {} to {}", path, value);
        self.apply(&property, value, ChangeOrigin::External);
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.properties.contains_key(path)
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.properties.iter().map(|r| r.key().clone()).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Subscribe to individual property changes.
    pub fn subscribe(&self) -> broadcast::Receiver<PropertyChange> {
        self.changes.subscribe()
    }

    /// Current version counter (bumped on every write).
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Read-only view for components that must not write.
    pub fn reader(self: &Arc<Self>) -> PropertyReader {
        PropertyReader {
            store: Arc::clone(self),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn lookup(&self, path: &str) -> Result<Arc<Property>, CoreError> {
        self.properties
            .get(path)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| CoreError::NotFound { path: path.into() })
    }

    fn apply(&self, property: &Property, value: PropertyValue, origin: ChangeOrigin) {
        let value = property.replace(value);
        self.version.send_modify(|v| *v += 1);

        // Formatting is only worth it when someone is listening.
        if self.changes.receiver_count() > 0 {
            let _ = self.changes.send(PropertyChange {
                path: property.path().to_owned(),
                text: property.text(),
                value,
                origin,
            });
        }
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle onto a [`PropertyStore`].
#[derive(Clone)]
pub struct PropertyReader {
    store: Arc<PropertyStore>,
}

impl PropertyReader {
    pub fn get(&self, path: &str) -> Result<Arc<PropertyValue>, CoreError> {
        self.store.get(path)
    }

    pub fn text(&self, path: &str) -> Result<String, CoreError> {
        self.store.text(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::format;

    fn store_with(path: &str, initial: impl Into<PropertyValue>) -> PropertyStore {
        let store = PropertyStore::new();
        store.register(path, initial, format::volts, true).unwrap();
        store
    }

    #[test]
    fn register_then_get() {
        let store = store_with("/Pv/V", 0.0);
        assert_eq!(*store.get("/Pv/V").unwrap(), PropertyValue::Float(0.0));
        assert_eq!(store.text("/Pv/V").unwrap(), "0.0 V");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let store = store_with("/Pv/V", 0.0);
        let err = store
            .register("/Pv/V", 1.0, format::volts, true)
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicatePath { ref path } if path == "/Pv/V"));
        // Original value untouched.
        assert_eq!(*store.get("/Pv/V").unwrap(), PropertyValue::Float(0.0));
    }

    #[test]
    fn unknown_path_is_not_found() {
        let store = PropertyStore::new();
        assert!(matches!(
            store.get("/Nope"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.set("/Nope", 1.0),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn set_overwrites_and_bumps_version() {
        let store = store_with("/Pv/V", 0.0);
        let before = store.version();
        store.set("/Pv/V", 40.0).unwrap();
        assert_eq!(*store.get("/Pv/V").unwrap(), PropertyValue::Float(40.0));
        assert_eq!(store.version(), before + 1);
    }

    #[test]
    fn external_write_accepts_any_type() {
        let store = store_with("/Pv/V", 0.0);
        store.write_external("/Pv/V", "garbage").unwrap();
        assert_eq!(*store.get("/Pv/V").unwrap(), PropertyValue::from("garbage"));
        // The formatter still renders it.
        assert_eq!(store.text("/Pv/V").unwrap(), "garbage");
    }

    #[test]
    fn external_write_to_read_only_path_is_rejected() {
        let store = PropertyStore::new();
        store
            .register("/Serial", "RNG-1", format::plain, false)
            .unwrap();
        assert!(matches!(
            store.write_external("/Serial", "x"),
            Err(CoreError::ReadOnly { .. })
        ));
        // Internal writes are still allowed.
        store.set("/Serial", "RNG-2").unwrap();
    }

    #[tokio::test]
    async fn subscribers_see_changes_with_origin() {
        let store = store_with("/Pv/V", 0.0);
        let mut rx = store.subscribe();

        store.set("/Pv/V", 12.5).unwrap();
        store.write_external("/Pv/V", 99_i64).unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.path, "/Pv/V");
        assert_eq!(first.text, "12.5 V");
        assert_eq!(first.origin, ChangeOrigin::Internal);

        let second = rx.recv().await.unwrap();
        assert_eq!(*second.value, PropertyValue::Int(99));
        assert_eq!(second.origin, ChangeOrigin::External);
    }

    #[test]
    fn concurrent_writers_never_tear() {
        let store = Arc::new(store_with("/Pv/V", 0.0));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..500_i64 {
                        if i % 2 == 0 {
                            store.set("/Pv/V", n).unwrap();
                        } else {
                            store.write_external("/Pv/V", n).unwrap();
                        }
                        let v = store.get("/Pv/V").unwrap();
                        assert!(matches!(*v, PropertyValue::Int(0..500)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn reader_sees_writes() {
        let store = Arc::new(store_with("/Yield/Power", 0.0));
        let reader = store.reader();
        store.set("/Yield/Power", 200.0).unwrap();
        assert_eq!(*reader.get("/Yield/Power").unwrap(), PropertyValue::Float(200.0));
    }
}
