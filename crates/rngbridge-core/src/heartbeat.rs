// ── Sign-of-life reporter ──
//
// Periodic liveness log for operators tailing the bridge's log file.
// Read-only: holds a `PropertyReader`, never the store itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::model::PropertyValue;
use crate::paths;
use crate::store::PropertyReader;

/// What one heartbeat reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Heartbeat {
    pub last_success: Option<DateTime<Utc>>,
    pub yield_power: Option<Arc<PropertyValue>>,
}

/// Logs the last successful update time and the published PV power.
#[derive(Clone)]
pub struct HeartbeatReporter {
    reader: PropertyReader,
    last_success: watch::Receiver<Option<DateTime<Utc>>>,
}

impl HeartbeatReporter {
    pub fn new(
        reader: PropertyReader,
        last_success: watch::Receiver<Option<DateTime<Utc>>>,
    ) -> Self {
        Self {
            reader,
            last_success,
        }
    }

    /// Current heartbeat values. Missing properties read as `None`.
    pub fn snapshot(&self) -> Heartbeat {
        Heartbeat {
            last_success: *self.last_success.borrow(),
            yield_power: self.reader.get(paths::YIELD_POWER).ok(),
        }
    }

    /// Emit one sign-of-life block at `info`.
    pub fn report(&self) -> Heartbeat {
        let beat = self.snapshot();

        let last = beat
            .last_success
            .map_or_else(|| "never".to_owned(), |t| t.to_rfc3339());
        let power = beat
            .yield_power
            .as_deref()
            .map_or_else(|| "unavailable".to_owned(), ToString::to_string);

        info!("--- Start: sign of life ---");
        info!("Last update: {last}");
        info!("Last '{}': {power}", paths::YIELD_POWER);
        info!("--- End: sign of life ---");

        beat
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{PropertyStore, format};

    #[test]
    fn snapshot_reads_power_and_last_success() {
        let store = Arc::new(PropertyStore::new());
        store
            .register(paths::YIELD_POWER, 0.0, format::watts, true)
            .unwrap();
        let (tx, rx) = watch::channel(None);
        let reporter = HeartbeatReporter::new(store.reader(), rx);

        let beat = reporter.report();
        assert!(beat.last_success.is_none());
        assert_eq!(*beat.yield_power.unwrap(), PropertyValue::Float(0.0));

        let now = Utc::now();
        tx.send(Some(now)).unwrap();
        store.set(paths::YIELD_POWER, 200.0).unwrap();

        let beat = reporter.snapshot();
        assert_eq!(beat.last_success, Some(now));
        assert_eq!(*beat.yield_power.unwrap(), PropertyValue::Float(200.0));
    }

    #[test]
    fn missing_power_path_does_not_fail() {
        let store = Arc::new(PropertyStore::new());
        let (_tx, rx) = watch::channel(None);
        let beat = HeartbeatReporter::new(store.reader(), rx).report();
        assert!(beat.yield_power.is_none());
    }
}
