// ── Bridge scheduler ──
//
// Owns the property store, the sync loop and the two timer tasks. The
// sync timer is min-interval: the next delay starts only after the
// previous cycle has returned, so cycles never overlap. The heartbeat
// timer is independent and fixed-rate.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rngbridge_api::{DeviceClient, TransportConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::CoreError;
use crate::heartbeat::HeartbeatReporter;
use crate::service::register_service;
use crate::store::PropertyStore;
use crate::sync::{CycleOutcome, StateSource, SyncLoop};

/// The running bridge: one device, one bus service.
///
/// Lifecycle: [`new`](Self::new) registers every property, then
/// [`start`](Self::start) spawns the timers and
/// [`shutdown`](Self::shutdown) cancels and joins them.
pub struct Bridge<S> {
    config: BridgeConfig,
    store: Arc<PropertyStore>,
    last_success: watch::Receiver<Option<DateTime<Utc>>>,
    /// Number of sign-of-life reports emitted so far.
    heartbeats: Arc<watch::Sender<u64>>,
    /// `None` once the sync loop has moved into its task.
    sync: Option<SyncLoop<S>>,
    cancel: CancellationToken,
    task_handles: Vec<JoinHandle<()>>,
}

impl Bridge<DeviceClient> {
    /// Build a bridge that polls the device at `config.base_url`.
    pub fn connect(config: BridgeConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.request_timeout);
        let client = DeviceClient::new(config.base_url.clone(), &transport)?;
        Self::new(config, client)
    }
}

impl<S: StateSource> Bridge<S> {
    /// Register the bus service and prepare the sync loop. Does NOT start
    /// any timers.
    pub fn new(config: BridgeConfig, source: S) -> Result<Self, CoreError> {
        let store = Arc::new(PropertyStore::new());
        register_service(&store, &config.identity)?;

        let sync = SyncLoop::new(source, Arc::clone(&store))?;
        let last_success = sync.last_success();

        info!(
            service = %config.identity.service_name(),
            endpoint = %config.base_url,
            "registered bus service"
        );

        Ok(Self {
            config,
            store,
            last_success,
            heartbeats: Arc::new(watch::channel(0).0),
            sync: Some(sync),
            cancel: CancellationToken::new(),
            task_handles: Vec::new(),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Access the underlying property store.
    pub fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    pub fn service_name(&self) -> String {
        self.config.identity.service_name()
    }

    /// Wall-clock time of the last successful sync cycle.
    pub fn last_success(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_success.clone()
    }

    /// Count of sign-of-life reports emitted since [`start`](Self::start).
    pub fn heartbeats(&self) -> watch::Receiver<u64> {
        self.heartbeats.subscribe()
    }

    /// Whether the timer tasks have been spawned.
    pub fn is_running(&self) -> bool {
        self.sync.is_none()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run a single sync cycle in the foreground. Only valid before
    /// [`start`](Self::start).
    pub async fn run_once(&mut self) -> Result<CycleOutcome, CoreError> {
        let sync = self.sync.as_mut().ok_or(CoreError::AlreadyStarted)?;
        Ok(sync.run_cycle().await)
    }

    /// Spawn the sync timer and, unless disabled, the heartbeat timer.
    ///
    /// The first sync cycle runs immediately.
    pub fn start(&mut self) -> Result<(), CoreError> {
        let sync = self.sync.take().ok_or(CoreError::AlreadyStarted)?;

        let period = self.config.poll_interval;
        self.task_handles
            .push(tokio::spawn(sync_task(sync, period, self.cancel.clone())));

        let beat = self.config.sign_of_life_interval;
        if beat.is_zero() {
            debug!("sign-of-life log disabled");
        } else {
            let reporter = HeartbeatReporter::new(self.store.reader(), self.last_success());
            self.task_handles.push(tokio::spawn(heartbeat_task(
                reporter,
                Arc::clone(&self.heartbeats),
                beat,
                self.cancel.clone(),
            )));
        }

        info!(
            poll_interval = ?period,
            sign_of_life = ?beat,
            "bridge started"
        );
        Ok(())
    }

    /// Stop both timers and wait for them to exit. An in-flight cycle is
    /// allowed to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for handle in self.task_handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "bridge task ended abnormally");
            }
        }
        info!("bridge stopped");
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn sync_task<S: StateSource>(
    mut sync: SyncLoop<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    loop {
        let outcome = sync.run_cycle().await;
        debug!(?outcome, "sync cycle finished");

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(period) => {}
        }
    }
}

async fn heartbeat_task(
    reporter: HeartbeatReporter,
    beats: Arc<watch::Sender<u64>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                reporter.report();
                beats.send_modify(|n| *n += 1);
            }
        }
    }
}
