//! Background reaper
//!
//! Periodically purges recycle bin entries older than the retention window.
//! The reaper and the interactive session share the namespace through one
//! coarse mutex; each sweep holds it only for the duration of the purge.

use crate::error::ShellError;
use crate::recycle::clock::Clock;
use crate::tree::Namespace;
use parking_lot::{Mutex, RwLock};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// Namespace handle shared by the session and the reaper.
pub type SharedNamespace = Arc<Mutex<Namespace>>;

/// Reaper timing.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// How long a soft-deleted node stays restorable.
    pub retention: chrono::Duration,
    /// Delay between sweeps.
    pub poll_interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            retention: chrono::Duration::seconds(120),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Handle to the running reaper thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
pub struct Reaper {
    running: Arc<RwLock<bool>>,
    shutdown: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    /// Spawn the reaper thread.
    pub fn start(
        namespace: SharedNamespace,
        clock: Arc<dyn Clock>,
        config: ReaperConfig,
    ) -> Result<Self, ShellError> {
        let running = Arc::new(RwLock::new(true));
        let (tx, rx) = mpsc::channel();

        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("recycle-reaper".to_string())
            .spawn(move || Self::reap_loop(namespace, clock, config, thread_running, rx))
            .map_err(|e| ShellError::Worker(format!("Failed to start reaper: {}", e)))?;

        Ok(Self {
            running,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        *self.running.read() && self.handle.is_some()
    }

    /// Signal the thread and wait for it to observe the signal.
    ///
    /// A sweep already in progress finishes first. Calling this twice is fine.
    pub fn stop(&mut self) {
        *self.running.write() = false;
        if let Some(tx) = self.shutdown.take() {
            // The thread may already be gone; a closed channel also stops it.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Reaper thread panicked");
            }
        }
    }

    fn reap_loop(
        namespace: SharedNamespace,
        clock: Arc<dyn Clock>,
        config: ReaperConfig,
        running: Arc<RwLock<bool>>,
        shutdown: mpsc::Receiver<()>,
    ) {
        info!(
            retention_secs = config.retention.num_seconds(),
            poll_ms = config.poll_interval.as_millis() as u64,
            "Reaper started"
        );

        while *running.read() {
            match shutdown.recv_timeout(config.poll_interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let purged = {
                let mut namespace = namespace.lock();
                namespace.sweep_expired(clock.now(), config.retention)
            };
            if !purged.is_empty() {
                info!(count = purged.len(), names = ?purged, "Purged expired recycle bin entries");
            }
        }

        debug!("Reaper stopped");
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.stop();
    }
}
