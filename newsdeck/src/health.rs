use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::api::ArticleService;

/// Background poller reporting reachability of the remote article service.
///
/// Probes immediately on start, then on a fixed interval. Starts optimistic
/// (`healthy = true`) until the first probe resolves. Transport errors flip
/// the flag to false but never escape the poller. `stop` tears the task
/// down so no timer outlives the monitor.
pub struct HealthMonitor {
    healthy: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn start(service: Arc<dyn ArticleService>, interval: Duration) -> Self {
        let healthy = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());

        let flag = healthy.clone();
        let stop_signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            loop {
                let ok = service.probe().await;
                if flag.swap(ok, Ordering::SeqCst) && !ok {
                    warn!("article service became unreachable");
                }
                select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_signal.notified() => break,
                }
            }
        });

        Self {
            healthy,
            shutdown,
            handle,
        }
    }

    /// Latest probe result (true until the first probe settles)
    pub fn healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Stop polling and wait for the background task to exit.
    pub async fn stop(self) {
        // notify_one stores a permit, so a probe in flight still observes
        // the shutdown on its next select instead of missing the wakeup.
        self.shutdown.notify_one();
        let _ = self.handle.await;
    }
}
