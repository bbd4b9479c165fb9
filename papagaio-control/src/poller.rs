//! Periodic daemon status feed for tray-style presentations.

use std::time::Duration;

use papagaio_daemon::{DaemonController, DaemonStatus};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Background task publishing [`DaemonStatus`] changes on a watch channel.
///
/// The channel holds `None` until the first query completes. Queries run on
/// the blocking pool; ticks that fall due while one is still running are
/// skipped. Dropping the poller aborts the task.
#[derive(Debug)]
pub struct StatusPoller {
    status: watch::Receiver<Option<DaemonStatus>>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Start polling. Must be called from within a tokio runtime.
    pub fn spawn(controller: DaemonController, interval: Duration) -> Self {
        let (status_tx, status_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(poll_task(controller, interval, status_tx, shutdown_rx));
        Self {
            status: status_rx,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DaemonStatus>> {
        self.status.clone()
    }

    pub fn latest(&self) -> Option<DaemonStatus> {
        *self.status.borrow()
    }

    /// Stop polling and wait for the task to exit. An in-flight query is
    /// abandoned, not awaited.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "status poller task failed");
            }
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn poll_task(
    controller: DaemonController,
    interval: Duration,
    status_tx: watch::Sender<Option<DaemonStatus>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {
                let ctl = controller.clone();
                let query = tokio::task::spawn_blocking(move || ctl.status());
                let status = tokio::select! {
                    _ = &mut shutdown_rx => break,
                    joined = query => match joined {
                        Ok(status) => status,
                        Err(err) => {
                            tracing::warn!(error = %err, "status query panicked");
                            continue;
                        }
                    },
                };
                status_tx.send_if_modified(|current| {
                    if *current == Some(status) {
                        return false;
                    }
                    tracing::info!(%status, "daemon status changed");
                    *current = Some(status);
                    true
                });
            }
        }
    }
    tracing::debug!("status poller stopped");
}
