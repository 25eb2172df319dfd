//! Graceful shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single stop notice to the HTTP server and any other task
/// that subscribed before [`Shutdown::trigger`] was called.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify all subscribers. Calling it again, or with nobody listening,
    /// is harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once the notice arrives or the coordinator is gone.
pub async fn notified(mut rx: broadcast::Receiver<()>) {
    // Lagged cannot happen with a single message; Closed means stop too.
    let _ = rx.recv().await;
}
