//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fans a single shutdown event out to the HTTP server and the refresh task.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver handed to each long-running task.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown event. Tasks that already exited are ignored.
    pub fn trigger(&self) {
        let receivers = self.tx.receiver_count();
        if self.tx.send(()).is_ok() {
            tracing::info!(receivers, "Shutdown triggered");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut refresher = server.resubscribe();

        shutdown.trigger();

        assert!(server.recv().await.is_ok());
        assert!(refresher.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers_is_noop() {
        Shutdown::new().trigger();
    }
}
