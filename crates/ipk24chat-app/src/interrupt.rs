//! Interrupt bridge.
//!
//! Turns an asynchronously delivered interrupt into a token the event loop can
//! wait on alongside its other sources. The notifying side does a single
//! non-blocking `try_send` and nothing else, so it is safe to call from any
//! context.

use tokio::sync::mpsc;

/// Read end of the interrupt channel, owned by the event loop.
///
/// Keeps a sender of its own so [`InterruptBridge::recv`] never observes a
/// closed channel; an idle bridge simply never becomes ready.
#[derive(Debug)]
pub struct InterruptBridge {
    rx: mpsc::Receiver<()>,
    tx: mpsc::Sender<()>,
}

/// Write end of the interrupt channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InterruptNotifier {
    tx: mpsc::Sender<()>,
}

impl InterruptBridge {
    /// Create a bridge with room for one pending token.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { rx, tx }
    }

    /// Handle for delivering interrupts into this bridge.
    pub fn notifier(&self) -> InterruptNotifier {
        InterruptNotifier { tx: self.tx.clone() }
    }

    /// Wait for the next interrupt token.
    pub async fn recv(&mut self) {
        // `self.tx` keeps the channel open, so `None` cannot happen.
        let _ = self.rx.recv().await;
    }
}

impl Default for InterruptBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptNotifier {
    /// Post one interrupt token. Never blocks.
    ///
    /// Repeated interrupts before the loop wakes collapse into one.
    pub fn notify(&self) {
        if self.tx.try_send(()).is_err() {
            tracing::debug!("interrupt already pending");
        }
    }
}

/// Forward every Ctrl-C delivered to the process into `notifier`.
///
/// Runs on a spawned task until the signal handler cannot be installed.
pub fn forward_ctrl_c(notifier: InterruptNotifier) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => notifier.notify(),
                Err(err) => {
                    tracing::warn!(%err, "failed to listen for Ctrl-C");
                    break;
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn notify_wakes_receiver() {
        let mut bridge = InterruptBridge::new();
        bridge.notifier().notify();

        timeout(Duration::from_secs(1), bridge.recv()).await.expect("token should be ready");
    }

    #[tokio::test]
    async fn repeated_notifies_collapse() {
        let mut bridge = InterruptBridge::new();
        let notifier = bridge.notifier();
        notifier.notify();
        notifier.notify();
        notifier.notify();

        timeout(Duration::from_secs(1), bridge.recv()).await.expect("first token");
        assert!(timeout(Duration::from_millis(50), bridge.recv()).await.is_err());
    }

    #[tokio::test]
    async fn idle_bridge_stays_pending_after_notifiers_drop() {
        let mut bridge = InterruptBridge::new();
        drop(bridge.notifier());

        assert!(timeout(Duration::from_millis(50), bridge.recv()).await.is_err());
    }
}
