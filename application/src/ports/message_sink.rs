//! Broadcast port
//!
//! Newly appended messages are delivered to every registered sink
//! (typically a live-update channel to clients). Sink failures are logged
//! and swallowed; they never affect ledger state or pipeline progress.

use async_trait::async_trait;
use roundtable_domain::Message;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

/// Errors a subscriber may report
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A broadcast subscriber
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Called for every message appended to any session ledger
    async fn deliver(&self, message: &Message) -> Result<(), SinkError>;
}

/// Fan-out over the registered sinks
#[derive(Default)]
pub struct Broadcaster {
    sinks: RwLock<Vec<Arc<dyn MessageSink>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub async fn subscribe(&self, sink: Arc<dyn MessageSink>) {
        self.sinks.write().await.push(sink);
    }

    /// Deliver a message to every sink, best effort.
    ///
    /// A failing sink is logged and skipped; delivery continues with the
    /// remaining sinks.
    pub async fn publish(&self, message: &Message) {
        let sinks = self.sinks.read().await.clone();
        for sink in sinks {
            if let Err(e) = sink.deliver(message).await {
                warn!("broadcast subscriber failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{MessageKind, Recipient, Sender};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        delivered: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MessageSink for CountingSink {
        async fn deliver(&self, _message: &Message) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Delivery("boom".to_string()));
            }
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_stop_delivery() {
        let broadcaster = Broadcaster::new();
        let failing = Arc::new(CountingSink {
            delivered: AtomicUsize::new(0),
            fail: true,
        });
        let healthy = Arc::new(CountingSink {
            delivered: AtomicUsize::new(0),
            fail: false,
        });
        broadcaster.subscribe(failing.clone()).await;
        broadcaster.subscribe(healthy.clone()).await;

        let msg = Message::new("s1", Sender::User, Recipient::All, MessageKind::Question, "hi");
        broadcaster.publish(&msg).await;

        assert_eq!(healthy.delivered.load(Ordering::SeqCst), 1);
    }
}
