//! Notification delivery queue
//!
//! The cycle driver and the control surface hand messages to a single
//! delivery task instead of awaiting the sink themselves. Messages reach
//! the sink in the order they were queued, and every attempt is bounded by
//! [`DELIVERY_TIMEOUT`]. A stalled chat only delays later notifications.

use std::sync::Arc;
use std::time::Duration;

use depthwatch_ports::{DeliveryError, NotificationSink};
use tokio::sync::{mpsc, oneshot};

/// Upper bound for a single `notify` call
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Messages waiting for the sink before new ones are dropped
pub const DELIVERY_CAPACITY: usize = 1024;

enum Delivery {
    Message(String),
    Flush(oneshot::Sender<()>),
}

/// Sending half of the delivery queue
#[derive(Clone)]
pub(crate) struct Notifier {
    tx: mpsc::Sender<Delivery>,
}

impl Notifier {
    /// Spawn the delivery task on the current Tokio runtime
    ///
    /// The task exits once every `Notifier` clone is dropped.
    pub(crate) fn spawn(sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(DELIVERY_CAPACITY);
        tokio::spawn(deliver_all(sink, rx, timeout));
        Self { tx }
    }

    /// Queue a message without waiting for the sink
    pub(crate) fn send(&self, message: impl Into<String>) {
        match self.tx.try_send(Delivery::Message(message.into())) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Delivery queue full, dropping notification");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::warn!("Delivery task stopped, dropping notification");
            }
        }
    }

    /// Wait until every message queued so far was delivered or given up on
    pub(crate) async fn flush(&self) {
        let (done, delivered) = oneshot::channel();
        if self.tx.send(Delivery::Flush(done)).await.is_ok() {
            let _ = delivered.await;
        }
    }
}

async fn deliver_all(
    sink: Arc<dyn NotificationSink>,
    mut rx: mpsc::Receiver<Delivery>,
    timeout: Duration,
) {
    while let Some(delivery) = rx.recv().await {
        match delivery {
            Delivery::Message(message) => {
                if let Err(e) = deliver(sink.as_ref(), &message, timeout).await {
                    log::warn!("Failed to deliver notification: {}", e);
                }
            }
            Delivery::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    log::debug!("Delivery queue closed");
}

async fn deliver(
    sink: &dyn NotificationSink,
    message: &str,
    timeout: Duration,
) -> Result<(), DeliveryError> {
    tokio::time::timeout(timeout, sink.notify(message))
        .await
        .unwrap_or(Err(DeliveryError::Timeout))
}
