use async_trait::async_trait;

use crate::error::DeliveryError;

/// Port for delivering human-readable alert strings (chat, log, ...)
///
/// Callers log delivery failures and carry on; a failing sink never
/// halts detection.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), DeliveryError>;
}
