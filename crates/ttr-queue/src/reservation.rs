//! Reservation protocol over a visibility-timeout queue.
//!
//! A received message moves `Visible → Received → Reserved → Deleted`. When no
//! delete happens the backend makes it visible again once the reservation
//! expires. Mutual exclusion between workers comes only from the remote
//! visibility timeout; nothing here holds a local lock.

use crate::client::QueueClient;
use crate::error::{QueueError, ValidationError};
use crate::message::ReceivedMessage;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(test)]
#[path = "reservation_tests.rs"]
mod tests;

/// Reserves and releases received messages through a shared queue client
#[derive(Clone)]
pub struct Reservation {
    client: Arc<dyn QueueClient>,
}

impl Reservation {
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self { client }
    }

    /// Hide the message from other consumers for `ttr_seconds`.
    ///
    /// Must be called right after receive and before any handler work, so the
    /// hidden period matches the producer's declared processing budget.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when the message carries no
    /// receipt handle, or the adapter error from the visibility change.
    pub async fn reserve(
        &self,
        message: &ReceivedMessage,
        ttr_seconds: u32,
    ) -> Result<(), QueueError> {
        let receipt = message
            .usable_receipt()
            .ok_or_else(|| ValidationError::Required {
                field: "receipt_handle".to_string(),
            })?;

        self.client
            .change_visibility(receipt, Duration::seconds(i64::from(ttr_seconds)))
            .await?;

        debug!(
            message_id = %message.message_id,
            ttr_seconds,
            "Reserved message"
        );
        Ok(())
    }

    /// Permanently remove a successfully handled message.
    ///
    /// Returns `false` without contacting the queue when the message has no
    /// usable receipt handle; otherwise whether the delete was acknowledged.
    pub async fn release(&self, message: &ReceivedMessage) -> Result<bool, QueueError> {
        let Some(receipt) = message.usable_receipt() else {
            warn!(
                message_id = %message.message_id,
                "Cannot release message without a receipt handle"
            );
            return Ok(false);
        };

        let acknowledged = self.client.delete_message(receipt).await?;

        debug!(
            message_id = %message.message_id,
            receipt = %receipt,
            acknowledged,
            "Released message"
        );
        Ok(acknowledged)
    }
}
