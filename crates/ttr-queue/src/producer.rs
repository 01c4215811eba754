//! Producer operations: push, clear and status.
//!
//! The backend has no priorities and no per-message status lookups. Requests
//! for either fail with [`WorkerError::UnsupportedFeature`] instead of being
//! silently ignored.

use crate::client::QueueClient;
use crate::codec;
use crate::error::WorkerError;
use crate::message::MessageId;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;

/// Processing budget used when a producer does not state one
pub const DEFAULT_TTR_SECONDS: u32 = 300;

/// A job to enqueue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub payload: String,
    /// Seconds a consumer keeps the message reserved while handling it
    pub ttr_seconds: u32,
    /// Seconds before the message first becomes visible
    pub delay_seconds: u32,
    /// Must be unset; `Some(0)` counts as unset, any other value is rejected
    pub priority: Option<u32>,
}

impl PushRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ttr_seconds: DEFAULT_TTR_SECONDS,
            delay_seconds: 0,
            priority: None,
        }
    }

    pub fn with_ttr(mut self, ttr_seconds: u32) -> Self {
        self.ttr_seconds = ttr_seconds;
        self
    }

    pub fn with_delay(mut self, delay_seconds: u32) -> Self {
        self.delay_seconds = delay_seconds;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Enqueues jobs on a single queue
#[derive(Clone)]
pub struct Producer {
    client: Arc<dyn QueueClient>,
}

impl Producer {
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self { client }
    }

    /// Encode the request as `{ttr};{payload}` and send it.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::UnsupportedFeature`] when a non-zero priority is given; nothing is sent
    /// - [`WorkerError::Queue`] when the send fails
    pub async fn push(&self, request: PushRequest) -> Result<MessageId, WorkerError> {
        if let Some(priority) = request.priority.filter(|&p| p != 0) {
            debug!(priority, "Rejecting push with priority");
            return Err(WorkerError::unsupported("priority"));
        }

        let body = codec::encode(request.ttr_seconds, &request.payload);
        let message_id = self
            .client
            .send_message(&body, Duration::seconds(i64::from(request.delay_seconds)))
            .await?;

        info!(
            message_id = %message_id,
            ttr_seconds = request.ttr_seconds,
            delay_seconds = request.delay_seconds,
            "Pushed job"
        );

        Ok(message_id)
    }

    /// Positional form of [`Producer::push`]
    pub async fn push_message(
        &self,
        payload: &str,
        ttr_seconds: u32,
        delay_seconds: u32,
        priority: Option<u32>,
    ) -> Result<MessageId, WorkerError> {
        self.push(PushRequest {
            payload: payload.to_string(),
            ttr_seconds,
            delay_seconds,
            priority,
        })
        .await
    }

    /// Remove every message from the queue. Completion is eventually consistent.
    pub async fn clear(&self) -> Result<(), WorkerError> {
        self.client.purge().await?;
        info!(provider = %self.client.provider_type(), "Purged queue");
        Ok(())
    }

    /// Status lookups by id are not available on this backend.
    pub async fn status(&self, message_id: &str) -> Result<(), WorkerError> {
        debug!(message_id, "Rejecting status query");
        Err(WorkerError::unsupported("status"))
    }
}
