//! Queue client contract and factory.
//!
//! [`QueueClient`] is the only network-facing boundary of the crate. Every call
//! is independently parameterized, so one client can be created up front and
//! shared by all loop iterations through an `Arc`.

use crate::error::QueueError;
use crate::message::{MessageId, ReceiptHandle, ReceivedMessage};
use crate::provider::{ProviderConfig, ProviderType, QueueConfig};
use crate::providers::{AwsSqsProvider, InMemoryProvider};
use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Operations a visibility-timeout queue must provide, bound to a single queue
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Long-poll for at most one message, waiting up to `wait` (0-20 seconds)
    async fn receive_message(&self, wait: Duration)
        -> Result<Option<ReceivedMessage>, QueueError>;

    /// Hide the delivery identified by `receipt` for `timeout` from now.
    ///
    /// Fails with [`QueueError::MessageNotFound`] when the handle is stale.
    async fn change_visibility(
        &self,
        receipt: &ReceiptHandle,
        timeout: Duration,
    ) -> Result<(), QueueError>;

    /// Remove the delivery identified by `receipt`.
    ///
    /// Returns `true` when the backend acknowledged the delete.
    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<bool, QueueError>;

    /// Enqueue a raw body, invisible for `delay` before it can be received
    async fn send_message(&self, body: &str, delay: Duration) -> Result<MessageId, QueueError>;

    /// Remove all messages. Completion is eventually consistent.
    async fn purge(&self) -> Result<(), QueueError>;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;
}

/// Factory for creating queue clients with appropriate providers
pub struct QueueClientFactory;

impl QueueClientFactory {
    /// Create queue client from configuration
    pub async fn create_client(config: &QueueConfig) -> Result<Arc<dyn QueueClient>, QueueError> {
        config.validate()?;

        let client: Arc<dyn QueueClient> = match &config.provider {
            ProviderConfig::InMemory(in_memory_config) => {
                Arc::new(InMemoryProvider::new(in_memory_config.clone()))
            }
            ProviderConfig::AwsSqs(aws_config) => Arc::new(
                AwsSqsProvider::new(aws_config.clone(), config.queue_name.clone()).await?,
            ),
        };

        info!(
            queue = %config.queue_name,
            provider = %client.provider_type(),
            "Created queue client"
        );

        Ok(client)
    }

    /// Create test client with in-memory provider
    pub fn create_test_client() -> Arc<dyn QueueClient> {
        Arc::new(InMemoryProvider::default())
    }
}
