//! In-memory queue provider implementation for testing and development.
//!
//! This module provides a single-queue implementation of the visibility
//! timeout model that:
//! - Hides received messages for a visibility timeout and redelivers on expiry
//! - Issues a fresh receipt handle and bumps the receive count per delivery
//! - Supports delayed delivery and long polling
//! - Provides thread-safe concurrent access
//!
//! Time is measured with [`tokio::time::Instant`], so tests running with a
//! paused clock can advance past visibility windows deterministically.

use crate::client::QueueClient;
use crate::error::{QueueError, ValidationError};
use crate::message::{MessageId, ReceiptHandle, ReceivedMessage, Timestamp};
use crate::provider::{InMemoryConfig, ProviderType};
use async_trait::async_trait;
use chrono::Duration;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// Longest long-poll wait honoured by the provider, matching SQS
const MAX_WAIT_SECONDS: i64 = 20;

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// A message stored in the queue with delivery metadata
struct StoredMessage {
    message_id: MessageId,
    body: String,
    receive_count: u32,
    visible_at: Instant,
    /// Handle of the most recent delivery; older handles are stale
    receipt_handle: Option<String>,
}

impl StoredMessage {
    fn is_visible(&self, now: Instant) -> bool {
        now >= self.visible_at
    }
}

/// Outcome of a single non-blocking delivery attempt
enum Delivery {
    Delivered(ReceivedMessage),
    Empty { next_visible: Option<Instant> },
}

#[derive(Default)]
struct QueueState {
    /// Messages in send order, including hidden ones
    messages: Vec<StoredMessage>,
}

// ============================================================================
// InMemoryProvider
// ============================================================================

/// In-memory queue provider implementation
pub struct InMemoryProvider {
    state: Mutex<QueueState>,
    arrivals: Notify,
    config: InMemoryConfig,
}

impl InMemoryProvider {
    /// Create new in-memory provider with configuration
    pub fn new(config: InMemoryConfig) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            arrivals: Notify::new(),
            config,
        }
    }

    /// Number of stored messages, visible or hidden
    pub fn message_count(&self) -> usize {
        self.state().map(|s| s.messages.len()).unwrap_or(0)
    }

    fn state(&self) -> Result<MutexGuard<'_, QueueState>, QueueError> {
        self.state.lock().map_err(|_| QueueError::ProviderError {
            provider: ProviderType::InMemory.to_string(),
            code: "LockPoisoned".to_string(),
            message: "queue state lock poisoned".to_string(),
        })
    }

    /// Deliver the oldest visible message, or report when the next hidden one reappears
    fn try_deliver(&self, now: Instant) -> Result<Delivery, QueueError> {
        let mut state = self.state()?;
        let visibility =
            std::time::Duration::from_secs(u64::from(self.config.default_visibility_timeout_seconds));

        if let Some(stored) = state.messages.iter_mut().find(|m| m.is_visible(now)) {
            let handle = uuid::Uuid::new_v4().to_string();
            stored.receive_count += 1;
            stored.visible_at = now + visibility;
            stored.receipt_handle = Some(handle.clone());

            return Ok(Delivery::Delivered(ReceivedMessage {
                message_id: stored.message_id.clone(),
                body: stored.body.clone(),
                receipt_handle: Some(ReceiptHandle::new(handle)),
                approximate_receive_count: stored.receive_count,
                received_at: Timestamp::now(),
            }));
        }

        Ok(Delivery::Empty {
            next_visible: state.messages.iter().map(|m| m.visible_at).min(),
        })
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

/// Convert a non-negative duration bounded by `max_seconds`
fn bounded(
    duration: Duration,
    max_seconds: u32,
    field: &str,
) -> Result<std::time::Duration, QueueError> {
    let seconds = duration.num_seconds();
    if seconds < 0 || seconds > i64::from(max_seconds) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            message: format!("must be 0-{} seconds, got {}", max_seconds, seconds),
        }
        .into());
    }
    Ok(std::time::Duration::from_secs(seconds as u64))
}

#[async_trait]
impl QueueClient for InMemoryProvider {
    async fn receive_message(
        &self,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError> {
        let wait_seconds = wait.num_seconds().clamp(0, MAX_WAIT_SECONDS) as u64;
        let deadline = Instant::now() + std::time::Duration::from_secs(wait_seconds);

        loop {
            // Register for wake-ups before inspecting state so a concurrent send is not missed
            let arrival = self.arrivals.notified();
            tokio::pin!(arrival);
            arrival.as_mut().enable();

            let now = Instant::now();
            let next_visible = match self.try_deliver(now)? {
                Delivery::Delivered(message) => {
                    debug!(
                        message_id = %message.message_id,
                        receive_count = message.approximate_receive_count,
                        "Delivered in-memory message"
                    );
                    return Ok(Some(message));
                }
                Delivery::Empty { next_visible } => next_visible,
            };

            if now >= deadline {
                if wait_seconds == 0 {
                    // A zero-wait poll never suspends otherwise, starving other tasks
                    // when a continuous consumer spins on an empty queue
                    tokio::task::yield_now().await;
                }
                return Ok(None);
            }

            let wake_at = next_visible.map_or(deadline, |at| at.min(deadline));
            tokio::select! {
                _ = &mut arrival => {}
                _ = tokio::time::sleep_until(wake_at) => {}
            }
        }
    }

    async fn change_visibility(
        &self,
        receipt: &ReceiptHandle,
        timeout: Duration,
    ) -> Result<(), QueueError> {
        let timeout = bounded(
            timeout,
            ProviderType::InMemory.max_visibility_timeout_seconds(),
            "visibility_timeout",
        )?;
        let now = Instant::now();

        let mut state = self.state()?;
        let stored = state
            .messages
            .iter_mut()
            .find(|m| m.receipt_handle.as_deref() == Some(receipt.as_str()) && !m.is_visible(now))
            .ok_or_else(|| QueueError::MessageNotFound {
                receipt: receipt.to_string(),
            })?;

        stored.visible_at = now + timeout;
        drop(state);

        if timeout.is_zero() {
            self.arrivals.notify_waiters();
        }
        Ok(())
    }

    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<bool, QueueError> {
        let mut state = self.state()?;
        let before = state.messages.len();
        state
            .messages
            .retain(|m| m.receipt_handle.as_deref() != Some(receipt.as_str()));

        // Stale handles are a no-op
        Ok(state.messages.len() < before)
    }

    async fn send_message(&self, body: &str, delay: Duration) -> Result<MessageId, QueueError> {
        let max_size = ProviderType::InMemory.max_message_size();
        if body.len() > max_size {
            return Err(QueueError::MessageTooLarge {
                size: body.len(),
                max_size,
            });
        }
        let delay = bounded(delay, ProviderType::InMemory.max_delay_seconds(), "delay")?;

        let message_id = MessageId::new();
        self.state()?.messages.push(StoredMessage {
            message_id: message_id.clone(),
            body: body.to_string(),
            receive_count: 0,
            visible_at: Instant::now() + delay,
            receipt_handle: None,
        });
        self.arrivals.notify_waiters();

        Ok(message_id)
    }

    async fn purge(&self) -> Result<(), QueueError> {
        self.state()?.messages.clear();
        Ok(())
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}
