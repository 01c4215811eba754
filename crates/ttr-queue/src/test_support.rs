//! Recording queue client shared by unit tests.

use crate::client::QueueClient;
use crate::error::QueueError;
use crate::message::{MessageId, ReceiptHandle, ReceivedMessage, Timestamp};
use crate::provider::ProviderType;
use async_trait::async_trait;
use chrono::Duration;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call observed by [`MockQueueClient`], in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Receive { wait_seconds: i64 },
    ChangeVisibility { receipt: String, seconds: i64 },
    Delete { receipt: String },
    Send { body: String, delay_seconds: i64 },
    Purge,
}

/// Operation a mock can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Receive,
    ChangeVisibility,
    Delete,
    Send,
    Purge,
}

/// Mock queue client that replays scripted messages and records every call
pub struct MockQueueClient {
    messages: Mutex<VecDeque<ReceivedMessage>>,
    calls: Mutex<Vec<Call>>,
    delete_acknowledged: bool,
    fail_on: Option<FailOn>,
    sent_id: MessageId,
}

impl MockQueueClient {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delete_acknowledged: true,
            fail_on: None,
            sent_id: "mock-message-id".parse().unwrap(),
        }
    }

    /// Queue a message to be returned by the next receive
    pub fn with_message(self, body: &str, receipt: Option<&str>) -> Self {
        self.messages
            .lock()
            .unwrap()
            .push_back(received(body, receipt, 1));
        self
    }

    pub fn with_received(self, message: ReceivedMessage) -> Self {
        self.messages.lock().unwrap().push_back(message);
        self
    }

    pub fn with_delete_acknowledged(mut self, acknowledged: bool) -> Self {
        self.delete_acknowledged = acknowledged;
        self
    }

    pub fn failing_on(mut self, operation: FailOn) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Receipts passed to delete, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { receipt } => Some(receipt),
                _ => None,
            })
            .collect()
    }

    pub fn sent(&self) -> Vec<(String, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send {
                    body,
                    delay_seconds,
                } => Some((body, delay_seconds)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call, operation: FailOn) -> Result<(), QueueError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(operation) {
            return Err(QueueError::ConnectionFailed {
                message: format!("mock {:?} failure", operation),
            });
        }
        Ok(())
    }
}

/// Build a received message as a backend would deliver it
pub fn received(body: &str, receipt: Option<&str>, receive_count: u32) -> ReceivedMessage {
    ReceivedMessage {
        message_id: MessageId::new(),
        body: body.to_string(),
        receipt_handle: receipt.map(ReceiptHandle::new),
        approximate_receive_count: receive_count,
        received_at: Timestamp::now(),
    }
}

#[async_trait]
impl QueueClient for MockQueueClient {
    async fn receive_message(
        &self,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError> {
        self.record(
            Call::Receive {
                wait_seconds: wait.num_seconds(),
            },
            FailOn::Receive,
        )?;
        Ok(self.messages.lock().unwrap().pop_front())
    }

    async fn change_visibility(
        &self,
        receipt: &ReceiptHandle,
        timeout: Duration,
    ) -> Result<(), QueueError> {
        self.record(
            Call::ChangeVisibility {
                receipt: receipt.to_string(),
                seconds: timeout.num_seconds(),
            },
            FailOn::ChangeVisibility,
        )
    }

    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<bool, QueueError> {
        self.record(
            Call::Delete {
                receipt: receipt.to_string(),
            },
            FailOn::Delete,
        )?;
        Ok(self.delete_acknowledged)
    }

    async fn send_message(&self, body: &str, delay: Duration) -> Result<MessageId, QueueError> {
        self.record(
            Call::Send {
                body: body.to_string(),
                delay_seconds: delay.num_seconds(),
            },
            FailOn::Send,
        )?;
        Ok(self.sent_id.clone())
    }

    async fn purge(&self) -> Result<(), QueueError> {
        self.record(Call::Purge, FailOn::Purge)
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}
