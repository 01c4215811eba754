//! Identifiers and the received-message type shared by every provider.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `as_str` and `Display` for string newtypes
macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

// ============================================================================
// Queue Name
// ============================================================================

/// Name of the queue a worker binds to.
///
/// Follows the SQS naming rules: up to 80 characters of ASCII letters, digits,
/// `-` and `_`, with an optional `.fifo` suffix for FIFO queues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueName(String);

string_newtype!(QueueName);

impl QueueName {
    pub const MAX_LENGTH: usize = 80;

    pub fn new(name: String) -> Result<Self, ValidationError> {
        let field = || "queue_name".to_string();

        if !(1..=Self::MAX_LENGTH).contains(&name.len()) {
            return Err(ValidationError::OutOfRange {
                field: field(),
                message: format!("length must be 1-{}, got {}", Self::MAX_LENGTH, name.len()),
            });
        }

        let stem = name.strip_suffix(".fifo").unwrap_or(&name);
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_');
        if stem.is_empty() || !stem.chars().all(allowed) {
            return Err(ValidationError::InvalidFormat {
                field: field(),
                message: format!("'{}' is not a valid SQS queue name", name),
            });
        }

        Ok(Self(name))
    }

    pub fn is_fifo(&self) -> bool {
        self.0.ends_with(".fifo")
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for QueueName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QueueName> for String {
    fn from(name: QueueName) -> Self {
        name.0
    }
}

// ============================================================================
// Message and Delivery Identifiers
// ============================================================================

/// Identifier the backend assigns to a message when it is sent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

string_newtype!(MessageId);

impl MessageId {
    /// Random identifier for backends that do not assign their own
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ValidationError::Required {
                field: "message_id".to_string(),
            }),
            id => Ok(Self(id.to_owned())),
        }
    }
}

/// Opaque token identifying one delivery of a message.
///
/// A new handle is issued on every delivery, so a handle held past its
/// visibility window is stale even when the same message is still queued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(String);

string_newtype!(ReceiptHandle);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// UTC instant at which a delivery was observed locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ============================================================================
// Received Message
// ============================================================================

/// One delivery of a message, valid for a single consumer-loop iteration
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub message_id: MessageId,
    /// Raw body, expected to be `{ttr};{payload}`
    pub body: String,
    pub receipt_handle: Option<ReceiptHandle>,
    /// Delivery attempt, starting at 1
    pub approximate_receive_count: u32,
    pub received_at: Timestamp,
}

impl ReceivedMessage {
    /// Receipt handle usable for visibility changes and deletion, if any
    pub fn usable_receipt(&self) -> Option<&ReceiptHandle> {
        self.receipt_handle.as_ref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
