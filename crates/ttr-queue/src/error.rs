//! Error types for queue operations.

use chrono::Duration;
use thiserror::Error;

/// Failures reported by a [`QueueClient`](crate::QueueClient).
///
/// Nothing in this crate retries; callers use [`QueueError::is_transient`]
/// to decide whether restarting the consumer is worthwhile.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue '{queue_name}' does not exist")]
    QueueNotFound { queue_name: String },

    #[error("Receipt handle is unknown or no longer current: {receipt}")]
    MessageNotFound { receipt: String },

    #[error("Queue request timed out after {duration}")]
    Timeout { duration: Duration },

    #[error("Could not reach the queue: {message}")]
    ConnectionFailed { message: String },

    #[error("Queue credentials were rejected: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not permitted: {operation}")]
    PermissionDenied { operation: String },

    #[error("Message body is {size} bytes, the queue accepts at most {max_size}")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("{provider} returned {code}: {message}")]
    ProviderError {
        provider: String,
        code: String,
        message: String,
    },

    #[error(transparent)]
    SerializationError(#[from] SerializationError),

    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),

    #[error(transparent)]
    ValidationError(#[from] ValidationError),
}

impl QueueError {
    /// Whether the same call may succeed if repeated later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionFailed { .. } | Self::ProviderError { .. }
        )
    }

    /// Back-off a supervisor should wait before restarting the consumer
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Timeout { .. } => Some(Duration::seconds(1)),
            Self::ConnectionFailed { .. } | Self::ProviderError { .. } => Some(Duration::seconds(5)),
            _ => None,
        }
    }
}

/// Errors while decoding a `{ttr};{payload}` message body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Message body has no ';' separator")]
    MissingSeparator,

    #[error("Invalid time-to-run '{value}': expected a non-negative integer")]
    InvalidTtr { value: String },
}

/// Provider responses that could not be understood
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Unreadable provider response: {message}")]
    InvalidXml { message: String },

    #[error("Provider response has no <{element}> element")]
    MissingElement { element: String },
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Queue configuration is invalid: {message}")]
    Invalid { message: String },

    #[error("Queue configuration needs '{key}'")]
    Missing { key: String },
}

/// Argument checks made before any request is sent
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is malformed: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("{field} {message}")]
    OutOfRange { field: String, message: String },
}

/// Errors surfaced by the producer and consumer APIs.
///
/// Malformed bodies are not among them: the consumer counts those as failed
/// jobs and keeps going.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl WorkerError {
    /// Create an error for a capability the backend does not provide
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
