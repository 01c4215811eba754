//! # TTR Queue
//!
//! Worker driver for visibility-timeout based, at-least-once message queues
//! such as AWS SQS.
//!
//! This library provides:
//! - A wire codec that carries the producer's time-to-run inline with the payload
//! - A provider-agnostic queue client contract with AWS SQS and in-memory providers
//! - The reservation protocol (hide on receive, delete on success)
//! - A single-message consumer loop with drain and continuous modes
//! - A producer that rejects capabilities the backend cannot honour
//!
//! ## Module Organization
//!
//! - [error] - Error types for codec, queue and worker operations
//! - [codec] - `{ttr};{payload}` body encoding
//! - [message] - Identifiers and received message structures
//! - [provider] - Provider types and configuration
//! - [client] - Queue client contract and factory
//! - [reservation] - Reserve/release protocol
//! - [consumer] - Consumer loop
//! - [producer] - Producer operations

pub mod client;
pub mod codec;
pub mod consumer;
pub mod error;
pub mod message;
pub mod producer;
pub mod provider;
pub mod providers;
pub mod reservation;

#[cfg(test)]
mod test_support;

// Re-exports
pub use client::{QueueClient, QueueClientFactory};
pub use codec::{decode, encode, DecodedJob};
pub use consumer::{
    handler_fn, ContinuationSignal, Consumer, JobContext, MessageHandler, RunSummary,
    ShutdownFlag, DEFAULT_PRIORITY, MAX_WAIT_SECONDS,
};
pub use error::{
    ConfigurationError, FormatError, QueueError, SerializationError, ValidationError, WorkerError,
};
pub use message::{MessageId, QueueName, ReceiptHandle, ReceivedMessage, Timestamp};
pub use producer::{Producer, PushRequest, DEFAULT_TTR_SECONDS};
pub use provider::{AwsSqsConfig, InMemoryConfig, ProviderConfig, ProviderType, QueueConfig};
pub use providers::{AwsSqsProvider, InMemoryProvider};
pub use reservation::Reservation;
