//! Consumer loop.
//!
//! One message per iteration: receive, decode, reserve for the decoded TTR,
//! dispatch to the handler, then release on success. On handler failure the
//! message is left alone and reappears once its reservation expires.
//!
//! The loop runs sequentially. Several consumers may share one queue; the
//! remote visibility timeout keeps them from processing the same delivery.

use crate::client::QueueClient;
use crate::codec;
use crate::error::{QueueError, ValidationError, WorkerError};
use crate::message::{MessageId, ReceivedMessage};
use crate::reservation::Reservation;
use async_trait::async_trait;
use chrono::Duration;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;

/// Longest long-poll wait a run may request
pub const MAX_WAIT_SECONDS: u32 = 20;

/// Priority reported to handlers; the backend has no priorities
pub const DEFAULT_PRIORITY: u32 = 1;

// ============================================================================
// Handler Contract
// ============================================================================

/// Delivery details handed to a [`MessageHandler`] alongside the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub message_id: MessageId,
    /// How many times this message has been received, including this delivery
    pub attempt: u32,
    pub priority: u32,
    /// Seconds the message stays reserved for this handler
    pub ttr_seconds: u32,
}

/// Processes the payload of one job.
///
/// Returning `Ok` deletes the message. Returning `Err` leaves it reserved until
/// the TTR elapses, after which it is delivered again. Handlers may see the same
/// payload more than once and should be idempotent.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &str, context: &JobContext) -> anyhow::Result<()>;
}

/// Handler backed by an async closure, see [`handler_fn`]
pub struct HandlerFn<F> {
    f: F,
}

/// Adapt an async closure into a [`MessageHandler`].
///
/// ```
/// use ttr_queue::handler_fn;
///
/// let handler = handler_fn(|payload: String, _context| async move {
///     println!("processing {}", payload);
///     anyhow::Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(String, JobContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut> MessageHandler for HandlerFn<F>
where
    F: Fn(String, JobContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn handle(&self, payload: &str, context: &JobContext) -> anyhow::Result<()> {
        (self.f)(payload.to_string(), context.clone()).await
    }
}

// ============================================================================
// Continuation
// ============================================================================

/// Decides, before each receive, whether the loop keeps going
pub trait ContinuationSignal: Send + Sync {
    fn should_continue(&self) -> bool;
}

impl<F> ContinuationSignal for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_continue(&self) -> bool {
        self()
    }
}

/// Shared stop flag, typically flipped from a signal handler
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop before its next receive
    pub fn request_shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl ContinuationSignal for ShutdownFlag {
    fn should_continue(&self) -> bool {
        !self.is_shutdown_requested()
    }
}

// ============================================================================
// Consumer
// ============================================================================

/// Counters for a single [`Consumer::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub received: u64,
    pub succeeded: u64,
    /// Handler failures, malformed bodies included
    pub failed: u64,
    pub malformed: u64,
}

/// Worker loop over a single queue
pub struct Consumer {
    client: Arc<dyn QueueClient>,
    reservation: Reservation,
    handler: Box<dyn MessageHandler>,
    continuation: Box<dyn ContinuationSignal>,
}

impl Consumer {
    /// Create a consumer that runs until the queue is drained or forever,
    /// depending on the `repeat` flag given to [`Consumer::run`]
    pub fn new<H>(client: Arc<dyn QueueClient>, handler: H) -> Self
    where
        H: MessageHandler + 'static,
    {
        Self {
            reservation: Reservation::new(Arc::clone(&client)),
            client,
            handler: Box::new(handler),
            continuation: Box::new(|| true),
        }
    }

    /// Replace the continuation signal checked before every receive
    pub fn with_continuation<S>(mut self, signal: S) -> Self
    where
        S: ContinuationSignal + 'static,
    {
        self.continuation = Box::new(signal);
        self
    }

    /// Run the loop.
    ///
    /// With `repeat == false` the loop returns after the first empty receive;
    /// otherwise it keeps polling until the continuation signal says stop.
    /// Each receive long-polls for up to `timeout_seconds`.
    ///
    /// # Errors
    ///
    /// - `timeout_seconds` above [`MAX_WAIT_SECONDS`]
    /// - any queue error from receive, reserve or release; the loop does not retry
    pub async fn run(&self, repeat: bool, timeout_seconds: u32) -> Result<RunSummary, WorkerError> {
        if timeout_seconds > MAX_WAIT_SECONDS {
            return Err(QueueError::from(ValidationError::OutOfRange {
                field: "timeout_seconds".to_string(),
                message: format!(
                    "must be 0-{} seconds, got {}",
                    MAX_WAIT_SECONDS, timeout_seconds
                ),
            })
            .into());
        }

        let wait = Duration::seconds(i64::from(timeout_seconds));
        let mut summary = RunSummary::default();

        info!(
            repeat,
            timeout_seconds,
            provider = %self.client.provider_type(),
            "Consumer started"
        );

        loop {
            if !self.continuation.should_continue() {
                info!("Stop requested, leaving consumer loop");
                break;
            }

            let Some(message) = self.client.receive_message(wait).await? else {
                if repeat {
                    continue;
                }
                debug!("Queue is empty, drain complete");
                break;
            };

            summary.received += 1;
            self.process(&message, &mut summary).await?;
        }

        info!(
            received = summary.received,
            succeeded = summary.succeeded,
            failed = summary.failed,
            malformed = summary.malformed,
            "Consumer stopped"
        );

        Ok(summary)
    }

    async fn process(
        &self,
        message: &ReceivedMessage,
        summary: &mut RunSummary,
    ) -> Result<(), WorkerError> {
        let job = match codec::decode(&message.body) {
            Ok(job) => job,
            Err(e) => {
                // Left visible; it will come back and fail the same way
                error!(
                    message_id = %message.message_id,
                    attempt = message.approximate_receive_count,
                    error = %e,
                    "Malformed message body"
                );
                summary.failed += 1;
                summary.malformed += 1;
                return Ok(());
            }
        };

        self.reservation.reserve(message, job.ttr_seconds).await?;

        let context = JobContext {
            message_id: message.message_id.clone(),
            attempt: message.approximate_receive_count,
            priority: DEFAULT_PRIORITY,
            ttr_seconds: job.ttr_seconds,
        };

        debug!(
            message_id = %context.message_id,
            attempt = context.attempt,
            ttr_seconds = context.ttr_seconds,
            "Dispatching job"
        );

        match self.handler.handle(&job.payload, &context).await {
            Ok(()) => {
                if !self.reservation.release(message).await? {
                    warn!(
                        message_id = %context.message_id,
                        "Delete was not acknowledged, message may be delivered again"
                    );
                }
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(
                    message_id = %context.message_id,
                    attempt = context.attempt,
                    ttr_seconds = context.ttr_seconds,
                    error = %e,
                    "Handler failed, message will reappear after its TTR"
                );
                summary.failed += 1;
            }
        }

        Ok(())
    }
}
