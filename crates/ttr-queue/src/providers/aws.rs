//! AWS SQS provider implementation using the HTTP Query API.
//!
//! This module talks to SQS with direct HTTP calls instead of the AWS SDK, which
//! keeps the dependency footprint small and lets unit tests run against a mock
//! HTTP server.
//!
//! ## Key Features
//!
//! - **HTTP Query API**: `ReceiveMessage`, `ChangeMessageVisibility`,
//!   `DeleteMessage`, `SendMessage` and `PurgeQueue` against one queue
//! - **AWS Signature V4**: Manual request signing for authentication
//! - **Lazy queue URL**: resolved once through `GetQueueUrl` and cached for the
//!   lifetime of the provider, unless configured explicitly
//! - **Custom endpoints**: LocalStack, VPC endpoints, test servers
//!
//! ## Authentication
//!
//! Credentials come from [`AwsSqsConfig`] or, when absent there, from the
//! `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
//! environment variables.
//!
//! ## Delivery semantics
//!
//! Standard queues are at-least-once with best-effort ordering. Message bodies
//! are sent verbatim so that other SQS consumers see the same `{ttr};{payload}`
//! text.
//!
//! ## Example
//!
//! ```no_run
//! use ttr_queue::{AwsSqsConfig, AwsSqsProvider, QueueName};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AwsSqsConfig {
//!     region: "us-east-1".to_string(),
//!     ..Default::default()
//! };
//!
//! let provider = AwsSqsProvider::new(config, "jobs".parse()?).await?;
//! # Ok(())
//! # }
//! ```

use crate::client::QueueClient;
use crate::error::{ConfigurationError, QueueError, SerializationError, ValidationError};
use crate::message::{MessageId, QueueName, ReceiptHandle, ReceivedMessage, Timestamp};
use crate::provider::{AwsSqsConfig, ProviderType};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client as HttpClient;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

/// SQS Query API version
const API_VERSION: &str = "2012-11-05";

/// Longest long-poll wait accepted by SQS
const MAX_WAIT_SECONDS: i64 = 20;

/// HTTP request timeout; must outlast the longest long poll
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

type Params = BTreeMap<String, String>;

// ============================================================================
// Error Types
// ============================================================================

/// AWS SQS specific errors
#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {duration}")]
    Timeout { duration: Duration },

    #[error("SQS service error: {code} - {message}")]
    ServiceError { code: String, message: String },

    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    #[error("Invalid receipt handle: {0}")]
    InvalidReceipt(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    #[error("Response parsing failed: {0}")]
    ResponseError(String),
}

impl AwsError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::Timeout { .. } | Self::ServiceError { .. }
        )
    }
}

impl From<AwsError> for QueueError {
    fn from(error: AwsError) -> Self {
        match error {
            AwsError::Authentication(message) => Self::AuthenticationFailed { message },
            AwsError::AccessDenied(operation) => Self::PermissionDenied { operation },
            AwsError::NetworkError(message) => Self::ConnectionFailed { message },
            AwsError::Timeout { duration } => Self::Timeout { duration },
            AwsError::ServiceError { code, message } => Self::ProviderError {
                provider: ProviderType::AwsSqs.to_string(),
                code,
                message,
            },
            AwsError::QueueNotFound(queue_name) => Self::QueueNotFound { queue_name },
            AwsError::InvalidReceipt(receipt) => Self::MessageNotFound { receipt },
            AwsError::ConfigurationError(message) => {
                ConfigurationError::Invalid { message }.into()
            }
            AwsError::ResponseError(message) => SerializationError::InvalidXml { message }.into(),
        }
    }
}

// ============================================================================
// AWS Signature V4 Signing
// ============================================================================

type HmacSha256 = Hmac<Sha256>;

/// Signs SQS requests with AWS Signature Version 4.
///
/// Requests are sent as POST with every parameter in the query string and an
/// empty body, so the canonical request covers the method, path, sorted query,
/// the `host` and `x-amz-date` headers (plus `x-amz-security-token` for
/// temporary credentials) and the hash of the empty payload.
///
/// See <https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html>.
#[derive(Clone)]
struct AwsV4Signer {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
    region: String,
    service: &'static str,
}

impl AwsV4Signer {
    fn new(
        access_key: String,
        secret_key: String,
        session_token: Option<String>,
        region: String,
    ) -> Self {
        Self {
            access_key,
            secret_key,
            session_token,
            region,
            service: "sqs",
        }
    }

    /// Headers to attach to the request, `Authorization` first
    fn sign_request(
        &self,
        method: &str,
        host: &str,
        path: &str,
        query_params: &Params,
        body: &str,
        timestamp: &DateTime<Utc>,
    ) -> Vec<(String, String)> {
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();

        // Header names in canonical (sorted) order
        let mut signed: Vec<(&str, &str)> = vec![("host", host), ("x-amz-date", amz_date.as_str())];
        if let Some(token) = self.session_token.as_deref() {
            signed.push(("x-amz-security-token", token));
        }

        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let signed_headers = signed
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = [
            method,
            path,
            canonical_query(query_params).as_str(),
            canonical_headers.as_str(),
            signed_headers.as_str(),
            sha256_hex(body.as_bytes()).as_str(),
        ]
        .join("\n");

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = [
            SIGNING_ALGORITHM,
            amz_date.as_str(),
            scope.as_str(),
            sha256_hex(canonical_request.as_bytes()).as_str(),
        ]
        .join("\n");

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date_stamp),
            string_to_sign.as_bytes(),
        ));

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            SIGNING_ALGORITHM, self.access_key, scope, signed_headers, signature
        );

        let mut headers = vec![
            ("Authorization".to_string(), authorization),
            ("x-amz-date".to_string(), amz_date.clone()),
            ("host".to_string(), host.to_string()),
        ];
        if let Some(token) = &self.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers
    }

    /// Key derived from the secret through the date, region and service scope
    fn signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.secret_key);
        [
            date_stamp.as_bytes(),
            self.region.as_bytes(),
            self.service.as_bytes(),
            "aws4_request".as_bytes(),
        ]
        .into_iter()
        .fold(secret.into_bytes(), |key, part| hmac_sha256(&key, part))
    }
}

const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Query string with keys and values URI-encoded, sorted by key
fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

// ============================================================================
// AWS SQS Provider
// ============================================================================

/// AWS SQS queue provider bound to a single queue
///
/// Safe to share across tasks behind an `Arc`. The queue URL is the only
/// state written after construction, and only once.
pub struct AwsSqsProvider {
    http_client: HttpClient,
    signer: Option<AwsV4Signer>,
    config: AwsSqsConfig,
    endpoint: Url,
    queue_name: QueueName,
    queue_url: OnceCell<String>,
    request_timeout: std::time::Duration,
}

fn build_http_client(timeout: std::time::Duration) -> Result<HttpClient, AwsError> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AwsError::NetworkError(format!("failed to build HTTP client: {}", e)))
}

impl AwsSqsProvider {
    /// Create a provider for `queue_name`.
    ///
    /// No request is made here; the queue URL is looked up on first use.
    ///
    /// # Errors
    ///
    /// Returns error if the region is empty, the endpoint is not a valid URL,
    /// or the HTTP client cannot be constructed.
    pub async fn new(config: AwsSqsConfig, queue_name: QueueName) -> Result<Self, AwsError> {
        if config.region.is_empty() {
            return Err(AwsError::ConfigurationError(
                "region must not be empty".to_string(),
            ));
        }

        let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let access_key = config
            .access_key_id
            .clone()
            .or_else(|| from_env("AWS_ACCESS_KEY_ID"));
        let secret_key = config
            .secret_access_key
            .clone()
            .or_else(|| from_env("AWS_SECRET_ACCESS_KEY"));
        let session_token = config
            .session_token
            .clone()
            .or_else(|| from_env("AWS_SESSION_TOKEN"));

        // Without a key pair every request fails with AuthenticationFailed
        let signer = access_key.zip(secret_key).map(|(access_key, secret_key)| {
            AwsV4Signer::new(access_key, secret_key, session_token, config.region.clone())
        });

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://sqs.{}.amazonaws.com", config.region));
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            AwsError::ConfigurationError(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        let http_client = build_http_client(REQUEST_TIMEOUT)?;
        let queue_url = OnceCell::new_with(config.queue_url.clone());

        Ok(Self {
            http_client,
            signer,
            config,
            endpoint,
            queue_name,
            queue_url,
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Get the queue URL, resolving it through `GetQueueUrl` on first use
    async fn queue_url(&self) -> Result<&str, AwsError> {
        self.queue_url
            .get_or_try_init(|| async {
                let response = self
                    .make_request(params([
                        ("Action", "GetQueueUrl".to_string()),
                        ("QueueName", self.queue_name.to_string()),
                    ]))
                    .await?;
                let url = find_element_text(&response, b"QueueUrl")?.ok_or_else(|| {
                    AwsError::ResponseError("GetQueueUrl response has no QueueUrl".to_string())
                })?;

                debug!(queue = %self.queue_name, queue_url = %url, "Resolved SQS queue URL");
                Ok::<_, AwsError>(url)
            })
            .await
            .map(String::as_str)
    }

    /// Run `action` against the bound queue and return the response body
    async fn queue_action(&self, action: &str, mut params: Params) -> Result<String, AwsError> {
        params.insert("Action".to_string(), action.to_string());
        params.insert("QueueUrl".to_string(), self.queue_url().await?.to_string());
        self.make_request(params).await
    }

    /// Make a signed POST request to SQS
    async fn make_request(&self, mut params: Params) -> Result<String, AwsError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| AwsError::Authentication("no AWS credentials available".to_string()))?;

        params.insert("Version".to_string(), API_VERSION.to_string());

        let host = match (self.endpoint.host_str(), self.endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(AwsError::ConfigurationError(format!(
                    "endpoint '{}' has no host",
                    self.endpoint
                )))
            }
        };

        let headers = signer.sign_request(
            "POST",
            &host,
            self.endpoint.path(),
            &params,
            "",
            &Utc::now(),
        );

        let mut url = self.endpoint.clone();
        url.set_query(Some(&canonical_query(&params)));

        let request = headers
            .into_iter()
            .fold(self.http_client.post(url), |request, (name, value)| {
                request.header(name, value)
            });

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                return AwsError::Timeout {
                    duration: Duration::milliseconds(self.request_timeout.as_millis() as i64),
                };
            }
            let kind = if e.is_connect() {
                "connection failed"
            } else {
                "request failed"
            };
            AwsError::NetworkError(format!("{}: {}", kind, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AwsError::NetworkError(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_response(&body, status.as_u16()));
        }
        Ok(body)
    }
}

impl fmt::Debug for AwsSqsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSqsProvider")
            .field("region", &self.config.region)
            .field("endpoint", &self.endpoint.as_str())
            .field("queue_name", &self.queue_name)
            .field("credentials", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// XML Response Parsing
// ============================================================================

fn xml_error(error: impl fmt::Display) -> AwsError {
    AwsError::ResponseError(format!("invalid XML: {}", error))
}

/// Text content of the first element named `name`, if present
fn find_element_text(xml: &str, name: &[u8]) -> Result<Option<String>, AwsError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut inside = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) if e.name().as_ref() == name => inside = true,
            Event::Text(e) if inside => {
                return Ok(Some(e.unescape().map_err(xml_error)?.into_owned()));
            }
            Event::End(e) if e.name().as_ref() == name => return Ok(Some(String::new())),
            Event::Empty(e) if e.name().as_ref() == name => return Ok(Some(String::new())),
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Map an SQS error response onto [`AwsError`]
fn parse_error_response(xml: &str, status_code: u16) -> AwsError {
    // Unreadable error bodies fall back on the status code
    let code = find_element_text(xml, b"Code")
        .ok()
        .flatten()
        .unwrap_or_else(|| "Unknown".to_string());
    let message = find_element_text(xml, b"Message")
        .ok()
        .flatten()
        .unwrap_or_else(|| format!("HTTP status {}", status_code));

    match code.as_str() {
        "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
            AwsError::QueueNotFound(message)
        }
        "InvalidClientTokenId"
        | "UnrecognizedClientException"
        | "SignatureDoesNotMatch"
        | "ExpiredToken"
        | "MissingAuthenticationToken" => AwsError::Authentication(format!("{}: {}", code, message)),
        "AccessDenied" | "AccessDeniedException" => AwsError::AccessDenied(message),
        "InvalidReceiptHandle"
        | "ReceiptHandleIsInvalid"
        | "AWS.SimpleQueueService.MessageNotInflight" => AwsError::InvalidReceipt(message),
        _ if status_code == 401 => AwsError::Authentication(format!("{}: {}", code, message)),
        _ if status_code == 403 => AwsError::AccessDenied(message),
        _ => AwsError::ServiceError { code, message },
    }
}

/// Child element of `<Message>` whose text is being read
#[derive(Debug, Clone, Copy)]
enum MessageField {
    MessageId,
    ReceiptHandle,
    Body,
    AttributeName,
    AttributeValue,
}

impl MessageField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"MessageId" => Some(Self::MessageId),
            b"ReceiptHandle" => Some(Self::ReceiptHandle),
            b"Body" => Some(Self::Body),
            b"Name" => Some(Self::AttributeName),
            b"Value" => Some(Self::AttributeValue),
            _ => None,
        }
    }
}

/// Fields collected for one `<Message>` element
#[derive(Default)]
struct MessageBuilder {
    message_id: Option<String>,
    receipt_handle: Option<String>,
    body: Option<String>,
    receive_count: Option<u32>,
    attribute_name: Option<String>,
}

impl MessageBuilder {
    /// Record a field's text. The body is kept byte for byte, other fields are trimmed.
    fn set(&mut self, field: MessageField, text: String) -> Result<(), AwsError> {
        let text = match field {
            MessageField::Body => text,
            _ => text.trim().to_string(),
        };
        match field {
            MessageField::MessageId => self.message_id = Some(text),
            MessageField::ReceiptHandle => self.receipt_handle = Some(text),
            MessageField::Body => self.body = Some(text),
            MessageField::AttributeName => self.attribute_name = Some(text),
            MessageField::AttributeValue => {
                if self.attribute_name.take().as_deref() == Some("ApproximateReceiveCount") {
                    let count = text.parse().map_err(|_| {
                        AwsError::ResponseError(format!(
                            "ApproximateReceiveCount '{}' is not a number",
                            text
                        ))
                    })?;
                    self.receive_count = Some(count);
                }
            }
        }
        Ok(())
    }

    fn build(self) -> Result<ReceivedMessage, AwsError> {
        let message_id = self
            .message_id
            .and_then(|id| id.parse::<MessageId>().ok())
            .ok_or_else(|| AwsError::ResponseError("message without MessageId".to_string()))?;

        Ok(ReceivedMessage {
            message_id,
            body: self.body.unwrap_or_default(),
            receipt_handle: self.receipt_handle.map(ReceiptHandle::new),
            approximate_receive_count: self.receive_count.unwrap_or(1),
            received_at: Timestamp::now(),
        })
    }
}

/// Parse the messages of a `ReceiveMessage` response.
///
/// Text is not trimmed by the reader: whitespace at either end of a `<Body>`
/// belongs to the payload.
fn parse_receive_message_response(xml: &str) -> Result<Vec<ReceivedMessage>, AwsError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut messages = Vec::new();
    let mut current: Option<MessageBuilder> = None;
    let mut field: Option<MessageField> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Message" => current = Some(MessageBuilder::default()),
                tag if current.is_some() => {
                    field = MessageField::from_tag(tag);
                    text.clear();
                }
                _ => {}
            },
            Event::Text(e) if field.is_some() => {
                text.push_str(&e.unescape().map_err(xml_error)?);
            }
            Event::CData(e) if field.is_some() => {
                text.push_str(std::str::from_utf8(&e).map_err(xml_error)?);
            }
            Event::End(e) => {
                if let (Some(builder), Some(field)) = (current.as_mut(), field.take()) {
                    builder.set(field, std::mem::take(&mut text))?;
                }
                if e.name().as_ref() == b"Message" {
                    if let Some(builder) = current.take() {
                        messages.push(builder.build()?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(messages)
}

/// Whole seconds of a non-negative duration bounded by `max_seconds`
fn bounded_seconds(duration: Duration, max_seconds: u32, field: &str) -> Result<i64, QueueError> {
    let seconds = duration.num_seconds();
    if seconds < 0 || seconds > i64::from(max_seconds) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            message: format!("must be 0-{} seconds, got {}", max_seconds, seconds),
        }
        .into());
    }
    Ok(seconds)
}

// ============================================================================
// QueueClient implementation
// ============================================================================

#[async_trait]
impl QueueClient for AwsSqsProvider {
    async fn receive_message(
        &self,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError> {
        let wait_seconds = wait.num_seconds().clamp(0, MAX_WAIT_SECONDS);

        let response = self
            .queue_action(
                "ReceiveMessage",
                params([
                    ("MaxNumberOfMessages", "1".to_string()),
                    ("WaitTimeSeconds", wait_seconds.to_string()),
                    ("AttributeName.1", "All".to_string()),
                ]),
            )
            .await?;

        let message = parse_receive_message_response(&response)?.into_iter().next();

        if let Some(message) = &message {
            debug!(
                queue = %self.queue_name,
                message_id = %message.message_id,
                receive_count = message.approximate_receive_count,
                "Received SQS message"
            );
        }
        Ok(message)
    }

    async fn change_visibility(
        &self,
        receipt: &ReceiptHandle,
        timeout: Duration,
    ) -> Result<(), QueueError> {
        let seconds = bounded_seconds(
            timeout,
            ProviderType::AwsSqs.max_visibility_timeout_seconds(),
            "visibility_timeout",
        )?;

        self.queue_action(
            "ChangeMessageVisibility",
            params([
                ("ReceiptHandle", receipt.to_string()),
                ("VisibilityTimeout", seconds.to_string()),
            ]),
        )
        .await?;
        Ok(())
    }

    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<bool, QueueError> {
        let response = self
            .queue_action(
                "DeleteMessage",
                params([("ReceiptHandle", receipt.to_string())]),
            )
            .await?;

        // The acknowledgement is the RequestId in the response metadata
        Ok(find_element_text(&response, b"RequestId")?.is_some())
    }

    async fn send_message(&self, body: &str, delay: Duration) -> Result<MessageId, QueueError> {
        let max_size = ProviderType::AwsSqs.max_message_size();
        if body.len() > max_size {
            return Err(QueueError::MessageTooLarge {
                size: body.len(),
                max_size,
            });
        }
        let delay_seconds =
            bounded_seconds(delay, ProviderType::AwsSqs.max_delay_seconds(), "delay")?;

        let mut request = params([("MessageBody", body.to_string())]);
        if self.queue_name.is_fifo() {
            // FIFO queues only support a queue-level delay
            if delay_seconds != 0 {
                return Err(ValidationError::InvalidFormat {
                    field: "delay".to_string(),
                    message: format!(
                        "FIFO queue '{}' does not accept per-message delays",
                        self.queue_name
                    ),
                }
                .into());
            }
            // One group keeps FIFO ordering across all workers
            request.insert("MessageGroupId".to_string(), "default".to_string());
            request.insert(
                "MessageDeduplicationId".to_string(),
                uuid::Uuid::new_v4().to_string(),
            );
        } else {
            request.insert("DelaySeconds".to_string(), delay_seconds.to_string());
        }

        let response = self.queue_action("SendMessage", request).await?;
        let message_id = find_element_text(&response, b"MessageId")?
            .ok_or_else(|| SerializationError::MissingElement {
                element: "MessageId".to_string(),
            })?
            .parse::<MessageId>()?;

        debug!(queue = %self.queue_name, message_id = %message_id, "Sent SQS message");
        Ok(message_id)
    }

    async fn purge(&self) -> Result<(), QueueError> {
        self.queue_action("PurgeQueue", Params::new()).await?;
        Ok(())
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::AwsSqs
    }
}
