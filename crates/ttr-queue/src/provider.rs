//! Provider types and configuration.

use crate::error::{ConfigurationError, QueueError};
use crate::message::QueueName;
use serde::{Deserialize, Serialize};

/// Backend a [`QueueClient`](crate::QueueClient) talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    AwsSqs,
    InMemory,
}

/// SQS caps delays at 15 minutes and visibility at 12 hours
const SQS_MAX_DELAY_SECONDS: u32 = 900;
const SQS_MAX_VISIBILITY_SECONDS: u32 = 43_200;

impl ProviderType {
    /// Largest body accepted by `send_message`, in bytes
    pub fn max_message_size(&self) -> usize {
        match self {
            Self::AwsSqs => 256 * 1024,
            Self::InMemory => 10 * 1024 * 1024,
        }
    }

    /// The in-memory provider mirrors the SQS limits so behaviour matches in tests
    pub fn max_delay_seconds(&self) -> u32 {
        SQS_MAX_DELAY_SECONDS
    }

    pub fn max_visibility_timeout_seconds(&self) -> u32 {
        SQS_MAX_VISIBILITY_SECONDS
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AwsSqs => "aws_sqs",
            Self::InMemory => "in_memory",
        })
    }
}

/// Configuration for queue client initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    pub queue_name: QueueName,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl QueueConfig {
    /// Check provider settings that cannot be expressed through types alone
    pub fn validate(&self) -> Result<(), QueueError> {
        match &self.provider {
            ProviderConfig::AwsSqs(aws) => {
                if aws.region.trim().is_empty() {
                    return Err(ConfigurationError::Missing {
                        key: "queue.provider.region".to_string(),
                    }
                    .into());
                }
                if aws.access_key_id.is_some() != aws.secret_access_key.is_some() {
                    return Err(ConfigurationError::Invalid {
                        message: "access_key_id and secret_access_key must be set together"
                            .to_string(),
                    }
                    .into());
                }
            }
            ProviderConfig::InMemory(memory) => {
                if memory.default_visibility_timeout_seconds
                    > ProviderType::InMemory.max_visibility_timeout_seconds()
                {
                    return Err(ConfigurationError::Invalid {
                        message: format!(
                            "default_visibility_timeout_seconds exceeds {}",
                            SQS_MAX_VISIBILITY_SECONDS
                        ),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Provider-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    AwsSqs(AwsSqsConfig),
    InMemory(InMemoryConfig),
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::InMemory(InMemoryConfig::default())
    }
}

/// AWS SQS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSqsConfig {
    pub region: String,
    /// Override of `https://sqs.{region}.amazonaws.com` (LocalStack, VPC endpoints)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Skip the `GetQueueUrl` lookup when the URL is already known
    #[serde(default)]
    pub queue_url: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
}

/// In-memory provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryConfig {
    /// Visibility timeout applied when a message is received
    #[serde(default = "default_visibility_timeout_seconds")]
    pub default_visibility_timeout_seconds: u32,
}

fn default_visibility_timeout_seconds() -> u32 {
    30
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            default_visibility_timeout_seconds: default_visibility_timeout_seconds(),
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
