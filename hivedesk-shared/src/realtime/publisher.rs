/// Message event publisher for the real-time channel
///
/// Announces newly persisted chat messages on Redis Streams so subscribed
/// clients see them live. One stream per chatroom:
///
/// ```text
/// API handler
///     │
///     │ publish_message()
///     ▼
/// MessagePublisher
///     │
///     │ XADD chat:{chatroom_id}
///     ▼
/// Redis Streams ──> subscribed clients
/// ```
///
/// Streams store entries as field-value string pairs, so a message is
/// flattened into:
///
/// ```text
/// event: "message.created"
/// id: "uuid"
/// sender_id: "uuid"
/// content: "hello"
/// created_at: "2025-03-01T12:00:00Z"
/// ```
///
/// Publishing is best-effort with bounded retry: the database row is the
/// source of truth and the HTTP request does not fail when the channel is
/// down — callers log and move on.

use redis::AsyncCommands;
use thiserror::Error;
use uuid::Uuid;

use crate::models::message::Message;
use crate::realtime::client::{RedisClient, RedisClientError};

/// Publisher errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Redis client error
    #[error("Redis error: {0}")]
    RedisError(#[from] RedisClientError),

    /// Write failed after retries
    #[error("Failed to publish message after {attempts} attempts: {last_error}")]
    WriteFailed { attempts: u32, last_error: String },
}

/// Configuration for publisher retry behavior
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
        }
    }
}

/// Returns the stream key for a chatroom's message feed
pub fn chat_stream_key(chatroom_id: Uuid) -> String {
    format!("chat:{}", chatroom_id)
}

/// Flattens a message into Redis Stream field-value pairs
fn message_fields(message: &Message) -> Vec<(String, String)> {
    vec![
        ("event".to_string(), "message.created".to_string()),
        ("id".to_string(), message.id.to_string()),
        ("sender_id".to_string(), message.sender_id.to_string()),
        ("content".to_string(), message.content.clone()),
        ("created_at".to_string(), message.created_at.to_rfc3339()),
    ]
}

/// Publishes message events to the per-chatroom Redis Streams
#[derive(Clone)]
pub struct MessagePublisher {
    client: RedisClient,
    config: PublisherConfig,
}

impl MessagePublisher {
    /// Creates a new publisher with default retry configuration
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            config: PublisherConfig::default(),
        }
    }

    /// Creates a new publisher with custom retry configuration
    pub fn with_config(client: RedisClient, config: PublisherConfig) -> Self {
        Self { client, config }
    }

    /// Publishes a `message.created` event to the message's chatroom stream
    ///
    /// # Returns
    ///
    /// The Redis Stream entry ID (format: "timestamp-sequence")
    ///
    /// # Errors
    ///
    /// Returns an error if the XADD still fails after all retries.
    pub async fn publish_message(&self, message: &Message) -> Result<String, PublishError> {
        let stream_key = chat_stream_key(message.chatroom_id);
        let fields = message_fields(message);

        let stream_id = self
            .xadd_with_retry(&stream_key, &fields)
            .await
            .map_err(|e| PublishError::WriteFailed {
                attempts: self.config.max_retries + 1,
                last_error: e.to_string(),
            })?;

        tracing::debug!(
            chatroom_id = %message.chatroom_id,
            message_id = %message.id,
            stream_id = %stream_id,
            "Published message to real-time channel"
        );

        Ok(stream_id)
    }

    /// Internal: Executes XADD with retry logic
    async fn xadd_with_retry(
        &self,
        stream_key: &str,
        fields: &[(String, String)],
    ) -> Result<String, redis::RedisError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.config.max_retries {
            let mut conn = self.client.get_connection();

            let items: Vec<(&str, &str)> = fields
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();

            match conn.xadd(stream_key, "*", &items).await {
                Ok(stream_id) => return Ok(stream_id),
                Err(e) => {
                    last_error = Some(e);
                    attempt += 1;

                    if attempt <= self.config.max_retries {
                        let delay_ms = std::cmp::min(
                            self.config.base_retry_delay_ms * 2u64.pow(attempt - 1),
                            self.config.max_retry_delay_ms,
                        );

                        tracing::warn!(
                            stream_key = %stream_key,
                            attempt = attempt,
                            delay_ms = delay_ms,
                            "XADD failed, retrying..."
                        );

                        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_chat_stream_key() {
        let id = Uuid::new_v4();
        assert_eq!(chat_stream_key(id), format!("chat:{}", id));
    }

    #[test]
    fn test_message_fields() {
        let message = Message {
            id: Uuid::new_v4(),
            chatroom_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            content: "hello @alice".to_string(),
            created_at: Utc::now(),
        };

        let fields = message_fields(&message);

        assert_eq!(fields[0], ("event".to_string(), "message.created".to_string()));
        assert!(fields.iter().any(|(k, v)| k == "id" && *v == message.id.to_string()));
        assert!(fields.iter().any(|(k, v)| k == "content" && v == "hello @alice"));
    }

    #[test]
    fn test_publisher_config_default() {
        let config = PublisherConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_retry_delay_ms, 100);
        assert_eq!(config.max_retry_delay_ms, 5000);
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_publish_message() {
        use crate::realtime::client::{RedisClient, RedisConfig};

        let client = RedisClient::new(RedisConfig::from_url("redis://localhost:6379"))
            .await
            .unwrap();
        let publisher = MessagePublisher::new(client);

        let message = Message {
            id: Uuid::new_v4(),
            chatroom_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            content: "integration".to_string(),
            created_at: Utc::now(),
        };

        let stream_id = publisher.publish_message(&message).await.unwrap();
        assert!(stream_id.contains('-'));
    }
}
