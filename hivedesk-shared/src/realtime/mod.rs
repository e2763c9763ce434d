/// Real-time message channel (publish side)
///
/// New chat messages are announced on an external Redis stream, one stream
/// per chatroom (`chat:{chatroom_id}`). Clients subscribe to those streams
/// out-of-band; this crate only publishes. Delivery, ordering beyond the
/// stream's own, and backpressure are the channel's problem, not ours.
///
/// - `client`: Redis connection management and health checks
/// - `publisher`: XADD-based message event publishing with retry

pub mod client;
pub mod publisher;

pub use client::{RedisClient, RedisClientError, RedisConfig};
pub use publisher::{chat_stream_key, MessagePublisher, PublishError};
