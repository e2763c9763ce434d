/// Chat message model and database operations
///
/// Messages are append-only: there is no update or delete. Rows are written
/// by the message endpoint and then announced on the external real-time
/// channel (see [`crate::realtime`]); history reads come straight from the
/// table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Chat message model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,

    /// Room the message was posted in
    pub chatroom_id: Uuid,

    /// Posting user
    pub sender_id: Uuid,

    /// Message text
    pub content: String,

    /// When the message was posted
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Appends a message to a chatroom
    pub async fn create(
        pool: &PgPool,
        chatroom_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (chatroom_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, chatroom_id, sender_id, content, created_at
            "#,
        )
        .bind(chatroom_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Lists a room's messages, oldest first
    pub async fn list_by_chatroom(
        pool: &PgPool,
        chatroom_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, chatroom_id, sender_id, content, created_at
            FROM messages
            WHERE chatroom_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(chatroom_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}
