/// Notification model and database operations
///
/// Notifications are per-user rows written by the task-assignment and
/// chat-mention flows, unread by default. There is no batching and no
/// delivery guarantee beyond the insert succeeding; clients fetch on
/// demand. Every read/write here is scoped by the owning user id so one
/// user can never touch another's notifications.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     message TEXT NOT NULL,
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient
    pub user_id: Uuid,

    /// Human-readable message
    pub message: String,

    /// Whether the recipient has read it
    pub is_read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates one unread notification for a user
    ///
    /// This is the single entry point used by the task-assignment and
    /// mention flows.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        message: &str,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's notifications, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Marks one of the user's notifications as read
    ///
    /// Returns the updated notification, or None when the id doesn't exist
    /// or belongs to somebody else.
    pub async fn mark_read(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, message, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    /// Marks all of a user's unread notifications as read
    ///
    /// Returns the number of rows updated.
    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Deletes one of the user's notifications
    ///
    /// Returns true if a row was deleted; false when the id doesn't exist
    /// or belongs to somebody else.
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Builds the notification text for a fresh task assignment
pub fn task_assigned_message(title: &str) -> String {
    format!("You have been assigned a task: \"{}\".", title)
}

/// Builds the notification text for an unassignment, addressed to the
/// previously assigned user
pub fn task_unassigned_message(title: &str) -> String {
    format!("Your task \"{}\" has been unassigned.", title)
}

/// Builds the notification text for a chat mention
pub fn mention_message(sender_username: &str, chatroom_name: &str) -> String {
    format!("{} mentioned you in {}", sender_username, chatroom_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_assigned_message() {
        assert_eq!(
            task_assigned_message("Ship it"),
            "You have been assigned a task: \"Ship it\"."
        );
    }

    #[test]
    fn test_task_unassigned_message() {
        assert_eq!(
            task_unassigned_message("Ship it"),
            "Your task \"Ship it\" has been unassigned."
        );
    }

    #[test]
    fn test_mention_message() {
        assert_eq!(mention_message("alice", "general"), "alice mentioned you in general");
    }

    // Integration tests for database operations require a running database.
}
