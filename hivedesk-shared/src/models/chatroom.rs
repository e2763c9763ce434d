/// Chatroom model and database operations
///
/// A chatroom belongs to one organization and carries two access rule sets:
/// direct members (`chatroom_members`) and label grants
/// (`chatroom_label_access`). A room with no rules at all is open to every
/// organization member. Who can actually see a room is decided by
/// [`crate::access`]; this module only persists the rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chatrooms (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE chatroom_members (
///     chatroom_id UUID NOT NULL REFERENCES chatrooms(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (chatroom_id, user_id)
/// );
///
/// CREATE TABLE chatroom_label_access (
///     chatroom_id UUID NOT NULL REFERENCES chatrooms(id) ON DELETE CASCADE,
///     label_id UUID NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (chatroom_id, label_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::MemberWithUser;

/// Chatroom model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chatroom {
    /// Unique chatroom ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Room name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// When the room was created
    pub created_at: DateTime<Utc>,

    /// When the room was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new chatroom
///
/// `member_ids` and `label_ids` become the room's access rules; leave both
/// empty for a room open to the whole organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatroom {
    /// Owning organization
    pub organization_id: Uuid,

    /// Room name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Users granted direct access
    pub member_ids: Vec<Uuid>,

    /// Labels granted access
    pub label_ids: Vec<Uuid>,
}

/// Input for updating a chatroom
///
/// Both access rule sets are replaced wholesale, matching the edit form's
/// submit semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChatroom {
    /// New room name
    pub name: String,

    /// New description
    pub description: Option<String>,

    /// Replacement direct-access user set
    pub member_ids: Vec<Uuid>,

    /// Replacement label grant set
    pub label_ids: Vec<Uuid>,
}

impl Chatroom {
    /// Creates a chatroom with its access rules, atomically
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced user or label doesn't exist (foreign
    /// key violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateChatroom) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let chatroom = sqlx::query_as::<_, Chatroom>(
            r#"
            INSERT INTO chatrooms (organization_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.member_ids {
            sqlx::query("INSERT INTO chatroom_members (chatroom_id, user_id) VALUES ($1, $2)")
                .bind(chatroom.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        for label_id in &data.label_ids {
            sqlx::query("INSERT INTO chatroom_label_access (chatroom_id, label_id) VALUES ($1, $2)")
                .bind(chatroom.id)
                .bind(label_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(chatroom)
    }

    /// Finds a chatroom by ID within an organization
    ///
    /// The organization id is part of the lookup so a room can never be
    /// addressed through another tenant's URL.
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let chatroom = sqlx::query_as::<_, Chatroom>(
            r#"
            SELECT id, organization_id, name, description, created_at, updated_at
            FROM chatrooms
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(chatroom)
    }

    /// Lists the chatrooms of an organization that the given user can access
    ///
    /// A room is visible when it has no access rules at all, when the user
    /// is a direct member, or when the user carries a granted label.
    pub async fn list_accessible(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let chatrooms = sqlx::query_as::<_, Chatroom>(
            r#"
            SELECT c.id, c.organization_id, c.name, c.description, c.created_at, c.updated_at
            FROM chatrooms c
            WHERE c.organization_id = $1
              AND (
                (NOT EXISTS (SELECT 1 FROM chatroom_members cm WHERE cm.chatroom_id = c.id)
                 AND NOT EXISTS (SELECT 1 FROM chatroom_label_access ca WHERE ca.chatroom_id = c.id))
                OR EXISTS (
                    SELECT 1 FROM chatroom_members cm
                    WHERE cm.chatroom_id = c.id AND cm.user_id = $2
                )
                OR EXISTS (
                    SELECT 1
                    FROM chatroom_label_access ca
                    JOIN organization_members om
                      ON om.label_id = ca.label_id
                     AND om.organization_id = c.organization_id
                    WHERE ca.chatroom_id = c.id AND om.user_id = $2
                )
              )
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(chatrooms)
    }

    /// Updates a chatroom and replaces both access rule sets, atomically
    ///
    /// Returns the updated room, or None if it doesn't exist in the
    /// organization.
    pub async fn update(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
        data: UpdateChatroom,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let chatroom = sqlx::query_as::<_, Chatroom>(
            r#"
            UPDATE chatrooms
            SET name = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(chatroom) = chatroom else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM chatroom_members WHERE chatroom_id = $1")
            .bind(chatroom.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM chatroom_label_access WHERE chatroom_id = $1")
            .bind(chatroom.id)
            .execute(&mut *tx)
            .await?;

        for user_id in &data.member_ids {
            sqlx::query("INSERT INTO chatroom_members (chatroom_id, user_id) VALUES ($1, $2)")
                .bind(chatroom.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        for label_id in &data.label_ids {
            sqlx::query("INSERT INTO chatroom_label_access (chatroom_id, label_id) VALUES ($1, $2)")
                .bind(chatroom.id)
                .bind(label_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(chatroom))
    }

    /// Deletes a chatroom
    ///
    /// Members, label grants, and messages cascade via foreign keys.
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chatrooms WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the room's direct members with their account fields and
    /// organization role
    pub async fn direct_members_with_users(
        pool: &PgPool,
        chatroom_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT cm.user_id, u.username, u.email, om.role
            FROM chatroom_members cm
            JOIN chatrooms c ON c.id = cm.chatroom_id
            JOIN users u ON u.id = cm.user_id
            JOIN organization_members om
              ON om.user_id = cm.user_id AND om.organization_id = c.organization_id
            WHERE cm.chatroom_id = $1
            ORDER BY cm.created_at ASC
            "#,
        )
        .bind(chatroom_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists the label ids granted access to the room
    pub async fn granted_label_ids(
        pool: &PgPool,
        chatroom_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let label_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT label_id FROM chatroom_label_access WHERE chatroom_id = $1",
        )
        .bind(chatroom_id)
        .fetch_all(pool)
        .await?;

        Ok(label_ids)
    }
}
