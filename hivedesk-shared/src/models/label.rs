/// Label model and database operations
///
/// A label is a named, colored tag grouping members of one organization.
/// Labels exist for access control: a chatroom can grant access to every
/// member carrying a given label.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Label model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    /// Unique label ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Label name (unique within the organization)
    pub name: String,

    /// Display color (e.g., "#ff8800")
    pub color: String,
}

/// Input for creating a new label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLabel {
    /// Owning organization
    pub organization_id: Uuid,

    /// Label name
    pub name: String,

    /// Display color
    pub color: String,
}

impl Label {
    /// Creates a new label
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken within the organization
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (organization_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, organization_id, name, color
            "#,
        )
        .bind(data.organization_id)
        .bind(data.name)
        .bind(data.color)
        .fetch_one(pool)
        .await?;

        Ok(label)
    }

    /// Lists all labels of an organization
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT id, organization_id, name, color
            FROM labels
            WHERE organization_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    /// Deletes a label
    ///
    /// Members tagged with the label fall back to untagged (SET NULL);
    /// chatroom access rules referencing it cascade away.
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
