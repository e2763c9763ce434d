/// Organization model and database operations
///
/// Organizations are the tenant boundary: chatrooms, contacts, tasks, and
/// labels all hang off one organization. Creating an organization also
/// creates the creator's OWNER membership — both inserts run in a single
/// transaction so an organization can never exist without its owner row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::OrgRole;

/// Organization model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID
    pub id: Uuid,

    /// Organization name (globally unique)
    pub name: String,

    /// Owning user
    pub owner_id: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Organization name
    pub name: String,

    /// The creating user, who becomes OWNER
    pub owner_id: Uuid,
}

impl Organization {
    /// Creates a new organization together with the creator's OWNER
    /// membership, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is already taken (unique constraint violation)
    /// - The owner doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateOrganization) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO organization_members (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(organization.id)
        .bind(data.owner_id)
        .bind(OrgRole::Owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(organization)
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(organization)
    }

    /// Lists organizations the user owns or belongs to
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT DISTINCT o.id, o.name, o.owner_id, o.created_at, o.updated_at
            FROM organizations o
            LEFT JOIN organization_members om ON om.organization_id = o.id
            WHERE o.owner_id = $1 OR om.user_id = $1
            ORDER BY o.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(organizations)
    }

    /// Deletes an organization
    ///
    /// Memberships, labels, chatrooms, contacts, and tasks cascade via
    /// foreign keys.
    ///
    /// Returns true if the organization was deleted, false if it didn't
    /// exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_serializes_with_owner() {
        let org = Organization {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["name"], "Acme");
        assert!(json["owner_id"].is_string());
    }

    // Integration tests for database operations require a running database.
}
