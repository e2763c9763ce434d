/// Contact model and database operations
///
/// CRM records scoped to one organization. Only the name is required;
/// everything else is free-form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Contact model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Unique contact ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Contact name (required)
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Job title
    pub position: Option<String>,

    /// Company name
    pub company: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input fields for creating or updating a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactFields {
    /// Contact name (required)
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Job title
    pub position: Option<String>,

    /// Company name
    pub company: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

impl Contact {
    /// Creates a new contact
    pub async fn create(
        pool: &PgPool,
        organization_id: Uuid,
        data: ContactFields,
    ) -> Result<Self, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (organization_id, name, email, phone, position, company, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, name, email, phone, position, company, notes,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.position)
        .bind(data.company)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    /// Finds a contact by ID within an organization
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, organization_id, name, email, phone, position, company, notes,
                   created_at, updated_at
            FROM contacts
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Lists an organization's contacts, newest first
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, organization_id, name, email, phone, position, company, notes,
                   created_at, updated_at
            FROM contacts
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Updates a contact, replacing all fields
    ///
    /// Returns the updated contact, or None if it doesn't exist in the
    /// organization.
    pub async fn update(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
        data: ContactFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET name = $3, email = $4, phone = $5, position = $6, company = $7, notes = $8,
                updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, name, email, phone, position, company, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.position)
        .bind(data.company)
        .bind(data.notes)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Deletes a contact
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
