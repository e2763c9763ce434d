/// Organization membership model and database operations
///
/// This module provides the membership model for user-organization
/// relationships with role-based access control, implementing a
/// many-to-many relationship between users and organizations.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE org_role AS ENUM ('OWNER', 'MODERATOR', 'MEMBER');
///
/// CREATE TABLE organization_members (
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role org_role NOT NULL DEFAULT 'MEMBER',
///     label_id UUID REFERENCES labels(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (organization_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **OWNER**: may do everything, including deleting org-scoped resources
///   and managing member roles
/// - **MODERATOR**: may create and update resources and invite members
/// - **MEMBER**: read access to the organization's resources
///
/// Note the role set is deliberately not a transitive hierarchy: which role
/// may perform which action is decided by the policy table in
/// [`crate::auth::authorization`], not by comparing role "levels".
///
/// A member may additionally carry a label, which grants access to any
/// chatroom that lists the label in its access rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Per-organization role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "org_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrgRole {
    /// Full control over the organization and its resources
    Owner,

    /// Can create/update resources and invite members
    Moderator,

    /// Read access
    Member,
}

impl OrgRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Owner => "OWNER",
            OrgRole::Moderator => "MODERATOR",
            OrgRole::Member => "MEMBER",
        }
    }
}

/// Membership model representing a user-organization relationship
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: OrgRole,

    /// Label this member is tagged with, if any
    pub label_id: Option<Uuid>,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to MEMBER)
    #[serde(default = "default_role")]
    pub role: OrgRole,
}

fn default_role() -> OrgRole {
    OrgRole::Member
}

/// A membership joined with the member's account fields, as returned by
/// roster listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberWithUser {
    /// User ID
    pub user_id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Role within the organization
    pub role: OrgRole,
}

impl Membership {
    /// Creates a new membership (adds a user to an organization)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (unique constraint violation)
    /// - Organization or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO organization_members (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING organization_id, user_id, role, label_id, created_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by organization and user
    pub async fn find(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT organization_id, user_id, role, label_id, created_at
            FROM organization_members
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Checks if a user is a member of an organization (any role)
    pub async fn has_access(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM organization_members
                WHERE organization_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in an organization
    ///
    /// Returns the role if the user is a member, None otherwise.
    pub async fn get_role(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrgRole>, sqlx::Error> {
        let role: Option<OrgRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM organization_members
            WHERE organization_id = $1 AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Updates a member's role
    ///
    /// Returns the updated membership if found, None if the membership
    /// doesn't exist.
    pub async fn update_role(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
        role: OrgRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE organization_members
            SET role = $3
            WHERE organization_id = $1 AND user_id = $2
            RETURNING organization_id, user_id, role, label_id, created_at
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Tags a member with a label, or clears the tag with None
    ///
    /// The label grants access to any chatroom listing it in its access
    /// rules. Returns the updated membership if found.
    pub async fn set_label(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
        label_id: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE organization_members
            SET label_id = $3
            WHERE organization_id = $1 AND user_id = $2
            RETURNING organization_id, user_id, role, label_id, created_at
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .bind(label_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Deletes a membership (removes a user from an organization)
    ///
    /// Returns true if the membership was deleted, false if it didn't exist.
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM organization_members WHERE organization_id = $1 AND user_id = $2")
                .bind(organization_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of an organization with their account fields
    pub async fn list_with_users(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT om.user_id, u.username, u.email, om.role
            FROM organization_members om
            JOIN users u ON u.id = om.user_id
            WHERE om.organization_id = $1
            ORDER BY om.created_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists members tagged with any of the given labels
    ///
    /// Used by the access resolver for label-based chatroom access.
    pub async fn list_with_users_by_labels(
        pool: &PgPool,
        organization_id: Uuid,
        label_ids: &[Uuid],
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT om.user_id, u.username, u.email, om.role
            FROM organization_members om
            JOIN users u ON u.id = om.user_id
            WHERE om.organization_id = $1 AND om.label_id = ANY($2)
            ORDER BY om.created_at ASC
            "#,
        )
        .bind(organization_id)
        .bind(label_ids)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Counts members in an organization
    pub async fn count_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM organization_members WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_role_as_str() {
        assert_eq!(OrgRole::Owner.as_str(), "OWNER");
        assert_eq!(OrgRole::Moderator.as_str(), "MODERATOR");
        assert_eq!(OrgRole::Member.as_str(), "MEMBER");
    }

    #[test]
    fn test_org_role_serde_uppercase() {
        assert_eq!(serde_json::to_string(&OrgRole::Owner).unwrap(), "\"OWNER\"");
        assert_eq!(
            serde_json::from_str::<OrgRole>("\"MODERATOR\"").unwrap(),
            OrgRole::Moderator
        );
    }

    #[test]
    fn test_create_membership_default_role() {
        assert_eq!(default_role(), OrgRole::Member);

        let parsed: CreateMembership = serde_json::from_str(
            r#"{"organization_id":"00000000-0000-0000-0000-000000000001",
                "user_id":"00000000-0000-0000-0000-000000000002"}"#,
        )
        .unwrap();
        assert_eq!(parsed.role, OrgRole::Member);
    }

    // Integration tests for database operations require a running database.
}
