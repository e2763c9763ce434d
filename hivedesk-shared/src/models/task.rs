/// Task model and database operations
///
/// Tracker entries scoped to one organization, with a three-state lifecycle
/// and optional assignment to a user. Assignment is always `None` or a valid
/// user id — there is no sentinel value. Assignment changes themselves don't
/// write notifications; the route layer decides when a change warrants one
/// (see [`crate::models::notification`]).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('PENDING', 'IN_PROGRESS', 'COMPLETED');
/// CREATE TYPE task_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'PENDING',
///     priority task_priority NOT NULL DEFAULT 'MEDIUM',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Lifecycle state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assigned user, if any
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning organization
    pub organization_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Lifecycle state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assigned user: None or a valid user id
    pub assigned_to: Option<Uuid>,
}

/// Input for updating a task
///
/// All fields are written; `assigned_to: None` unassigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New lifecycle state
    pub status: TaskStatus,

    /// New priority
    pub priority: TaskPriority,

    /// New assignment: None or a valid user id
    pub assigned_to: Option<Uuid>,
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (organization_id, title, description, status, priority, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, title, description, status, priority, assigned_to,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID within an organization
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, title, description, status, priority, assigned_to,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists an organization's tasks, newest first
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, organization_id, title, description, status, priority, assigned_to,
                   created_at, updated_at
            FROM tasks
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task, replacing all fields
    ///
    /// Returns the updated task, or None if it doesn't exist in the
    /// organization.
    pub async fn update(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, status = $5, priority = $6, assigned_to = $7,
                updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, title, description, status, priority, assigned_to,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the task's assignment
    ///
    /// `assigned_to: None` unassigns. Returns the updated task, or None if
    /// it doesn't exist in the organization.
    pub async fn set_assignment(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET assigned_to = $3, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, title, description, status, priority, assigned_to,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(assigned_to)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    pub async fn delete(
        pool: &PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "PENDING");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Completed.as_str(), "COMPLETED");
    }

    #[test]
    fn test_task_status_serde() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"COMPLETED\"").unwrap(),
            TaskStatus::Completed
        );
    }

    #[test]
    fn test_task_priority_serde() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"HIGH\"");
        assert_eq!(
            serde_json::from_str::<TaskPriority>("\"LOW\"").unwrap(),
            TaskPriority::Low
        );
    }

    #[test]
    fn test_update_task_null_assignment_deserializes() {
        let update: UpdateTask = serde_json::from_str(
            r#"{"title":"t","description":null,"status":"PENDING","priority":"LOW","assigned_to":null}"#,
        )
        .unwrap();
        assert_eq!(update.assigned_to, None);
    }

    // Integration tests for database operations require a running database.
}
