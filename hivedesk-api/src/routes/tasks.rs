/// Task tracker endpoints
///
/// Role-gated CRUD plus explicit assign/unassign. Assignment is always
/// `null` or the id of a current organization member; assignment changes
/// notify the affected user (see the notification model for the exact
/// wording).
///
/// # Endpoints
///
/// - `GET    /v1/organizations/:org_id/tasks` - List, newest first
/// - `POST   /v1/organizations/:org_id/tasks` - Create
/// - `GET    /v1/organizations/:org_id/tasks/:task_id` - Fetch one
/// - `PATCH  /v1/organizations/:org_id/tasks/:task_id` - Update
/// - `DELETE /v1/organizations/:org_id/tasks/:task_id` - Delete (OWNER only)
/// - `POST   /v1/organizations/:org_id/tasks/:task_id/assign` - Assign to a member
/// - `POST   /v1/organizations/:org_id/tasks/:task_id/unassign` - Clear assignment

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use hivedesk_shared::{
    auth::{
        authorization::{authorize, require_membership, OrgAction},
        session::AuthContext,
    },
    models::{
        membership::Membership,
        notification::{task_assigned_message, task_unassigned_message, Notification},
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Lifecycle state (defaults to PENDING)
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Priority (defaults to MEDIUM)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    /// Assignment: null or the id of an organization member
    pub assigned_to: Option<Uuid>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Pending
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Task update request; all fields are written
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New lifecycle state
    pub status: TaskStatus,

    /// New priority
    pub priority: TaskPriority,

    /// New assignment: null or the id of an organization member
    pub assigned_to: Option<Uuid>,
}

/// Assignment request
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    /// Member to assign the task to
    pub user_id: Uuid,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Confirmation message
    pub message: String,
}

/// Rejects an assignment to someone outside the organization
async fn ensure_assignee_is_member(
    pool: &PgPool,
    org_id: Uuid,
    assigned_to: Option<Uuid>,
) -> Result<(), ApiError> {
    if let Some(user_id) = assigned_to {
        let is_member = Membership::has_access(pool, org_id, user_id).await?;
        if !is_member {
            return Err(ApiError::BadRequest(
                "Assigned user is not a member of this organization".to_string(),
            ));
        }
    }

    Ok(())
}

/// List the organization's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let tasks = Task::list_by_organization(&state.db, org_id).await?;

    Ok(Json(tasks))
}

/// Create a task (OWNER or MODERATOR)
///
/// Creating an already-assigned task notifies the assignee.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    ensure_assignee_is_member(&state.db, org_id, req.assigned_to).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            organization_id: org_id,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    if let Some(assignee) = task.assigned_to {
        Notification::create(&state.db, assignee, &task_assigned_message(&task.title)).await?;
    }

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetch one task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Task>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let task = Task::find_in_org(&state.db, org_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task (OWNER or MODERATOR)
///
/// When the update hands the task to a different user, that user is
/// notified. Unassignment through update is silent; the explicit unassign
/// endpoint is the one that notifies the previous assignee.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    ensure_assignee_is_member(&state.db, org_id, req.assigned_to).await?;

    let current = Task::find_in_org(&state.db, org_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::update(
        &state.db,
        org_id,
        task_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            assigned_to: req.assigned_to,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(assignee) = task.assigned_to {
        if current.assigned_to != Some(assignee) {
            Notification::create(&state.db, assignee, &task_assigned_message(&task.title))
                .await?;
        }
    }

    Ok(Json(task))
}

/// Delete a task (OWNER only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::DeleteResources).await?;

    let deleted = Task::delete(&state.db, org_id, task_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Assign a task to a member (OWNER or MODERATOR)
///
/// Writes exactly one notification for the new assignee.
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<Task>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    ensure_assignee_is_member(&state.db, org_id, Some(req.user_id)).await?;

    Task::find_in_org(&state.db, org_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::set_assignment(&state.db, org_id, task_id, Some(req.user_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Notification::create(&state.db, req.user_id, &task_assigned_message(&task.title)).await?;

    Ok(Json(task))
}

/// Clear a task's assignment (OWNER or MODERATOR)
///
/// Writes exactly one notification for the previously assigned user, if
/// there was one.
pub async fn unassign_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Task>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let current = Task::find_in_org(&state.db, org_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::set_assignment(&state.db, org_id, task_id, None)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(previous) = current.assigned_to {
        Notification::create(&state.db, previous, &task_unassigned_message(&task.title))
            .await?;
    }

    Ok(Json(task))
}
