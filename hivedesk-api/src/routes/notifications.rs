/// Notification endpoints
///
/// Strictly scoped to the requesting user: every query carries the caller's
/// id, so addressing another user's notification behaves exactly like
/// addressing one that doesn't exist.
///
/// # Endpoints
///
/// - `GET    /v1/notifications` - List, newest first
/// - `PATCH  /v1/notifications` - Mark all unread as read
/// - `DELETE /v1/notifications` - Delete one, id in the body
/// - `PATCH  /v1/notifications/:id` - Mark one as read
/// - `DELETE /v1/notifications/:id` - Delete one

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use hivedesk_shared::{auth::session::AuthContext, models::notification::Notification};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body-addressed deletion request
#[derive(Debug, Deserialize)]
pub struct DeleteNotificationRequest {
    /// Notification to delete
    pub id: Uuid,
}

/// Bulk mark-read response
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    /// Confirmation message
    pub message: String,

    /// Number of notifications marked read
    pub updated: u64,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteNotificationResponse {
    /// Confirmation message
    pub message: String,
}

/// The caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(notifications))
}

/// Mark all of the caller's unread notifications as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = Notification::mark_all_read(&state.db, auth.user_id).await?;

    Ok(Json(MarkAllReadResponse {
        message: "Notifications marked as read".to_string(),
        updated,
    }))
}

/// Mark one notification as read
///
/// # Errors
///
/// - `404 Not Found`: No such notification owned by the caller
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    let notification = Notification::mark_read(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}

/// Delete one notification by path id
///
/// # Errors
///
/// - `404 Not Found`: No such notification owned by the caller
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteNotificationResponse>> {
    let deleted = Notification::delete(&state.db, auth.user_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(DeleteNotificationResponse {
        message: "Notification deleted".to_string(),
    }))
}

/// Delete one notification, id carried in the request body
///
/// Kept alongside the path-addressed variant for clients that batch their
/// notification actions through the collection URL.
pub async fn delete_notification_by_body(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteNotificationRequest>,
) -> ApiResult<Json<DeleteNotificationResponse>> {
    let deleted = Notification::delete(&state.db, auth.user_id, req.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(DeleteNotificationResponse {
        message: "Notification deleted".to_string(),
    }))
}
