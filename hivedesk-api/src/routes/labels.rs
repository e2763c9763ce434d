/// Label endpoints
///
/// Labels group organization members for chatroom access control.
///
/// # Endpoints
///
/// - `GET  /v1/organizations/:org_id/labels` - List labels (members only)
/// - `POST /v1/organizations/:org_id/labels` - Create (OWNER or MODERATOR)

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
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
    models::label::{CreateLabel, Label},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Label creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLabelRequest {
    /// Label name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// Display color
    #[validate(length(min = 1, max = 32, message = "Color is required"))]
    pub color: String,
}

/// List an organization's labels
pub async fn list_labels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Label>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let labels = Label::list_by_organization(&state.db, org_id).await?;

    Ok(Json(labels))
}

/// Create a label
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not OWNER or MODERATOR
/// - `409 Conflict`: Name already taken within the organization
pub async fn create_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateLabelRequest>,
) -> ApiResult<(StatusCode, Json<Label>)> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let label = Label::create(
        &state.db,
        CreateLabel {
            organization_id: org_id,
            name: req.name,
            color: req.color,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(label)))
}
