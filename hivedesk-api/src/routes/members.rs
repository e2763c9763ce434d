/// Organization member endpoints
///
/// Roster listing, invites, role changes, and removal. Invites are open to
/// OWNER and MODERATOR; changing a role or removing a member requires
/// exactly OWNER.
///
/// # Endpoints
///
/// - `GET    /v1/organizations/:org_id/members` - Roster (members only)
/// - `POST   /v1/organizations/:org_id/members` - Invite by email
/// - `PATCH  /v1/organizations/:org_id/members/:user_id/role` - Change role
/// - `PATCH  /v1/organizations/:org_id/members/:user_id/label` - Tag with a label
/// - `DELETE /v1/organizations/:org_id/members/:user_id` - Remove member

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
        membership::{CreateMembership, MemberWithUser, Membership, OrgRole},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Invite request: the user is addressed by email
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Role to grant
    pub role: OrgRole,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role
    pub role: OrgRole,
}

/// Role change response
#[derive(Debug, Serialize)]
pub struct UpdateRoleResponse {
    /// New role after the change
    pub role: OrgRole,
}

/// Label tagging request
#[derive(Debug, Deserialize)]
pub struct SetLabelRequest {
    /// Label to tag the member with; null clears the tag
    pub label_id: Option<Uuid>,
}

/// Label tagging response
#[derive(Debug, Serialize)]
pub struct SetLabelResponse {
    /// Label after the change
    pub label_id: Option<Uuid>,
}

/// Removal response
#[derive(Debug, Serialize)]
pub struct RemoveMemberResponse {
    /// Confirmation message
    pub message: String,
}

/// Organization roster
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MemberWithUser>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let members = Membership::list_with_users(&state.db, org_id).await?;

    Ok(Json(members))
}

/// Invite a user by email
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not OWNER or MODERATOR
/// - `404 Not Found`: No account with that email
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberWithUser>)> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::InviteMembers).await?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            organization_id: org_id,
            user_id: user.id,
            role: req.role,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MemberWithUser {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: membership.role,
        }),
    ))
}

/// Change a member's role (OWNER only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not OWNER
/// - `404 Not Found`: No such membership
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UpdateRoleResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageMembers).await?;

    let membership = Membership::update_role(&state.db, org_id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(UpdateRoleResponse {
        role: membership.role,
    }))
}

/// Tag a member with a label, or clear the tag (OWNER or MODERATOR)
///
/// Labels feed chatroom access rules, so tagging sits with the same roles
/// that manage those rules.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not OWNER or MODERATOR
/// - `404 Not Found`: No such membership
pub async fn set_member_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetLabelRequest>,
) -> ApiResult<Json<SetLabelResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let membership = Membership::set_label(&state.db, org_id, user_id, req.label_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(SetLabelResponse {
        label_id: membership.label_id,
    }))
}

/// Remove a member (OWNER only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not OWNER
/// - `404 Not Found`: No such membership
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<RemoveMemberResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageMembers).await?;

    let removed = Membership::delete(&state.db, org_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    Ok(Json(RemoveMemberResponse {
        message: "Member removed".to_string(),
    }))
}
