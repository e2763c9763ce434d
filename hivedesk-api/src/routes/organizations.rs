/// Organization endpoints
///
/// Listing and creating organizations, the organization detail view, and
/// the two membership probes the frontend uses for routing decisions.
///
/// # Endpoints
///
/// - `GET  /v1/organizations` - Organizations the caller owns or joined
/// - `POST /v1/organizations` - Create one; the creator becomes OWNER
/// - `GET  /v1/organizations/:org_id` - Detail with owner + roster (members only)
/// - `GET  /v1/organizations/:org_id/role` - Caller's role in the org
/// - `GET  /v1/organizations/:org_id/membership` - `{ "is_member": bool }`

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
    auth::{authorization::require_membership, session::AuthContext},
    models::{
        membership::{MemberWithUser, Membership, OrgRole},
        organization::{CreateOrganization, Organization},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Organization creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    /// Organization name
    #[validate(length(min = 1, max = 100, message = "Valid name is required"))]
    pub name: String,
}

/// The organization's owner, as shown in the detail view
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    /// Owner's user ID
    pub id: Uuid,

    /// Owner's username
    pub username: String,
}

/// Organization detail response
#[derive(Debug, Serialize)]
pub struct OrganizationDetail {
    /// Organization ID
    pub id: Uuid,

    /// Organization name
    pub name: String,

    /// Owner summary
    pub owner: OwnerSummary,

    /// Full member roster
    pub members: Vec<MemberWithUser>,
}

/// Role probe response
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    /// Caller's role in the organization
    pub role: OrgRole,
}

/// Membership probe response
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    /// Whether the caller is a member
    pub is_member: bool,
}

/// Organizations the caller owns or belongs to
pub async fn list_organizations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Organization>>> {
    let organizations = Organization::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(organizations))
}

/// Create an organization; the creator becomes OWNER
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty name
/// - `409 Conflict`: Name already taken
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    req.validate().map_err(validation_error)?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Valid name is required".to_string()));
    }

    let organization = Organization::create(
        &state.db,
        CreateOrganization {
            name,
            owner_id: auth.user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

/// Organization detail with owner and roster (members only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member
/// - `404 Not Found`: Organization doesn't exist
pub async fn get_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<OrganizationDetail>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let organization = Organization::find_by_id(&state.db, org_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    let owner = User::find_by_id(&state.db, organization.owner_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Organization owner missing".to_string()))?;

    let members = Membership::list_with_users(&state.db, org_id).await?;

    Ok(Json(OrganizationDetail {
        id: organization.id,
        name: organization.name,
        owner: OwnerSummary {
            id: owner.id,
            username: owner.username,
        },
        members,
    }))
}

/// Caller's role in the organization
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member
pub async fn get_my_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<RoleResponse>> {
    let role = require_membership(&state.db, org_id, auth.user_id).await?;

    Ok(Json(RoleResponse { role }))
}

/// Membership probe
///
/// Returns `is_member` rather than failing, so the frontend can branch
/// without error handling.
pub async fn check_membership(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<MembershipResponse>> {
    let is_member = Membership::has_access(&state.db, org_id, auth.user_id).await?;

    Ok(Json(MembershipResponse { is_member }))
}
