/// Chatroom endpoints
///
/// Rooms are visible according to their access rules: open to the whole
/// organization when no rules exist, otherwise the union of direct members
/// and label members. A room the caller can't see answers 404, the same as
/// a room that doesn't exist.
///
/// # Endpoints
///
/// - `GET    /v1/organizations/:org_id/chatrooms` - Rooms the caller can access
/// - `POST   /v1/organizations/:org_id/chatrooms` - Create (OWNER or MODERATOR)
/// - `GET    /v1/organizations/:org_id/chatrooms/:chatroom_id` - Room detail
/// - `PATCH  /v1/organizations/:org_id/chatrooms/:chatroom_id` - Update + replace access rules
/// - `DELETE /v1/organizations/:org_id/chatrooms/:chatroom_id` - Delete (OWNER only)
/// - `GET    /v1/organizations/:org_id/chatrooms/:chatroom_id/members` - Resolved visible members

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
    access::{resolve_visible_members, user_can_access},
    auth::{
        authorization::{authorize, require_membership, OrgAction},
        session::AuthContext,
    },
    models::{
        chatroom::{Chatroom, CreateChatroom, UpdateChatroom},
        membership::MemberWithUser,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Chatroom creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatroomRequest {
    /// Room name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Users granted direct access (empty = no direct rules)
    #[serde(default)]
    pub member_ids: Vec<Uuid>,

    /// Labels granted access (empty = no label rules)
    #[serde(default)]
    pub label_ids: Vec<Uuid>,
}

/// Chatroom update request; access rule sets are replaced wholesale
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChatroomRequest {
    /// New room name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// New description
    pub description: Option<String>,

    /// Replacement direct-access user set
    #[serde(default)]
    pub member_ids: Vec<Uuid>,

    /// Replacement label grant set
    #[serde(default)]
    pub label_ids: Vec<Uuid>,
}

/// Room detail: the room plus its raw access rules
#[derive(Debug, Serialize)]
pub struct ChatroomDetail {
    /// The room itself
    #[serde(flatten)]
    pub chatroom: Chatroom,

    /// Direct-access user ids
    pub member_ids: Vec<Uuid>,

    /// Granted label ids
    pub label_ids: Vec<Uuid>,
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteChatroomResponse {
    /// Confirmation message
    pub message: String,
}

/// Rooms in the organization the caller can access
pub async fn list_chatrooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Chatroom>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let chatrooms = Chatroom::list_accessible(&state.db, org_id, auth.user_id).await?;

    Ok(Json(chatrooms))
}

/// Create a chatroom (OWNER or MODERATOR)
pub async fn create_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateChatroomRequest>,
) -> ApiResult<(StatusCode, Json<Chatroom>)> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let chatroom = Chatroom::create(
        &state.db,
        CreateChatroom {
            organization_id: org_id,
            name: req.name,
            description: req.description,
            member_ids: req.member_ids,
            label_ids: req.label_ids,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(chatroom)))
}

/// Room detail, if the caller can access it
///
/// # Errors
///
/// - `404 Not Found`: Room absent or not accessible to the caller (the two
///   are indistinguishable on purpose)
pub async fn get_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ChatroomDetail>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let chatroom = fetch_accessible_chatroom(&state, org_id, chatroom_id, auth.user_id).await?;

    let member_ids = Chatroom::direct_members_with_users(&state.db, chatroom_id)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();
    let label_ids = Chatroom::granted_label_ids(&state.db, chatroom_id).await?;

    Ok(Json(ChatroomDetail {
        chatroom,
        member_ids,
        label_ids,
    }))
}

/// Update a room and replace its access rules (OWNER or MODERATOR)
pub async fn update_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateChatroomRequest>,
) -> ApiResult<Json<Chatroom>> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let chatroom = Chatroom::update(
        &state.db,
        org_id,
        chatroom_id,
        UpdateChatroom {
            name: req.name,
            description: req.description,
            member_ids: req.member_ids,
            label_ids: req.label_ids,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Chatroom not found".to_string()))?;

    Ok(Json(chatroom))
}

/// Delete a room (OWNER only)
pub async fn delete_chatroom(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteChatroomResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::DeleteResources).await?;

    let deleted = Chatroom::delete(&state.db, org_id, chatroom_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Chatroom not found".to_string()));
    }

    Ok(Json(DeleteChatroomResponse {
        message: "Chatroom deleted successfully".to_string(),
    }))
}

/// Resolved visible-member list for a room
///
/// Open rooms resolve to the full organization roster; restricted rooms to
/// the union of direct and label members, one entry per user.
pub async fn list_visible_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<MemberWithUser>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    Chatroom::find_in_org(&state.db, org_id, chatroom_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chatroom not found".to_string()))?;

    let members = resolve_visible_members(&state.db, org_id, chatroom_id).await?;

    Ok(Json(members))
}

/// Fetches a room the caller can access, collapsing "absent" and "not
/// accessible" into the same 404
pub(crate) async fn fetch_accessible_chatroom(
    state: &AppState,
    org_id: Uuid,
    chatroom_id: Uuid,
    user_id: Uuid,
) -> Result<Chatroom, ApiError> {
    let chatroom = Chatroom::find_in_org(&state.db, org_id, chatroom_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chatroom not found or access denied".to_string()))?;

    let can_access = user_can_access(&state.db, org_id, chatroom_id, user_id).await?;
    if !can_access {
        return Err(ApiError::NotFound(
            "Chatroom not found or access denied".to_string(),
        ));
    }

    Ok(chatroom)
}
