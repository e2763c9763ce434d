/// Chat message endpoints
///
/// Posting persists the message, announces it on the external real-time
/// channel, and writes one notification per mentioned organization member.
/// The database insert is the only delivery guarantee; a channel failure is
/// logged and the request still succeeds.
///
/// # Endpoints
///
/// - `GET  /v1/organizations/:org_id/chatrooms/:chatroom_id/messages` - History
/// - `POST /v1/organizations/:org_id/chatrooms/:chatroom_id/messages` - Post

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
    routes::chatrooms::fetch_accessible_chatroom,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use hivedesk_shared::{
    auth::{authorization::require_membership, session::AuthContext},
    mentions::extract_mentions,
    models::{
        message::Message,
        notification::{mention_message, Notification},
        user::User,
    },
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

/// Message post request
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    /// Message text; mentions are written as `@username`
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
}

/// Room history, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<Message>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    fetch_accessible_chatroom(&state, org_id, chatroom_id, auth.user_id).await?;

    let messages = Message::list_by_chatroom(&state.db, chatroom_id).await?;

    Ok(Json(messages))
}

/// Post a message
///
/// Anyone with access to the room may post. After the row is written the
/// message is published to `chat:{chatroom_id}` and each `@username`
/// resolving to a member of this organization gets a notification.
///
/// # Errors
///
/// - `400 Bad Request`: Empty content
/// - `404 Not Found`: Room absent or not accessible to the caller
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, chatroom_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    req.validate().map_err(validation_error)?;

    require_membership(&state.db, org_id, auth.user_id).await?;

    let chatroom = fetch_accessible_chatroom(&state, org_id, chatroom_id, auth.user_id).await?;

    let sender = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".to_string()))?;

    let message = Message::create(&state.db, chatroom_id, auth.user_id, &req.content).await?;

    // Best-effort announce; the row is the source of truth.
    if let Err(e) = state.publisher.publish_message(&message).await {
        warn!(
            chatroom_id = %chatroom_id,
            message_id = %message.id,
            "Failed to publish message to real-time channel: {}",
            e
        );
    }

    let mentions = extract_mentions(&req.content);
    if !mentions.is_empty() {
        let mentioned =
            User::find_org_members_by_usernames(&state.db, org_id, &mentions).await?;

        for user in mentioned {
            Notification::create(
                &state.db,
                user.id,
                &mention_message(&sender.username, &chatroom.name),
            )
            .await?;
        }
    }

    Ok((StatusCode::CREATED, Json(message)))
}
