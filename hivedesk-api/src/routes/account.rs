/// Own-account endpoints
///
/// The authenticated user's account surface: read, update, delete. These
/// operate only on the caller's own row; there is no way to address another
/// user here.
///
/// # Endpoints
///
/// - `GET    /v1/account` - Current account
/// - `PUT    /v1/account` - Update username/email
/// - `DELETE /v1/account` - Delete the account

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use hivedesk_shared::{
    auth::session::{AuthContext, SESSION_COOKIE},
    models::user::{PublicUser, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account update request; both fields are required
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// New username
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Account deletion response
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    /// Confirmation message
    pub message: String,
}

/// Current account
pub async fn get_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".to_string()))?;

    Ok(Json(user.into()))
}

/// Update username and email
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Username or email already in use
pub async fn update_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<PublicUser>> {
    req.validate().map_err(validation_error)?;

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            username: Some(req.username),
            email: Some(req.email),
            password_hash: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::Unauthorized("Invalid session".to_string()))?;

    Ok(Json(user.into()))
}

/// Delete the account and end the session
///
/// Owned organizations, memberships, notifications, and messages cascade
/// away with the account.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<DeleteAccountResponse>)> {
    User::delete(&state.db, auth.user_id).await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((
        jar,
        Json(DeleteAccountResponse {
            message: "Account deleted successfully".to_string(),
        }),
    ))
}
