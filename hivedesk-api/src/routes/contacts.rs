/// CRM contact endpoints
///
/// Standard role-gated CRUD: any member reads, OWNER/MODERATOR writes,
/// OWNER deletes. The name is the only required field.
///
/// # Endpoints
///
/// - `GET    /v1/organizations/:org_id/contacts` - List, newest first
/// - `POST   /v1/organizations/:org_id/contacts` - Create
/// - `GET    /v1/organizations/:org_id/contacts/:contact_id` - Fetch one
/// - `PATCH  /v1/organizations/:org_id/contacts/:contact_id` - Update
/// - `DELETE /v1/organizations/:org_id/contacts/:contact_id` - Delete

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
    models::contact::{Contact, ContactFields},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Contact create/update request
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// Contact name (required)
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Job title
    pub position: Option<String>,

    /// Company name
    pub company: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,
}

impl From<ContactRequest> for ContactFields {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            position: req.position,
            company: req.company,
            notes: req.notes,
        }
    }
}

/// Deletion response
#[derive(Debug, Serialize)]
pub struct DeleteContactResponse {
    /// Confirmation message
    pub message: String,
}

/// List the organization's contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Contact>>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let contacts = Contact::list_by_organization(&state.db, org_id).await?;

    Ok(Json(contacts))
}

/// Create a contact (OWNER or MODERATOR)
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let contact = Contact::create(&state.db, org_id, req.into()).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Fetch one contact
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, contact_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Contact>> {
    require_membership(&state.db, org_id, auth.user_id).await?;

    let contact = Contact::find_in_org(&state.db, org_id, contact_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    Ok(Json(contact))
}

/// Update a contact (OWNER or MODERATOR)
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, contact_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ContactRequest>,
) -> ApiResult<Json<Contact>> {
    req.validate().map_err(validation_error)?;

    authorize(&state.db, org_id, auth.user_id, OrgAction::ManageResources).await?;

    let contact = Contact::update(&state.db, org_id, contact_id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    Ok(Json(contact))
}

/// Delete a contact (OWNER only)
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((org_id, contact_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteContactResponse>> {
    authorize(&state.db, org_id, auth.user_id, OrgAction::DeleteResources).await?;

    let deleted = Contact::delete(&state.db, org_id, contact_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Contact not found".to_string()));
    }

    Ok(Json(DeleteContactResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}
