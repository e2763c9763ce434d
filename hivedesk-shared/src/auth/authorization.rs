/// The organization authorization gate
///
/// Every org-scoped action is checked here: look up the caller's unique
/// membership row, then consult a static policy table mapping the action to
/// its allowed role set. A missing membership denies exactly like an
/// insufficient role — both surface as HTTP 403 at the API boundary,
/// distinct from a missing session (401).
///
/// The role set is deliberately not a transitive hierarchy. Deleting
/// org-scoped resources and managing member roles require exactly OWNER;
/// a MODERATOR is not "almost an owner" for those actions.
///
/// # Example
///
/// ```no_run
/// use hivedesk_shared::auth::authorization::{authorize, OrgAction};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, org_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Deny unless the caller may create/update resources in this org
/// let role = authorize(&pool, org_id, user_id, OrgAction::ManageResources).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{Membership, OrgRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the organization
    #[error("Not a member of organization {0}")]
    NotMember(Uuid),

    /// User's role does not permit the action
    #[error("Role {role:?} may not perform {action:?}")]
    ActionNotAllowed { action: OrgAction, role: OrgRole },

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Org-scoped actions, each with a fixed allowed-role set
///
/// This is the single policy table; handlers name the action and never
/// compare roles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgAction {
    /// Read org-scoped resources (any member)
    ViewResources,

    /// Create or update chatrooms, contacts, and tasks
    ManageResources,

    /// Delete chatrooms, contacts, and tasks
    DeleteResources,

    /// Add a member to the organization
    InviteMembers,

    /// Change a member's role or remove a member
    ManageMembers,
}

impl OrgAction {
    /// The roles permitted to perform this action
    pub fn allowed_roles(&self) -> &'static [OrgRole] {
        match self {
            OrgAction::ViewResources => &[OrgRole::Owner, OrgRole::Moderator, OrgRole::Member],
            OrgAction::ManageResources => &[OrgRole::Owner, OrgRole::Moderator],
            OrgAction::DeleteResources => &[OrgRole::Owner],
            OrgAction::InviteMembers => &[OrgRole::Owner, OrgRole::Moderator],
            OrgAction::ManageMembers => &[OrgRole::Owner],
        }
    }

    /// Whether the given role may perform this action
    pub fn permits(&self, role: OrgRole) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Authorizes an org-scoped action for a user
///
/// Looks up the unique (organization_id, user_id) membership row and checks
/// the action's policy entry.
///
/// # Returns
///
/// The caller's role, for handlers that want it after the check.
///
/// # Errors
///
/// - `AuthzError::NotMember` if the user has no membership row
/// - `AuthzError::ActionNotAllowed` if the role is not in the action's set
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn authorize(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
    action: OrgAction,
) -> Result<OrgRole, AuthzError> {
    let role = Membership::get_role(pool, organization_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(organization_id))?;

    if !action.permits(role) {
        return Err(AuthzError::ActionNotAllowed { action, role });
    }

    Ok(role)
}

/// Requires that the user is a member of the organization (any role)
///
/// Shorthand for `authorize(.., OrgAction::ViewResources)`.
pub async fn require_membership(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<OrgRole, AuthzError> {
    authorize(pool, organization_id, user_id, OrgAction::ViewResources).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_member_may_view() {
        for role in [OrgRole::Owner, OrgRole::Moderator, OrgRole::Member] {
            assert!(OrgAction::ViewResources.permits(role));
        }
    }

    #[test]
    fn test_member_may_not_manage() {
        assert!(OrgAction::ManageResources.permits(OrgRole::Owner));
        assert!(OrgAction::ManageResources.permits(OrgRole::Moderator));
        assert!(!OrgAction::ManageResources.permits(OrgRole::Member));

        assert!(OrgAction::InviteMembers.permits(OrgRole::Moderator));
        assert!(!OrgAction::InviteMembers.permits(OrgRole::Member));
    }

    #[test]
    fn test_delete_requires_exactly_owner() {
        assert!(OrgAction::DeleteResources.permits(OrgRole::Owner));
        assert!(!OrgAction::DeleteResources.permits(OrgRole::Moderator));
        assert!(!OrgAction::DeleteResources.permits(OrgRole::Member));

        assert!(OrgAction::ManageMembers.permits(OrgRole::Owner));
        assert!(!OrgAction::ManageMembers.permits(OrgRole::Moderator));
        assert!(!OrgAction::ManageMembers.permits(OrgRole::Member));
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::ActionNotAllowed {
            action: OrgAction::DeleteResources,
            role: OrgRole::Moderator,
        };
        assert!(err.to_string().contains("Moderator"));
    }
}
