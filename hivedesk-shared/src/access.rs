/// Chatroom access resolution
///
/// Who can see a chatroom is the union of two rule sets: users granted
/// direct access (`chatroom_members`) and users carrying a label granted
/// access (`chatroom_label_access` × member labels). A room with no rules in
/// either set is open to every member of its organization.
///
/// The resolver returns each user once — membership is keyed by user id, and
/// the first occurrence wins (direct access before label access). Order
/// beyond that is not part of the contract.
///
/// # Example
///
/// ```no_run
/// use hivedesk_shared::access::resolve_visible_members;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, org_id: Uuid, room_id: Uuid) -> Result<(), sqlx::Error> {
/// let members = resolve_visible_members(&pool, org_id, room_id).await?;
/// println!("{} users can see this room", members.len());
/// # Ok(())
/// # }
/// ```

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chatroom::Chatroom;
use crate::models::membership::{MemberWithUser, Membership};

/// Resolves the set of users who can see a chatroom
///
/// - No access rules configured → every member of the organization.
/// - Otherwise → direct members ∪ label members, deduplicated by user id.
///
/// Each entry carries the user's actual organization role.
///
/// # Errors
///
/// Returns an error if any of the underlying queries fail.
pub async fn resolve_visible_members(
    pool: &PgPool,
    organization_id: Uuid,
    chatroom_id: Uuid,
) -> Result<Vec<MemberWithUser>, sqlx::Error> {
    let direct = Chatroom::direct_members_with_users(pool, chatroom_id).await?;
    let label_ids = Chatroom::granted_label_ids(pool, chatroom_id).await?;

    // Open by default: a room with no rules is visible to the whole org.
    if direct.is_empty() && label_ids.is_empty() {
        return Membership::list_with_users(pool, organization_id).await;
    }

    let labeled =
        Membership::list_with_users_by_labels(pool, organization_id, &label_ids).await?;

    Ok(merge_access_sets(direct, labeled))
}

/// Unions the direct and label access sets, deduplicating by user id
///
/// First occurrence wins; direct entries come first so a user in both sets
/// keeps their direct entry.
pub fn merge_access_sets(
    direct: Vec<MemberWithUser>,
    labeled: Vec<MemberWithUser>,
) -> Vec<MemberWithUser> {
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(direct.len() + labeled.len());
    let mut merged = Vec::with_capacity(direct.len() + labeled.len());

    for member in direct.into_iter().chain(labeled) {
        if seen.insert(member.user_id) {
            merged.push(member);
        }
    }

    merged
}

/// Checks whether one user can see a chatroom
///
/// Same rule as [`resolve_visible_members`], evaluated in the database:
/// the room is unrestricted, or the user is a direct member, or the user
/// carries a granted label.
pub async fn user_can_access(
    pool: &PgPool,
    organization_id: Uuid,
    chatroom_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let can_access: bool = sqlx::query_scalar(
        r#"
        SELECT
            (NOT EXISTS (SELECT 1 FROM chatroom_members cm WHERE cm.chatroom_id = $1)
             AND NOT EXISTS (SELECT 1 FROM chatroom_label_access ca WHERE ca.chatroom_id = $1))
            OR EXISTS (
                SELECT 1 FROM chatroom_members cm
                WHERE cm.chatroom_id = $1 AND cm.user_id = $3
            )
            OR EXISTS (
                SELECT 1
                FROM chatroom_label_access ca
                JOIN organization_members om
                  ON om.label_id = ca.label_id AND om.organization_id = $2
                WHERE ca.chatroom_id = $1 AND om.user_id = $3
            )
        "#,
    )
    .bind(chatroom_id)
    .bind(organization_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(can_access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::membership::OrgRole;

    fn member(id: Uuid, username: &str, role: OrgRole) -> MemberWithUser {
        MemberWithUser {
            user_id: id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
        }
    }

    #[test]
    fn test_merge_disjoint_sets() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let merged = merge_access_sets(
            vec![member(a, "alice", OrgRole::Owner)],
            vec![member(b, "bob", OrgRole::Member)],
        );

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_deduplicates_by_user_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let merged = merge_access_sets(
            vec![member(a, "alice", OrgRole::Owner), member(b, "bob", OrgRole::Member)],
            vec![member(a, "alice", OrgRole::Owner), member(b, "bob", OrgRole::Member)],
        );

        assert_eq!(merged.len(), 2);

        let ids: HashSet<Uuid> = merged.iter().map(|m| m.user_id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_merge_first_occurrence_wins() {
        let a = Uuid::new_v4();

        // Same user id with differing usernames; the direct entry must win.
        let merged = merge_access_sets(
            vec![member(a, "direct", OrgRole::Member)],
            vec![member(a, "labeled", OrgRole::Member)],
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].username, "direct");
    }

    #[test]
    fn test_merge_empty_sets() {
        let merged = merge_access_sets(vec![], vec![]);
        assert!(merged.is_empty());
    }

    // resolve_visible_members and user_can_access are covered by the
    // database integration tests in tests/.
}
