/// Integration tests for the HiveDesk API
///
/// These drive the full router in-process (auth middleware included) and
/// verify the system's observable guarantees:
/// - registration/login behavior and credential-failure uniformity
/// - role gating (OWNER-only deletes, MODERATOR/MEMBER denials)
/// - chatroom access resolution (open-by-default, union without duplicates)
/// - assignment notifications
///
/// All tests require a running PostgreSQL database (DATABASE_URL) and Redis
/// (REDIS_URL), so they are ignored by default:
///
/// ```bash
/// cargo test -p hivedesk-api -- --ignored
/// ```

mod common;

use axum::http::{Method, StatusCode};
use common::{create_logged_in_user, create_organization, invite_member, send, TestContext};
use serde_json::json;

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();

    let user = create_logged_in_user(&ctx, "dup").await.unwrap();

    // Same email, different username: the second registration must fail.
    let (status, _) = send(
        &ctx,
        Method::POST,
        "/v1/auth/register",
        None,
        Some(json!({
            "username": format!("{}_other", user.username),
            "email": user.email,
            "password": "another-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_login_failure_does_not_leak_user_existence() {
    let ctx = TestContext::new().await.unwrap();

    let user = create_logged_in_user(&ctx, "leak").await.unwrap();

    // Wrong password for an existing user
    let (status_wrong_pw, body_wrong_pw) = send(
        &ctx,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "username": user.username, "password": "wrong-password" })),
    )
    .await;

    // Unknown user entirely
    let (status_unknown, body_unknown) = send(
        &ctx,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "username": "no_such_user_anywhere", "password": "whatever" })),
    )
    .await;

    assert_eq!(status_wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_wrong_pw["message"], body_unknown["message"],
        "credential failures must be indistinguishable"
    );
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_unauthenticated_is_401_not_403() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(&ctx, Method::GET, "/v1/organizations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&ctx, Method::GET, "/v1/account", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// The scenario from the task board: create org "Acme" as A (OWNER), invite
/// B as MEMBER, B cannot create a chatroom, A creates an unrestricted
/// "general", B can list it and see the full member roster.
#[tokio::test]
#[ignore] // Requires a running PostgreSQL database and Redis
async fn test_acme_scenario() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_logged_in_user(&ctx, "alice").await.unwrap();
    let bob = create_logged_in_user(&ctx, "bob").await.unwrap();

    let org_id = create_organization(&ctx, &alice, "Acme").await.unwrap();

    // A is OWNER
    let (status, body) = send(
        &ctx,
        Method::GET,
        &format!("/v1/organizations/{}/role", org_id),
        Some(&alice.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "OWNER");

    invite_member(&ctx, &alice, org_id, &bob, "MEMBER").await.unwrap();

    // B (MEMBER) cannot create a chatroom
    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/chatrooms", org_id),
        Some(&bob.cookie),
        Some(json!({ "name": "bob-room" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A creates "general" with no restrictions
    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/chatrooms", org_id),
        Some(&alice.cookie),
        Some(json!({ "name": "general", "description": "open room" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = body["id"].as_str().unwrap().to_string();

    // B can list it
    let (status, body) = send(
        &ctx,
        Method::GET,
        &format!("/v1/organizations/{}/chatrooms", org_id),
        Some(&bob.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(listed.contains(&room_id.as_str()));

    // B sees the full member roster: an unrestricted room resolves to the
    // whole organization.
    let (status, body) = send(
        &ctx,
        Method::GET,
        &format!("/v1/organizations/{}/chatrooms/{}/members", org_id, room_id),
        Some(&bob.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let visible = body.as_array().unwrap();
    assert_eq!(visible.len(), 2);

    let visible_ids: Vec<&str> = visible.iter().filter_map(|m| m["user_id"].as_str()).collect();
    assert!(visible_ids.contains(&alice.user_id.to_string().as_str()));
    assert!(visible_ids.contains(&bob.user_id.to_string().as_str()));
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database and Redis
async fn test_restricted_room_resolves_exact_union() {
    let ctx = TestContext::new().await.unwrap();

    let owner = create_logged_in_user(&ctx, "owner").await.unwrap();
    let direct = create_logged_in_user(&ctx, "direct").await.unwrap();
    let outsider = create_logged_in_user(&ctx, "outsider").await.unwrap();

    let org_id = create_organization(&ctx, &owner, "Restricted").await.unwrap();
    invite_member(&ctx, &owner, org_id, &direct, "MEMBER").await.unwrap();
    invite_member(&ctx, &owner, org_id, &outsider, "MEMBER").await.unwrap();

    // Room restricted to one direct member (duplicated in the request to
    // prove the resolver never returns duplicates either way).
    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/chatrooms", org_id),
        Some(&owner.cookie),
        Some(json!({ "name": "private", "member_ids": [direct.user_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let room_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &ctx,
        Method::GET,
        &format!("/v1/organizations/{}/chatrooms/{}/members", org_id, room_id),
        Some(&owner.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let visible = body.as_array().unwrap();
    assert_eq!(visible.len(), 1, "only the direct member is visible");
    assert_eq!(visible[0]["user_id"], direct.user_id.to_string());

    // The restricted room answers 404 to a member without access
    let (status, _) = send(
        &ctx,
        Method::GET,
        &format!("/v1/organizations/{}/chatrooms/{}", org_id, room_id),
        Some(&outsider.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_only_owner_may_delete() {
    let ctx = TestContext::new().await.unwrap();

    let owner = create_logged_in_user(&ctx, "owner").await.unwrap();
    let moderator = create_logged_in_user(&ctx, "mod").await.unwrap();
    let stranger = create_logged_in_user(&ctx, "stranger").await.unwrap();

    let org_id = create_organization(&ctx, &owner, "Deletes").await.unwrap();
    invite_member(&ctx, &owner, org_id, &moderator, "MODERATOR").await.unwrap();

    // Moderator may create a contact...
    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/contacts", org_id),
        Some(&moderator.cookie),
        Some(json!({ "name": "Jane Prospect" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let contact_id = body["id"].as_str().unwrap().to_string();

    // ...but not delete it
    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/v1/organizations/{}/contacts/{}", org_id, contact_id),
        Some(&moderator.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A non-member gets the same error class as the denied moderator
    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/v1/organizations/{}/contacts/{}", org_id, contact_id),
        Some(&stranger.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner may delete
    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/v1/organizations/{}/contacts/{}", org_id, contact_id),
        Some(&owner.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_assignment_notifications() {
    let ctx = TestContext::new().await.unwrap();

    let owner = create_logged_in_user(&ctx, "owner").await.unwrap();
    let assignee = create_logged_in_user(&ctx, "assignee").await.unwrap();

    let org_id = create_organization(&ctx, &owner, "Tasks").await.unwrap();
    invite_member(&ctx, &owner, org_id, &assignee, "MEMBER").await.unwrap();

    // Create unassigned, then assign
    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/tasks", org_id),
        Some(&owner.cookie),
        Some(json!({ "title": "Ship the release" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/tasks/{}/assign", org_id, task_id),
        Some(&owner.cookie),
        Some(json!({ "user_id": assignee.user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Exactly one unread notification referencing the task title
    let (status, body) = send(
        &ctx,
        Method::GET,
        "/v1/notifications",
        Some(&assignee.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let notifications = body.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["is_read"], false);
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains("Ship the release"));

    // Unassign notifies the previously assigned user
    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/tasks/{}/unassign", org_id, task_id),
        Some(&owner.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &ctx,
        Method::GET,
        "/v1/notifications",
        Some(&assignee.cookie),
        None,
    )
    .await;

    let notifications = body.as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .any(|n| n["message"].as_str().unwrap().contains("has been unassigned")));
}

#[tokio::test]
#[ignore] // Requires a running PostgreSQL database
async fn test_notifications_are_user_scoped() {
    let ctx = TestContext::new().await.unwrap();

    let owner = create_logged_in_user(&ctx, "owner").await.unwrap();
    let assignee = create_logged_in_user(&ctx, "assignee").await.unwrap();

    let org_id = create_organization(&ctx, &owner, "Scoped").await.unwrap();
    invite_member(&ctx, &owner, org_id, &assignee, "MEMBER").await.unwrap();

    let (_, body) = send(
        &ctx,
        Method::POST,
        &format!("/v1/organizations/{}/tasks", org_id),
        Some(&owner.cookie),
        Some(json!({ "title": "Scoped task", "assigned_to": assignee.user_id })),
    )
    .await;
    let _task_id = body["id"].as_str().unwrap();

    let (_, body) = send(
        &ctx,
        Method::GET,
        "/v1/notifications",
        Some(&assignee.cookie),
        None,
    )
    .await;
    let notification_id = body[0]["id"].as_str().unwrap().to_string();

    // The owner cannot delete the assignee's notification
    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/v1/notifications/{}", notification_id),
        Some(&owner.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The assignee can
    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/v1/notifications/{}", notification_id),
        Some(&assignee.cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
