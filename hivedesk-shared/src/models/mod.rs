/// Database models for HiveDesk
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `organization`: Tenant boundaries owning all other resources
/// - `membership`: User-organization relationships with roles and labels
/// - `label`: Tags grouping organization members for access control
/// - `chatroom`: Chatrooms with direct and label-based access rules
/// - `contact`: CRM records scoped to one organization
/// - `task`: Task tracker entries with assignment
/// - `notification`: Per-user notification rows
/// - `message`: Append-only chat messages
///
/// # Example
///
/// ```no_run
/// use hivedesk_shared::models::user::{User, CreateUser};
/// use hivedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "jdoe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod chatroom;
pub mod contact;
pub mod label;
pub mod membership;
pub mod message;
pub mod notification;
pub mod organization;
pub mod task;
pub mod user;
