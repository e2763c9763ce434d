/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `account`: The authenticated user's own account
/// - `organizations`: Organization listing/creation and membership probes
/// - `members`: Organization rosters and role management
/// - `labels`: Access-control labels
/// - `chatrooms`: Chatrooms, their access rules, and visible-member resolution
/// - `messages`: Chat history and posting
/// - `contacts`: CRM records
/// - `tasks`: Task tracker and assignment
/// - `notifications`: Per-user notifications

pub mod account;
pub mod auth;
pub mod chatrooms;
pub mod contacts;
pub mod health;
pub mod labels;
pub mod members;
pub mod messages;
pub mod notifications;
pub mod organizations;
pub mod tasks;
