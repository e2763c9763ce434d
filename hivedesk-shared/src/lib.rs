//! # HiveDesk Shared Library
//!
//! This crate contains the types and business logic shared by the HiveDesk
//! API server: database models, authentication and authorization primitives,
//! chatroom access resolution, and the real-time publisher.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Passwords, session tokens, and the authorization gate
//! - `access`: Chatroom visibility resolution
//! - `mentions`: `@username` extraction from chat messages
//! - `realtime`: Redis client and message-event publisher
//! - `db`: Connection pool and migration runner

pub mod access;
pub mod auth;
pub mod db;
pub mod mentions;
pub mod models;
pub mod realtime;

/// Current version of the HiveDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
