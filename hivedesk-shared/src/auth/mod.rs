/// Authentication and authorization
///
/// This module provides the security primitives used by the API server:
///
/// - `password`: Argon2id password hashing and verification
/// - `jwt`: Signed session tokens carried in the session cookie
/// - `session`: The authenticated-request context injected by middleware
/// - `authorization`: The per-organization role gate and its policy table

pub mod authorization;
pub mod jwt;
pub mod password;
pub mod session;

pub use authorization::{authorize, AuthzError, OrgAction};
pub use session::AuthContext;
