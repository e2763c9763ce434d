/// Session context for authenticated requests
///
/// After the session-cookie middleware validates the token it inserts an
/// `AuthContext` into the request extensions; handlers extract it with
/// Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use hivedesk_shared::auth::session::AuthContext;
/// use uuid::Uuid;
///
/// let auth = AuthContext::new(Uuid::new_v4());
/// println!("User: {}", auth.user_id);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the httpOnly session cookie
pub const SESSION_COOKIE: &str = "hivedesk_session";

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from validated session claims
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_roundtrip() {
        let user_id = Uuid::new_v4();
        let ctx = AuthContext::new(user_id);
        assert_eq!(ctx.user_id, user_id);
    }
}
