/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use hivedesk_api::{app::AppState, config::Config};
/// use hivedesk_shared::realtime::{MessagePublisher, RedisClient, RedisConfig};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let redis = RedisClient::new(RedisConfig::from_url(&config.redis.url)).await?;
/// let state = AppState::new(pool, MessagePublisher::new(redis), config);
/// let app = hivedesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use hivedesk_shared::auth::{jwt, session::AuthContext, session::SESSION_COOKIE};
use hivedesk_shared::models::user::User;
use hivedesk_shared::realtime::MessagePublisher;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. All fields
/// are cheap to clone (pool handles and an Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Real-time channel publisher
    pub publisher: MessagePublisher,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, publisher: MessagePublisher, config: Config) -> Self {
        Self {
            db,
            publisher,
            config: Arc::new(config),
        }
    }

    /// Gets the secret used to sign session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                    # Health check (public)
/// └── /v1/
///     ├── /auth/ register|login|logout           # Public
///     ├── /auth/user                             # Session required
///     ├── /account                               # Own account (GET/PUT/DELETE)
///     ├── /organizations                         # List/create
///     │   └── /:org_id/...                       # Org-scoped resources
///     │       ├── /role /membership /members /labels
///     │       ├── /chatrooms[/:id[/members|/messages]]
///     │       ├── /contacts[/:id]
///     │       └── /tasks[/:id[/assign|/unassign]]
///     └── /notifications[/:id]                   # Own notifications
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes; register/login/logout are public, /user requires a session
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/user",
            get(routes::auth::current_user).layer(axum::middleware::from_fn_with_state(
                state.clone(),
                session_auth_layer,
            )),
        );

    // Own-account routes
    let account_routes = Router::new().route(
        "/",
        get(routes::account::get_account)
            .put(routes::account::update_account)
            .delete(routes::account::delete_account),
    );

    // Organization-scoped routes
    let org_routes = Router::new()
        .route(
            "/",
            get(routes::organizations::list_organizations)
                .post(routes::organizations::create_organization),
        )
        .route("/:org_id", get(routes::organizations::get_organization))
        .route("/:org_id/role", get(routes::organizations::get_my_role))
        .route(
            "/:org_id/membership",
            get(routes::organizations::check_membership),
        )
        .route(
            "/:org_id/members",
            get(routes::members::list_members).post(routes::members::add_member),
        )
        .route(
            "/:org_id/members/:user_id/role",
            patch(routes::members::update_member_role),
        )
        .route(
            "/:org_id/members/:user_id/label",
            patch(routes::members::set_member_label),
        )
        .route(
            "/:org_id/members/:user_id",
            delete(routes::members::remove_member),
        )
        .route(
            "/:org_id/labels",
            get(routes::labels::list_labels).post(routes::labels::create_label),
        )
        .route(
            "/:org_id/chatrooms",
            get(routes::chatrooms::list_chatrooms).post(routes::chatrooms::create_chatroom),
        )
        .route(
            "/:org_id/chatrooms/:chatroom_id",
            get(routes::chatrooms::get_chatroom)
                .patch(routes::chatrooms::update_chatroom)
                .delete(routes::chatrooms::delete_chatroom),
        )
        .route(
            "/:org_id/chatrooms/:chatroom_id/members",
            get(routes::chatrooms::list_visible_members),
        )
        .route(
            "/:org_id/chatrooms/:chatroom_id/messages",
            get(routes::messages::list_messages).post(routes::messages::post_message),
        )
        .route(
            "/:org_id/contacts",
            get(routes::contacts::list_contacts).post(routes::contacts::create_contact),
        )
        .route(
            "/:org_id/contacts/:contact_id",
            get(routes::contacts::get_contact)
                .patch(routes::contacts::update_contact)
                .delete(routes::contacts::delete_contact),
        )
        .route(
            "/:org_id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:org_id/tasks/:task_id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:org_id/tasks/:task_id/assign", post(routes::tasks::assign_task))
        .route(
            "/:org_id/tasks/:task_id/unassign",
            post(routes::tasks::unassign_task),
        );

    // Notification routes, scoped to the requesting user
    let notification_routes = Router::new()
        .route(
            "/",
            get(routes::notifications::list_notifications)
                .patch(routes::notifications::mark_all_read)
                .delete(routes::notifications::delete_notification_by_body),
        )
        .route(
            "/:id",
            patch(routes::notifications::mark_read)
                .delete(routes::notifications::delete_notification),
        );

    // Everything below requires a valid session cookie
    let session_routes = Router::new()
        .nest("/account", account_routes)
        .nest("/organizations", org_routes)
        .nest("/notifications", notification_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(session_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session-cookie authentication middleware
///
/// Validates the session token from the `hivedesk_session` cookie, confirms
/// the user still exists, and injects `AuthContext` into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))?;

    let claims = jwt::validate_session_token(&token, state.jwt_secret())?;

    // A token can outlive its account; treat that as no session.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".to_string()))?;

    req.extensions_mut().insert(AuthContext::new(user.id));

    Ok(next.run(req).await)
}
