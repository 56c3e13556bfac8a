/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use ticketdesk_api::{app::AppState, config::Config};
/// use ticketdesk_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = ticketdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use ticketdesk_shared::auth::{
    jwt::TokenService,
    middleware::{authenticate, bearer_token, CurrentUser},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Bearer token issuer and verifier
    pub tokens: Arc<TokenService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let tokens = TokenService::new(&config.jwt.secret, config.token_ttl());

        Self {
            db,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                    # Health check (public)
/// ├── POST   /token                     # Login (public, form-encoded)
/// ├── POST   /users/                    # Registration (public)
/// ├── GET    /users/me/                 # Current user (authenticated)
/// ├── POST   /tickets/                  # Create ticket (authenticated)
/// ├── GET    /tickets/                  # List tickets (authenticated)
/// ├── GET    /tickets/:id               # Read ticket (authenticated)
/// ├── PUT    /tickets/:id               # Partial update (authenticated)
/// ├── DELETE /tickets/:id               # Delete ticket (authenticated)
/// ├── POST   /tickets/:id/comments/     # Add comment (authenticated)
/// └── GET    /tickets/:id/comments/     # List comments (public)
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (single credentialed origin, mirrored methods and headers)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/token", post(routes::auth::login))
        .route("/users/", post(routes::users::register))
        .route(
            "/tickets/:id/comments/",
            get(routes::comments::list_comments),
        );

    let protected_routes = Router::new()
        .route("/users/me/", get(routes::users::me))
        .route(
            "/tickets/",
            post(routes::tickets::create_ticket).get(routes::tickets::list_tickets),
        )
        .route(
            "/tickets/:id",
            get(routes::tickets::get_ticket)
                .put(routes::tickets::update_ticket)
                .delete(routes::tickets::delete_ticket),
        )
        .route(
            "/tickets/:id/comments/",
            post(routes::comments::create_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_user,
        ));

    let origins: Vec<HeaderValue> = state
        .config
        .api
        .cors_origin
        .parse()
        .ok()
        .into_iter()
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            origin = %state.config.api.cors_origin,
            "CORS_ORIGIN is not a valid header value; cross-origin requests will be refused"
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware
///
/// Resolves the token to an active user and injects [`CurrentUser`] into
/// request extensions. The lookup connection goes back to the pool before
/// the handler runs.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = {
        let mut conn = state.db.acquire().await?;
        authenticate(&mut conn, &state.tokens, bearer_token(req.headers())).await?
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
