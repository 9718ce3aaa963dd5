/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use gigboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = gigboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use gigboard_shared::auth::middleware::create_session_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The pool
/// and config are both read-only after startup; request handlers never
/// mutate shared state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the signing secret for session token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /auth/
/// │   ├── POST /register         # Create account (public)
/// │   ├── POST /login            # Authenticate (public)
/// │   └── GET  /me               # Current identity (session required)
/// └── /tasks/                    # All task routes require a session
///     ├── POST   /               # Post a task
///     ├── GET    /?page&limit    # List all tasks
///     ├── GET    /my-tasks       # Tasks created or claimed by the caller
///     ├── POST   /:id/claim      # Claim a task
///     ├── POST   /:id/unclaim    # Release a claim
///     └── DELETE /:id            # Delete (creator only)
/// ```
///
/// # Middleware Stack
///
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer, configured from `CORS_ORIGINS`)
/// 3. Session authentication (per route group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let session_layer =
        axum::middleware::from_fn(create_session_middleware(state.jwt_secret().to_string()));

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes; only /me needs a session
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(session_layer.clone()),
        );

    // Task routes all require a session
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task).get(routes::tasks::list_tasks))
        .route("/my-tasks", get(routes::tasks::list_my_tasks))
        .route("/:id/claim", post(routes::tasks::claim_task))
        .route("/:id/unclaim", post(routes::tasks::unclaim_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .layer(session_layer);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
