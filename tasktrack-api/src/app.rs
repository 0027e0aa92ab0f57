/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::{build_router, AppState}, config::Config};
/// use tasktrack_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::from_config(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use tasktrack_shared::auth::{
    middleware::require_bearer,
    revocation::{InMemoryRevocationStore, PgRevocationStore, RevocationStore},
    token_service::{TokenService, DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::{Config, RevocationBackend};

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; all fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token issuance and validation
    pub tokens: TokenService,
}

impl AppState {
    /// Creates state with an explicit token service
    pub fn new(db: PgPool, config: Config, tokens: TokenService) -> Self {
        Self {
            db,
            config: Arc::new(config),
            tokens,
        }
    }

    /// Creates state, building the token service and revocation store from config
    pub fn from_config(db: PgPool, config: Config) -> Self {
        let revocations: Arc<dyn RevocationStore> = match config.jwt.revocation_backend {
            RevocationBackend::Memory => Arc::new(InMemoryRevocationStore::new()),
            RevocationBackend::Postgres => Arc::new(PgRevocationStore::new(db.clone())),
        };

        // `Config::from_env` bounds both values; fall back for hand-built configs
        let access_ttl = Duration::try_minutes(config.jwt.access_ttl_minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES));
        let refresh_ttl = Duration::try_days(config.jwt.refresh_ttl_days)
            .unwrap_or_else(|| Duration::days(DEFAULT_REFRESH_TTL_DAYS));

        let tokens =
            TokenService::with_ttls(config.jwt.secret.clone(), access_ttl, refresh_ttl, revocations);

        Self::new(db, config, tokens)
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET    /health                 # public
/// ├── POST   /register               # public, multipart
/// ├── POST   /login                  # public
/// ├── POST   /refresh                # public, refresh token in body
/// └── (bearer required)
///     ├── POST   /logout
///     ├── PUT    /profile/update     # multipart
///     ├── GET    /user/:id
///     ├── GET    /users
///     ├── GET    /companies
///     ├── GET    /tasks
///     ├── POST   /tasks
///     ├── PUT    /tasks/:id/complete
///     └── DELETE /tasks/:id
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/profile/update", put(routes::users::update_profile_pic))
        .route("/user/:id", get(routes::users::get_user))
        .route("/users", get(routes::users::list_users))
        .route("/companies", get(routes::companies::company_progress))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/:id/complete", put(routes::tasks::complete_task))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
