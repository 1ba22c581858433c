//! PromptOverflow Backend
//!
//! REST backend for a prompt troubleshooting forum: posts, votes, comments and tag filtering,
//! persisted as JSON values in a SQLite key-value store.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::KvStore;
use store::Forum;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub forum: Arc<Forum>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PromptOverflow Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize key-value store and load forum state
    let pool = db::init_database(&config.db_path).await?;
    let forum = Arc::new(Forum::load(KvStore::new(pool), config.seed_demo).await?);

    let app = create_router(AppState { forum });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Forum
        .route("/forum", get(api::get_forum))
        .route("/users", get(api::list_users))
        // Posts
        .route("/posts", get(api::list_posts).post(api::create_post))
        .route("/posts/{id}", get(api::get_post))
        .route("/posts/{id}/vote", post(api::vote_post))
        .route("/posts/{id}/comments", post(api::add_comment))
        // Tags
        .route("/tags", get(api::list_tags))
        .route("/tags/toggle", post(api::toggle_tag))
        // Session
        .route(
            "/session",
            get(api::get_session)
                .post(api::login)
                .delete(api::logout),
        )
        .route("/session/register", post(api::register));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
