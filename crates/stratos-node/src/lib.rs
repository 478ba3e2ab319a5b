//! # Stratos Node
//!
//! Stratos node library: API router, engine, and server bootstrap.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod api;
pub mod config;
pub mod engine;
pub mod state;

pub use config::NodeConfig;
pub use engine::Engine;
pub use state::AppState;

/// Install the global tracing subscriber, env-filtered with `info` default.
pub fn init_tracing() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Run the Stratos node server.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    info!("🚀 Stratos Node starting...");

    // Create shared application state
    let state = AppState::from_config(&config);

    // Build the router
    let app = create_router(state);

    info!("🌐 Listening on http://{}", config.addr);

    // Start the server
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Brief API
        .route("/api/v1/briefs", post(api::brief::create_brief))
        .route("/api/v1/briefs", get(api::brief::list_briefs))
        .route("/api/v1/briefs/:id", get(api::brief::get_brief))
        .route("/api/v1/briefs/:id", delete(api::brief::delete_brief))
        .route(
            "/api/v1/briefs/:id/components",
            put(api::brief::submit_component),
        )
        .route("/api/v1/briefs/:id/context", get(api::brief::get_context))
        // Strategy API
        .route(
            "/api/v1/briefs/:id/strategy",
            post(api::strategy::generate_strategy),
        )
        .route(
            "/api/v1/briefs/:id/strategy",
            get(api::strategy::get_strategy_for_brief),
        )
        .route("/api/v1/strategies/:id", get(api::strategy::get_strategy))
        .route(
            "/api/v1/strategies/:id/open",
            post(api::strategy::open_strategy),
        )
        .route(
            "/api/v1/strategies/:id/sections/:section_id",
            patch(api::strategy::edit_section),
        )
        .route(
            "/api/v1/strategies/:id/approve",
            post(api::strategy::approve_strategy),
        )
        .route(
            "/api/v1/strategies/:id/blocks/order",
            put(api::strategy::reorder_blocks),
        )
        // Delivery
        .route(
            "/api/v1/strategies/:id/deliver",
            post(api::deliver::deliver_strategy),
        )
        // WebSocket endpoint
        .route("/ws/briefs/:id/strategy", get(api::ws::strategy_stream))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
