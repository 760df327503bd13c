//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use gatherbot_core::config::GatewayConfig;
use gatherbot_core::error::Result;
use gatherbot_proposals::CommandRouter;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    /// Command router: parses inbound messages and drives the engine.
    pub router: Arc<CommandRouter>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self {
            router,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/webhook/whatsapp", post(super::routes::whatsapp_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(config: &GatewayConfig, state: AppState) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
