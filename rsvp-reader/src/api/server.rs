//! HTTP server setup and routing
//!
//! Sets up the Axum router for control endpoints and SSE.

use crate::controller::ReaderController;
use crate::error::{Error, Result};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub controller: ReaderController,
}

/// Build the router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(super::handlers::health))

        // Document list
        .route("/documents", get(super::handlers::list_documents))
        .route("/documents/:id", delete(super::handlers::delete_document))
        .route("/documents/:id/select", post(super::handlers::select_document))
        .route("/documents/:id/copy", post(super::handlers::copy_document))

        // Playback control
        .route("/playback/toggle", post(super::handlers::toggle))
        .route("/playback/play", post(super::handlers::play))
        .route("/playback/pause", post(super::handlers::pause))
        .route("/playback/restart", post(super::handlers::restart))
        .route("/playback/state", get(super::handlers::get_playback_state))
        .route("/playback/speed", get(super::handlers::get_speed))
        .route("/playback/speed", post(super::handlers::set_speed))
        .route("/playback/speeds", get(super::handlers::list_speeds))

        // Rendered frame
        .route("/frame", get(super::handlers::get_frame))

        // SSE event stream
        .route("/events", get(super::sse::event_stream))

        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server until `shutdown` resolves
pub async fn run<F>(port: u16, ctx: AppContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(ctx);

    // Local control API only
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
