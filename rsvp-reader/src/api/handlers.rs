//! HTTP request handlers

use crate::api::server::AppContext;
use crate::document::DocumentSummary;
use crate::error::Error;
use crate::playback::PlaybackSnapshot;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rsvp_common::Wpm;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    documents: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SpeedRequest {
    wpm: u32,
}

#[derive(Debug, Serialize)]
pub struct SpeedResponse {
    wpm: Wpm,
}

#[derive(Debug, Serialize)]
pub struct SpeedMenuResponse {
    speeds: Vec<Wpm>,
    selected: Wpm,
}

#[derive(Debug, Serialize)]
pub struct FrameResponse {
    markdown: String,
    alt_text: String,
}

type ApiError = (StatusCode, Json<StatusResponse>);

fn error_response(e: Error) -> ApiError {
    let status = match &e {
        Error::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidSpeed(_) => StatusCode::BAD_REQUEST,
        _ => {
            error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(StatusResponse {
            status: format!("error: {}", e),
        }),
    )
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "rsvp_reader".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Document Endpoints
// ============================================================================

/// GET /documents - Documents of the session, most recent first
pub async fn list_documents(State(ctx): State<AppContext>) -> Json<DocumentListResponse> {
    Json(DocumentListResponse {
        documents: ctx.controller.documents().await,
    })
}

/// POST /documents/:id/select - Read a document from its first word
pub async fn select_document(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    info!("Select document: {}", id);
    ctx.controller
        .select(id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// DELETE /documents/:id - Remove a document and never offer it again
pub async fn delete_document(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    info!("Delete document: {}", id);
    ctx.controller
        .delete(id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /documents/:id/copy - Put a document's text on the clipboard
pub async fn copy_document(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    ctx.controller.copy(id).await.map_err(error_response)?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// POST /playback/toggle - Play/pause, or restart a finished document
pub async fn toggle(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.controller.toggle().await)
}

/// POST /playback/play - Resume, or start over once finished
pub async fn play(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.controller.play().await)
}

/// POST /playback/pause
pub async fn pause(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.controller.pause().await)
}

/// POST /playback/restart - Back to the first word, playing
pub async fn restart(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.controller.restart().await)
}

/// GET /playback/state - Current playback snapshot
pub async fn get_playback_state(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.controller.snapshot())
}

/// GET /playback/speed - Current reading speed
pub async fn get_speed(State(ctx): State<AppContext>) -> Json<SpeedResponse> {
    Json(SpeedResponse {
        wpm: ctx.controller.snapshot().wpm,
    })
}

/// POST /playback/speed - Change reading speed
pub async fn set_speed(
    State(ctx): State<AppContext>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<SpeedResponse>, ApiError> {
    info!("Set speed: {} WPM", req.wpm);
    let snapshot = ctx
        .controller
        .set_speed(req.wpm)
        .await
        .map_err(error_response)?;
    Ok(Json(SpeedResponse { wpm: snapshot.wpm }))
}

/// GET /playback/speeds - Speed menu with the current choice
pub async fn list_speeds(State(ctx): State<AppContext>) -> Json<SpeedMenuResponse> {
    Json(SpeedMenuResponse {
        speeds: Wpm::menu().collect(),
        selected: ctx.controller.snapshot().wpm,
    })
}

// ============================================================================
// Frame Endpoint
// ============================================================================

/// GET /frame - Markdown for the word currently shown
pub async fn get_frame(State(ctx): State<AppContext>) -> Json<FrameResponse> {
    let frame = ctx.controller.frame();
    Json(FrameResponse {
        markdown: frame.markdown(),
        alt_text: frame.alt_text().to_string(),
    })
}
