//! Server-Sent Events (SSE) broadcaster
//!
//! Streams reader events to connected clients. A new client first receives
//! the frame currently on screen, then every event from then on.

use crate::api::server::AppContext;
use crate::render::render_snapshot;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use rsvp_common::events::ReaderEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// GET /events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    // Subscribe before reading the snapshot so nothing falls in between
    let rx = ctx.controller.shared_state().subscribe_events();
    let snapshot = ctx.controller.snapshot();
    let frame = render_snapshot(&snapshot);
    let initial = ReaderEvent::FrameRendered {
        document_id: snapshot.document_id,
        index: snapshot.index,
        total: snapshot.total,
        alt_text: frame.alt_text().to_string(),
        markdown: frame.markdown(),
        timestamp: chrono::Utc::now(),
    };

    let updates = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => to_sse(&event),
            Err(e) => {
                // Lagged; the client catches up with later frames
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    let stream = async_stream::stream! {
        if let Some(event) = to_sse(&initial) {
            yield event;
        }
        futures::pin_mut!(updates);
        while let Some(event) = updates.next().await {
            yield event;
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_sse(event: &ReaderEvent) -> Option<Result<Event, Infallible>> {
    match serde_json::to_string(event) {
        Ok(json) => {
            let event_type = event.event_type();
            debug!("Broadcasting SSE event: {}", event_type);
            Some(Ok(Event::default().event(event_type).data(json)))
        }
        Err(e) => {
            warn!("Failed to serialize event: {}", e);
            None
        }
    }
}
