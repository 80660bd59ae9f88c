//! Snapshot-to-frame publisher
//!
//! Subscribes to playback snapshots and broadcasts one `FrameRendered` event
//! per snapshot.

use super::render_snapshot;
use crate::state::SharedState;
use rsvp_common::events::ReaderEvent;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Start the frame publisher task
///
/// The task keeps running for as long as `state` lives; abort the handle to
/// stop it.
pub fn spawn_frame_publisher(state: Arc<SharedState>) -> JoinHandle<()> {
    let mut snapshots = state.subscribe_snapshots();

    tokio::spawn(async move {
        loop {
            let snapshot = match snapshots.recv().await {
                Ok(snapshot) => snapshot,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Frame publisher lagged, skipped {} snapshots", skipped);
                    state.current_snapshot()
                }
                Err(RecvError::Closed) => break,
            };

            let frame = render_snapshot(&snapshot);
            state.broadcast_event(ReaderEvent::FrameRendered {
                document_id: snapshot.document_id,
                index: snapshot.index,
                total: snapshot.total,
                alt_text: frame.alt_text().to_string(),
                markdown: frame.markdown(),
                timestamp: chrono::Utc::now(),
            });
        }
        debug!("Frame publisher stopped");
    })
}
