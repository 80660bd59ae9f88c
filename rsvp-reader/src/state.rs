//! Shared reader state
//!
//! Channels connecting the controller to its observers: domain events for SSE
//! clients, and playback snapshots for the frame renderer.

use crate::playback::PlaybackSnapshot;
use rsvp_common::events::ReaderEvent;
use rsvp_common::Wpm;
use tokio::sync::{broadcast, watch};

/// Shared state accessible by all components
pub struct SharedState {
    /// Event broadcaster for SSE events
    event_tx: broadcast::Sender<ReaderEvent>,

    /// Every published snapshot, in order
    snapshot_tx: broadcast::Sender<PlaybackSnapshot>,

    /// Most recent snapshot
    latest_tx: watch::Sender<PlaybackSnapshot>,
}

impl SharedState {
    /// Create new shared state; the initial snapshot is idle at `wpm`
    pub fn new(wpm: Wpm) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, _) = broadcast::channel(100);
        let (latest_tx, _) = watch::channel(PlaybackSnapshot::idle(wpm));
        Self {
            event_tx,
            snapshot_tx,
            latest_tx,
        }
    }

    /// Broadcast an event to all SSE listeners
    pub fn broadcast_event(&self, event: ReaderEvent) {
        // No receivers is OK
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to event stream for SSE
    pub fn subscribe_events(&self) -> broadcast::Receiver<ReaderEvent> {
        self.event_tx.subscribe()
    }

    /// Publish a snapshot, returning the one it replaces
    pub fn publish_snapshot(&self, snapshot: PlaybackSnapshot) -> PlaybackSnapshot {
        let _ = self.snapshot_tx.send(snapshot.clone());
        self.latest_tx.send_replace(snapshot)
    }

    /// Subscribe to every snapshot published from now on
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<PlaybackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn current_snapshot(&self) -> PlaybackSnapshot {
        self.latest_tx.borrow().clone()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(Wpm::DEFAULT)
    }
}
