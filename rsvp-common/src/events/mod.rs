//! Event types for the RSVP reader event system
//!
//! Events are broadcast by the reader controller and serialized for SSE
//! transmission. All events use this central enum for exhaustive matching.

mod playback_types;

pub use playback_types::{NotificationStyle, PlaybackState, Wpm};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reader event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReaderEvent {
    /// Clipboard entries were turned into the session's document set
    ///
    /// Emitted once per session, after startup.
    DocumentsLoaded {
        /// Number of eligible documents
        count: usize,
        /// When loading completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Selected document changed (None when nothing is left to select)
    DocumentSelected {
        document_id: Option<Uuid>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Document removed and blacklisted
    DocumentDeleted {
        document_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback state changed (Playing ↔ Paused, Finished, Idle)
    ///
    /// Triggers:
    /// - SSE: Update play/pause action title
    PlaybackStateChanged {
        /// Playback state before change
        old_state: PlaybackState,
        /// Playback state after change
        new_state: PlaybackState,
        /// When state changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Reading speed changed
    SpeedChanged {
        wpm: Wpm,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A new frame is ready for display
    ///
    /// One per published playback snapshot.
    FrameRendered {
        /// Document the frame belongs to
        document_id: Option<Uuid>,
        /// Word index within the document
        index: usize,
        /// Word count of the document
        total: usize,
        /// Alt text (displayed word, placeholder, or empty for the fallback frame)
        alt_text: String,
        /// Markdown with embedded data-URI image
        markdown: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// User-facing notification (toast)
    Notification {
        style: NotificationStyle,
        title: String,
        message: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ReaderEvent {
    /// Event name used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            ReaderEvent::DocumentsLoaded { .. } => "DocumentsLoaded",
            ReaderEvent::DocumentSelected { .. } => "DocumentSelected",
            ReaderEvent::DocumentDeleted { .. } => "DocumentDeleted",
            ReaderEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            ReaderEvent::SpeedChanged { .. } => "SpeedChanged",
            ReaderEvent::FrameRendered { .. } => "FrameRendered",
            ReaderEvent::Notification { .. } => "Notification",
        }
    }

    /// Build a notification event stamped with the current time
    pub fn notification(
        style: NotificationStyle,
        title: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        ReaderEvent::Notification {
            style,
            title: title.into(),
            message,
            timestamp: chrono::Utc::now(),
        }
    }
}
