//! # RSVP Reader Library (rsvp-reader)
//!
//! Rapid serial visual presentation of clipboard text.
//!
//! **Purpose:** Turn recent clipboard entries into documents, play their words
//! one at a time at a fixed speed, and render each word so its optical
//! recognition point stays at the same spot on screen.
//!
//! **Architecture:** A pure playback engine returns snapshots and side
//! effects; the controller runs those effects on tokio (single-shot timers,
//! persistence, notifications); the renderer turns every snapshot into an SVG
//! frame served over HTTP/SSE.

pub mod api;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod playback;
pub mod render;
pub mod session;
pub mod state;

pub use controller::ReaderController;
pub use error::{Error, Result};
pub use state::SharedState;
