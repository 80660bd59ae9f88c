//! # RSVP Common Library
//!
//! Shared code for the RSVP reader workspace including:
//! - Error type
//! - Configuration loading and root folder resolution
//! - Event types (ReaderEvent enum) and playback vocabulary
//! - SQLite settings store
//! - Clipboard source interface

pub mod clipboard;
pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{PlaybackState, Wpm};
