//! Playback engine and its timing rules

pub mod engine;
pub mod timing;
pub mod types;

pub use engine::PlaybackEngine;
pub use rsvp_common::{PlaybackState, Wpm};
pub use timing::word_delay;
pub use types::{Effect, PlaybackSnapshot, TickToken, Transition};
