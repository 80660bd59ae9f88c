//! Playback-related type definitions
//!
//! Supporting types for play state, reading speed and user notifications.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

/// Playback state enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No document selected, or the selected document has no words
    Idle,
    /// Advancing through words on the tick timer
    Playing,
    /// Holding the current word
    Paused,
    /// Last word shown and its delay elapsed
    Finished,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Finished => write!(f, "finished"),
        }
    }
}

/// Reading speed in words per minute
///
/// Only the rates of the speed menu are representable; anything else is
/// rejected by [`Wpm::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct Wpm(u32);

impl Wpm {
    /// Speed menu, slowest first
    pub const ALLOWED: [u32; 5] = [300, 400, 500, 600, 700];

    /// Speed used when nothing valid is configured or persisted
    pub const DEFAULT: Wpm = Wpm(400);

    pub fn new(value: u32) -> Result<Self> {
        if Self::ALLOWED.contains(&value) {
            Ok(Wpm(value))
        } else {
            Err(Error::InvalidInput(format!(
                "Unsupported speed {} WPM (allowed: {:?})",
                value,
                Self::ALLOWED
            )))
        }
    }

    /// All selectable speeds
    pub fn menu() -> impl Iterator<Item = Wpm> {
        Self::ALLOWED.into_iter().map(Wpm)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Time one plain word stays on screen: 60000 / wpm milliseconds
    pub fn base_delay(self) -> Duration {
        Duration::from_micros(60_000_000 / u64::from(self.0))
    }
}

impl Default for Wpm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Wpm {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Wpm::new(value)
    }
}

impl From<Wpm> for u32 {
    fn from(wpm: Wpm) -> u32 {
        wpm.0
    }
}

impl std::str::FromStr for Wpm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::InvalidInput(format!("Invalid speed '{}': {}", s, e)))?;
        Wpm::new(value)
    }
}

impl std::fmt::Display for Wpm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} WPM", self.0)
    }
}

/// Visual style of a user notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    Success,
    Failure,
}
