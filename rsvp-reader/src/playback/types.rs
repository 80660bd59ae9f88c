//! Playback types shared across modules

use rsvp_common::events::NotificationStyle;
use rsvp_common::{PlaybackState, Wpm};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Identity of one scheduled tick
///
/// The engine hands out a fresh token each time it schedules and forgets the
/// old one when it cancels, so a tick that fires late cannot match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TickToken(pub(crate) u64);

/// Side effect requested by a transition, executed by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `tick(token)` after `delay`
    ScheduleTick { token: TickToken, delay: Duration },
    /// Drop the outstanding timer, if any
    CancelTick,
    /// Store the reading speed
    PersistSpeed(Wpm),
    /// Store the full blacklist
    PersistBlacklist(Vec<String>),
    /// Show a notification to the user
    Notify {
        style: NotificationStyle,
        title: String,
        message: Option<String>,
    },
}

/// Immutable view of the playback state after a transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub document_id: Option<Uuid>,
    pub state: PlaybackState,
    pub index: usize,
    pub total: usize,
    /// Word at `index`, None when idle
    pub word: Option<String>,
    pub wpm: Wpm,
}

impl PlaybackSnapshot {
    /// Snapshot with nothing selected
    pub fn idle(wpm: Wpm) -> Self {
        Self {
            document_id: None,
            state: PlaybackState::Idle,
            index: 0,
            total: 0,
            word: None,
            wpm,
        }
    }
}

/// Result of an engine or session transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub snapshot: PlaybackSnapshot,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(snapshot: PlaybackSnapshot, effects: Vec<Effect>) -> Self {
        Self { snapshot, effects }
    }

    /// The tick this transition schedules, if any
    pub fn scheduled_tick(&self) -> Option<(TickToken, Duration)> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::ScheduleTick { token, delay } => Some((*token, *delay)),
            _ => None,
        })
    }

    pub fn cancels_tick(&self) -> bool {
        self.effects.contains(&Effect::CancelTick)
    }
}
