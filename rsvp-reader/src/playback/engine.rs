//! Playback engine state machine
//!
//! Owns the word pointer, play state and speed for the selected document.
//! Every operation mutates the engine synchronously and returns a
//! [`Transition`]: the new snapshot plus the effects the caller must carry out.
//! The engine never touches timers itself; it only tracks which tick token is
//! current, so a stale tick can be recognized and ignored.
//!
//! States:
//! - `Idle`: nothing selected, or no words
//! - `Playing`: exactly one tick outstanding
//! - `Paused`: no tick outstanding
//! - `Finished`: the last word's delay elapsed; no tick outstanding

use super::timing::word_delay;
use super::types::{Effect, PlaybackSnapshot, TickToken, Transition};
use rsvp_common::{PlaybackState, Wpm};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Playback engine for one session
#[derive(Debug)]
pub struct PlaybackEngine {
    document_id: Option<Uuid>,
    words: Arc<[String]>,
    index: usize,
    state: PlaybackState,
    wpm: Wpm,
    next_token: u64,
    pending: Option<TickToken>,
}

impl PlaybackEngine {
    pub fn new(wpm: Wpm) -> Self {
        Self {
            document_id: None,
            words: Arc::from(Vec::new()),
            index: 0,
            state: PlaybackState::Idle,
            wpm,
            next_token: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn wpm(&self) -> Wpm {
        self.wpm
    }

    pub fn document_id(&self) -> Option<Uuid> {
        self.document_id
    }

    /// Token of the outstanding tick
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    pub fn current_word(&self) -> Option<&str> {
        if self.state == PlaybackState::Idle {
            return None;
        }
        self.words.get(self.index).map(String::as_str)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            document_id: self.document_id,
            state: self.state,
            index: self.index,
            total: self.words.len(),
            word: self.current_word().map(str::to_string),
            wpm: self.wpm,
        }
    }

    /// Select a document and start it from the first word
    pub fn select(&mut self, document_id: Uuid, words: Arc<[String]>) -> Transition {
        let mut effects = self.cancel();

        self.document_id = Some(document_id);
        self.words = words;
        self.index = 0;

        if self.words.is_empty() {
            self.state = PlaybackState::Idle;
        } else {
            self.state = PlaybackState::Playing;
            effects.push(self.schedule());
        }

        debug!(
            "Selected document {} ({} words): {}",
            document_id,
            self.words.len(),
            self.state
        );
        self.transition(effects)
    }

    /// Drop the selection
    pub fn clear(&mut self) -> Transition {
        let effects = self.cancel();

        self.document_id = None;
        self.words = Arc::from(Vec::new());
        self.index = 0;
        self.state = PlaybackState::Idle;

        debug!("Selection cleared");
        self.transition(effects)
    }

    /// Resume from `Paused`; from `Finished` start over
    pub fn play(&mut self) -> Transition {
        match self.state {
            PlaybackState::Paused => {
                let mut effects = self.cancel();
                self.state = PlaybackState::Playing;
                effects.push(self.schedule());
                self.transition(effects)
            }
            PlaybackState::Finished => self.restart(),
            PlaybackState::Idle | PlaybackState::Playing => self.transition(Vec::new()),
        }
    }

    /// Hold the current word
    pub fn pause(&mut self) -> Transition {
        if self.state != PlaybackState::Playing {
            return self.transition(Vec::new());
        }
        let effects = self.cancel();
        self.state = PlaybackState::Paused;
        self.transition(effects)
    }

    /// Back to the first word, playing
    pub fn restart(&mut self) -> Transition {
        if self.state == PlaybackState::Idle {
            return self.transition(Vec::new());
        }
        let mut effects = self.cancel();
        self.index = 0;
        self.state = PlaybackState::Playing;
        effects.push(self.schedule());
        self.transition(effects)
    }

    /// Play/pause action
    ///
    /// At the last word (which includes `Finished`) this restarts instead.
    pub fn toggle(&mut self) -> Transition {
        if self.state == PlaybackState::Idle {
            return self.transition(Vec::new());
        }
        if self.index + 1 >= self.words.len() {
            return self.restart();
        }
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Change speed; index and play state are kept
    ///
    /// A running tick is rescheduled with the new delay.
    pub fn set_speed(&mut self, wpm: Wpm) -> Transition {
        self.wpm = wpm;
        let mut effects = vec![Effect::PersistSpeed(wpm)];

        if self.state == PlaybackState::Playing {
            effects.extend(self.cancel());
            effects.push(self.schedule());
        }

        debug!("Speed set to {}", wpm);
        self.transition(effects)
    }

    /// Timer callback
    ///
    /// Returns None for a token that is no longer current.
    pub fn tick(&mut self, token: TickToken) -> Option<Transition> {
        if self.pending != Some(token) || self.state != PlaybackState::Playing {
            debug!("Ignoring stale tick {:?}", token);
            return None;
        }
        self.pending = None;

        let next = self.index + 1;
        if next >= self.words.len() {
            self.state = PlaybackState::Finished;
            debug!("Reached end of document after {} words", self.words.len());
            return Some(self.transition(Vec::new()));
        }

        self.index = next;
        let effects = vec![self.schedule()];
        Some(self.transition(effects))
    }

    fn schedule(&mut self) -> Effect {
        let token = TickToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);

        let word = self.words.get(self.index).map(String::as_str).unwrap_or("");
        Effect::ScheduleTick {
            token,
            delay: word_delay(word, self.wpm),
        }
    }

    fn cancel(&mut self) -> Vec<Effect> {
        match self.pending.take() {
            Some(_) => vec![Effect::CancelTick],
            None => Vec::new(),
        }
    }

    fn transition(&self, effects: Vec<Effect>) -> Transition {
        Transition::new(self.snapshot(), effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn words(list: &[&str]) -> Arc<[String]> {
        list.iter().map(|w| w.to_string()).collect::<Vec<_>>().into()
    }

    fn scenario_words() -> Arc<[String]> {
        words(&[
            "The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog.", "Ready?",
        ])
    }

    fn wpm(value: u32) -> Wpm {
        Wpm::new(value).unwrap()
    }

    /// Deliver the scheduled tick of `transition`
    fn fire(engine: &mut PlaybackEngine, transition: &Transition) -> Transition {
        let (token, _) = transition.scheduled_tick().expect("tick scheduled");
        engine.tick(token).expect("tick accepted")
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = PlaybackEngine::new(Wpm::DEFAULT);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot, PlaybackSnapshot::idle(Wpm::DEFAULT));
        assert!(engine.pending_tick().is_none());
    }

    #[test]
    fn test_select_starts_playing_at_first_word() {
        let mut engine = PlaybackEngine::new(wpm(300));
        let id = Uuid::new_v4();

        let transition = engine.select(id, scenario_words());

        assert_eq!(transition.snapshot.state, PlaybackState::Playing);
        assert_eq!(transition.snapshot.document_id, Some(id));
        assert_eq!(transition.snapshot.index, 0);
        assert_eq!(transition.snapshot.word.as_deref(), Some("The"));
        assert_eq!(transition.snapshot.total, 10);
        let (_, delay) = transition.scheduled_tick().unwrap();
        assert_eq!(delay, Duration::from_millis(200));
        assert!(!transition.cancels_tick());
    }

    #[test]
    fn test_select_empty_words_stays_idle() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let first = engine.select(Uuid::new_v4(), scenario_words());
        assert!(first.scheduled_tick().is_some());

        let transition = engine.select(Uuid::new_v4(), words(&[]));

        assert_eq!(transition.snapshot.state, PlaybackState::Idle);
        assert!(transition.snapshot.word.is_none());
        assert!(transition.cancels_tick());
        assert!(transition.scheduled_tick().is_none());
        assert!(engine.toggle().effects.is_empty());
    }

    #[test]
    fn test_scenario_runs_to_finished_at_300_wpm() {
        let mut engine = PlaybackEngine::new(wpm(300));
        let mut transition = engine.select(Uuid::new_v4(), scenario_words());
        let mut delays = Vec::new();

        while let Some((token, delay)) = transition.scheduled_tick() {
            delays.push(delay);
            transition = engine.tick(token).unwrap();
        }

        let ms: Vec<u128> = delays.iter().map(|d| d.as_millis()).collect();
        assert_eq!(ms, vec![200, 200, 200, 200, 200, 200, 200, 200, 400, 400]);
        assert_eq!(transition.snapshot.state, PlaybackState::Finished);
        assert_eq!(transition.snapshot.index, 9);
        assert_eq!(transition.snapshot.word.as_deref(), Some("Ready?"));
        assert!(engine.pending_tick().is_none());
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let first = engine.select(Uuid::new_v4(), scenario_words());
        let (stale, _) = first.scheduled_tick().unwrap();

        // Reselecting invalidates the earlier token
        let second = engine.select(Uuid::new_v4(), scenario_words());
        assert!(second.cancels_tick());
        assert!(engine.tick(stale).is_none());
        assert_eq!(engine.index(), 0);

        let (current, _) = second.scheduled_tick().unwrap();
        assert_ne!(stale, current);
        assert_eq!(engine.tick(current).unwrap().snapshot.index, 1);

        // A token is only good once
        assert!(engine.tick(current).is_none());
    }

    #[test]
    fn test_tick_ignored_while_paused() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let selected = engine.select(Uuid::new_v4(), scenario_words());
        let (token, _) = selected.scheduled_tick().unwrap();

        let paused = engine.toggle();
        assert_eq!(paused.snapshot.state, PlaybackState::Paused);
        assert!(paused.cancels_tick());
        assert!(engine.tick(token).is_none());
        assert_eq!(engine.index(), 0);
    }

    #[test]
    fn test_toggle_twice_keeps_index() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let selected = engine.select(Uuid::new_v4(), scenario_words());
        let advanced = fire(&mut engine, &selected);
        let advanced = fire(&mut engine, &advanced);
        assert_eq!(advanced.snapshot.index, 2);

        let paused = engine.toggle();
        assert_eq!(paused.snapshot.state, PlaybackState::Paused);
        assert_eq!(paused.snapshot.index, 2);
        assert!(paused.scheduled_tick().is_none());

        let resumed = engine.toggle();
        assert_eq!(resumed.snapshot.state, PlaybackState::Playing);
        assert_eq!(resumed.snapshot.index, 2);
        assert!(resumed.scheduled_tick().is_some());

        let paused_again = engine.toggle();
        let resumed_again = engine.toggle();
        assert_eq!(paused_again.snapshot.index, 2);
        assert_eq!(resumed_again.snapshot.index, 2);
        assert_eq!(resumed_again.snapshot.state, PlaybackState::Playing);
    }

    #[test]
    fn test_toggle_when_finished_restarts() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let mut transition = engine.select(Uuid::new_v4(), scenario_words());
        while transition.scheduled_tick().is_some() {
            transition = fire(&mut engine, &transition);
        }
        assert_eq!(engine.state(), PlaybackState::Finished);

        let restarted = engine.toggle();

        assert_eq!(restarted.snapshot.state, PlaybackState::Playing);
        assert_eq!(restarted.snapshot.index, 0);
        assert!(restarted.scheduled_tick().is_some());
        assert!(!restarted.cancels_tick());
    }

    #[test]
    fn test_toggle_paused_on_last_word_restarts() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let mut transition = engine.select(Uuid::new_v4(), scenario_words());
        for _ in 0..9 {
            transition = fire(&mut engine, &transition);
        }
        assert_eq!(engine.index(), 9);
        assert_eq!(engine.pause().snapshot.state, PlaybackState::Paused);

        let restarted = engine.toggle();
        assert_eq!(restarted.snapshot.index, 0);
        assert_eq!(restarted.snapshot.state, PlaybackState::Playing);
    }

    #[test]
    fn test_set_speed_reschedules_only_when_playing() {
        let mut engine = PlaybackEngine::new(wpm(300));
        engine.select(Uuid::new_v4(), scenario_words());

        let faster = engine.set_speed(wpm(600));
        assert_eq!(faster.effects[0], Effect::PersistSpeed(wpm(600)));
        assert!(faster.cancels_tick());
        assert_eq!(faster.scheduled_tick().unwrap().1, Duration::from_millis(100));
        assert_eq!(faster.snapshot.index, 0);
        assert_eq!(faster.snapshot.state, PlaybackState::Playing);

        engine.pause();
        let slower = engine.set_speed(wpm(400));
        assert_eq!(slower.effects, vec![Effect::PersistSpeed(wpm(400))]);
        assert_eq!(slower.snapshot.state, PlaybackState::Paused);
        assert_eq!(slower.snapshot.wpm, wpm(400));
    }

    #[test]
    fn test_clear_cancels_and_goes_idle() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let selected = engine.select(Uuid::new_v4(), scenario_words());
        let (token, _) = selected.scheduled_tick().unwrap();

        let cleared = engine.clear();

        assert!(cleared.cancels_tick());
        assert_eq!(cleared.snapshot, PlaybackSnapshot::idle(Wpm::DEFAULT));
        assert!(engine.tick(token).is_none());
        assert!(engine.toggle().effects.is_empty());
    }

    #[test]
    fn test_single_word_document_finishes_after_one_tick() {
        let mut engine = PlaybackEngine::new(Wpm::DEFAULT);
        let selected = engine.select(Uuid::new_v4(), words(&["Done!"]));
        let (_, delay) = selected.scheduled_tick().unwrap();
        assert_eq!(delay, Duration::from_millis(300));

        let finished = fire(&mut engine, &selected);
        assert_eq!(finished.snapshot.state, PlaybackState::Finished);
        assert_eq!(finished.snapshot.index, 0);
        assert!(finished.effects.is_empty());
    }
}
