//! Reading session
//!
//! One session per process: the document set, the blacklist and the playback
//! engine, built once at startup from the clipboard history. Every command
//! returns a [`Transition`]; the session performs no I/O itself.

use crate::document::{Blacklist, Document, DocumentSet};
use crate::error::{Error, Result};
use crate::playback::{Effect, PlaybackEngine, PlaybackSnapshot, TickToken, Transition};
use rsvp_common::events::NotificationStyle;
use rsvp_common::Wpm;
use tracing::{debug, info};
use uuid::Uuid;

/// Documents, blacklist and playback state of one session
#[derive(Debug)]
pub struct Session {
    documents: DocumentSet,
    blacklist: Blacklist,
    engine: PlaybackEngine,
}

impl Session {
    /// Build the session from clipboard entries (most recent first)
    ///
    /// The first document, if any, is selected and starts playing.
    pub fn start(
        entries: Vec<String>,
        blacklist: Blacklist,
        wpm: Wpm,
        min_words: usize,
    ) -> (Self, Transition) {
        let documents = DocumentSet::build(&entries, &blacklist, min_words);
        info!(
            "Loaded {} documents from {} clipboard entries",
            documents.len(),
            entries.len()
        );

        let mut session = Self {
            documents,
            blacklist,
            engine: PlaybackEngine::new(wpm),
        };

        let transition = match session.documents.first() {
            Some(first) => {
                let (id, words) = (first.id(), first.words());
                session.engine.select(id, words)
            }
            None => Transition::new(session.engine.snapshot(), Vec::new()),
        };

        (session, transition)
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.engine.document_id()
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected_id().and_then(|id| self.documents.get(id))
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.engine.snapshot()
    }

    pub fn wpm(&self) -> Wpm {
        self.engine.wpm()
    }

    /// Jump to another document; None if the id is unknown
    pub fn select(&mut self, id: Uuid) -> Option<Transition> {
        let document = self.documents.get(id)?;
        let words = document.words();
        Some(self.engine.select(id, words))
    }

    pub fn toggle(&mut self) -> Transition {
        self.engine.toggle()
    }

    pub fn play(&mut self) -> Transition {
        self.engine.play()
    }

    pub fn pause(&mut self) -> Transition {
        self.engine.pause()
    }

    pub fn restart(&mut self) -> Transition {
        self.engine.restart()
    }

    pub fn set_speed(&mut self, wpm: Wpm) -> Transition {
        self.engine.set_speed(wpm)
    }

    pub fn tick(&mut self, token: TickToken) -> Option<Transition> {
        self.engine.tick(token)
    }

    /// Text of a document, for the copy command
    pub fn document_text(&self, id: Uuid) -> Result<&str> {
        self.documents
            .get(id)
            .map(Document::text)
            .ok_or(Error::DocumentNotFound(id))
    }

    /// Delete a document and blacklist its text
    ///
    /// If it was selected, the first remaining document is selected, or
    /// nothing when none remain. Other selections are untouched.
    pub fn delete(&mut self, id: Uuid) -> Result<Transition> {
        let removed = self
            .documents
            .remove(id)
            .ok_or(Error::DocumentNotFound(id))?;

        let mut effects = Vec::new();
        if self.blacklist.append(removed.text()) {
            effects.push(Effect::PersistBlacklist(self.blacklist.texts().to_vec()));
        }

        let selection = if self.engine.document_id() == Some(id) {
            let next = self.documents.first().map(|d| (d.id(), d.words()));
            match next {
                Some((next_id, words)) => {
                    debug!("Deleted selected document, moving to {}", next_id);
                    self.engine.select(next_id, words)
                }
                None => self.engine.clear(),
            }
        } else {
            Transition::new(self.engine.snapshot(), Vec::new())
        };

        effects.extend(selection.effects);
        effects.push(Effect::Notify {
            style: NotificationStyle::Success,
            title: "Deleted".to_string(),
            message: None,
        });

        info!("Deleted document {} ({} remain)", id, self.documents.len());
        Ok(Transition::new(selection.snapshot, effects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_common::PlaybackState;

    const A: &str = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    const B: &str = "one two three four five six seven eight nine ten";
    const C: &str = "The quick brown fox jumps over the lazy dog. Ready?";

    fn start(entries: &[&str]) -> (Session, Transition) {
        Session::start(
            entries.iter().map(|e| e.to_string()).collect(),
            Blacklist::default(),
            Wpm::DEFAULT,
            10,
        )
    }

    fn id_at(session: &Session, index: usize) -> Uuid {
        session.documents().get_index(index).unwrap().id()
    }

    fn persisted_blacklist(transition: &Transition) -> Option<&Vec<String>> {
        transition.effects.iter().find_map(|e| match e {
            Effect::PersistBlacklist(texts) => Some(texts),
            _ => None,
        })
    }

    #[test]
    fn test_start_selects_first_document() {
        let (session, transition) = start(&[A, "short text", B]);

        assert_eq!(session.documents().len(), 2);
        assert_eq!(transition.snapshot.state, PlaybackState::Playing);
        assert_eq!(transition.snapshot.document_id, Some(id_at(&session, 0)));
        assert_eq!(transition.snapshot.word.as_deref(), Some("alpha"));
        assert!(transition.scheduled_tick().is_some());
    }

    #[test]
    fn test_start_with_nothing_eligible_is_idle() {
        let (session, transition) = start(&["too short", ""]);

        assert!(session.documents().is_empty());
        assert_eq!(transition.snapshot.state, PlaybackState::Idle);
        assert!(transition.effects.is_empty());
        assert!(session.selected_document().is_none());
    }

    #[test]
    fn test_start_skips_blacklisted() {
        let (session, transition) = Session::start(
            vec![A.to_string(), B.to_string()],
            Blacklist::new(vec![A.to_string()]),
            Wpm::DEFAULT,
            10,
        );

        assert_eq!(session.documents().len(), 1);
        assert_eq!(transition.snapshot.word.as_deref(), Some("one"));
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let (mut session, _) = start(&[A, B]);
        let before = session.snapshot();

        assert!(session.select(Uuid::new_v4()).is_none());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_select_resets_to_first_word_playing() {
        let (mut session, _) = start(&[A, B]);
        session.pause();
        let second = id_at(&session, 1);

        let transition = session.select(second).unwrap();

        assert_eq!(transition.snapshot.document_id, Some(second));
        assert_eq!(transition.snapshot.index, 0);
        assert_eq!(transition.snapshot.state, PlaybackState::Playing);
    }

    #[test]
    fn test_delete_only_document_falls_back_to_idle() {
        let (mut session, _) = start(&[A]);
        let only = id_at(&session, 0);

        let transition = session.delete(only).unwrap();

        assert_eq!(transition.snapshot.state, PlaybackState::Idle);
        assert_eq!(transition.snapshot.document_id, None);
        assert!(transition.snapshot.word.is_none());
        assert!(transition.cancels_tick());
        assert_eq!(persisted_blacklist(&transition), Some(&vec![A.to_string()]));
        assert!(session.documents().is_empty());
        assert!(session.blacklist().contains(A));
    }

    #[test]
    fn test_delete_unselected_keeps_selection_and_index() {
        let (mut session, first) = start(&[A, B, C]);
        let (token, _) = first.scheduled_tick().unwrap();
        session.tick(token).unwrap();
        let selected = session.selected_id();
        let other = id_at(&session, 2);

        let transition = session.delete(other).unwrap();

        assert_eq!(transition.snapshot.document_id, selected);
        assert_eq!(transition.snapshot.index, 1);
        assert_eq!(transition.snapshot.state, PlaybackState::Playing);
        assert!(!transition.cancels_tick());
        assert!(transition.scheduled_tick().is_none());
        assert_eq!(session.documents().len(), 2);
    }

    #[test]
    fn test_delete_selected_first_moves_to_new_first() {
        let (mut session, _) = start(&[A, B, C]);
        let first = id_at(&session, 0);
        let second = id_at(&session, 1);

        let transition = session.delete(first).unwrap();

        assert_eq!(transition.snapshot.document_id, Some(second));
        assert_eq!(transition.snapshot.index, 0);
        assert_eq!(transition.snapshot.state, PlaybackState::Playing);
        assert!(transition.cancels_tick());
        assert!(transition.scheduled_tick().is_some());
    }

    #[test]
    fn test_delete_selected_middle_moves_to_first() {
        let (mut session, _) = start(&[A, B, C]);
        let first = id_at(&session, 0);
        let middle = id_at(&session, 1);
        session.select(middle).unwrap();

        let transition = session.delete(middle).unwrap();

        assert_eq!(transition.snapshot.document_id, Some(first));
        assert_eq!(transition.snapshot.index, 0);
        assert_eq!(transition.snapshot.word.as_deref(), Some("alpha"));
        assert_eq!(session.documents().len(), 2);
    }

    #[test]
    fn test_delete_selected_last_moves_to_first() {
        let (mut session, _) = start(&[A, B, C]);
        let first = id_at(&session, 0);
        let last = id_at(&session, 2);
        session.select(last).unwrap();

        let transition = session.delete(last).unwrap();
        assert_eq!(transition.snapshot.document_id, Some(first));
    }

    #[test]
    fn test_delete_unknown_document_errors() {
        let (mut session, _) = start(&[A]);

        assert!(matches!(
            session.delete(Uuid::new_v4()),
            Err(Error::DocumentNotFound(_))
        ));
        assert_eq!(session.documents().len(), 1);
    }

    #[test]
    fn test_delete_notifies_success() {
        let (mut session, _) = start(&[A, B]);
        let transition = session.delete(id_at(&session, 1)).unwrap();

        assert!(transition.effects.iter().any(|e| matches!(
            e,
            Effect::Notify { style: NotificationStyle::Success, title, .. } if title == "Deleted"
        )));
    }

    #[test]
    fn test_document_text_for_copy() {
        let (session, _) = start(&[A]);

        assert_eq!(session.document_text(id_at(&session, 0)).unwrap(), A);
        assert!(session.document_text(Uuid::new_v4()).is_err());
    }
}
