//! Per-word display timing

use rsvp_common::Wpm;
use std::time::Duration;

/// Marks that hold a word for twice the base delay
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Whether the word closes a sentence
pub fn ends_sentence(word: &str) -> bool {
    word.ends_with(SENTENCE_TERMINATORS)
}

/// How long `word` stays on screen before the engine advances
///
/// `60000 / wpm` ms, doubled for words ending a sentence.
pub fn word_delay(word: &str, wpm: Wpm) -> Duration {
    let base = wpm.base_delay();
    if ends_sentence(word) {
        base * 2
    } else {
        base
    }
}
