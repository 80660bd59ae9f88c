//! Documents built from clipboard entries
//!
//! A document is a trimmed clipboard text and its words. The session's
//! document set is built once from the clipboard history: entries that are
//! too short, repeated, or blacklisted are skipped without notice.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Characters of text shown in a document's list title
pub const TITLE_MAX_CHARS: usize = 60;

/// Split text into words on runs of whitespace
///
/// Never yields empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// One readable clipboard text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: Uuid,
    text: String,
    words: Arc<[String]>,
}

impl Document {
    /// Build a document from a raw clipboard entry
    ///
    /// Returns None when the trimmed text has fewer than `min_words` words.
    pub fn from_entry(raw: &str, min_words: usize) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let words = tokenize(text);
        if words.len() < min_words {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            words: words.into(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared word list; cheap to hand to the playback engine
    pub fn words(&self) -> Arc<[String]> {
        Arc::clone(&self.words)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// List title: the first 60 characters, with `...` when cut
    pub fn title(&self) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

/// Row of the document list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    pub word_count: usize,
    pub selected: bool,
}

impl DocumentSummary {
    pub fn new(document: &Document, selected: bool) -> Self {
        Self {
            id: document.id(),
            title: document.title(),
            word_count: document.word_count(),
            selected,
        }
    }
}

/// Texts the user deleted; never offered again
///
/// Append-only. Order is preserved so the persisted JSON array stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    texts: Vec<String>,
}

impl Blacklist {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }

    /// Record a deleted text; returns false when it was already listed
    pub fn append(&mut self, text: &str) -> bool {
        if self.contains(text) {
            return false;
        }
        self.texts.push(text.to_string());
        true
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

/// Ordered documents of one session
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Build the set from clipboard entries (most recent first)
    pub fn build<I, S>(entries: I, blacklist: &Blacklist, min_words: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut documents: Vec<Document> = Vec::new();

        for (offset, entry) in entries.into_iter().enumerate() {
            let text = entry.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            if documents.iter().any(|d| d.text == text) {
                debug!("Clipboard entry {} skipped: duplicate", offset);
                continue;
            }
            if blacklist.contains(text) {
                debug!("Clipboard entry {} skipped: deleted earlier", offset);
                continue;
            }
            match Document::from_entry(text, min_words) {
                Some(document) => documents.push(document),
                None => debug!("Clipboard entry {} skipped: under {} words", offset, min_words),
            }
        }

        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Document> {
        let position = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_WORDS: &str = "The quick brown fox jumps over the lazy dog. Ready?";

    #[test]
    fn test_tokenize_splits_on_whitespace_runs() {
        let words = tokenize("  one\ttwo \n\n three    four ");
        assert_eq!(words, vec!["one", "two", "three", "four"]);
        assert!(tokenize(" \t\n ").is_empty());
        assert!(tokenize("a  b\u{00a0}c").iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn test_document_requires_min_words() {
        assert!(Document::from_entry("one two three four five six seven eight nine", 10).is_none());

        let document = Document::from_entry(&format!("  {}  ", TEN_WORDS), 10).unwrap();
        assert_eq!(document.text(), TEN_WORDS);
        assert_eq!(document.word_count(), 10);
        assert_eq!(&document.words()[8], "dog.");
    }

    #[test]
    fn test_document_title_truncates_at_sixty_chars() {
        let short = Document::from_entry(TEN_WORDS, 10).unwrap();
        assert_eq!(short.title(), TEN_WORDS);

        let long_text = "word ".repeat(20);
        let long = Document::from_entry(&long_text, 10).unwrap();
        let title = long.title();
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_build_skips_short_duplicate_and_blacklisted() {
        let blacklisted = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let kept = "one two three four five six seven eight nine ten eleven";
        let entries = vec![
            format!("  {}\n", kept),
            "too short to read".to_string(),
            "   ".to_string(),
            kept.to_string(),
            blacklisted.to_string(),
            TEN_WORDS.to_string(),
        ];
        let blacklist = Blacklist::new(vec![blacklisted.to_string()]);

        let set = DocumentSet::build(entries, &blacklist, 10);

        let texts: Vec<&str> = set.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec![kept, TEN_WORDS]);
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let set_entries = vec![
            "a b c d e f g h i j".to_string(),
            "k l m n o p q r s t".to_string(),
            "u v w x y z a b c d".to_string(),
        ];
        let mut set = DocumentSet::build(set_entries, &Blacklist::default(), 10);
        let second = set.get_index(1).unwrap().id();

        let removed = set.remove(second).unwrap();
        assert_eq!(removed.text(), "k l m n o p q r s t");
        let texts: Vec<&str> = set.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec!["a b c d e f g h i j", "u v w x y z a b c d"]);
        assert!(set.remove(second).is_none());
    }

    #[test]
    fn test_blacklist_append_only_once() {
        let mut blacklist = Blacklist::default();
        assert!(blacklist.append("text"));
        assert!(!blacklist.append("text"));
        assert_eq!(blacklist.texts(), ["text".to_string()]);
    }
}
