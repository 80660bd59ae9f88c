//! Frame renderer
//!
//! Turns a playback snapshot into something the host can show: a markdown
//! string embedding the word as an SVG data URI, or a fallback message when
//! there is nothing to read.

pub mod layout;
pub mod publisher;
pub mod svg;

pub use publisher::spawn_frame_publisher;

use crate::playback::PlaybackSnapshot;
use serde::Serialize;

/// Markdown shown when no word is available
pub const FALLBACK_MARKDOWN: &str = "# No Text Found\n\nCopy some text to your clipboard";

/// One rendered frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frame {
    /// A word (or the placeholder) aligned on its ORP
    Word {
        /// Text actually drawn
        display: String,
        orp_index: usize,
        index: usize,
        total: usize,
        svg: String,
    },
    /// Nothing selected or nothing to read
    Fallback,
}

impl Frame {
    /// Render the word at `index` of a `total`-word document
    pub fn word(word: &str, index: usize, total: usize) -> Self {
        let display = layout::displayable_word(word);
        let orp_index = layout::orp_index(display);
        Frame::Word {
            display: display.to_string(),
            orp_index,
            index,
            total,
            svg: svg::word_svg(display, orp_index, index, total),
        }
    }

    /// Accessible text for the image; empty for the fallback frame
    pub fn alt_text(&self) -> &str {
        match self {
            Frame::Word { display, .. } => display,
            Frame::Fallback => "",
        }
    }

    /// Markdown payload for the detail pane
    pub fn markdown(&self) -> String {
        match self {
            Frame::Word { display, svg, .. } => {
                format!("![{}]({})", display, svg::data_uri(svg))
            }
            Frame::Fallback => FALLBACK_MARKDOWN.to_string(),
        }
    }
}

/// Render the frame for a snapshot
pub fn render_snapshot(snapshot: &PlaybackSnapshot) -> Frame {
    match snapshot.word.as_deref() {
        Some(word) if !word.is_empty() => Frame::word(word, snapshot.index, snapshot.total),
        _ => Frame::Fallback,
    }
}
