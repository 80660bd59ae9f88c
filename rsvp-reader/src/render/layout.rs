//! Glyph layout for a single word
//!
//! Words are drawn on a fixed canvas with a fixed advance per character. The
//! optical recognition point (ORP) is the middle character, and its center is
//! pinned to the horizontal center of the canvas whatever the word length.

/// Longest word drawn verbatim, in characters
pub const MAX_WORD_CHARS: usize = 15;

/// Characters that mark markup debris rather than prose
pub const NOISE_CHARS: [char; 8] = ['[', ']', '(', ')', '!', '#', '*', '`'];

/// Drawn in place of words that are too long or noisy
pub const PLACEHOLDER: &str = "\u{2014}";

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 400;
pub const FONT_SIZE: u32 = 56;
pub const CHAR_WIDTH: f64 = 34.0;
pub const CENTER_X: f64 = CANVAS_WIDTH as f64 / 2.0;
pub const BASELINE_Y: f64 = CANVAS_HEIGHT as f64 / 2.0 + 50.0;

pub const PROGRESS_WIDTH: u32 = 200;
pub const PROGRESS_HEIGHT: u32 = 2;
pub const PROGRESS_X: u32 = (CANVAS_WIDTH - PROGRESS_WIDTH) / 2;
pub const PROGRESS_Y: u32 = CANVAS_HEIGHT - 40;

/// The word as it will be drawn: itself, or the placeholder
pub fn displayable_word(word: &str) -> &str {
    if word.chars().count() > MAX_WORD_CHARS || word.contains(NOISE_CHARS) {
        PLACEHOLDER
    } else {
        word
    }
}

/// ORP index: floor(length / 2), in characters
pub fn orp_index(word: &str) -> usize {
    word.chars().count() / 2
}

/// Left edge of character `i` when character `orp` is centered
pub fn glyph_x(i: usize, orp: usize) -> f64 {
    let start = CENTER_X - (orp as f64 * CHAR_WIDTH + CHAR_WIDTH / 2.0);
    start + i as f64 * CHAR_WIDTH
}

/// Share of the document already read, in 0.0..=1.0
///
/// `index / (total - 1)`; always 0 for documents of one word or none.
pub fn progress_fraction(index: usize, total: usize) -> f64 {
    if total <= 1 {
        return 0.0;
    }
    (index as f64 / (total - 1) as f64).clamp(0.0, 1.0)
}

/// Filled width of the progress bar in pixels
pub fn progress_fill(index: usize, total: usize) -> u32 {
    (PROGRESS_WIDTH as f64 * progress_fraction(index, total)).round() as u32
}

/// Escape a character for SVG text content
pub fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}
