//! SVG markup for word frames

use super::layout::{
    escape_char, glyph_x, progress_fill, BASELINE_Y, CANVAS_HEIGHT, CANVAS_WIDTH, FONT_SIZE,
    PROGRESS_HEIGHT, PROGRESS_WIDTH, PROGRESS_X, PROGRESS_Y,
};
use std::fmt::Write;

pub const HIGHLIGHT_COLOR: &str = "#ef4444";
pub const TEXT_COLOR: &str = "#e5e5e5";
pub const TRACK_COLOR: &str = "#333";
pub const FONT_FAMILY: &str = "SF Mono, Menlo, Monaco, monospace";

const DATA_URI_PREFIX: &str = "data:image/svg+xml;utf8,";

/// Full SVG document for one word
///
/// `word` is drawn character by character with `orp` highlighted; the
/// progress bar reflects `index` out of `total`.
pub fn word_svg(word: &str, orp: usize, index: usize, total: usize) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
    );

    for (i, c) in word.chars().enumerate() {
        let fill = if i == orp { HIGHLIGHT_COLOR } else { TEXT_COLOR };
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-weight="500" font-family="{}" dominant-baseline="central">"#,
            glyph_x(i, orp),
            BASELINE_Y,
            fill,
            FONT_SIZE,
            FONT_FAMILY,
        );
        match escape_char(c) {
            Some(escaped) => svg.push_str(escaped),
            None => svg.push(c),
        }
        svg.push_str("</text>");
    }

    let _ = write!(
        svg,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{track}" rx="1"/><rect x="{x}" y="{y}" width="{fill_w}" height="{h}" fill="{fill}" rx="1"/>"#,
        x = PROGRESS_X,
        y = PROGRESS_Y,
        w = PROGRESS_WIDTH,
        h = PROGRESS_HEIGHT,
        track = TRACK_COLOR,
        fill_w = progress_fill(index, total),
        fill = HIGHLIGHT_COLOR,
    );

    svg.push_str("</svg>");
    svg
}

/// Percent-encoded `data:` URI for an SVG document
///
/// Everything but `A-Z a-z 0-9 - . _ ~` is escaped, including `!'()*`,
/// which browsers decode the same way.
pub fn data_uri(svg: &str) -> String {
    format!("{}{}", DATA_URI_PREFIX, urlencoding::encode(svg))
}
