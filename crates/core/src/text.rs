//! Text helpers shared by the history, citation and scoring code

use unicode_segmentation::UnicodeSegmentation;

/// Truncate to at most `max` grapheme clusters, appending `...` when cut.
///
/// Counting graphemes keeps combining marks and non-Latin scripts intact.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let mut graphemes = text.grapheme_indices(true);
    match graphemes.nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
