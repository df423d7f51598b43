//! Offset-to-line mapping.

use serde::Serialize;

/// The 1-based line number and full text of the line containing an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineInfo {
    /// 1-based line number.
    pub line_number: usize,
    /// The line's content, without the terminating newline.
    pub line_text: String,
}

/// Locate the line containing byte `offset` in `text`.
///
/// Offsets past the end of `text` are clamped to its length. Only `\n` counts
/// as a line terminator.
pub fn locate(text: &str, offset: usize) -> LineInfo {
    let offset = offset.min(text.len());
    let bytes = text.as_bytes();
    let before = &bytes[..offset];

    let line_number = 1 + before.iter().filter(|&&b| b == b'\n').count();
    let start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(text.len(), |pos| offset + pos);

    LineInfo {
        line_number,
        line_text: text[start..end].to_string(),
    }
}
