//! Byte offset helpers.
//!
//! Tokens and errors only carry byte offsets and line numbers. Columns are
//! derived here when something needs to be shown to a user.

use serde::Serialize;

/// Half-open byte range into a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end: end.max(start) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Convert a byte offset to a 1-based line and a 0-based column.
///
/// # Arguments
/// * `source` - The scanned bytes
/// * `byte_offset` - Offset to convert; clamped to the buffer length
///
/// # Returns
/// `(line, col)` where `col` counts UTF-8 characters from the start of the line.
pub fn line_col(source: &[u8], byte_offset: usize) -> (usize, usize) {
    let byte_offset = byte_offset.min(source.len());
    let before = &source[..byte_offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
    let col = String::from_utf8_lossy(&before[line_start..]).chars().count();
    (line, col)
}

/// The text of 1-based line `line`, without its terminator.
pub fn line_text(source: &[u8], line: usize) -> Option<String> {
    source
        .split(|&b| b == b'\n')
        .nth(line.checked_sub(1)?)
        .map(|l| String::from_utf8_lossy(l.strip_suffix(b"\r").unwrap_or(l)).into_owned())
}
