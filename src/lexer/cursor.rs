//! Byte cursor shared by every comment tokenizer.
//!
//! The cursor knows nothing about comment syntax. It hands out the byte under
//! the read head (or a `0` sentinel past the end), moves forward one byte at a
//! time, and lifts the bytes just scanned back out as a borrowed slice.
//! Line accounting lives here but is driven by the tokenizers: they call
//! [`Cursor::new_line`] whenever they consume a `\n`.

use std::fmt;

/// Sentinel returned by the peek/advance family once input is exhausted.
pub const SENTINEL: u8 = 0;

/// Raised when a caller asks for a slice outside the buffer.
///
/// This is a programming error in a tokenizer, never a property of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    pub offset: usize,
    pub current: usize,
    pub len: usize,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slice of {} byte(s) ending at {} is outside a {}-byte buffer",
            self.offset, self.current, self.len
        )
    }
}

impl std::error::Error for RangeError {}

/// Read head over one file's bytes.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self { source, start: 0, current: 0, line: 1 }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// 1-based line of the read head.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Anchor the start of the next lexeme at the read head.
    pub fn mark_start(&mut self) {
        self.start = self.current;
    }

    pub fn new_line(&mut self) {
        self.line += 1;
    }

    pub fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    pub fn peek_next(&self) -> u8 {
        if self.at_end() { SENTINEL } else { self.source[self.current + 1] }
    }

    /// Byte `n` positions past the read head.
    pub fn peek_at(&self, n: usize) -> u8 {
        self.source.get(self.current + n).copied().unwrap_or(SENTINEL)
    }

    /// Byte just behind the read head, or the sentinel at the start of input.
    pub fn previous(&self) -> u8 {
        match self.current {
            0 => SENTINEL,
            n => self.source.get(n - 1).copied().unwrap_or(SENTINEL),
        }
    }

    /// Consume the byte under the read head and return it.
    pub fn advance(&mut self) -> u8 {
        if self.is_exhausted() {
            return SENTINEL;
        }
        let byte = self.source[self.current];
        self.current += 1;
        byte
    }

    /// No look-ahead byte remains past the read head.
    pub fn at_end(&self) -> bool {
        self.current + 1 >= self.source.len()
    }

    /// Every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.source.len()
    }

    /// The `offset` bytes immediately behind the read head.
    pub fn slice(&self, offset: usize) -> Result<&'a [u8], RangeError> {
        let err = RangeError { offset, current: self.current, len: self.source.len() };
        let begin = self.current.checked_sub(offset).ok_or(err)?;
        self.source.get(begin..self.current).ok_or(err)
    }

    /// Consume a run of spaces, tabs and carriage returns. Newlines stay put.
    pub fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c') {
            self.current += 1;
        }
    }
}
