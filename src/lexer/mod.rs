//! Comment tokenizers.
//!
//! Every family shares one [`Lexer`]: a [`Cursor`] over the file, the
//! annotation being searched for, and two token buffers. Tokens of the comment
//! being scanned go into a scratch buffer (`draft`) which is promoted to the
//! file's token list only once the annotation has been seen, and cleared in
//! place otherwise. Ordinary comments therefore never reach the output.
//!
//! The family-specific part is small: each [`CommentSyntax`] implementation
//! decides what the byte under the read head opens (a string, a single-line
//! comment, a multi-line comment, or nothing) and delegates to the shared
//! scanning routines below.

pub mod cursor;
pub mod family;
pub mod token;

mod clike;
mod markdown;
mod python;
mod shell;

pub use cursor::{Cursor, RangeError};
pub use family::Family;
pub use token::{Token, TokenKind};

use crate::error::{ErrorKind, LexError};
use crate::positions::Span;
use family::trim_range;

/// Comment grammar of one [`Family`]
pub(crate) trait CommentSyntax {
    /// Scan whatever starts at the read head. Must consume at least one byte.
    fn scan(&mut self, lexer: &mut Lexer<'_, '_>) -> Result<(), LexError>;
}

/// Result of comparing a comment word against the configured annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMatch {
    /// `@TODO`
    Pending,
    /// `@TODO(#42)`: already reported under the given issue number
    Reported(u64),
}

/// Match `word` against `annotation`, accepting the reported form `annotation(#N)`.
pub fn match_annotation(word: &[u8], annotation: &[u8]) -> Option<AnnotationMatch> {
    if annotation.is_empty() {
        return None;
    }
    let rest = word.strip_prefix(annotation)?;
    if rest.is_empty() {
        return Some(AnnotationMatch::Pending);
    }
    let digits = rest.strip_prefix(b"(#")?.strip_suffix(b")")?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits)
        .ok()?
        .parse()
        .ok()
        .map(AnnotationMatch::Reported)
}

/// Tokenize `source` with the grammar of `family`.
///
/// Only annotated comments produce tokens; the sequence always ends with
/// [`TokenKind::EndOfFile`].
pub fn tokenize<'a>(
    source: &'a [u8],
    family: Family,
    annotation: &[u8],
) -> Result<Vec<Token<'a>>, LexError> {
    let lexer = Lexer::new(source, annotation, family.trim_chars());
    match family {
        Family::CLike => lexer.run(&mut clike::CLike),
        Family::Python => lexer.run(&mut python::Python),
        Family::Shell => lexer.run(&mut shell::Shell::full()),
        Family::Markdown => lexer.run(&mut markdown::Markdown),
        Family::Default => lexer.run(&mut shell::Shell::minimal()),
    }
}

/// Placement of a word inside the comment being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentShape {
    SingleLine,
    MultiLine,
}

/// How a multi-line comment is delimited
#[derive(Debug, Clone, Copy)]
pub(crate) struct Delimiters {
    pub opener_len: usize,
    /// Byte that may repeat after the opener and still belong to it (`/**`)
    pub repeat: Option<u8>,
    pub closer: &'static [u8],
    /// Skip one leading `*` on continuation lines
    pub decorated: bool,
}

/// Per-file tokenizer state shared by every family
pub(crate) struct Lexer<'a, 'n> {
    cursor: Cursor<'a>,
    annotation: &'n [u8],
    trim: &'static [u8],
    tokens: Vec<Token<'a>>,
    draft: Vec<Token<'a>>,
    annotated: bool,
    /// Line holding the title words of the current multi-line comment
    title_line: Option<usize>,
}

impl<'a, 'n> Lexer<'a, 'n> {
    pub(crate) fn new(source: &'a [u8], annotation: &'n [u8], trim: &'static [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
            annotation,
            trim,
            tokens: Vec::new(),
            draft: Vec::with_capacity(32),
            annotated: false,
            title_line: None,
        }
    }

    pub(crate) fn run(
        mut self,
        syntax: &mut impl CommentSyntax,
    ) -> Result<Vec<Token<'a>>, LexError> {
        while !self.cursor.is_exhausted() {
            self.cursor.mark_start();
            syntax.scan(&mut self)?;
        }

        let end = self.cursor.source().len();
        self.tokens
            .push(Token::new(TokenKind::EndOfFile, b"", self.cursor.line(), end, end));
        Ok(self.tokens)
    }

    pub(crate) fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    /// Consume one byte, counting it if it is a newline.
    pub(crate) fn consume(&mut self) -> u8 {
        let byte = self.cursor.advance();
        if byte == b'\n' {
            self.cursor.new_line();
        }
        byte
    }

    /// The bytes at the read head equal `pattern`.
    pub(crate) fn at(&self, pattern: &[u8]) -> bool {
        let source = self.cursor.source();
        let current = self.cursor.current();
        source.get(current..current + pattern.len()) == Some(pattern)
    }

    /// A `delim`-quoted literal opening at the read head closes before the end of the line.
    pub(crate) fn closes_on_line(&self, delim: u8) -> bool {
        let source = self.cursor.source();
        let mut i = self.cursor.current() + 1;
        while let Some(&byte) = source.get(i) {
            match byte {
                b'\n' => return false,
                b'\\' => i += 2,
                b if b == delim => return true,
                _ => i += 1,
            }
        }
        false
    }

    fn slice(&self, offset: usize) -> Result<&'a [u8], LexError> {
        self.cursor
            .slice(offset)
            .map_err(|err| LexError::range(err, self.cursor.line()))
    }

    fn push_draft(
        &mut self,
        kind: TokenKind,
        lexeme: &'a [u8],
        line: usize,
        start: usize,
        end: usize,
    ) {
        self.draft.push(Token::new(kind, lexeme, line, start, end));
    }

    /// Promote the scratch tokens if the comment was annotated, then reset for the next comment.
    fn commit_draft(&mut self) {
        if self.annotated {
            self.tokens.append(&mut self.draft);
        } else {
            self.draft.clear();
        }
        self.annotated = false;
        self.title_line = None;
    }

    /// Skip a quoted literal opening at the read head. No tokens are emitted.
    pub(crate) fn skip_string(&mut self, delim: u8, escapes: bool) -> Result<(), LexError> {
        let line = self.cursor.line();
        let start = self.cursor.current();
        self.consume();

        loop {
            if self.cursor.is_exhausted() {
                let source = self.cursor.source();
                return Err(LexError::new(
                    ErrorKind::UnterminatedString,
                    "String literal is never closed.",
                    line,
                    Span::new(start, start + 1),
                )
                .with_scanned(&source[start..])
                .with_help(format!("Close it with {}", delim as char)));
            }
            match self.consume() {
                b'\\' if escapes => {
                    self.consume();
                }
                b if b == delim => return Ok(()),
                _ => {}
            }
        }
    }

    /// Scan a single-line comment whose marker starts at the read head.
    ///
    /// `min_len` bytes of `marker` open the comment; further repeats (`///`, `##`)
    /// are folded into the start token.
    pub(crate) fn single_line_comment(
        &mut self,
        marker: u8,
        min_len: usize,
    ) -> Result<(), LexError> {
        let line = self.cursor.line();
        let start = self.cursor.current();
        for _ in 0..min_len {
            self.cursor.advance();
        }
        while self.cursor.peek() == marker {
            self.cursor.advance();
        }
        let lexeme = self.slice(self.cursor.current() - start)?;
        let end = self.cursor.current() - 1;
        self.push_draft(TokenKind::SingleLineCommentStart, lexeme, line, start, end);

        loop {
            self.cursor.skip_inline_whitespace();
            if self.cursor.is_exhausted() || self.cursor.peek() == b'\n' {
                break;
            }
            self.word(None, CommentShape::SingleLine)?;
        }

        let line = self.cursor.line();
        if self.cursor.peek() == b'\n' {
            let pos = self.cursor.current();
            self.consume();
            let lexeme = self.slice(1)?;
            self.push_draft(TokenKind::SingleLineCommentEnd, lexeme, line, pos, pos);
        } else {
            // End of input: point at the last real byte
            let pos = self.cursor.current() - 1;
            self.push_draft(TokenKind::SingleLineCommentEnd, b"\0", line, pos, pos);
        }

        self.commit_draft();
        Ok(())
    }

    /// Scan a multi-line comment whose opener starts at the read head.
    pub(crate) fn multi_line_comment(&mut self, delimiters: Delimiters) -> Result<(), LexError> {
        let open_line = self.cursor.line();
        let open_start = self.cursor.current();
        for _ in 0..delimiters.opener_len {
            self.consume();
        }
        if let Some(repeat) = delimiters.repeat {
            while self.cursor.peek() == repeat && !self.at(delimiters.closer) {
                self.consume();
            }
        }
        let lexeme = self.slice(self.cursor.current() - open_start)?;
        let open_end = self.cursor.current() - 1;
        self.push_draft(TokenKind::MultiLineCommentStart, lexeme, open_line, open_start, open_end);

        let mut line_start = false;
        loop {
            loop {
                match self.cursor.peek() {
                    b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c' => {
                        self.cursor.advance();
                    }
                    b'\n' => {
                        self.consume();
                        line_start = true;
                    }
                    _ => break,
                }
            }

            if self.cursor.is_exhausted() {
                let source = self.cursor.source();
                return Err(LexError::new(
                    ErrorKind::UnterminatedComment,
                    "Multi-line comment is never closed.",
                    open_line,
                    Span::new(open_start, open_end + 1),
                )
                .with_scanned(&source[open_start..])
                .with_help(format!(
                    "Close it with '{}'",
                    String::from_utf8_lossy(delimiters.closer)
                )));
            }

            if self.at(delimiters.closer) {
                break;
            }

            if delimiters.decorated && line_start && self.cursor.peek() == b'*' {
                self.cursor.advance();
                line_start = false;
                continue;
            }

            line_start = false;
            self.word(Some(delimiters.closer), CommentShape::MultiLine)?;
        }

        let line = self.cursor.line();
        let close_start = self.cursor.current();
        for _ in 0..delimiters.closer.len() {
            self.cursor.advance();
        }
        let lexeme = self.slice(delimiters.closer.len())?;
        let close_end = self.cursor.current() - 1;
        self.push_draft(TokenKind::MultiLineCommentEnd, lexeme, line, close_start, close_end);

        self.commit_draft();
        Ok(())
    }

    /// Lift the word at the read head and classify it.
    ///
    /// The word ends at whitespace, at the start of `closer`, or at end of input.
    fn word(&mut self, closer: Option<&[u8]>, shape: CommentShape) -> Result<(), LexError> {
        let line = self.cursor.line();
        self.cursor.mark_start();
        let start = self.cursor.start();
        while !self.cursor.is_exhausted()
            && !self.cursor.peek().is_ascii_whitespace()
            && !closer.is_some_and(|c| self.at(c))
        {
            self.cursor.advance();
        }

        let raw = self.slice(self.cursor.current() - start)?;
        let (begin, end) = trim_range(raw, self.trim);
        if begin == end {
            return Ok(());
        }
        let lexeme = &raw[begin..end];
        let (start_byte, end_byte) = (start + begin, start + end - 1);

        if !self.annotated {
            if match_annotation(lexeme, self.annotation).is_some() {
                self.push_draft(TokenKind::Annotation, lexeme, line, start_byte, end_byte);
                self.annotated = true;
            }
            return Ok(());
        }

        let kind = match shape {
            CommentShape::SingleLine => TokenKind::Title,
            CommentShape::MultiLine => {
                let title_line = *self.title_line.get_or_insert(line);
                if line == title_line { TokenKind::Title } else { TokenKind::Description }
            }
        };
        self.push_draft(kind, lexeme, line, start_byte, end_byte);
        Ok(())
    }
}
