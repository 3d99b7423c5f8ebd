use serde::Serialize;
use std::fmt;

/// Kind of token produced by the comment tokenizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // === Comment markers ===
    /// Opening marker of a single-line comment: `//`, `#`
    SingleLineCommentStart,
    /// Terminating byte of a single-line comment: `\n`, or `\0` at end of input
    SingleLineCommentEnd,
    /// Opening marker of a multi-line comment: `/*`, `"""`, `<!--`
    MultiLineCommentStart,
    /// Closing marker of a multi-line comment: `*/`, `"""`, `-->`
    MultiLineCommentEnd,

    // === Comment content ===
    /// The configured annotation, e.g. `@TODO` or `@TODO(#12)`
    Annotation,
    /// Word on the first content line after the annotation
    Title,
    /// Word on any later line of a multi-line comment
    Description,

    // === Structural ===
    EndOfFile,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::SingleLineCommentStart => "SINGLE_LINE_COMMENT_START",
            TokenKind::SingleLineCommentEnd => "SINGLE_LINE_COMMENT_END",
            TokenKind::MultiLineCommentStart => "MULTI_LINE_COMMENT_START",
            TokenKind::MultiLineCommentEnd => "MULTI_LINE_COMMENT_END",
            TokenKind::Annotation => "ANNOTATION",
            TokenKind::Title => "TITLE",
            TokenKind::Description => "DESCRIPTION",
            TokenKind::EndOfFile => "EOF",
        }
    }

    pub fn is_comment_start(&self) -> bool {
        matches!(self, TokenKind::SingleLineCommentStart | TokenKind::MultiLineCommentStart)
    }

    /// The end marker that closes a comment opened by `self`.
    pub fn closing(&self) -> Option<TokenKind> {
        match self {
            TokenKind::SingleLineCommentStart => Some(TokenKind::SingleLineCommentEnd),
            TokenKind::MultiLineCommentStart => Some(TokenKind::MultiLineCommentEnd),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token borrowing its lexeme from the scanned file.
///
/// `start_byte` and `end_byte` are inclusive offsets into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a [u8],
    pub line: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl<'a> Token<'a> {
    pub fn new(
        kind: TokenKind,
        lexeme: &'a [u8],
        line: usize,
        start_byte: usize,
        end_byte: usize,
    ) -> Self {
        debug_assert!(start_byte <= end_byte);
        Self { kind, lexeme, line, start_byte, end_byte }
    }

    /// Lexeme as text, replacing invalid UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'a, str> {
        String::from_utf8_lossy(self.lexeme)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:>6}..{:<6} {:<26} {:?}",
            self.line,
            self.start_byte,
            self.end_byte,
            self.kind.as_str(),
            self.text()
        )
    }
}
