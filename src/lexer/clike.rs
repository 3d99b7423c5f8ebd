//! `//` and `/* */` comments, shared by C and every language that borrowed its syntax.

use super::{CommentSyntax, Delimiters, Lexer};
use crate::error::LexError;

const BLOCK: Delimiters = Delimiters {
    opener_len: 2,
    repeat: Some(b'*'),
    closer: b"*/",
    decorated: true,
};

pub(crate) struct CLike;

/// `'` followed by an identifier that is not closed one byte later: a Rust
/// lifetime (`'static`, `'a`) or loop label, not a literal.
fn is_lifetime(lexer: &Lexer<'_, '_>) -> bool {
    let cursor = lexer.cursor();
    let first = cursor.peek_at(1);
    (first.is_ascii_alphabetic() || first == b'_') && cursor.peek_at(2) != b'\''
}

impl CommentSyntax for CLike {
    fn scan(&mut self, lexer: &mut Lexer<'_, '_>) -> Result<(), LexError> {
        match (lexer.cursor().peek(), lexer.cursor().peek_next()) {
            (quote @ (b'"' | b'`'), _) => lexer.skip_string(quote, true),
            // Any other `'` is a char literal or a JS/PHP string when it closes
            // on the same line.
            (b'\'', _) if !is_lifetime(lexer) && lexer.closes_on_line(b'\'') => {
                lexer.skip_string(b'\'', true)
            }
            (b'/', b'/') => lexer.single_line_comment(b'/', 2),
            (b'/', b'*') => lexer.multi_line_comment(BLOCK),
            _ => {
                lexer.consume();
                Ok(())
            }
        }
    }
}
