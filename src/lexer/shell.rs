use super::{CommentSyntax, Lexer};
use crate::error::LexError;

/// `#` comments that open only at the start of a word.
///
/// The full grammar also skips quoted strings and backslash escapes; the
/// minimal one is the fallback for files with no known grammar.
pub(crate) struct Shell {
    quoting: bool,
}

impl Shell {
    pub(crate) fn full() -> Self {
        Self { quoting: true }
    }

    pub(crate) fn minimal() -> Self {
        Self { quoting: false }
    }
}

/// `#` after one of these bytes begins a comment (`$#` and `${#x}` do not).
fn is_word_boundary(byte: u8) -> bool {
    matches!(byte, 0 | b' ' | b'\t' | b'\r' | b'\n' | b';' | b'|' | b'&' | b'(' | b')')
}

impl CommentSyntax for Shell {
    fn scan(&mut self, lexer: &mut Lexer<'_, '_>) -> Result<(), LexError> {
        let (byte, previous) = (lexer.cursor().peek(), lexer.cursor().previous());
        match byte {
            b'#' if is_word_boundary(previous) => lexer.single_line_comment(b'#', 1),
            b'\\' if self.quoting => {
                lexer.consume();
                lexer.consume();
                Ok(())
            }
            // Nothing is escaped inside single quotes
            b'\'' if self.quoting => lexer.skip_string(b'\'', false),
            quote @ (b'"' | b'`') if self.quoting => lexer.skip_string(quote, true),
            _ => {
                lexer.consume();
                Ok(())
            }
        }
    }
}
