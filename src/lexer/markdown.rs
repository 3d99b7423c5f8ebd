use super::{CommentSyntax, Delimiters, Lexer};
use crate::error::LexError;

const HTML_COMMENT: Delimiters = Delimiters {
    opener_len: 4,
    repeat: None,
    closer: b"-->",
    decorated: false,
};

/// HTML comments (`<!-- -->`) are the only comments Markdown has.
pub(crate) struct Markdown;

impl CommentSyntax for Markdown {
    fn scan(&mut self, lexer: &mut Lexer<'_, '_>) -> Result<(), LexError> {
        if lexer.at(b"<!--") {
            return lexer.multi_line_comment(HTML_COMMENT);
        }
        lexer.consume();
        Ok(())
    }
}
