use super::{CommentSyntax, Delimiters, Lexer};
use crate::error::LexError;

const DOUBLE_DOCSTRING: Delimiters = Delimiters {
    opener_len: 3,
    repeat: None,
    closer: b"\"\"\"",
    decorated: false,
};

const SINGLE_DOCSTRING: Delimiters = Delimiters {
    opener_len: 3,
    repeat: None,
    closer: b"'''",
    decorated: false,
};

/// `#` comments plus triple-quoted docstrings, which are scanned as multi-line comments.
pub(crate) struct Python;

impl CommentSyntax for Python {
    fn scan(&mut self, lexer: &mut Lexer<'_, '_>) -> Result<(), LexError> {
        match lexer.cursor().peek() {
            b'"' if lexer.at(DOUBLE_DOCSTRING.closer) => lexer.multi_line_comment(DOUBLE_DOCSTRING),
            b'\'' if lexer.at(SINGLE_DOCSTRING.closer) => {
                lexer.multi_line_comment(SINGLE_DOCSTRING)
            }
            quote @ (b'"' | b'\'') => lexer.skip_string(quote, true),
            b'#' => lexer.single_line_comment(b'#', 1),
            _ => {
                lexer.consume();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::lexer::{tokenize, Family, Token, TokenKind};

    fn lex(source: &str) -> Vec<Token<'_>> {
        tokenize(source.as_bytes(), Family::Python, b"@TODO").unwrap()
    }

    fn words(tokens: &[Token<'_>], kind: TokenKind) -> Vec<String> {
        tokens.iter().filter(|t| t.kind == kind).map(|t| t.text().into_owned()).collect()
    }

    #[test]
    fn test_docstring_title_and_description() {
        let tokens = lex("\"\"\"\n@TODO improve docs\nadd examples\n\"\"\"\n");
        assert_eq!(words(&tokens, TokenKind::Title), ["improve", "docs"]);
        assert_eq!(words(&tokens, TokenKind::Description), ["add", "examples"]);
        assert_eq!(tokens[0].kind, TokenKind::MultiLineCommentStart);
        assert_eq!(tokens[0].lexeme, b"\"\"\"");
        assert_eq!(tokens[1].line, 2);
        let close = &tokens[tokens.len() - 2];
        assert_eq!(close.kind, TokenKind::MultiLineCommentEnd);
        assert_eq!((close.start_byte, close.end_byte, close.line), (36, 38, 4));
    }

    #[test]
    fn test_single_quoted_docstring_needs_matching_closer() {
        let tokens = lex("'''@TODO keep \"\"\" inside'''");
        assert_eq!(words(&tokens, TokenKind::Title), ["keep", "inside"]);
    }

    #[test]
    fn test_hash_comment() {
        let tokens = lex("x = 1  # @TODO use a constant\n");
        assert_eq!(tokens[0].lexeme, b"#");
        assert_eq!(words(&tokens, TokenKind::Title), ["use", "a", "constant"]);
        assert!(words(&tokens, TokenKind::Description).is_empty());
    }

    #[test]
    fn test_quotes_are_trimmed_from_words() {
        let tokens = lex("# @TODO rename 'legacy' helper\n");
        assert_eq!(words(&tokens, TokenKind::Title), ["rename", "legacy", "helper"]);
        let legacy = tokens.iter().find(|t| t.text() == "legacy").unwrap();
        assert_eq!((legacy.start_byte, legacy.end_byte), (16, 21));
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let tokens = lex("url = \"http://x/#@TODO\"\ncolor = '#fff'  # @TODO theme\n");
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Annotation).count(), 1);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_empty_string_is_not_a_docstring() {
        let tokens = lex("s = \"\"  # @TODO fill\n");
        assert_eq!(words(&tokens, TokenKind::Title), ["fill"]);
    }

    #[test]
    fn test_annotation_alone_promotes_next_line_to_title() {
        let source = concat!(
            "def f():\n",
            "    \"\"\"@TODO\n",
            "    split this function\n",
            "    it is too long\n",
            "    \"\"\"\n",
        );
        let tokens = lex(source);
        assert_eq!(words(&tokens, TokenKind::Title), ["split", "this", "function"]);
        assert_eq!(words(&tokens, TokenKind::Description), ["it", "is", "too", "long"]);
    }

    #[test]
    fn test_unterminated_docstring() {
        let source = b"x = 1\n\"\"\"@TODO never closed\n";
        let err = tokenize(source, Family::Python, b"@TODO").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedComment);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(b"s = 'open\n", Family::Python, b"@TODO").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
        assert_eq!(err.span.start, 4);
    }
}
