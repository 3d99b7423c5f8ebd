use crate::lexer::{match_annotation, AnnotationMatch, Token, TokenKind};
use serde::Serialize;

/// Whether a comment came from a single-line or a multi-line marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    SingleLine,
    MultiLine,
}

/// An annotated comment folded out of a token sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub title: String,
    pub description: String,
    pub token_start_index: usize,
    pub token_annotation_index: usize,
    pub token_end_index: usize,
    /// Line of the annotation, not of the comment opener
    pub line_number: usize,
    pub start_line: usize,
    pub end_line: usize,
    /// First byte of the opening marker
    pub start_byte: usize,
    /// Last byte of the closing marker
    pub end_byte: usize,
    pub annotation_start: usize,
    pub annotation_end: usize,
    /// Set when the annotation carries `(#N)` from an earlier report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<u64>,
}

impl Comment {
    pub fn is_reported(&self) -> bool {
        self.issue_number.is_some()
    }
}

/// Folds a token sequence into [`Comment`]s
pub struct CommentBuilder<'t, 'a> {
    tokens: &'t [Token<'a>],
    annotation: &'t [u8],
    pos: usize,
}

impl<'t, 'a> CommentBuilder<'t, 'a> {
    /// `annotation` is only used to read issue numbers off reported annotations.
    pub fn new(tokens: &'t [Token<'a>], annotation: &'t [u8]) -> Self {
        Self { tokens, annotation, pos: 0 }
    }

    pub fn build(&mut self) -> Vec<Comment> {
        let mut comments = Vec::new();

        while let Some(token) = self.peek() {
            if token.kind.is_comment_start() {
                if let Some(comment) = self.parse_comment() {
                    comments.push(comment);
                }
            } else {
                self.advance();
            }
        }

        comments
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Fold the comment opening at `pos`, leaving `pos` just past its end marker.
    ///
    /// Returns `None` for a run without an annotation or without its end marker.
    fn parse_comment(&mut self) -> Option<Comment> {
        let start_index = self.pos;
        let open = self.tokens[start_index];
        let closing = open.kind.closing()?;
        let kind = match open.kind {
            TokenKind::SingleLineCommentStart => CommentKind::SingleLine,
            _ => CommentKind::MultiLine,
        };
        self.advance();

        let mut annotation_index = None;
        let mut title: Vec<&[u8]> = Vec::new();
        let mut description: Vec<&[u8]> = Vec::new();

        while let Some(token) = self.peek() {
            let token = *token;
            match token.kind {
                TokenKind::Annotation if annotation_index.is_none() => {
                    annotation_index = Some(self.pos)
                }
                TokenKind::Title => title.push(token.lexeme),
                TokenKind::Description => description.push(token.lexeme),
                k if k == closing => {
                    let end_index = self.pos;
                    self.advance();
                    let annotation = self.tokens[annotation_index?];
                    let issue_number = match match_annotation(annotation.lexeme, self.annotation) {
                        Some(AnnotationMatch::Reported(number)) => Some(number),
                        _ => None,
                    };
                    return Some(Comment {
                        kind,
                        title: join_words(&title),
                        description: join_words(&description),
                        token_start_index: start_index,
                        token_annotation_index: annotation_index?,
                        token_end_index: end_index,
                        line_number: annotation.line,
                        start_line: open.line,
                        end_line: token.line,
                        start_byte: open.start_byte,
                        end_byte: token.end_byte,
                        annotation_start: annotation.start_byte,
                        annotation_end: annotation.end_byte,
                        issue_number,
                    });
                }
                // A new opener or the end of the file before our end marker
                k if k.is_comment_start() || k == TokenKind::EndOfFile => return None,
                _ => {}
            }
            self.advance();
        }

        None
    }
}

fn join_words(words: &[&[u8]]) -> String {
    String::from_utf8_lossy(&words.join(&b' ')).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &'static str, line: usize, start: usize) -> Token<'static> {
        let end = start + lexeme.len().max(1) - 1;
        Token::new(kind, lexeme.as_bytes(), line, start, end)
    }

    fn build(tokens: &[Token<'_>]) -> Vec<Comment> {
        CommentBuilder::new(tokens, b"@TODO").build()
    }

    #[test]
    fn test_single_line_fold() {
        let tokens = [
            token(TokenKind::SingleLineCommentStart, "//", 1, 0),
            token(TokenKind::Annotation, "@TODO", 1, 3),
            token(TokenKind::Title, "fix", 1, 9),
            token(TokenKind::Title, "it", 1, 13),
            token(TokenKind::SingleLineCommentEnd, "\n", 1, 15),
            token(TokenKind::EndOfFile, "", 2, 16),
        ];
        let comments = build(&tokens);
        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert_eq!(comment.kind, CommentKind::SingleLine);
        assert_eq!(comment.title, "fix it");
        assert_eq!(comment.description, "");
        assert_eq!(
            (comment.token_start_index, comment.token_annotation_index, comment.token_end_index),
            (0, 1, 4)
        );
        assert_eq!((comment.start_byte, comment.end_byte), (0, 15));
        assert_eq!((comment.annotation_start, comment.annotation_end), (3, 7));
        assert_eq!(comment.issue_number, None);
    }

    #[test]
    fn test_annotation_is_searched_not_assumed_adjacent() {
        let tokens = [
            token(TokenKind::MultiLineCommentStart, "/*", 1, 0),
            token(TokenKind::Title, "stray", 1, 3),
            token(TokenKind::Annotation, "@TODO", 2, 12),
            token(TokenKind::Title, "real", 2, 18),
            token(TokenKind::Description, "more", 3, 25),
            token(TokenKind::Description, "words", 3, 30),
            token(TokenKind::MultiLineCommentEnd, "*/", 4, 37),
            token(TokenKind::EndOfFile, "", 4, 39),
        ];
        let comments = build(&tokens);
        assert_eq!(comments[0].token_annotation_index, 2);
        assert_eq!(comments[0].line_number, 2);
        assert_eq!(comments[0].start_line, 1);
        assert_eq!(comments[0].end_line, 4);
        assert_eq!(comments[0].title, "stray real");
        assert_eq!(comments[0].description, "more words");
    }

    #[test]
    fn test_runs_without_annotation_are_skipped() {
        let tokens = [
            token(TokenKind::SingleLineCommentStart, "#", 1, 0),
            token(TokenKind::Title, "orphan", 1, 2),
            token(TokenKind::SingleLineCommentEnd, "\n", 1, 8),
            token(TokenKind::SingleLineCommentStart, "#", 2, 9),
            token(TokenKind::Annotation, "@TODO", 2, 11),
            token(TokenKind::SingleLineCommentEnd, "\n", 2, 16),
            token(TokenKind::EndOfFile, "", 3, 17),
        ];
        let comments = build(&tokens);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].token_start_index, 3);
        assert_eq!(comments[0].title, "");
    }

    #[test]
    fn test_missing_end_marker_yields_nothing() {
        let tokens = [
            token(TokenKind::MultiLineCommentStart, "/*", 1, 0),
            token(TokenKind::Annotation, "@TODO", 1, 3),
            token(TokenKind::SingleLineCommentEnd, "\n", 1, 8),
            token(TokenKind::EndOfFile, "", 2, 9),
        ];
        assert!(build(&tokens).is_empty());
    }

    #[test]
    fn test_reported_annotation_carries_issue_number() {
        let tokens = [
            token(TokenKind::SingleLineCommentStart, "//", 1, 0),
            token(TokenKind::Annotation, "@TODO(#321)", 1, 3),
            token(TokenKind::Title, "done", 1, 15),
            token(TokenKind::SingleLineCommentEnd, "\n", 1, 19),
            token(TokenKind::EndOfFile, "", 2, 20),
        ];
        let comments = build(&tokens);
        assert_eq!(comments[0].issue_number, Some(321));
        assert!(comments[0].is_reported());
    }

    #[test]
    fn test_source_order_is_kept() {
        let tokens = [
            token(TokenKind::SingleLineCommentStart, "//", 1, 0),
            token(TokenKind::Annotation, "@TODO", 1, 3),
            token(TokenKind::Title, "first", 1, 9),
            token(TokenKind::SingleLineCommentEnd, "\n", 1, 14),
            token(TokenKind::MultiLineCommentStart, "/*", 2, 15),
            token(TokenKind::Annotation, "@TODO", 2, 18),
            token(TokenKind::Title, "second", 2, 24),
            token(TokenKind::MultiLineCommentEnd, "*/", 2, 31),
            token(TokenKind::EndOfFile, "", 2, 33),
        ];
        let titles: Vec<_> = build(&tokens).into_iter().map(|c| c.title).collect();
        assert_eq!(titles, ["first", "second"]);
    }
}
