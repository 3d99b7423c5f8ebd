//! Finds annotated comments (`// @TODO ...`) in source files and turns them into issues.
//!
//! The pipeline for one file is:
//!
//! 1. [`Family`] picks the comment grammar from the file extension.
//! 2. [`tokenize`] walks the bytes once and emits tokens for annotated comments only.
//! 3. [`CommentBuilder`] folds those tokens into [`Comment`]s.
//! 4. [`Issue::from_comment`] attaches the file path and a stable id.
//!
//! [`tokenize_and_extract`] runs steps 1-3 and touches nothing but its
//! arguments, so files can be processed in parallel; [`scan`] does exactly that
//! for a directory tree.

pub mod comment;
pub mod error;
pub mod issue;
pub mod lexer;
pub mod positions;
pub mod scan;

pub use comment::{Comment, CommentBuilder, CommentKind};
pub use error::{ErrorKind, LexError, ScanError};
pub use issue::Issue;
pub use lexer::{tokenize, Family, Token, TokenKind};
pub use scan::{scan, ScanOptions, ScanReport};

/// Extract the annotated comments of `source` using the grammar of `family`.
pub fn extract(source: &[u8], family: Family, annotation: &str) -> Result<Vec<Comment>, LexError> {
    let tokens = tokenize(source, family, annotation.as_bytes())?;
    Ok(CommentBuilder::new(&tokens, annotation.as_bytes()).build())
}

/// Extract the annotated comments of a file's bytes, resolving the grammar from its extension.
///
/// `annotation` is a case-sensitive literal such as `@TODO`, not a pattern.
pub fn tokenize_and_extract(
    source: &[u8],
    extension: &str,
    annotation: &str,
) -> Result<Vec<Comment>, LexError> {
    extract(source, Family::from_extension(extension), annotation)
}
