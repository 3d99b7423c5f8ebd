use crate::lexer::cursor::RangeError;
use crate::positions::{line_col, line_text, Span};
use std::fmt;
use std::path::PathBuf;

/// Kind of lexing error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedLanguage,
    UnterminatedString,
    UnterminatedComment,
    /// Cursor misuse inside a tokenizer. Never caused by input.
    Range,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedLanguage => "Unsupported language",
            ErrorKind::UnterminatedString => "Unterminated string",
            ErrorKind::UnterminatedComment => "Unterminated comment",
            ErrorKind::Range => "Cursor range error",
        }
    }
}

/// Error raised while tokenizing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: ErrorKind,
    pub message: String,
    /// Line the offending construct opened on
    pub line: usize,
    /// Bytes of the opening delimiter
    pub span: Span,
    pub file: Option<String>,
    /// Text consumed between the opener and the end of input
    pub scanned: Option<String>,
    pub help: Option<String>,
}

/// Longest excerpt of scanned text kept on an error.
const SCANNED_EXCERPT: usize = 60;

impl LexError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            span,
            file: None,
            scanned: None,
            help: None,
        }
    }

    pub fn unsupported(extension: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedLanguage,
            format!("No comment grammar is registered for '.{}' files.", extension),
            1,
            Span::new(0, 0),
        )
    }

    pub fn range(err: RangeError, line: usize) -> Self {
        Self::new(ErrorKind::Range, err.to_string(), line, Span::new(err.current, err.current))
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach the text scanned so far, shortened to a readable excerpt
    pub fn with_scanned(mut self, bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let excerpt: String = text.chars().take(SCANNED_EXCERPT).collect();
        self.scanned = Some(if excerpt.len() < text.len() {
            format!("{}...", excerpt)
        } else {
            excerpt
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Internal invariant violations abort a whole scan instead of one file
    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Range
    }

    /// Render the error with source context
    pub fn render(&self, source: &[u8], filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &[u8], filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &[u8], filename: &str, color: bool) -> String {
        // Red for errors only, dim for structural chrome
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let underline = if color { "\x1b[4m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();
        output.push('\n');

        let (_, col) = line_col(source, self.span.start);
        let location = format!("{}:{}:{}", filename, self.line, col + 1);
        if color {
            // OSC 8 hyperlink: \x1b]8;;URL\x07TEXT\x1b]8;;\x07
            let abs_path = std::path::Path::new(filename)
                .canonicalize()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| filename.to_string());
            output.push_str(&format!(
                " {}file:{} \x1b]8;;file://{}\x07{}{}{}\x1b]8;;\x07\n",
                dim, reset, abs_path, underline, location, reset
            ));
        } else {
            output.push_str(&format!(" file: {}\n", location));
        }

        output.push_str(&format!("{}error:{} {}\n", red, reset, self.message));

        if let Some(source_line) = line_text(source, self.line) {
            let line_num_width = format!("{}", self.line).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = line_num_width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim, self.line, reset, source_line,
                width = line_num_width
            ));

            let line_chars = source_line.chars().count();
            let underline_start = col.min(line_chars);
            let underline_len = self
                .span
                .len()
                .min(line_chars.saturating_sub(underline_start))
                .max(1);
            let spaces = " ".repeat(underline_start);
            let carets = "^".repeat(underline_len);
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{} opened here{}\n",
                dim, "", reset,
                spaces, red, carets, reset,
                width = line_num_width
            ));
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            for (i, help_line) in help.lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help_line));
                } else {
                    output.push_str(&format!("       {}\n", help_line));
                }
            }
        }

        output.push('\n');
        output
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{} line {}]: {}", file, self.line, self.message)?,
            None => write!(f, "[line {}]: {}", self.line, self.message)?,
        }
        if let Some(ref scanned) = self.scanned {
            write!(f, ": {}", scanned)?;
        }
        Ok(())
    }
}

impl std::error::Error for LexError {}

/// Error at the scan orchestration boundary (one file, or the whole batch)
#[derive(Debug)]
pub enum ScanError {
    Io { path: PathBuf, source: std::io::Error },
    Lex { path: PathBuf, error: LexError },
    /// A tokenizer broke an internal invariant; results can no longer be trusted
    Internal { path: PathBuf, error: LexError },
}

impl ScanError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanError::Io { path, .. }
            | ScanError::Lex { path, .. }
            | ScanError::Internal { path, .. } => path,
        }
    }

    /// Render with source context when the error came from the lexer
    pub fn render(&self, source: &[u8], color: bool) -> String {
        let filename = self.path().display().to_string();
        match self {
            ScanError::Lex { error, .. } | ScanError::Internal { error, .. } if color => {
                error.render_color(source, &filename)
            }
            ScanError::Lex { error, .. } | ScanError::Internal { error, .. } => {
                error.render(source, &filename)
            }
            ScanError::Io { .. } if color => {
                format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", self)
            }
            ScanError::Io { .. } => format!("error: {}\n", self),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ScanError::Lex { error, .. } => write!(f, "{}", error),
            ScanError::Internal { path, error } => {
                write!(f, "internal lexer error in {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Io { source, .. } => Some(source),
            ScanError::Lex { error, .. } | ScanError::Internal { error, .. } => Some(error),
        }
    }
}
