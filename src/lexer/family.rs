//! Maps file extensions to the comment grammar used to scan them.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Group of languages sharing the same comment and string syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    /// `//`, `/* */`: C, C++, Java, JS/TS, C#, Go, PHP, Swift, Kotlin, Rust, ...
    CLike,
    /// `#`, `'''`/`"""` docstrings
    Python,
    /// `#` at word start, quoted strings and backslash escapes
    Shell,
    /// `<!-- -->`
    Markdown,
    /// `#` at word start, nothing else
    Default,
}

const CLIKE_EXTENSIONS: &[&str] = &[
    "c", "h", "cc", "cpp", "cxx", "hpp", "hh", "java", "js", "jsx", "mjs", "cjs", "ts", "tsx",
    "mts", "cts", "cs", "go", "php", "swift", "kt", "kts", "rs", "m", "mm", "scala", "dart",
    "groovy", "proto", "zig",
];
const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];
const SHELL_EXTENSIONS: &[&str] = &["sh", "bash", "zsh", "ps1"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Extensionless files scanned with the shell grammar.
const SHELL_FILE_NAMES: &[&str] = &["Makefile", "makefile", "GNUmakefile", "Dockerfile"];

impl Family {
    /// Resolve a family from a file extension, with or without the leading dot.
    /// Unknown extensions fall back to [`Family::Default`].
    pub fn from_extension(ext: &str) -> Family {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if CLIKE_EXTENSIONS.contains(&ext) {
            Family::CLike
        } else if PYTHON_EXTENSIONS.contains(&ext) {
            Family::Python
        } else if SHELL_EXTENSIONS.contains(&ext) {
            Family::Shell
        } else if MARKDOWN_EXTENSIONS.contains(&ext) {
            Family::Markdown
        } else {
            Family::Default
        }
    }

    /// Resolve a family for a path, also recognising well-known extensionless names.
    pub fn for_path(path: &Path) -> Family {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if SHELL_FILE_NAMES.contains(&file_name) {
            return Family::Shell;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Family::Default, Family::from_extension)
    }

    /// Characters stripped from both ends of every comment word.
    pub fn trim_chars(&self) -> &'static [u8] {
        match self {
            Family::Python => b"'\"#",
            Family::CLike | Family::Shell | Family::Markdown | Family::Default => b"",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::CLike => "c-like",
            Family::Python => "python",
            Family::Shell => "shell",
            Family::Markdown => "markdown",
            Family::Default => "default",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip `chars` from both ends of `word`, returning the kept sub-range.
pub(crate) fn trim_range(word: &[u8], chars: &[u8]) -> (usize, usize) {
    let begin = word.iter().position(|b| !chars.contains(b)).unwrap_or(word.len());
    let end = word.iter().rposition(|b| !chars.contains(b)).map_or(begin, |i| i + 1);
    (begin, end)
}
