use crate::comment::Comment;
use crate::positions::line_col;
use serde::Serialize;
use std::path::Path;

/// An annotated comment tied to the file it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// `{file_name}-{start_byte}:{end_byte}`; stable while the comment does not move
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_path: String,
    pub line_number: usize,
    /// 0-based character column of the annotation
    pub column: usize,
    pub comment: Comment,
}

impl Issue {
    /// Materialize an issue from a comment found in `source`, read from `path`.
    pub fn from_comment(comment: Comment, path: &Path, source: &[u8]) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (_, column) = line_col(source, comment.annotation_start);

        Self {
            id: format!("{}-{}:{}", file_name, comment.start_byte, comment.end_byte),
            title: comment.title.clone(),
            description: comment.description.clone(),
            file_name,
            file_path: path.display().to_string(),
            line_number: comment.line_number,
            column,
            comment,
        }
    }

    /// `path:line:col` as printed by compilers, clickable in most terminals
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file_path, self.line_number, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use crate::lexer::Family;

    #[test]
    fn test_issue_identity() {
        let source = b"int x;\n    // @TODO fix\n";
        let comment = extract(source, Family::CLike, "@TODO").unwrap().remove(0);
        let issue = Issue::from_comment(comment, Path::new("src/lib/main.c"), source);
        assert_eq!(issue.id, "main.c-11:23");
        assert_eq!(issue.file_name, "main.c");
        assert_eq!(issue.file_path, "src/lib/main.c");
        assert_eq!(issue.title, "fix");
        assert_eq!(issue.line_number, 2);
        assert_eq!(issue.column, 7);
        assert_eq!(issue.location(), "src/lib/main.c:2:8");
    }

    #[test]
    fn test_serializes_issue_number_only_when_reported() {
        let source = b"# @TODO(#7) shipped\n# @TODO pending\n";
        let comments = extract(source, Family::Shell, "@TODO").unwrap();
        let issues: Vec<_> = comments
            .into_iter()
            .map(|c| Issue::from_comment(c, Path::new("run.sh"), source))
            .collect();
        let reported = serde_json::to_value(&issues[0]).unwrap();
        let pending = serde_json::to_value(&issues[1]).unwrap();
        assert_eq!(reported["comment"]["issue_number"], 7);
        assert!(pending["comment"].get("issue_number").is_none());
        assert_eq!(pending["title"], "pending");
    }
}
