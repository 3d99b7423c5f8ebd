use issue_summoner::{
    extract, tokenize, tokenize_and_extract, CommentKind, ErrorKind, Family, TokenKind,
};

const ANNOTATION: &str = "@TODO";

fn extract_c(source: &str) -> Vec<issue_summoner::Comment> {
    extract(source.as_bytes(), Family::CLike, ANNOTATION).unwrap()
}

#[test]
fn test_single_line_example() {
    let comments = extract_c("int main() {return 0;} // @TODO fix return value\n");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].kind, CommentKind::SingleLine);
    assert_eq!(comments[0].title, "fix return value");
    assert_eq!(comments[0].description, "");
    assert_eq!(comments[0].line_number, 1);
}

#[test]
fn test_python_docstring_example() {
    let source = b"\"\"\"\n@TODO improve docs\nadd examples\n\"\"\"\n";
    let comments = extract(source, Family::Python, ANNOTATION).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].title, "improve docs");
    assert_eq!(comments[0].description, "add examples");
    assert_eq!(comments[0].line_number, 2);
}

#[test]
fn test_only_the_annotated_comment_survives() {
    let source = "// setup the buffer\nint x = 0;\n// @TODO grow it\n";
    let comments = extract_c(source);
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].title, "grow it");
    assert_eq!(comments[0].start_line, 3);
    assert_eq!(comments[0].start_byte, source.find("// @TODO").unwrap());
}

#[test]
fn test_multi_line_title_and_description() {
    let source = "/* @TODO word1 word2\n   word3 word4 */\n";
    let comments = extract_c(source);
    assert_eq!(comments[0].kind, CommentKind::MultiLine);
    assert_eq!(comments[0].title, "word1 word2");
    assert_eq!(comments[0].description, "word3 word4");
    assert_eq!((comments[0].start_line, comments[0].end_line), (1, 2));
    assert_eq!(comments[0].end_byte, source.find("*/").unwrap() + 1);
}

#[test]
fn test_files_without_annotation_yield_nothing() {
    let sources: [(&str, Family); 4] = [
        ("/* a */ // b\nint y;\n", Family::CLike),
        ("# a\n'''b'''\n", Family::Python),
        ("echo hi # there\n", Family::Shell),
        ("<!-- note -->\n", Family::Markdown),
    ];
    for (source, family) in sources {
        assert!(extract(source.as_bytes(), family, ANNOTATION).unwrap().is_empty(), "{source:?}");
    }
}

#[test]
fn test_comment_markers_inside_strings_are_ignored() {
    let source = r#"const char *a = "/* @TODO not a comment */";
const char *b = "// @TODO nor this";
"#;
    let tokens = tokenize(source.as_bytes(), Family::CLike, ANNOTATION.as_bytes()).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EndOfFile);
}

#[test]
fn test_unterminated_comment_reports_opening_line() {
    let err = extract(b"int a;\n\n/* @TODO never closed", Family::CLike, ANNOTATION).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedComment);
    assert_eq!(err.line, 3);
    assert!(!err.is_internal());
}

#[test]
fn test_unterminated_string() {
    let err = extract(b"x = \"never\n", Family::Python, ANNOTATION).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedString);
    assert_eq!(err.line, 1);
}

#[test]
fn test_token_ranges_round_trip() {
    let source = "fn f<'a>(x: &'a str) {} /// @TODO doc\n/** @TODO\n * title here\n * more\n */\n";
    let bytes = source.as_bytes();
    let tokens = tokenize(bytes, Family::CLike, ANNOTATION.as_bytes()).unwrap();
    assert!(tokens.len() > 1);
    for token in tokens.iter().filter(|t| t.kind != TokenKind::EndOfFile) {
        assert_eq!(&bytes[token.start_byte..=token.end_byte], token.lexeme, "{token}");
    }
    let comments = extract_c(source);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].title, "doc");
    assert_eq!(comments[1].title, "title here");
    assert_eq!(comments[1].description, "more");
}

#[test]
fn test_python_trimmed_words_keep_source_ranges() {
    let source = "# \"@TODO\" quoted 'words'\n";
    let tokens = tokenize(source.as_bytes(), Family::Python, ANNOTATION.as_bytes()).unwrap();
    let words: Vec<_> = tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Annotation | TokenKind::Title))
        .collect();
    assert_eq!(words.len(), 3);
    for token in words {
        assert_eq!(&source.as_bytes()[token.start_byte..=token.end_byte], token.lexeme);
    }
    let comments = extract(source.as_bytes(), Family::Python, ANNOTATION).unwrap();
    assert_eq!(comments[0].title, "quoted words");
}

#[test]
fn test_custom_annotation() {
    let source = b"// @TODO not this one\n// @FIXME this one\n";
    let comments = tokenize_and_extract(source, "go", "@FIXME").unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].title, "this one");
}

#[test]
fn test_makefile_uses_shell_grammar() {
    let path = std::path::Path::new("build/Makefile");
    assert_eq!(Family::for_path(path), Family::Shell);
    let source = b"all:\n\t@echo ok # @TODO parallel build\n";
    let comments = extract(source, Family::for_path(path), ANNOTATION).unwrap();
    assert_eq!(comments[0].title, "parallel build");
}

#[test]
fn test_unknown_extension_uses_default_grammar() {
    let source = b"key = value # @TODO document key\n";
    let comments = tokenize_and_extract(source, "toml", ANNOTATION).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].title, "document key");
}
