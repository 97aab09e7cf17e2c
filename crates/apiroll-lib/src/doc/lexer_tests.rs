use super::lexer::token_text;
use super::{DocTokenKind, lex};

fn kinds(source: &str) -> Vec<(DocTokenKind, &str)> {
    lex(source)
        .iter()
        .map(|t| (t.kind, token_text(source, t)))
        .collect()
}

#[test]
fn delimiters_and_tags() {
    let tokens = kinds("/** Hi @beta */");
    assert_eq!(
        tokens,
        vec![
            (DocTokenKind::Open, "/**"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Text, "Hi"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::BlockTag, "@beta"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Close, "*/"),
        ]
    );
}

#[test]
fn continuation_stars_and_newlines() {
    let tokens = kinds("/**\r\n * a\n */");
    assert_eq!(
        tokens,
        vec![
            (DocTokenKind::Open, "/**"),
            (DocTokenKind::Newline, "\r\n"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Star, "*"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Text, "a"),
            (DocTokenKind::Newline, "\n"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Close, "*/"),
        ]
    );
}

#[test]
fn inline_tags_and_code_spans() {
    let tokens = kinds("{@link Foo} `@notATag`");
    assert_eq!(
        tokens,
        vec![
            (DocTokenKind::InlineTagOpen, "{@link"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::Text, "Foo"),
            (DocTokenKind::BraceClose, "}"),
            (DocTokenKind::Whitespace, " "),
            (DocTokenKind::CodeSpan, "`@notATag`"),
        ]
    );
}

#[test]
fn garbage_coalesced() {
    let tokens = kinds("a\u{000C}\u{000C}b");
    assert_eq!(
        tokens,
        vec![
            (DocTokenKind::Text, "a"),
            (DocTokenKind::Garbage, "\u{000C}\u{000C}"),
            (DocTokenKind::Text, "b"),
        ]
    );
}
