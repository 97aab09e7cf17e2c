//! Identifier rewriting inside declaration headers.
//!
//! Headers are tokenized just finely enough to tell identifiers apart from
//! member accesses, property keys, string literals and comments.

use std::collections::HashMap;
use std::ops::Range;

use logos::Logos;

use apiroll_core::DeclarationKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum SigToken {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9A-Za-z_]*")]
    Number,

    #[token(".")]
    Dot,

    #[token("...")]
    Spread,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    #[regex(r"`[^`]*`")]
    Str,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[token("/")]
    Slash,

    #[regex(r"\s+")]
    Whitespace,

    #[regex(r#"[^A-Za-z0-9_$.\s"'`/]+"#)]
    Punct,
}

/// Replace identifier tokens found in `renames`.
///
/// Identifiers after `.` and identifiers directly followed by `:` or `?:`
/// (property and parameter names) are left alone.
pub fn rewrite_identifiers(text: &str, renames: &HashMap<&str, &str>) -> String {
    if renames.is_empty() {
        return text.to_string();
    }

    let tokens: Vec<(Option<SigToken>, Range<usize>)> = SigToken::lexer(text)
        .spanned()
        .map(|(kind, span)| (kind.ok(), span))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut after_dot = false;
    for (i, (kind, span)) in tokens.iter().enumerate() {
        let slice = &text[span.clone()];
        match kind {
            Some(SigToken::Ident) if !after_dot && !is_key(text, &tokens, i) => {
                out.push_str(renames.get(slice).copied().unwrap_or(slice));
            }
            _ => out.push_str(slice),
        }
        match kind {
            Some(SigToken::Whitespace | SigToken::Comment) => {}
            Some(SigToken::Dot) => after_dot = true,
            _ => after_dot = false,
        }
    }
    out
}

fn is_key(text: &str, tokens: &[(Option<SigToken>, Range<usize>)], index: usize) -> bool {
    match tokens.get(index + 1) {
        Some((Some(SigToken::Punct), span)) => {
            let next = &text[span.clone()];
            next.starts_with(':') || next.starts_with("?:")
        }
        _ => false,
    }
}

/// Give an anonymous declaration header its synthesized name.
///
/// `class extends Base` becomes `class _anonymous_1_1 extends Base`; a value
/// becomes `const name: <type>`.
pub fn insert_name(kind: DeclarationKind, text: &str, name: &str) -> String {
    if kind == DeclarationKind::Variable {
        return format!("const {name}: {text}");
    }
    let Some(keyword) = kind.keyword() else {
        return text.to_string();
    };
    let Some(rest) = text.strip_prefix(keyword) else {
        return text.to_string();
    };
    let rest = rest.trim_start();
    if rest.is_empty() {
        format!("{keyword} {name}")
    } else if rest.starts_with(['(', '<']) {
        format!("{keyword} {name}{rest}")
    } else {
        format!("{keyword} {name} {rest}")
    }
}

/// Re-indent a `/** */` block: continuation lines get `indent` plus one space
/// before their `*`.
pub fn reindent_doc(doc: &str, indent: &str) -> String {
    doc.trim()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim();
            if i > 0 && line.starts_with('*') {
                format!("{indent} {line}")
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
