//! Lexer for AEDoc comment blocks.
//!
//! Produces span-based tokens; text is sliced from the comment only when needed.
//! Consecutive unrecognized characters coalesce into a single `Garbage` token.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTokenKind {
    #[token("/**")]
    Open,

    #[token("*/")]
    Close,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"[ \t]+")]
    Whitespace,

    /// Leading `*` of a continuation line, or a stray asterisk in text.
    #[token("*")]
    Star,

    /// `{@tagName` opening an inline tag.
    #[regex(r"\{@[a-zA-Z][a-zA-Z0-9]*")]
    InlineTagOpen,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    /// `@tagName`. Only a block tag when it starts a word; the parser decides.
    #[regex(r"@[a-zA-Z][a-zA-Z0-9]*")]
    BlockTag,

    /// Backtick code span; tags inside are literal text.
    #[regex(r"`[^`\n]*`")]
    CodeSpan,

    #[regex(r"[^\s@{}*`]+")]
    Text,

    #[token("@")]
    At,

    #[token("`")]
    Backtick,

    /// Coalesced unrecognized characters
    Garbage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocToken {
    pub kind: DocTokenKind,
    pub span: Range<usize>,
}

/// Tokenizes a doc comment.
pub fn lex(source: &str) -> Vec<DocToken> {
    let mut tokens = Vec::new();
    let mut lexer = DocTokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(DocToken {
                        kind: DocTokenKind::Garbage,
                        span: start..lexer.span().start,
                    });
                }
                tokens.push(DocToken {
                    kind,
                    span: lexer.span(),
                });
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(DocToken {
                        kind: DocTokenKind::Garbage,
                        span: start..source.len(),
                    });
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &DocToken) -> &'s str {
    &source[token.span.clone()]
}
