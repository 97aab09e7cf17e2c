//! AEDoc comment parser.
//!
//! Splits a `/** ... */` block into its summary and block sections, and records
//! the modifier tags and inline references the later stages act on. Problems are
//! returned as [`DocIssue`]s; parsing never fails.

use apiroll_core::ReleaseTag;

use super::lexer::{DocToken, DocTokenKind, lex, token_text};
use super::reference::DeclarationReference;
use super::{DocComment, DocIssue, InheritDoc};
use crate::diagnostics::DiagnosticKind;

/// Parse a raw doc comment.
pub fn parse_doc(source: &str) -> (DocComment, Vec<DocIssue>) {
    let tokens = lex(source);
    let mut parser = Parser::new(source, &tokens);
    parser.run();
    (parser.doc, parser.issues)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    Summary,
    Remarks,
    Param(String),
    TypeParam(String),
    Returns,
    Deprecated,
    Example,
    See,
    /// Sections the model does not keep (`@privateRemarks`, `@throws`, ...).
    Discarded,
}

struct Parser<'s, 't> {
    source: &'s str,
    tokens: &'t [DocToken],
    pos: usize,
    end: usize,
    doc: DocComment,
    issues: Vec<DocIssue>,
    section: Section,
    buf: String,
    at_line_start: bool,
    word_start: bool,
}

impl<'s, 't> Parser<'s, 't> {
    fn new(source: &'s str, tokens: &'t [DocToken]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            end: tokens.len(),
            doc: DocComment::default(),
            issues: Vec::new(),
            section: Section::Summary,
            buf: String::new(),
            at_line_start: false,
            word_start: true,
        }
    }

    fn run(&mut self) {
        self.strip_delimiters();

        let tokens = self.tokens;
        let source = self.source;
        while self.pos < self.end {
            let token = &tokens[self.pos];
            self.pos += 1;

            if self.at_line_start {
                match token.kind {
                    DocTokenKind::Whitespace => continue,
                    DocTokenKind::Star => {
                        self.at_line_start = false;
                        continue;
                    }
                    _ => self.at_line_start = false,
                }
            }

            let text = token_text(source, token);
            match token.kind {
                DocTokenKind::Newline => {
                    self.buf.push('\n');
                    self.at_line_start = true;
                    self.word_start = true;
                }
                DocTokenKind::Whitespace => {
                    self.buf.push(' ');
                    self.word_start = true;
                }
                DocTokenKind::BlockTag if self.word_start => {
                    self.block_tag(text);
                    self.word_start = false;
                }
                DocTokenKind::InlineTagOpen => {
                    self.inline_tag(text);
                    self.word_start = false;
                }
                _ => {
                    self.buf.push_str(text);
                    self.word_start = false;
                }
            }
        }

        self.flush();
    }

    /// Narrow `pos..end` to the content between `/**` and `*/`.
    fn strip_delimiters(&mut self) {
        let first = self
            .tokens
            .iter()
            .position(|t| !is_blank(t.kind));
        let last = self
            .tokens
            .iter()
            .rposition(|t| !is_blank(t.kind));

        let opened = first.is_some_and(|i| self.tokens[i].kind == DocTokenKind::Open);
        let closed = last.is_some_and(|i| self.tokens[i].kind == DocTokenKind::Close);

        if opened && let Some(i) = first {
            self.pos = i + 1;
        }
        if closed && let Some(i) = last {
            self.end = i;
        }
        if !opened || !closed || self.pos > self.end {
            self.issues.push(DocIssue::new(
                DiagnosticKind::MalformedDocComment,
                "doc comments must start with `/**` and end with `*/`",
            ));
            self.end = self.end.max(self.pos);
        }
    }

    fn block_tag(&mut self, tag: &str) {
        if let Some(release) = ReleaseTag::from_doc_tag(tag) {
            if self.doc.release_tag.is_some() {
                self.issues
                    .push(DocIssue::new(DiagnosticKind::ExtraReleaseTag, tag));
            } else {
                self.doc.release_tag = Some(release);
            }
            return;
        }

        match tag {
            "@preapproved" => self.doc.modifiers.preapproved = true,
            "@readonly" => self.doc.modifiers.readonly = true,
            "@virtual" => self.doc.modifiers.is_virtual = true,
            "@override" => self.doc.modifiers.is_override = true,
            "@sealed" => self.doc.modifiers.sealed = true,
            "@eventProperty" => self.doc.modifiers.event_property = true,
            "@packageDocumentation" => self.doc.modifiers.package_documentation = true,
            "@remarks" => self.switch(Section::Remarks),
            "@returns" => self.switch(Section::Returns),
            "@deprecated" => self.switch(Section::Deprecated),
            "@example" => self.switch(Section::Example),
            "@see" => self.switch(Section::See),
            "@privateRemarks" | "@defaultValue" | "@throws" | "@decorator" => {
                self.switch(Section::Discarded)
            }
            "@param" | "@typeParam" => match self.param_name() {
                Some(name) if tag == "@param" => self.switch(Section::Param(name)),
                Some(name) => self.switch(Section::TypeParam(name)),
                None => {
                    self.issues.push(DocIssue::new(
                        DiagnosticKind::MalformedDocComment,
                        format!("`{tag}` needs a parameter name"),
                    ));
                    self.switch(Section::Discarded);
                }
            },
            _ => {
                self.issues
                    .push(DocIssue::new(DiagnosticKind::UndefinedDocTag, tag));
                self.buf.push_str(tag);
            }
        }
    }

    /// Consume `name` and an optional ` -` separator after `@param`.
    fn param_name(&mut self) -> Option<String> {
        let tokens = self.tokens;
        self.skip_whitespace();
        if self.pos >= self.end || tokens[self.pos].kind != DocTokenKind::Text {
            return None;
        }
        let name = token_text(self.source, &tokens[self.pos])
            .trim_end_matches('-')
            .to_string();
        self.pos += 1;

        let save = self.pos;
        self.skip_whitespace();
        if self.pos < self.end && token_text(self.source, &tokens[self.pos]) == "-" {
            self.pos += 1;
        } else {
            self.pos = save;
        }
        Some(name)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.end && self.tokens[self.pos].kind == DocTokenKind::Whitespace {
            self.pos += 1;
        }
    }

    fn inline_tag(&mut self, open: &str) {
        let tag = &open[1..];
        let content_start = self.tokens[self.pos - 1].span.end;

        let Some(close) = (self.pos..self.end)
            .find(|&i| self.tokens[i].kind == DocTokenKind::BraceClose)
        else {
            self.issues.push(DocIssue::new(
                DiagnosticKind::MalformedDocComment,
                format!("unterminated inline tag `{open}`"),
            ));
            self.buf.push_str(open);
            return;
        };

        let content_end = self.tokens[close].span.start;
        let inner = self.source[content_start..content_end].trim();
        self.pos = close + 1;

        match tag {
            "@inheritDoc" => {
                self.doc.inherit_doc = Some(InheritDoc {
                    reference: DeclarationReference::parse(inner),
                    text: inner.to_string(),
                });
            }
            "@link" => {
                let target = inner.split('|').next().unwrap_or("").trim();
                if !target.contains("://")
                    && let Some(reference) = DeclarationReference::parse(target)
                {
                    self.doc.links.push(reference);
                }
                self.push_inline_raw(tag, inner);
            }
            "@label" | "@docRoot" => self.push_inline_raw(tag, inner),
            _ => {
                self.issues
                    .push(DocIssue::new(DiagnosticKind::UndefinedDocTag, format!("{{{tag}}}")));
                self.push_inline_raw(tag, inner);
            }
        }
    }

    fn push_inline_raw(&mut self, tag: &str, inner: &str) {
        self.buf.push('{');
        self.buf.push_str(tag);
        if !inner.is_empty() {
            self.buf.push(' ');
            self.buf.push_str(inner);
        }
        self.buf.push('}');
    }

    fn switch(&mut self, section: Section) {
        self.flush();
        self.section = section;
    }

    fn flush(&mut self) {
        let text = normalize(&std::mem::take(&mut self.buf));
        let doc = &mut self.doc;
        match std::mem::replace(&mut self.section, Section::Discarded) {
            Section::Summary => doc.summary = text,
            Section::Remarks => doc.remarks = Some(text),
            Section::Param(name) => {
                doc.params.insert(name, text);
            }
            Section::TypeParam(name) => {
                doc.type_params.insert(name, text);
            }
            Section::Returns => doc.returns = Some(text),
            Section::Deprecated => doc.deprecated = Some(text),
            Section::Example => doc.examples.push(text),
            Section::See => doc.see.push(text),
            Section::Discarded => {}
        }
    }
}

fn is_blank(kind: DocTokenKind) -> bool {
    matches!(kind, DocTokenKind::Whitespace | DocTokenKind::Newline)
}

/// Trim every line and drop leading/trailing blank lines.
fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}
