//! AEDoc comments: lexing, parsing and declaration references.

mod lexer;
mod parser;
mod reference;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod reference_tests;

use indexmap::IndexMap;

use apiroll_core::ReleaseTag;

pub use lexer::{DocToken, DocTokenKind, lex};
pub use parser::parse_doc;
pub use reference::DeclarationReference;

use crate::diagnostics::DiagnosticKind;

/// Structured content of a doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub summary: String,
    pub remarks: Option<String>,
    pub params: IndexMap<String, String>,
    pub type_params: IndexMap<String, String>,
    pub returns: Option<String>,
    pub deprecated: Option<String>,
    pub examples: Vec<String>,
    pub see: Vec<String>,
    pub release_tag: Option<ReleaseTag>,
    pub modifiers: DocModifiers,
    pub inherit_doc: Option<InheritDoc>,
    pub links: Vec<DeclarationReference>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocModifiers {
    pub preapproved: bool,
    pub readonly: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub sealed: bool,
    pub event_property: bool,
    pub package_documentation: bool,
}

/// `{@inheritDoc target}` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritDoc {
    /// `None` when the directive names no target or the target does not parse.
    pub reference: Option<DeclarationReference>,
    pub text: String,
}

/// Problem found while parsing a comment, reported by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocIssue {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl DocIssue {
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl DocComment {
    /// Replace the documentation body with `source`'s, keeping modifier tags.
    ///
    /// Copies summary, remarks, params, type params and returns, then clears the
    /// `{@inheritDoc}` directive.
    pub fn inherit_from(&mut self, source: &DocComment) {
        self.summary = source.summary.clone();
        self.remarks = source.remarks.clone();
        self.params = source.params.clone();
        self.type_params = source.type_params.clone();
        self.returns = source.returns.clone();
        self.inherit_doc = None;
    }

    /// A summary shorter than 10 characters does not count as documentation.
    pub fn is_undocumented(&self) -> bool {
        self.summary.chars().filter(|c| !c.is_whitespace()).count() < 10
    }
}
