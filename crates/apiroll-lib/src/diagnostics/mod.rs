//! Non-fatal findings collected across the pipeline.
//!
//! Stages never abort on an inconsistency in the declaration graph; they report
//! a diagnostic and carry on. Callers decide what to do with the collection
//! (fail CI, print warnings) after applying a [`ReportingPolicy`].

mod message;
mod printer;

#[cfg(test)]
mod tests;

use indexmap::IndexMap;

pub use message::{Diagnostic, DiagnosticKind, Location, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

use crate::graph::DeclId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and location.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, location: Location) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic::with_default_message(kind, location),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.messages.iter().filter(|d| d.kind == kind).count()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.count_of(kind) > 0
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Re-grade every message through `policy`, dropping silenced kinds.
    pub fn apply_policy(&self, policy: &ReportingPolicy) -> Diagnostics {
        let messages = self
            .messages
            .iter()
            .filter_map(|msg| {
                let severity = policy.severity_for(msg.kind)?;
                let mut msg = msg.clone();
                msg.severity = severity;
                Some(msg)
            })
            .collect();
        Diagnostics { messages }
    }

    pub fn render(&self) -> String {
        self.printer().render()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, location: Location) -> Self {
        self.message.related.push(RelatedInfo::new(location, msg));
        self
    }

    /// Attach the message to a declaration so reports can print it inline.
    pub fn subject(mut self, decl: DeclId) -> Self {
        self.message.subject = Some(decl);
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

/// How a diagnostic kind is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reporting {
    Error,
    Warning,
    None,
}

/// Per-kind severity overrides, keyed by diagnostic code in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportingPolicy {
    overrides: IndexMap<DiagnosticKind, Reporting>,
}

impl ReportingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, kind: DiagnosticKind, reporting: Reporting) -> Self {
        self.overrides.insert(kind, reporting);
        self
    }

    /// Effective severity, or `None` when the kind is silenced.
    pub fn severity_for(&self, kind: DiagnosticKind) -> Option<Severity> {
        match self.overrides.get(&kind) {
            None => Some(kind.default_severity()),
            Some(Reporting::Error) => Some(Severity::Error),
            Some(Reporting::Warning) => Some(Severity::Warning),
            Some(Reporting::None) => None,
        }
    }
}
