//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use indexmap::IndexMap;

use super::Diagnostics;
use super::message::{Diagnostic, Severity};

/// Builder for rendering diagnostics with various options.
///
/// Messages whose module source is known and that carry a byte range render as
/// annotated snippets; everything else falls back to one line per message.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    sources: Option<&'s IndexMap<String, String>>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            sources: None,
            colored: false,
        }
    }

    /// Module sources keyed by module path.
    pub fn sources(mut self, sources: &'s IndexMap<String, String>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.snippet_source(diag) {
                Some((source, range)) => self.format_snippet(w, &renderer, diag, source, range)?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn snippet_source(&self, diag: &Diagnostic) -> Option<(&'s str, Range<usize>)> {
        let sources = self.sources?;
        let source = sources.get(&diag.location.path)?;
        let range = diag.location.range.clone()?;
        Some((source.as_str(), adjust_range(range, source.len())))
    }

    fn format_snippet(
        &self,
        w: &mut impl Write,
        renderer: &Renderer,
        diag: &Diagnostic,
        source: &str,
        range: Range<usize>,
    ) -> std::fmt::Result {
        let mut snippet = Snippet::source(source)
            .line_start(1)
            .path(diag.location.path.as_str())
            .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

        for related in &diag.related {
            if related.location.path != diag.location.path {
                continue;
            }
            let Some(related_range) = related.location.range.clone() else {
                continue;
            };
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(adjust_range(related_range, source.len()))
                    .label(&related.message),
            );
        }

        let title = format!("{} ({})", diag.message, diag.kind.code());
        let level = severity_to_level(diag.severity);
        let report: Vec<Group> = vec![level.primary_title(&title).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: Range<u32>, limit: usize) -> Range<usize> {
    let start = (range.start as usize).min(limit);
    let end = (range.end as usize).min(limit);

    if start >= end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
