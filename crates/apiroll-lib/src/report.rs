//! API report: a reviewable, untrimmed summary of the public surface.
//!
//! Unlike a rollup, the report drops doc comments, sorts members, and
//! annotates each declaration with its release tag and the warnings that
//! were reported against it.

use std::collections::HashSet;

use apiroll_core::utils::sort_key_ignoring_underscore;
use apiroll_core::{DeclarationKind, Modifier, ReleaseTag};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::extractor::ExtractorContext;
use crate::graph::{DeclId, EntityId};
use crate::resolve::Target;
use crate::rollup::{INDENT, export_lines, header_text, import_lines, included_entities, is_inline, namespace_block};

/// Render the report for an analysis, attaching `diagnostics` to the
/// declarations they name.
pub fn emit_report(ctx: ExtractorContext<'_>, diagnostics: &Diagnostics) -> String {
    let mut writer = ReportWriter {
        ctx,
        diagnostics,
        included: included_entities(ctx, ReleaseTag::Internal),
        rendered: HashSet::new(),
    };
    ctx.config.newline.apply(writer.emit())
}

struct ReportWriter<'a> {
    ctx: ExtractorContext<'a>,
    diagnostics: &'a Diagnostics,
    included: Vec<bool>,
    rendered: HashSet<DeclId>,
}

impl ReportWriter<'_> {
    fn emit(&mut self) -> String {
        let ctx = self.ctx;
        let package = ctx.table.package();
        let mut out = format!("## API Report File for \"{}\"\n\n", package.name);
        out.push_str("> Do not edit this file. It is a report generated by apiroll.\n\n");
        out.push_str("```ts\n\n");

        let mut sections = vec![import_lines(ctx, &self.included)];
        for id in self.sorted_entities() {
            let entity = ctx.resolution.entity(id);
            let block = match entity.target {
                Target::Symbol(symbol) => {
                    let prefix = if is_inline(ctx, entity) { "export " } else { "" };
                    let mut block = String::new();
                    for &decl in &ctx.table.symbol(symbol).declarations {
                        block.push_str(&self.render_decl(decl, "", prefix, None));
                        block.push('\n');
                    }
                    block
                }
                Target::Namespace(module) => namespace_block(ctx, entity, module, &self.included),
                Target::External(_) => continue,
            };
            sections.push(block);
        }
        sections.push(export_lines(ctx, &self.included, false));
        sections.push(self.unattached());
        if package.doc.is_none() {
            sections.push("// (No @packageDocumentation comment for this package)\n".to_string());
        }
        sections.retain(|s| !s.is_empty());
        out.push_str(&sections.join("\n"));
        out.push_str("\n```\n");
        out
    }

    fn sorted_entities(&self) -> Vec<EntityId> {
        let resolution = self.ctx.resolution;
        let mut ids: Vec<EntityId> = resolution
            .entities()
            .filter(|(id, _)| self.included[id.index()])
            .map(|(id, _)| id)
            .collect();
        ids.sort_by_cached_key(|id| sort_key_ignoring_underscore(&resolution.entity(*id).name));
        ids
    }

    fn render_decl(&mut self, decl: DeclId, indent: &str, prefix: &str, parent_tag: Option<ReleaseTag>) -> String {
        self.rendered.insert(decl);
        let ctx = self.ctx;
        let declaration = ctx.table.decl(decl);
        let tag = ctx.release.decl_tag(decl);
        let preapproved = declaration.parent.is_none() && ctx.release.is_preapproved(declaration.symbol);

        let mut out = String::new();
        for line in self.synopsis(decl, parent_tag, preapproved) {
            out.push_str(&format!("{indent}// {line}\n"));
        }

        out.push_str(indent);
        out.push_str(prefix);
        for modifier in Modifier::canonical_order(&declaration.modifiers) {
            out.push_str(modifier.keyword());
            out.push(' ');
        }
        out.push_str(&header_text(ctx, decl));

        if !declaration.kind.has_body() {
            out.push(if declaration.kind == DeclarationKind::EnumMember { ',' } else { ';' });
            return out;
        }
        out.push_str(" {\n");
        if !preapproved {
            let inner = format!("{indent}{INDENT}");
            let member_prefix = |exported: bool| match declaration.kind {
                DeclarationKind::Namespace if exported => "export ",
                _ => "",
            };
            let mut members = declaration.members.clone();
            members.sort_by_key(|&m| sort_key_ignoring_underscore(ctx.table.name(ctx.table.decl(m).name)));
            for member in members {
                let prefix = member_prefix(ctx.table.decl(member).exported);
                out.push_str(&self.render_decl(member, &inner, prefix, Some(tag)));
                out.push('\n');
            }
        }
        out.push_str(indent);
        out.push('}');
        out
    }

    fn synopsis(&self, decl: DeclId, parent_tag: Option<ReleaseTag>, preapproved: bool) -> Vec<String> {
        let ctx = self.ctx;
        let mut lines: Vec<String> = self
            .diagnostics
            .iter()
            .filter(|d| d.subject() == Some(decl))
            .map(|d| format!("Warning: ({}) {}", d.kind().code(), d.message()))
            .collect();

        let tag = ctx.release.decl_tag(decl);
        if preapproved {
            lines.push(format!("{} (preapproved)", tag.doc_tag()));
        } else if parent_tag != Some(tag) {
            lines.push(tag.doc_tag().to_string());
        }

        let doc = ctx.release.doc(decl);
        let flags = [
            (doc.modifiers.sealed, "@sealed"),
            (doc.modifiers.is_virtual, "@virtual"),
            (doc.modifiers.is_override, "@override"),
            (doc.modifiers.event_property, "@eventProperty"),
            (doc.deprecated.is_some(), "@deprecated"),
            (ctx.release.is_readonly(ctx.table, decl), "@readonly"),
            (ctx.release.is_undocumented(ctx.table, decl), "(undocumented)"),
        ];
        lines.extend(flags.into_iter().filter(|(on, _)| *on).map(|(_, text)| text.to_string()));
        lines
    }

    /// Diagnostics that did not land on any rendered declaration.
    fn unattached(&self) -> String {
        let rest: Vec<&Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| d.subject().is_none_or(|decl| !self.rendered.contains(&decl)))
            .collect();
        if rest.is_empty() {
            return String::new();
        }
        let mut out = String::from("// Warnings were encountered during analysis:\n//\n");
        for d in rest {
            out.push_str(&format!("// {} - ({}) {}\n", d.location(), d.kind().code(), d.message()));
        }
        out
    }
}
