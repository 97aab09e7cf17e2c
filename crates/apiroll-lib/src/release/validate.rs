//! Consistency checks over the resolved public surface.

use std::collections::HashSet;

use apiroll_core::{Modifier, ReleaseTag};

use super::ReleaseInfo;
use super::inherit_doc::lookup_reference;
use crate::collect::{DEFAULT_EXPORT, SymbolTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::graph::{DeclId, SymbolId};
use crate::resolve::{Resolution, Target, top_level_symbol};

pub(super) fn validate(
    table: &SymbolTable,
    resolution: &Resolution,
    surface: &[DeclId],
    info: &ReleaseInfo,
    diag: &mut Diagnostics,
) {
    check_exports(table, resolution, info, diag);
    check_symbol_tags(table, surface, info, diag);
    check_references(table, resolution, surface, info, diag);
    check_links(table, resolution, surface, info, diag);
}

fn check_exports(table: &SymbolTable, resolution: &Resolution, info: &ReleaseInfo, diag: &mut Diagnostics) {
    for (_, entity) in resolution.entities() {
        let Target::Symbol(symbol) = entity.target else {
            continue;
        };
        if !entity.is_exported() {
            continue;
        }
        let declarations = &table.symbol(symbol).declarations;
        let Some(&first) = declarations.first() else {
            continue;
        };

        let untagged = declarations
            .iter()
            .all(|&d| table.decl(d).doc.release_tag.is_none());
        if untagged {
            diag.report(DiagnosticKind::MissingReleaseTag, table.location(first))
                .message(table.qualified_name(symbol))
                .subject(first)
                .emit();
        }

        if info.symbol_tag(symbol) == ReleaseTag::Internal {
            for &name in &entity.export_names {
                let name = table.name(name);
                if name == DEFAULT_EXPORT || name.starts_with('_') {
                    continue;
                }
                diag.report(DiagnosticKind::InternalMissingUnderscore, table.location(first))
                    .message(name)
                    .subject(first)
                    .emit();
            }
        }
    }
}

fn check_symbol_tags(table: &SymbolTable, surface: &[DeclId], info: &ReleaseInfo, diag: &mut Diagnostics) {
    let mut seen: HashSet<SymbolId> = HashSet::new();
    for &decl in surface {
        let symbol = table.decl(decl).symbol;
        if !seen.insert(symbol) {
            continue;
        }
        let declarations = &table.symbol(symbol).declarations;
        if declarations.len() < 2 {
            continue;
        }
        let first = declarations[0];
        let name = table.qualified_name(symbol);

        let tags: Vec<ReleaseTag> = declarations.iter().map(|&d| info.decl_tag(d)).collect();
        let internal = tags.iter().any(|&t| t == ReleaseTag::Internal);
        let mixed = tags.iter().any(|&t| t != tags[0]);
        if internal && mixed {
            diag.report(DiagnosticKind::InternalMixedReleaseTag, table.location(first))
                .message(name)
                .subject(first)
                .emit();
            continue;
        }

        let explicit: HashSet<ReleaseTag> = declarations
            .iter()
            .filter_map(|&d| table.decl(d).doc.release_tag)
            .collect();
        let overloads = declarations
            .iter()
            .all(|&d| table.decl(d).kind.is_overloadable());
        if explicit.len() > 1 && !overloads {
            diag.report(DiagnosticKind::DifferentReleaseTags, table.location(first))
                .message(name)
                .subject(first)
                .emit();
        }
    }
}

/// A declaration may not expose a less public symbol, unless that symbol is
/// preapproved.
fn check_references(
    table: &SymbolTable,
    resolution: &Resolution,
    surface: &[DeclId],
    info: &ReleaseInfo,
    diag: &mut Diagnostics,
) {
    for &decl in surface {
        let declaration = table.decl(decl);
        if declaration.has_modifier(Modifier::Private) {
            continue;
        }
        let tag = info.decl_tag(decl);
        let owner = top_level_symbol(table, declaration.symbol);

        for (reference, bound) in declaration
            .references
            .iter()
            .zip(resolution.references_of(decl))
        {
            let Some(Target::Symbol(target)) = bound.leaf else {
                continue;
            };
            if target == declaration.symbol || top_level_symbol(table, target) == owner {
                continue;
            }
            let target_tag = info.symbol_tag(target);
            if target_tag >= tag || is_preapproved(table, info, target) {
                continue;
            }
            diag.report(DiagnosticKind::IncompatibleReleaseTags, table.location(decl))
                .message(format!(
                    "`{}` is marked as {} but references `{}`, which is marked as {}",
                    table.qualified_name(declaration.symbol),
                    tag.doc_tag(),
                    reference.text,
                    target_tag.doc_tag()
                ))
                .related_to("declared here", table.symbol_location(target))
                .subject(decl)
                .emit();
        }
    }
}

fn is_preapproved(table: &SymbolTable, info: &ReleaseInfo, mut symbol: SymbolId) -> bool {
    loop {
        if info.is_preapproved(symbol) {
            return true;
        }
        match table.symbol(symbol).parent {
            Some(parent) => symbol = parent,
            None => return false,
        }
    }
}

fn check_links(
    table: &SymbolTable,
    resolution: &Resolution,
    surface: &[DeclId],
    info: &ReleaseInfo,
    diag: &mut Diagnostics,
) {
    let package = &table.package().name;
    for &decl in surface {
        for link in &info.doc(decl).links {
            if link.is_external(package) || lookup_reference(table, resolution, link).is_some() {
                continue;
            }
            diag.report(DiagnosticKind::UnresolvedLink, table.location(decl))
                .message(link.to_string())
                .subject(decl)
                .emit();
        }
    }
}
