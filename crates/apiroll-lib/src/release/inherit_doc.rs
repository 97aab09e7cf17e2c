//! `{@inheritDoc}` resolution.

use log::trace;

use super::ReleaseInfo;
use crate::collect::SymbolTable;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::doc::DeclarationReference;
use crate::graph::DeclId;
use crate::resolve::{Resolution, Target};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Visiting,
    Visited,
}

struct DocResolver<'a> {
    table: &'a SymbolTable,
    resolution: &'a Resolution,
    info: &'a mut ReleaseInfo,
    diag: &'a mut Diagnostics,
    state: Vec<Visit>,
}

pub(super) fn resolve_inherited_docs(
    table: &SymbolTable,
    resolution: &Resolution,
    surface: &[DeclId],
    info: &mut ReleaseInfo,
    diag: &mut Diagnostics,
) {
    let mut resolver = DocResolver {
        table,
        resolution,
        info,
        diag,
        state: vec![Visit::Unvisited; table.decl_count()],
    };
    for &decl in surface {
        resolver.visit(decl);
    }
}

/// Follow a declaration reference from the entry point exports.
///
/// Returns the first declaration of the named symbol.
pub(crate) fn lookup_reference(
    table: &SymbolTable,
    resolution: &Resolution,
    reference: &DeclarationReference,
) -> Option<DeclId> {
    let (first, rest) = reference.path.split_first()?;
    let mut current = resolution.entry_export(table, first)?;
    for component in rest {
        let name = table.interner().get(component)?;
        current = match current {
            Target::Symbol(symbol) => Target::Symbol(*table.symbol(symbol).members.get(&name)?),
            Target::Namespace(module) => *resolution.exports_of(module).get(&name)?,
            Target::External(_) => return None,
        };
    }
    match current {
        Target::Symbol(symbol) => table.symbol(symbol).declarations.first().copied(),
        _ => None,
    }
}

impl DocResolver<'_> {
    /// Walk the `{@inheritDoc}` chain starting at `root`, then copy the
    /// documentation back along it, deepest link first.
    fn visit(&mut self, root: DeclId) {
        let mut chain: Vec<(DeclId, DeclId)> = Vec::new();
        let mut current = root;

        while self.state[current.index()] == Visit::Unvisited {
            self.state[current.index()] = Visit::Visiting;
            match self.source_of(current) {
                Some(source) => {
                    chain.push((current, source));
                    current = source;
                }
                None => self.state[current.index()] = Visit::Visited,
            }
        }

        while let Some((decl, source)) = chain.pop() {
            let inherited = self.info.docs[source.index()].clone();
            self.info.docs[decl.index()].inherit_from(&inherited);
            self.state[decl.index()] = Visit::Visited;
        }
    }

    /// The local declaration `decl` inherits its documentation from, if any.
    ///
    /// Directives that cannot be followed are reported and cleared here.
    fn source_of(&mut self, decl: DeclId) -> Option<DeclId> {
        let inherit = self.info.docs[decl.index()].inherit_doc.clone()?;
        let location = self.table.location(decl);

        let reference = match inherit.reference {
            None => {
                self.diag
                    .report(DiagnosticKind::UnresolvedInheritDocBase, location)
                    .subject(decl)
                    .emit();
                self.info.docs[decl.index()].inherit_doc = None;
                return None;
            }
            Some(reference) if reference.is_external(&self.table.package().name) => {
                trace!(reference = reference.to_string().as_str(); "inheritDoc from another package");
                self.info.external_inherit_docs.push((decl, reference));
                return None;
            }
            Some(reference) => reference,
        };

        let Some(source) = lookup_reference(self.table, self.resolution, &reference) else {
            self.diag
                .report(DiagnosticKind::UnresolvedInheritDocReference, location)
                .message(reference.to_string())
                .subject(decl)
                .emit();
            self.info.docs[decl.index()].inherit_doc = None;
            return None;
        };

        if self.state[source.index()] == Visit::Visiting {
            let symbol = self.table.decl(decl).symbol;
            self.diag
                .report(DiagnosticKind::CyclicInheritDoc, location)
                .message(format!(
                    "`{{@inheritDoc}}` on `{}` leads back to itself through `{reference}`",
                    self.table.qualified_name(symbol)
                ))
                .related_to("cycle continues here", self.table.location(source))
                .subject(decl)
                .emit();
            self.info.docs[decl.index()].inherit_doc = None;
            return None;
        }

        Some(source)
    }
}
