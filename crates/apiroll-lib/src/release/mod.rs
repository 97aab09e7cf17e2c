//! Release tag propagation and API consistency checks.
//!
//! Results live in a side table ([`ReleaseInfo`]) indexed by declaration and
//! symbol ids; the symbol table and the resolution stay untouched.

mod inherit_doc;
mod validate;


use log::debug;

use apiroll_core::{DeclarationKind, Modifier, ReleaseTag};

use crate::collect::SymbolTable;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::doc::{DeclarationReference, DocComment};
use crate::graph::{DeclId, SymbolId};
use crate::resolve::{Resolution, Target};

/// Effective tags, resolved docs and derived flags.
#[derive(Debug, Clone, Default)]
pub struct ReleaseInfo {
    pub(crate) decl_tags: Vec<ReleaseTag>,
    pub(crate) symbol_tags: Vec<ReleaseTag>,
    /// Per symbol; only ever set for `@internal` symbols.
    pub(crate) preapproved: Vec<bool>,
    /// Per declaration, with `{@inheritDoc}` applied.
    pub(crate) docs: Vec<DocComment>,
    /// `{@inheritDoc}` targets in other packages, left for their own extraction.
    pub(crate) external_inherit_docs: Vec<(DeclId, DeclarationReference)>,
}

impl ReleaseInfo {
    pub fn decl_tag(&self, decl: DeclId) -> ReleaseTag {
        self.decl_tags[decl.index()]
    }

    pub fn symbol_tag(&self, symbol: SymbolId) -> ReleaseTag {
        self.symbol_tags[symbol.index()]
    }

    pub fn is_preapproved(&self, symbol: SymbolId) -> bool {
        self.preapproved[symbol.index()]
    }

    pub fn doc(&self, decl: DeclId) -> &DocComment {
        &self.docs[decl.index()]
    }

    pub fn external_inherit_docs(&self) -> &[(DeclId, DeclarationReference)] {
        &self.external_inherit_docs
    }

    /// Resolved summary too short to count as documentation.
    pub fn is_undocumented(&self, table: &SymbolTable, decl: DeclId) -> bool {
        table.decl(decl).kind != DeclarationKind::Constructor && self.doc(decl).is_undocumented()
    }

    /// `readonly` keyword, `@readonly`, or a getter without a setter.
    pub fn is_readonly(&self, table: &SymbolTable, decl: DeclId) -> bool {
        let declaration = table.decl(decl);
        if declaration.has_modifier(Modifier::Readonly) || self.doc(decl).modifiers.readonly {
            return true;
        }
        declaration.kind == DeclarationKind::GetAccessor
            && !table
                .symbol(declaration.symbol)
                .declarations
                .iter()
                .any(|&d| table.decl(d).kind == DeclarationKind::SetAccessor)
    }
}

/// Assign effective tags, resolve inherited docs and validate the surface.
pub fn propagate(table: &SymbolTable, resolution: &Resolution, diag: &mut Diagnostics) -> ReleaseInfo {
    let mut info = ReleaseInfo {
        decl_tags: assign_decl_tags(table),
        docs: table.decl_ids().map(|d| table.decl(d).doc.clone()).collect(),
        ..ReleaseInfo::default()
    };
    info.symbol_tags = table
        .symbol_ids()
        .map(|s| {
            table
                .symbol(s)
                .declarations
                .iter()
                .map(|&d| info.decl_tags[d.index()])
                .max()
                .unwrap_or(ReleaseTag::Public)
        })
        .collect();
    info.preapproved = vec![false; table.symbol_count()];

    let surface = surface_declarations(table, resolution);
    check_preapproved(table, &surface, &mut info, diag);
    inherit_doc::resolve_inherited_docs(table, resolution, &surface, &mut info, diag);
    validate::validate(table, resolution, &surface, &info, diag);

    debug!(
        declarations = info.decl_tags.len(),
        surface = surface.len(),
        external_inherit_docs = info.external_inherit_docs.len();
        "propagated release tags"
    );
    info
}

/// Explicit tag, else the getter's tag for a setter, else the container's
/// tag; top-level declarations default to public.
fn assign_decl_tags(table: &SymbolTable) -> Vec<ReleaseTag> {
    let mut tags: Vec<ReleaseTag> = Vec::with_capacity(table.decl_count());
    // Containers are allocated before their members.
    for id in table.decl_ids() {
        let decl = table.decl(id);
        let tag = decl
            .doc
            .release_tag
            .or_else(|| {
                if decl.kind != DeclarationKind::SetAccessor {
                    return None;
                }
                table
                    .symbol(decl.symbol)
                    .declarations
                    .iter()
                    .map(|&d| table.decl(d))
                    .find(|d| d.kind == DeclarationKind::GetAccessor)
                    .and_then(|getter| getter.doc.release_tag)
            })
            .or_else(|| decl.parent.map(|p| tags[p.index()]))
            .unwrap_or(ReleaseTag::Public);
        tags.push(tag);
    }
    tags
}

/// Declarations of every local entity, members included, in arena order.
fn surface_declarations(table: &SymbolTable, resolution: &Resolution) -> Vec<DeclId> {
    let mut surface = Vec::new();
    let mut stack = Vec::new();
    for (_, entity) in resolution.entities() {
        let Target::Symbol(symbol) = entity.target else {
            continue;
        };
        stack.extend(table.symbol(symbol).declarations.iter().rev());
        while let Some(decl) = stack.pop() {
            surface.push(decl);
            stack.extend(table.decl(decl).members.iter().rev());
        }
    }
    surface.sort();
    surface.dedup();
    surface
}

fn check_preapproved(
    table: &SymbolTable,
    surface: &[DeclId],
    info: &mut ReleaseInfo,
    diag: &mut Diagnostics,
) {
    for &decl in surface {
        let declaration = table.decl(decl);
        if !declaration.doc.modifiers.preapproved {
            continue;
        }
        if info.decl_tag(decl) != ReleaseTag::Internal {
            diag.report(DiagnosticKind::PreapprovedBadReleaseTag, table.location(decl))
                .message(table.qualified_name(declaration.symbol))
                .subject(decl)
                .emit();
            info.docs[decl.index()].modifiers.preapproved = false;
            continue;
        }
        info.preapproved[declaration.symbol.index()] = true;
    }
}
