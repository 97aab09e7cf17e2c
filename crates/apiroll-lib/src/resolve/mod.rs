//! Symbol graph resolver.
//!
//! Turns the collector's symbol table into a canonical graph:
//! - every export and import edge resolved to a [`Target`] (or reported),
//! - star exports flattened into per-module export tables,
//! - declaration references bound to targets,
//! - the set of rollup [`Entity`] values with collision-free emitted names.
//!
//! Nothing here recurses over the edge graph; alias chains are followed by a
//! worklist bounded by the edge count.

mod edges;
mod entities;


use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use apiroll_core::Name;

use crate::collect::SymbolTable;
use crate::config::ExtractorConfig;
use crate::diagnostics::{Diagnostics, Location};
use crate::graph::{DeclId, EdgeId, EntityId, ExternalId, ModuleId, SymbolId};

pub use entities::BUILTIN_GLOBALS;

/// What an export name, import binding or reference ultimately denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Symbol(SymbolId),
    External(ExternalId),
    /// `import * as ns` / `export * as ns` of a package module.
    Namespace(ModuleId),
}

/// A binding imported from another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
    pub package: String,
    /// `None` for a namespace import.
    pub imported: Option<Name>,
    /// First local name the binding was seen under.
    pub local: Name,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRole {
    Export,
    Import,
}

/// Where an edge gets its target from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeSource {
    /// A module-scope name of the edge's own module.
    Local(Name),
    /// A name exported by another package module.
    Reexport { module: ModuleId, name: Name },
    External(ExternalId),
    Namespace(ModuleId),
    /// Relative specifier that names no module.
    MissingModule(String),
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub module: ModuleId,
    /// Export name or local import binding.
    pub name: Name,
    pub role: EdgeRole,
    pub source: EdgeSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeState {
    Pending,
    Resolved(Target),
    Failed,
}

/// A reference bound to its targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundReference {
    /// Target of the first identifier; `None` for ambient or failed lookups.
    pub root: Option<Target>,
    /// Target after walking the qualifier path.
    pub leaf: Option<Target>,
}

/// Unit of rollup emission.
#[derive(Clone, Debug)]
pub struct Entity {
    pub target: Target,
    /// Emitted name, unique across the rollup and never shadowing a global.
    pub name: String,
    /// Entry point export names, in export-order policy order.
    pub export_names: Vec<Name>,
    /// Listed by a namespace entity.
    pub namespace_member: bool,
}

impl Entity {
    pub fn is_exported(&self) -> bool {
        !self.export_names.is_empty()
    }

    /// Referenced by the public surface but exported nowhere.
    pub fn is_forgotten(&self) -> bool {
        matches!(self.target, Target::Symbol(_)) && !self.is_exported() && !self.namespace_member
    }
}

/// Resolved graph, frozen after [`resolve`] returns.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub(crate) edges: Vec<Edge>,
    pub(crate) states: Vec<EdgeState>,
    pub(crate) externals: Vec<External>,
    /// Per module: export name → target, explicit exports first.
    pub(crate) exports: Vec<IndexMap<Name, Target>>,
    /// Per module: import binding → edge.
    pub(crate) import_edges: Vec<IndexMap<Name, EdgeId>>,
    /// Per module: packages re-exported with `export *`, including through local stars.
    pub(crate) star_externals: Vec<Vec<String>>,
    pub(crate) references: HashMap<DeclId, Vec<BoundReference>>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) entity_of: HashMap<Target, EntityId>,
    /// Globals referenced by declarations, plus configured and built-in ones.
    pub(crate) reserved: Vec<String>,
}

impl Resolution {
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge, EdgeState)> {
        self.edges
            .iter()
            .zip(&self.states)
            .enumerate()
            .map(|(i, (edge, state))| (EdgeId::from_raw(i as u32), edge, *state))
    }

    pub fn external(&self, id: ExternalId) -> &External {
        &self.externals[id.index()]
    }

    pub fn exports_of(&self, module: ModuleId) -> &IndexMap<Name, Target> {
        &self.exports[module.index()]
    }

    pub fn star_externals_of(&self, module: ModuleId) -> &[String] {
        &self.star_externals[module.index()]
    }

    /// Bound references of a declaration, in the order the declaration lists them.
    pub fn references_of(&self, decl: DeclId) -> &[BoundReference] {
        self.references.get(&decl).map_or(&[], Vec::as_slice)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::from_raw(i as u32), e))
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn entity_of(&self, target: Target) -> Option<EntityId> {
        self.entity_of.get(&target).copied()
    }

    /// Resolve an entry point export name.
    pub fn entry_export(&self, table: &SymbolTable, name: &str) -> Option<Target> {
        let name = table.interner().get(name)?;
        self.exports_of(table.entry()).get(&name).copied()
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r == name)
    }
}

/// Top-level symbol containing `symbol` (itself when already top level).
pub fn top_level_symbol(table: &SymbolTable, mut symbol: SymbolId) -> SymbolId {
    while let Some(parent) = table.symbol(symbol).parent {
        symbol = parent;
    }
    symbol
}

/// Resolve the package graph.
pub fn resolve(table: &SymbolTable, config: &ExtractorConfig, diag: &mut Diagnostics) -> Resolution {
    let mut resolution = edges::resolve_edges(table, diag);
    entities::collect_entities(table, config, &mut resolution, diag);

    debug!(
        edges = resolution.edges.len(),
        externals = resolution.externals.len(),
        entities = resolution.entities.len();
        "resolved symbol graph"
    );
    resolution
}

pub(crate) fn edge_location(table: &SymbolTable, edge: &Edge) -> Location {
    table.module_location(edge.module)
}
