//! Reference binding, entity collection and naming.

use std::collections::{HashSet, VecDeque};

use log::trace;

use apiroll_core::utils::unique_name;
use apiroll_core::{DeclarationKind, Name};

use super::{BoundReference, EdgeState, Entity, Resolution, Target, top_level_symbol};
use crate::collect::{DEFAULT_EXPORT, SymbolTable};
use crate::config::{ExportOrder, ExtractorConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::graph::{DeclId, EntityId, Reference};

/// Global names a rollup must not shadow.
pub const BUILTIN_GLOBALS: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "ArrayLike",
    "Awaited",
    "BigInt",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "EvalError",
    "Exclude",
    "Extract",
    "Float32Array",
    "Float64Array",
    "Function",
    "InstanceType",
    "Int8Array",
    "Int16Array",
    "Int32Array",
    "Intl",
    "Iterable",
    "IterableIterator",
    "Iterator",
    "JSON",
    "Map",
    "Math",
    "NonNullable",
    "Number",
    "Object",
    "Omit",
    "Parameters",
    "Partial",
    "Pick",
    "Promise",
    "PromiseLike",
    "Proxy",
    "RangeError",
    "Readonly",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "ReferenceError",
    "Reflect",
    "RegExp",
    "Required",
    "ReturnType",
    "Set",
    "String",
    "Symbol",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Uint8Array",
    "Uint8ClampedArray",
    "Uint16Array",
    "Uint32Array",
    "WeakMap",
    "WeakSet",
    "console",
    "globalThis",
];

enum Root {
    Target(Target),
    Ambient,
    Failed,
}

struct EntityCollector<'a> {
    table: &'a SymbolTable,
    config: &'a ExtractorConfig,
    res: &'a mut Resolution,
    diag: &'a mut Diagnostics,
    /// Preferred local name per entity.
    hints: Vec<Name>,
    worklist: VecDeque<EntityId>,
    ambient: Vec<String>,
}

pub(super) fn collect_entities(
    table: &SymbolTable,
    config: &ExtractorConfig,
    res: &mut Resolution,
    diag: &mut Diagnostics,
) {
    let mut collector = EntityCollector {
        table,
        config,
        res,
        diag,
        hints: Vec::new(),
        worklist: VecDeque::new(),
        ambient: Vec::new(),
    };
    collector.seed_from_entry();
    collector.drain();
    collector.order_export_names();
    collector.assign_names();
    collector.report_forgotten();
}

impl EntityCollector<'_> {
    fn seed_from_entry(&mut self) {
        let entry = self.table.entry();
        let exports = self.res.exports[entry.index()].clone();
        for (name, target) in exports {
            let entity = self.entity_for(target, name);
            let names = &mut self.res.entities[entity.index()].export_names;
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    fn entity_for(&mut self, target: Target, hint: Name) -> EntityId {
        if let Some(&id) = self.res.entity_of.get(&target) {
            return id;
        }
        let hint = match target {
            Target::Symbol(symbol) => self.table.symbol(symbol).name,
            Target::External(external) => self.res.externals[external.index()].local,
            Target::Namespace(_) => hint,
        };
        let id = EntityId::from_raw(self.res.entities.len() as u32);
        self.res.entities.push(Entity {
            target,
            name: String::new(),
            export_names: Vec::new(),
            namespace_member: false,
        });
        self.res.entity_of.insert(target, id);
        self.hints.push(hint);
        self.worklist.push_back(id);
        id
    }

    fn drain(&mut self) {
        while let Some(id) = self.worklist.pop_front() {
            match self.res.entities[id.index()].target {
                Target::Symbol(symbol) => {
                    let table = self.table;
                    for &decl in &table.symbol(symbol).declarations {
                        self.bind_declaration(decl);
                    }
                }
                Target::Namespace(module) => {
                    let exports = self.res.exports[module.index()].clone();
                    for (name, target) in exports {
                        let member = self.entity_for(target, name);
                        self.res.entities[member.index()].namespace_member = true;
                    }
                }
                Target::External(_) => {}
            }
        }
    }

    fn bind_declaration(&mut self, decl: DeclId) {
        if self.res.references.contains_key(&decl) {
            return;
        }
        let table = self.table;
        let declaration = table.decl(decl);
        let bound: Vec<BoundReference> = declaration
            .references
            .iter()
            .map(|reference| self.bind(decl, reference))
            .collect();

        for (reference, binding) in declaration.references.iter().zip(&bound) {
            let Some(root) = binding.root else {
                continue;
            };
            let target = match root {
                Target::Symbol(symbol) => Target::Symbol(top_level_symbol(table, symbol)),
                other => other,
            };
            self.entity_for(target, reference.root);
        }
        self.res.references.insert(decl, bound);

        for &member in &declaration.members {
            self.bind_declaration(member);
        }
    }

    fn bind(&mut self, decl: DeclId, reference: &Reference) -> BoundReference {
        let root = match self.lookup_root(decl, reference.root) {
            Root::Target(target) => target,
            Root::Ambient => {
                let name = self.table.name(reference.root);
                if !self.ambient.iter().any(|a| a == name) {
                    trace!(name = name; "ambient reference");
                    self.ambient.push(name.to_string());
                }
                return BoundReference::default();
            }
            Root::Failed => return BoundReference::default(),
        };

        let mut current = root;
        for &member in &reference.rest {
            let next = match current {
                Target::Symbol(symbol) => self
                    .table
                    .symbol(symbol)
                    .members
                    .get(&member)
                    .map(|&m| Target::Symbol(m)),
                Target::Namespace(module) => self.res.exports[module.index()].get(&member).copied(),
                // Another package's surface is opaque.
                Target::External(_) => break,
            };
            match next {
                Some(target) => current = target,
                None => {
                    self.diag
                        .report(DiagnosticKind::UnresolvedReference, self.table.location(decl))
                        .message(reference.text.as_str())
                        .subject(decl)
                        .emit();
                    return BoundReference {
                        root: Some(root),
                        leaf: None,
                    };
                }
            }
        }

        BoundReference {
            root: Some(root),
            leaf: Some(current),
        }
    }

    /// Enclosing namespaces, then module locals, then imports, then globals.
    fn lookup_root(&self, decl: DeclId, name: Name) -> Root {
        let declaration = self.table.decl(decl);

        let mut scope = declaration.parent;
        while let Some(container) = scope {
            let container = self.table.decl(container);
            if container.kind == DeclarationKind::Namespace
                && let Some(&symbol) = self.table.symbol(container.symbol).members.get(&name)
            {
                return Root::Target(Target::Symbol(symbol));
            }
            scope = container.parent;
        }

        let module = declaration.module;
        if let Some(&symbol) = self.table.module(module).locals.get(&name) {
            return Root::Target(Target::Symbol(symbol));
        }

        match self.res.import_edges[module.index()].get(&name) {
            Some(edge) => match self.res.states[edge.index()] {
                EdgeState::Resolved(target) => Root::Target(target),
                _ => Root::Failed,
            },
            None => Root::Ambient,
        }
    }

    fn order_export_names(&mut self) {
        if self.config.export_order != ExportOrder::Alphabetical {
            return;
        }
        let table = self.table;
        for entity in &mut self.res.entities {
            entity.export_names.sort_by(|a, b| table.name(*a).cmp(table.name(*b)));
        }
    }

    fn assign_names(&mut self) {
        let mut reserved: Vec<String> = BUILTIN_GLOBALS.iter().map(|g| g.to_string()).collect();
        for name in self.config.ambient_globals.iter().chain(&self.ambient) {
            if !reserved.contains(name) {
                reserved.push(name.clone());
            }
        }
        let mut taken: HashSet<String> = reserved.iter().cloned().collect();

        let (exported, unexported): (Vec<usize>, Vec<usize>) =
            (0..self.res.entities.len()).partition(|&i| self.res.entities[i].is_exported());

        for i in exported.into_iter().chain(unexported) {
            let entity = &self.res.entities[i];
            let preferred = entity
                .export_names
                .iter()
                .copied()
                .find(|&name| self.table.name(name) != DEFAULT_EXPORT)
                .unwrap_or(self.hints[i]);
            let name = unique_name(self.table.name(preferred), |n| taken.contains(n));
            taken.insert(name.clone());
            self.res.entities[i].name = name;
        }

        self.res.reserved = reserved;
    }

    fn report_forgotten(&mut self) {
        for entity in &self.res.entities {
            if !entity.is_forgotten() {
                continue;
            }
            let Target::Symbol(symbol) = entity.target else {
                continue;
            };
            let mut builder = self
                .diag
                .report(DiagnosticKind::ForgottenExport, self.table.symbol_location(symbol))
                .message(self.table.qualified_name(symbol));
            if let Some(&decl) = self.table.symbol(symbol).declarations.first() {
                builder = builder.subject(decl);
            }
            builder.emit();
        }
    }
}
