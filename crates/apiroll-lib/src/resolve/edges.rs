//! Export and import edge resolution.
//!
//! Star exports are flattened first by a monotone fixed point over module
//! name sets. Every other edge depends on at most one other edge, so the
//! remaining work is a worklist that settles edges whose dependency settled,
//! bounded by the edge count. Whatever is still pending afterwards sits on a
//! cycle, or leads into one.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::trace;

use apiroll_core::Name;
use apiroll_core::utils::{is_relative_specifier, resolve_relative_specifier};

use super::{Edge, EdgeRole, EdgeSource, EdgeState, External, Resolution, Target, edge_location};
use crate::collect::{DEFAULT_EXPORT, SymbolTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::graph::{EdgeId, ExportSpec, ExternalId, ImportSpec, ModuleId};

#[derive(Clone, Debug)]
enum StarSource {
    Module(ModuleId),
    Package(String),
}

#[derive(Clone, Copy, Debug)]
enum Dependency {
    Settled,
    On(EdgeId),
}

struct EdgeResolver<'a> {
    table: &'a SymbolTable,
    res: Resolution,
    /// Per module: explicit export name → edge.
    explicit: Vec<IndexMap<Name, EdgeId>>,
    /// Per module: names contributed by `export *`, first star wins.
    star_names: Vec<IndexMap<Name, EdgeId>>,
    stars: Vec<Vec<StarSource>>,
    /// Every edge a star-exported name was offered by, per module and name.
    star_candidates: IndexMap<(ModuleId, Name), Vec<EdgeId>>,
    external_index: HashMap<(String, Option<Name>), ExternalId>,
}

pub(super) fn resolve_edges(table: &SymbolTable, diag: &mut Diagnostics) -> Resolution {
    let count = table.modules().count();
    let mut resolver = EdgeResolver {
        table,
        res: Resolution {
            exports: vec![IndexMap::new(); count],
            import_edges: vec![IndexMap::new(); count],
            star_externals: vec![Vec::new(); count],
            ..Resolution::default()
        },
        explicit: vec![IndexMap::new(); count],
        star_names: vec![IndexMap::new(); count],
        stars: vec![Vec::new(); count],
        star_candidates: IndexMap::new(),
        external_index: HashMap::new(),
    };

    resolver.register(diag);
    resolver.flatten_stars();
    resolver.settle(diag);
    resolver.report_ambiguities(diag);
    resolver.build_export_tables();
    resolver.res
}

impl EdgeResolver<'_> {
    fn register(&mut self, diag: &mut Diagnostics) {
        for (id, module) in self.table.modules() {
            for import in &module.imports {
                let local = import.local();
                if self.res.import_edges[id.index()].contains_key(&local) {
                    continue;
                }
                let source = match import {
                    ImportSpec::Named {
                        imported,
                        specifier,
                        local,
                    } => self.source_for(id, specifier, Some(*imported), *local),
                    ImportSpec::Namespace { local, specifier } => {
                        self.source_for(id, specifier, None, *local)
                    }
                };
                let edge = self.push_edge(id, local, EdgeRole::Import, source);
                self.res.import_edges[id.index()].insert(local, edge);
            }

            for export in &module.exports {
                let (name, source) = match export {
                    ExportSpec::Named { name, local } => (*name, EdgeSource::Local(*local)),
                    ExportSpec::Reexport {
                        name,
                        imported,
                        specifier,
                    } => (*name, self.source_for(id, specifier, Some(*imported), *name)),
                    ExportSpec::Namespace { name, specifier } => {
                        (*name, self.source_for(id, specifier, None, *name))
                    }
                    ExportSpec::Star { specifier } => {
                        match self.star_source(id, specifier) {
                            Some(star) => self.stars[id.index()].push(star),
                            None => {
                                diag.report(
                                    DiagnosticKind::UnresolvedModule,
                                    self.table.module_location(id),
                                )
                                .message(specifier.as_str())
                                .emit();
                            }
                        }
                        continue;
                    }
                };
                let edge = self.push_edge(id, name, EdgeRole::Export, source);
                self.explicit[id.index()].insert(name, edge);
            }
        }
    }

    fn push_edge(&mut self, module: ModuleId, name: Name, role: EdgeRole, source: EdgeSource) -> EdgeId {
        let id = EdgeId::from_raw(self.res.edges.len() as u32);
        self.res.edges.push(Edge {
            module,
            name,
            role,
            source,
        });
        id
    }

    fn find_module(&self, importer: ModuleId, specifier: &str) -> Option<ModuleId> {
        let path = resolve_relative_specifier(&self.table.module(importer).path, specifier)?;
        self.table
            .module_by_path(&path)
            .or_else(|| self.table.module_by_path(&format!("{path}/index")))
    }

    fn source_for(
        &mut self,
        module: ModuleId,
        specifier: &str,
        imported: Option<Name>,
        local: Name,
    ) -> EdgeSource {
        if !is_relative_specifier(specifier) {
            return EdgeSource::External(self.intern_external(specifier, imported, local));
        }
        match (self.find_module(module, specifier), imported) {
            (Some(target), Some(name)) => EdgeSource::Reexport {
                module: target,
                name,
            },
            (Some(target), None) => EdgeSource::Namespace(target),
            (None, _) => EdgeSource::MissingModule(specifier.to_string()),
        }
    }

    fn star_source(&self, module: ModuleId, specifier: &str) -> Option<StarSource> {
        if !is_relative_specifier(specifier) {
            return Some(StarSource::Package(specifier.to_string()));
        }
        self.find_module(module, specifier).map(StarSource::Module)
    }

    /// Identical imports of one package binding share one external.
    fn intern_external(&mut self, package: &str, imported: Option<Name>, local: Name) -> ExternalId {
        let key = (package.to_string(), imported);
        if let Some(&id) = self.external_index.get(&key) {
            return id;
        }
        let id = ExternalId::from_raw(self.res.externals.len() as u32);
        self.res.externals.push(External {
            package: package.to_string(),
            imported,
            local,
        });
        self.external_index.insert(key, id);
        id
    }

    fn flatten_stars(&mut self) {
        let default = self.table.interner().get(DEFAULT_EXPORT);
        let count = self.stars.len();

        for (m, stars) in self.stars.iter().enumerate() {
            for star in stars {
                if let StarSource::Package(package) = star
                    && !self.res.star_externals[m].contains(package)
                {
                    self.res.star_externals[m].push(package.clone());
                }
            }
        }

        // Each round can only grow the name sets; a chain of `export *` is at
        // most `count` modules long.
        for round in 0..=count {
            let mut changed = false;
            for m in 0..count {
                for star in self.stars[m].clone() {
                    let StarSource::Module(t) = star else {
                        continue;
                    };
                    let t = t.index();
                    let offered: Vec<(Name, EdgeId)> = self.explicit[t]
                        .iter()
                        .chain(&self.star_names[t])
                        .map(|(n, e)| (*n, *e))
                        .filter(|(n, _)| Some(*n) != default)
                        .collect();
                    for (name, edge) in offered {
                        if self.explicit[m].contains_key(&name) {
                            continue;
                        }
                        let candidates = self
                            .star_candidates
                            .entry((ModuleId::from_raw(m as u32), name))
                            .or_default();
                        if !candidates.contains(&edge) {
                            candidates.push(edge);
                        }
                        if !self.star_names[m].contains_key(&name) {
                            self.star_names[m].insert(name, edge);
                            changed = true;
                        }
                    }
                    for package in self.res.star_externals[t].clone() {
                        if !self.res.star_externals[m].contains(&package) {
                            self.res.star_externals[m].push(package);
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                trace!(rounds = round + 1; "star exports flattened");
                break;
            }
        }
    }

    fn lookup_export(&self, module: ModuleId, name: Name) -> Option<EdgeId> {
        self.explicit[module.index()]
            .get(&name)
            .or_else(|| self.star_names[module.index()].get(&name))
            .copied()
    }

    fn settle(&mut self, diag: &mut Diagnostics) {
        let count = self.res.edges.len();
        let mut states = vec![EdgeState::Pending; count];
        let mut deps = vec![Dependency::Settled; count];

        for (i, edge) in self.res.edges.iter().enumerate() {
            let location = edge_location(self.table, edge);
            match &edge.source {
                EdgeSource::Local(local) => {
                    let module = self.table.module(edge.module);
                    if let Some(&symbol) = module.locals.get(local) {
                        states[i] = EdgeState::Resolved(Target::Symbol(symbol));
                    } else if let Some(&dep) = self.res.import_edges[edge.module.index()].get(local) {
                        deps[i] = Dependency::On(dep);
                    } else {
                        states[i] = EdgeState::Failed;
                        diag.report(DiagnosticKind::UnresolvedExport, location)
                            .message(self.table.name(*local))
                            .emit();
                    }
                }
                EdgeSource::Reexport { module, name } => match self.lookup_export(*module, *name) {
                    Some(dep) => deps[i] = Dependency::On(dep),
                    None => {
                        states[i] = EdgeState::Failed;
                        diag.report(DiagnosticKind::UnresolvedExport, location)
                            .message(self.table.name(*name))
                            .related_to(
                                "not exported by this module",
                                self.table.module_location(*module),
                            )
                            .emit();
                    }
                },
                EdgeSource::External(id) => {
                    states[i] = EdgeState::Resolved(Target::External(*id));
                }
                EdgeSource::Namespace(module) => {
                    states[i] = EdgeState::Resolved(Target::Namespace(*module));
                }
                EdgeSource::MissingModule(specifier) => {
                    states[i] = EdgeState::Failed;
                    diag.report(DiagnosticKind::UnresolvedModule, location)
                        .message(specifier.as_str())
                        .emit();
                }
            }
        }

        for round in 0..=count {
            let mut changed = false;
            for i in 0..count {
                if states[i] != EdgeState::Pending {
                    continue;
                }
                let Dependency::On(dep) = deps[i] else {
                    continue;
                };
                match states[dep.index()] {
                    EdgeState::Pending => {}
                    settled => {
                        states[i] = settled;
                        changed = true;
                    }
                }
            }
            if !changed {
                trace!(rounds = round + 1; "edge worklist settled");
                break;
            }
        }

        self.report_cycles(&states, &deps, diag);
        for state in &mut states {
            if *state == EdgeState::Pending {
                *state = EdgeState::Failed;
            }
        }
        self.res.states = states;
    }

    /// One diagnostic per cycle; edges that merely lead into a cycle stay silent.
    fn report_cycles(&self, states: &[EdgeState], deps: &[Dependency], diag: &mut Diagnostics) {
        let mut visited = vec![false; states.len()];
        for start in 0..states.len() {
            if states[start] != EdgeState::Pending || visited[start] {
                continue;
            }
            let mut path = Vec::new();
            let mut position = HashMap::new();
            let mut current = start;
            loop {
                if let Some(&at) = position.get(&current) {
                    self.report_cycle(&path[at..], diag);
                    break;
                }
                if visited[current] {
                    break;
                }
                position.insert(current, path.len());
                path.push(current);
                match deps[current] {
                    Dependency::On(dep) => current = dep.index(),
                    Dependency::Settled => break,
                }
            }
            for edge in path {
                visited[edge] = true;
            }
        }
    }

    fn report_cycle(&self, cycle: &[usize], diag: &mut Diagnostics) {
        let describe = |i: usize| {
            let edge = &self.res.edges[i];
            format!(
                "{}:{}",
                self.table.module(edge.module).path,
                self.table.name(edge.name)
            )
        };
        let mut chain: Vec<String> = cycle.iter().map(|&i| describe(i)).collect();
        chain.push(describe(cycle[0]));

        let first = &self.res.edges[cycle[0]];
        let mut builder = diag
            .report(DiagnosticKind::CircularReference, edge_location(self.table, first))
            .message(chain.join(" -> "));
        let mut seen = HashSet::from([first.module]);
        for &i in &cycle[1..] {
            let edge = &self.res.edges[i];
            if seen.insert(edge.module) {
                builder = builder.related_to("part of the cycle", edge_location(self.table, edge));
            }
        }
        builder.emit();
    }

    fn report_ambiguities(&self, diag: &mut Diagnostics) {
        for ((module, name), candidates) in &self.star_candidates {
            let Some(&winner) = self.star_names[module.index()].get(name) else {
                continue;
            };
            let EdgeState::Resolved(expected) = self.res.states[winner.index()] else {
                continue;
            };
            let conflicting = candidates.iter().find(|&&edge| {
                matches!(self.res.states[edge.index()], EdgeState::Resolved(t) if t != expected)
            });
            if let Some(&other) = conflicting {
                let path = &self.table.module(*module).path;
                diag.report(DiagnosticKind::AmbiguousReexport, self.table.module_location(*module))
                    .message(format!(
                        "`{}` is exported by more than one `export *` in `{path}`; the first one wins",
                        self.table.name(*name)
                    ))
                    .related_to(
                        "also exported here",
                        self.table.module_location(self.res.edges[other.index()].module),
                    )
                    .emit();
            }
        }
    }

    fn build_export_tables(&mut self) {
        for m in 0..self.explicit.len() {
            let table: IndexMap<Name, Target> = self.explicit[m]
                .iter()
                .chain(&self.star_names[m])
                .filter_map(|(name, edge)| match self.res.states[edge.index()] {
                    EdgeState::Resolved(target) => Some((*name, target)),
                    _ => None,
                })
                .collect();
            self.res.exports[m] = table;
        }
    }
}
