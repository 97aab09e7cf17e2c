//! Declaration collector: builds the symbol table from the declaration model.
//!
//! One pass over every module registers declarations into arenas and merges
//! declarations that share a name within a scope (overloads, namespace and
//! interface merging, accessor pairs) into one [`Symbol`]. Import and export
//! statements are recorded here and resolved later by the graph resolver.

#[cfg(test)]
mod collect_tests;

use indexmap::IndexMap;
use log::{debug, trace};

use apiroll_core::utils::{normalize_module_path, unique_name};
use apiroll_core::{
    DeclarationKind, Interner, Name, RawDeclaration, RawExport, RawImport, RawModule, RawPackage,
};

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::doc::{DocComment, parse_doc};
use crate::graph::{
    DeclId, Declaration, ExportSpec, ImportSpec, Module, ModuleId, PackageInfo, Reference, Symbol,
    SymbolId,
};
use crate::{Error, PassResult};

/// Name under which default exports are registered.
pub const DEFAULT_EXPORT: &str = "default";

/// Every declaration of a package, keyed by module and declared name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub(crate) interner: Interner,
    pub(crate) package: PackageInfo,
    pub(crate) modules: Vec<Module>,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) module_index: IndexMap<String, ModuleId>,
    pub(crate) entry: ModuleId,
}

impl Default for ModuleId {
    fn default() -> Self {
        ModuleId::from_raw(0)
    }
}

impl SymbolTable {
    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    pub fn entry(&self) -> ModuleId {
        self.entry
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn name(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, m)| (ModuleId::from_raw(i as u32), m))
    }

    pub fn module_by_path(&self, path: &str) -> Option<ModuleId> {
        self.module_index
            .get(&normalize_module_path(path))
            .copied()
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }

    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + use<> {
        (0..self.declarations.len() as u32).map(DeclId::from_raw)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        (0..self.symbols.len() as u32).map(SymbolId::from_raw)
    }

    pub fn decl_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Look up a module-scope symbol by module path and declared name.
    pub fn lookup(&self, path: &str, name: &str) -> Option<SymbolId> {
        let module = self.module_by_path(path)?;
        let name = self.interner.get(name)?;
        self.module(module).locals.get(&name).copied()
    }

    /// Dotted name from the outermost container, e.g. `Shapes.Circle.area`.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut parts = vec![self.name(self.symbol(id).name)];
        let mut current = self.symbol(id).parent;
        while let Some(parent) = current {
            parts.push(self.name(self.symbol(parent).name));
            current = self.symbol(parent).parent;
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn location(&self, id: DeclId) -> Location {
        let decl = self.decl(id);
        let path = &self.module(decl.module).path;
        match decl.location {
            Some(loc) => {
                let location = Location::new(path.as_str(), loc.line, loc.column);
                match (loc.start, loc.end) {
                    (Some(start), Some(end)) => location.with_range(start..end),
                    _ => location,
                }
            }
            None => Location::module(path.as_str()),
        }
    }

    pub fn symbol_location(&self, id: SymbolId) -> Location {
        match self.symbol(id).declarations.first() {
            Some(&decl) => self.location(decl),
            None => Location::module(self.module(self.symbol(id).module).path.as_str()),
        }
    }

    pub fn module_location(&self, id: ModuleId) -> Location {
        Location::module(self.module(id).path.as_str())
    }

    /// Module sources keyed by path, for snippet rendering.
    pub fn sources(&self) -> IndexMap<String, String> {
        self.modules
            .iter()
            .filter_map(|m| Some((m.path.clone(), m.source.clone()?)))
            .collect()
    }
}

/// Build the symbol table for a package.
///
/// Malformed input (unnamed or misplaced declarations, duplicate modules, a
/// missing entry point) is fatal; doc comment problems are diagnostics.
pub fn collect(package: &RawPackage) -> PassResult<SymbolTable> {
    let mut collector = Collector {
        table: SymbolTable::default(),
        diag: Diagnostics::new(),
    };
    collector.run(package)?;
    Ok((collector.table, collector.diag))
}

struct Collector {
    table: SymbolTable,
    diag: Diagnostics,
}

impl Collector {
    fn run(&mut self, package: &RawPackage) -> Result<(), Error> {
        self.table.package = PackageInfo {
            name: package.name.clone(),
            doc: package.doc.clone(),
            type_references: package.type_references.clone(),
            lib_references: package.lib_references.clone(),
        };

        for raw in &package.modules {
            let path = normalize_module_path(&raw.path);
            if self.table.module_index.contains_key(&path) {
                return Err(Error::DuplicateModule(path));
            }
            let id = ModuleId::from_raw(self.table.modules.len() as u32);
            self.table.module_index.insert(path.clone(), id);
            self.table.modules.push(Module {
                path,
                source: raw.source.clone(),
                locals: IndexMap::new(),
                declarations: Vec::new(),
                imports: Vec::new(),
                exports: Vec::new(),
            });
        }

        let entry_path = normalize_module_path(&package.entry_point);
        self.table.entry = self
            .table
            .module_index
            .get(&entry_path)
            .copied()
            .ok_or_else(|| Error::MissingEntryPoint(package.entry_point.clone()))?;

        for (index, raw) in package.modules.iter().enumerate() {
            let module = ModuleId::from_raw(index as u32);
            let mut inline_exports = Vec::new();
            for (position, decl) in raw.declarations.iter().enumerate() {
                self.collect_top_level(module, decl, position, &mut inline_exports)?;
            }
            self.collect_statements(module, raw, inline_exports);
            debug!(
                module = self.table.modules[index].path.as_str(),
                declarations = raw.declarations.len();
                "collected module"
            );
        }

        Ok(())
    }

    fn collect_top_level(
        &mut self,
        module: ModuleId,
        raw: &RawDeclaration,
        position: usize,
        exports: &mut Vec<ExportSpec>,
    ) -> Result<(), Error> {
        if !raw.kind.is_top_level() {
            return Err(self.malformed(
                module,
                raw,
                format!("a {} cannot appear at module scope", raw.kind),
            ));
        }

        let (name, synthesized) = match raw.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => (name.to_string(), false),
            _ if raw.default_export => (self.synthesize_name(module, raw, position), true),
            _ => {
                return Err(self.malformed(
                    module,
                    raw,
                    format!("{} declaration has no name", raw.kind),
                ));
            }
        };

        let decl = self.collect_decl(module, raw, None, None, name, synthesized)?;
        self.table.modules[module.index()].declarations.push(decl);

        let local = self.table.declarations[decl.index()].name;
        if raw.exported {
            exports.push(ExportSpec::Named { name: local, local });
        }
        if raw.default_export {
            let name = self.table.interner.intern(DEFAULT_EXPORT);
            exports.push(ExportSpec::Named { name, local });
        }
        Ok(())
    }

    /// `_anonymous_<line>_<column>`, or `_anonymous_<position>` without a location.
    fn synthesize_name(&mut self, module: ModuleId, raw: &RawDeclaration, position: usize) -> String {
        let base = match raw.location {
            Some(loc) => format!("_anonymous_{}_{}", loc.line, loc.column),
            None => format!("_anonymous_{position}"),
        };
        let interner = &self.table.interner;
        let locals = &self.table.modules[module.index()].locals;
        let name = unique_name(&base, |candidate| {
            interner
                .get(candidate)
                .is_some_and(|n| locals.contains_key(&n))
        });
        trace!(name = name.as_str(); "synthesized name for anonymous declaration");
        name
    }

    fn collect_decl(
        &mut self,
        module: ModuleId,
        raw: &RawDeclaration,
        parent: Option<DeclId>,
        parent_symbol: Option<SymbolId>,
        name: String,
        synthesized: bool,
    ) -> Result<DeclId, Error> {
        if raw.text.trim().is_empty() {
            return Err(self.malformed(module, raw, format!("{} `{name}` has no text", raw.kind)));
        }

        let name = self.table.interner.intern(&name);
        let symbol = self.symbol_for(module, parent_symbol, name, raw.kind);
        let id = DeclId::from_raw(self.table.declarations.len() as u32);
        self.table.symbols[symbol.index()].declarations.push(id);

        let references = raw
            .references
            .iter()
            .filter_map(|r| self.parse_reference(r))
            .collect();

        self.table.declarations.push(Declaration {
            kind: raw.kind,
            name,
            synthesized,
            text: raw.text.trim().to_string(),
            raw_doc: raw.doc.clone(),
            doc: DocComment::default(),
            modifiers: raw.modifiers.clone(),
            references,
            members: Vec::new(),
            parent,
            symbol,
            module,
            location: raw.location,
            exported: raw.exported,
        });

        if let Some(text) = &raw.doc {
            self.attach_doc(id, text);
        }

        let mut members = Vec::with_capacity(raw.members.len());
        for member in &raw.members {
            self.check_member_kind(module, raw.kind, member)?;
            let member_name = match member.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => match member.kind.implicit_name() {
                    Some(implicit) => implicit.to_string(),
                    None => {
                        return Err(self.malformed(
                            module,
                            member,
                            format!("{} member has no name", member.kind),
                        ));
                    }
                },
            };
            members.push(self.collect_decl(module, member, Some(id), Some(symbol), member_name, false)?);
        }
        self.table.declarations[id.index()].members = members;

        Ok(id)
    }

    fn symbol_for(
        &mut self,
        module: ModuleId,
        parent: Option<SymbolId>,
        name: Name,
        kind: DeclarationKind,
    ) -> SymbolId {
        let next = SymbolId::from_raw(self.table.symbols.len() as u32);
        let scope = match parent {
            Some(p) => &mut self.table.symbols[p.index()].members,
            None => &mut self.table.modules[module.index()].locals,
        };
        if let Some(&existing) = scope.get(&name) {
            return existing;
        }
        scope.insert(name, next);
        self.table.symbols.push(Symbol {
            name,
            kind,
            module,
            parent,
            declarations: Vec::new(),
            members: IndexMap::new(),
        });
        next
    }

    fn check_member_kind(
        &self,
        module: ModuleId,
        container: DeclarationKind,
        member: &RawDeclaration,
    ) -> Result<(), Error> {
        use DeclarationKind::*;

        let allowed = match container {
            Class | Interface => matches!(
                member.kind,
                Method
                    | Property
                    | Constructor
                    | GetAccessor
                    | SetAccessor
                    | CallSignature
                    | ConstructSignature
                    | IndexSignature
            ),
            Enum => member.kind == EnumMember,
            Namespace => member.kind.is_top_level(),
            _ => false,
        };
        if allowed {
            return Ok(());
        }
        Err(self.malformed(
            module,
            member,
            format!("a {} cannot be a member of a {container}", member.kind),
        ))
    }

    fn attach_doc(&mut self, id: DeclId, text: &str) {
        let (doc, issues) = parse_doc(text);
        let location = self.table.location(id);
        for issue in issues {
            self.diag
                .report(issue.kind, location.clone())
                .message(issue.detail)
                .subject(id)
                .emit();
        }
        if doc.modifiers.package_documentation {
            self.diag
                .report(DiagnosticKind::MisplacedPackageTag, location)
                .subject(id)
                .emit();
        }
        self.table.declarations[id.index()].doc = doc;
    }

    /// `Foo`, `Ns.Foo` or `typeof foo`.
    fn parse_reference(&mut self, text: &str) -> Option<Reference> {
        let text = text.trim();
        let (is_typeof, path) = match text.strip_prefix("typeof ") {
            Some(rest) => (true, rest.trim()),
            None => (false, text),
        };

        let mut parts = path.split('.').map(str::trim).filter(|p| !p.is_empty());
        let root = self.table.interner.intern(parts.next()?);
        let rest = parts.map(|p| self.table.interner.intern(p)).collect();

        Some(Reference {
            root,
            rest,
            is_typeof,
            text: text.to_string(),
        })
    }

    fn collect_statements(&mut self, module: ModuleId, raw: &RawModule, inline: Vec<ExportSpec>) {
        let interner = &mut self.table.interner;
        let imports: Vec<ImportSpec> = raw
            .imports
            .iter()
            .map(|import| match import {
                RawImport::Named { local, name, from } => ImportSpec::Named {
                    local: interner.intern(local),
                    imported: interner.intern(name),
                    specifier: from.clone(),
                },
                RawImport::Namespace { local, from } => ImportSpec::Namespace {
                    local: interner.intern(local),
                    specifier: from.clone(),
                },
            })
            .collect();

        let statements: Vec<ExportSpec> = raw
            .exports
            .iter()
            .map(|export| match export {
                RawExport::Named { name, local } => ExportSpec::Named {
                    name: interner.intern(name),
                    local: interner.intern(local),
                },
                RawExport::Reexport {
                    name,
                    imported,
                    from,
                } => ExportSpec::Reexport {
                    name: interner.intern(name),
                    imported: interner.intern(imported),
                    specifier: from.clone(),
                },
                RawExport::Star { from } => ExportSpec::Star {
                    specifier: from.clone(),
                },
                RawExport::Namespace { name, from } => ExportSpec::Namespace {
                    name: interner.intern(name),
                    specifier: from.clone(),
                },
            })
            .collect();

        let mut seen: IndexMap<Name, ExportSpec> = IndexMap::new();
        let mut exports = Vec::new();
        for spec in inline.into_iter().chain(statements) {
            let name = match &spec {
                ExportSpec::Named { name, .. }
                | ExportSpec::Reexport { name, .. }
                | ExportSpec::Namespace { name, .. } => *name,
                ExportSpec::Star { .. } => {
                    exports.push(spec);
                    continue;
                }
            };
            match seen.get(&name) {
                Some(previous) if *previous == spec => {}
                Some(_) => {
                    let location = self.table.module_location(module);
                    self.diag
                        .report(DiagnosticKind::DuplicateExport, location)
                        .message(self.table.interner.resolve(name))
                        .emit();
                }
                None => {
                    seen.insert(name, spec.clone());
                    exports.push(spec);
                }
            }
        }

        let target = &mut self.table.modules[module.index()];
        target.imports = imports;
        target.exports = exports;
    }

    fn malformed(&self, module: ModuleId, raw: &RawDeclaration, reason: String) -> Error {
        let module = &self.table.modules[module.index()].path;
        let location = match raw.location {
            Some(loc) => format!("{module}:{}:{}", loc.line, loc.column),
            None => module.clone(),
        };
        Error::MalformedDeclaration { location, reason }
    }
}
