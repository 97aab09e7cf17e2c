//! Rollup emitter: one trimmed declaration document per release tier.
//!
//! Emission is a pure function of the analyzed graph, so any number of tiers
//! can be rendered from one analysis.

mod rewrite;

#[cfg(test)]
mod rollup_tests;

use std::collections::{HashMap, VecDeque};

use log::debug;

use apiroll_core::{DeclarationKind, Modifier, ReleaseTag};

use crate::collect::DEFAULT_EXPORT;
use crate::config::ExportOrder;
use crate::extractor::ExtractorContext;
use crate::graph::{DeclId, EntityId, ModuleId, SymbolId};
use crate::resolve::{Entity, Target, top_level_symbol};

pub use rewrite::{insert_name, reindent_doc, rewrite_identifiers};

pub(crate) const INDENT: &str = "    ";

/// Which entities a rollup for `tier` contains, indexed by entity id.
///
/// Exported entities visible at `tier` seed the set; anything their retained
/// declarations reference follows when it is visible too.
pub fn included_entities(ctx: ExtractorContext<'_>, tier: ReleaseTag) -> Vec<bool> {
    let resolution = ctx.resolution;
    let visible = |entity: &Entity| match entity.target {
        Target::Symbol(symbol) => ctx.release.symbol_tag(symbol).is_visible_at(tier),
        Target::External(_) | Target::Namespace(_) => true,
    };

    let mut included = vec![false; resolution.entities.len()];
    let mut queue = VecDeque::new();
    for (id, entity) in resolution.entities() {
        if entity.is_exported() && visible(entity) {
            included[id.index()] = true;
            queue.push_back(id);
        }
    }

    let include = |target: Target, included: &mut Vec<bool>, queue: &mut VecDeque<EntityId>| {
        let target = match target {
            Target::Symbol(symbol) => Target::Symbol(top_level_symbol(ctx.table, symbol)),
            other => other,
        };
        if let Some(id) = resolution.entity_of(target)
            && !included[id.index()]
            && visible(resolution.entity(id))
        {
            included[id.index()] = true;
            queue.push_back(id);
        }
    };

    while let Some(id) = queue.pop_front() {
        match resolution.entity(id).target {
            Target::Symbol(symbol) => {
                let mut stack: Vec<DeclId> = ctx.table.symbol(symbol).declarations.clone();
                while let Some(decl) = stack.pop() {
                    if !ctx.release.decl_tag(decl).is_visible_at(tier) {
                        continue;
                    }
                    for bound in resolution.references_of(decl) {
                        if let Some(root) = bound.root {
                            include(root, &mut included, &mut queue);
                        }
                    }
                    stack.extend(&ctx.table.decl(decl).members);
                }
            }
            Target::Namespace(module) => {
                for &target in resolution.exports_of(module).values() {
                    include(target, &mut included, &mut queue);
                }
            }
            Target::External(_) => {}
        }
    }
    included
}

/// Render the rollup document for `tier`.
pub fn emit_rollup(ctx: ExtractorContext<'_>, tier: ReleaseTag) -> String {
    let emitter = Emitter {
        ctx,
        tier,
        included: included_entities(ctx, tier),
    };
    debug!(
        tier = tier.as_str(),
        entities = emitter.included.iter().filter(|&&kept| kept).count();
        "emitting rollup"
    );
    ctx.config.newline.apply(emitter.emit())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Container {
    /// Module scope; `inline` adds the `export` keyword.
    Top { inline: bool },
    Namespace,
    Type,
    Enum,
}

enum Item {
    Decl(String),
    Marker(String),
}

struct Emitter<'a> {
    ctx: ExtractorContext<'a>,
    tier: ReleaseTag,
    included: Vec<bool>,
}

impl Emitter<'_> {
    fn emit(&self) -> String {
        let mut sections = Vec::new();
        let package = self.ctx.table.package();

        if let Some(doc) = &package.doc {
            sections.push(format!("{}\n", reindent_doc(doc, "")));
        }

        let mut directives = String::new();
        for (kind, values) in [("types", &package.type_references), ("lib", &package.lib_references)] {
            let mut values = values.clone();
            values.sort();
            values.dedup();
            for value in values {
                directives.push_str(&format!("/// <reference {kind}=\"{value}\" />\n"));
            }
        }
        sections.push(directives);
        sections.push(import_lines(self.ctx, &self.included));

        for id in self.sorted_entities() {
            if let Some(block) = self.entity_block(id) {
                sections.push(block);
            }
        }

        sections.push(export_lines(self.ctx, &self.included, true));
        sections.retain(|s| !s.is_empty());
        sections.join("\n")
    }

    fn sorted_entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.ctx.resolution.entities().map(|(id, _)| id).collect();
        ids.sort_by(|a, b| {
            let (a, b) = (self.ctx.resolution.entity(*a), self.ctx.resolution.entity(*b));
            a.name.cmp(&b.name)
        });
        ids
    }

    fn is_included(&self, id: EntityId) -> bool {
        self.included[id.index()]
    }

    fn marker(&self, indent: &str, name: &str) -> String {
        format!("{indent}/* Excluded from this release type: {name} */")
    }

    fn entity_block(&self, id: EntityId) -> Option<String> {
        let entity = self.ctx.resolution.entity(id);
        if !self.is_included(id) {
            let excluded_export = entity.is_exported() && matches!(entity.target, Target::Symbol(_));
            if excluded_export && !self.ctx.config.omit_trimming_comments {
                return Some(format!("{}\n", self.marker("", &entity.name)));
            }
            return None;
        }

        match entity.target {
            Target::Symbol(symbol) => Some(self.symbol_block(entity, symbol)),
            Target::Namespace(module) => {
                Some(namespace_block(self.ctx, entity, module, &self.included))
            }
            Target::External(_) => None,
        }
    }

    fn symbol_block(&self, entity: &Entity, symbol: SymbolId) -> String {
        let container = Container::Top {
            inline: is_inline(self.ctx, entity),
        };
        let declarations = &self.ctx.table.symbol(symbol).declarations;
        let items = self.items(declarations, "", container);
        let mut out = String::new();
        for item in items {
            let (Item::Decl(text) | Item::Marker(text)) = item;
            out.push_str(&text);
            out.push('\n');
        }
        out
    }

    /// Render `decls`, replacing each run of excluded declarations of one
    /// symbol with a single marker.
    fn items(&self, decls: &[DeclId], indent: &str, container: Container) -> Vec<Item> {
        let table = self.ctx.table;
        let mut items = Vec::new();
        let mut run: Option<SymbolId> = None;

        for &decl in decls {
            if self.ctx.release.decl_tag(decl).is_visible_at(self.tier) {
                run = None;
                items.push(Item::Decl(self.render_decl(decl, indent, container)));
                continue;
            }
            let symbol = table.decl(decl).symbol;
            if run == Some(symbol) {
                continue;
            }
            run = Some(symbol);
            if !self.ctx.config.omit_trimming_comments {
                items.push(Item::Marker(self.marker(indent, &self.display_name(decl))));
            }
        }
        items
    }

    fn display_name(&self, decl: DeclId) -> String {
        let table = self.ctx.table;
        let declaration = table.decl(decl);
        if declaration.parent.is_none()
            && let Some(id) = self.ctx.resolution.entity_of(Target::Symbol(declaration.symbol))
        {
            return self.ctx.resolution.entity(id).name.clone();
        }
        table.name(declaration.name).to_string()
    }

    fn render_decl(&self, decl: DeclId, indent: &str, container: Container) -> String {
        let declaration = self.ctx.table.decl(decl);
        let mut out = String::new();

        if let Some(doc) = &declaration.raw_doc {
            out.push_str(&reindent_doc(doc, indent));
            out.push('\n');
        }

        out.push_str(indent);
        match container {
            Container::Top { inline } => {
                if inline {
                    out.push_str("export ");
                }
                out.push_str("declare ");
            }
            Container::Namespace if declaration.exported => out.push_str("export "),
            _ => {}
        }
        for modifier in Modifier::canonical_order(&declaration.modifiers) {
            out.push_str(modifier.keyword());
            out.push(' ');
        }
        out.push_str(&header_text(self.ctx, decl));

        if declaration.kind.has_body() {
            let inner = format!("{indent}{INDENT}");
            let member_container = match declaration.kind {
                DeclarationKind::Namespace => Container::Namespace,
                DeclarationKind::Enum => Container::Enum,
                _ => Container::Type,
            };
            let items = self.items(&declaration.members, &inner, member_container);
            out.push_str(" {\n");
            out.push_str(&join_members(items, member_container));
            out.push_str(indent);
            out.push('}');
        } else if container != Container::Enum {
            out.push(';');
        }
        out
    }
}

/// Exported under exactly one name, equal to the emitted name.
pub(crate) fn is_inline(ctx: ExtractorContext<'_>, entity: &Entity) -> bool {
    if matches!(entity.target, Target::External(_)) {
        return false;
    }
    match entity.export_names.as_slice() {
        [only] => ctx.table.name(*only) == entity.name,
        _ => false,
    }
}

/// `import` statements for the included external entities, sorted.
pub(crate) fn import_lines(ctx: ExtractorContext<'_>, included: &[bool]) -> String {
    let resolution = ctx.resolution;
    let mut lines: Vec<String> = resolution
        .entities()
        .filter(|(id, _)| included[id.index()])
        .filter_map(|(_, entity)| {
            let Target::External(external) = entity.target else {
                return None;
            };
            let external = resolution.external(external);
            let package = &external.package;
            let name = &entity.name;
            Some(match external.imported.map(|n| ctx.table.name(n)) {
                None => format!("import * as {name} from '{package}';"),
                Some(DEFAULT_EXPORT) => format!("import {name} from '{package}';"),
                Some(imported) if imported == name => {
                    format!("import {{ {name} }} from '{package}';")
                }
                Some(imported) => format!("import {{ {imported} as {name} }} from '{package}';"),
            })
        })
        .collect();
    lines.sort();
    lines.into_iter().map(|l| l + "\n").collect()
}

/// `declare namespace ns { export { A, B_2 as B } }` for a module namespace.
pub(crate) fn namespace_block(
    ctx: ExtractorContext<'_>,
    entity: &Entity,
    module: ModuleId,
    included: &[bool],
) -> String {
    let resolution = ctx.resolution;
    let members: Vec<String> = resolution
        .exports_of(module)
        .iter()
        .filter_map(|(name, target)| {
            let id = resolution.entity_of(*target)?;
            if !included[id.index()] {
                return None;
            }
            let emitted = &resolution.entity(id).name;
            let exported = ctx.table.name(*name);
            Some(if emitted == exported {
                emitted.clone()
            } else {
                format!("{emitted} as {exported}")
            })
        })
        .collect();

    let export = if is_inline(ctx, entity) { "export " } else { "" };
    let mut out = format!("{export}declare namespace {} {{\n", entity.name);
    if members.is_empty() {
        out.push_str(&format!("{INDENT}export {{ }}\n"));
    } else {
        out.push_str(&format!("{INDENT}export {{\n"));
        let list: Vec<String> = members
            .iter()
            .map(|m| format!("{INDENT}{INDENT}{m}"))
            .collect();
        out.push_str(&list.join(",\n"));
        out.push_str(&format!("\n{INDENT}}}\n"));
    }
    out.push_str("}\n");
    out
}

/// Entry point export statements for the included entities.
///
/// With `sentinel`, a document without a default export ends in `export { }`
/// so it stays a module.
pub(crate) fn export_lines(ctx: ExtractorContext<'_>, included: &[bool], sentinel: bool) -> String {
    let table = ctx.table;
    let resolution = ctx.resolution;
    let mut lines: Vec<(&str, String)> = Vec::new();
    let mut default_line = None;

    for (name, target) in resolution.exports_of(table.entry()) {
        let Some(id) = resolution.entity_of(*target) else {
            continue;
        };
        if !included[id.index()] {
            continue;
        }
        let entity = resolution.entity(id);
        let exported = table.name(*name);
        if exported == DEFAULT_EXPORT {
            default_line = Some(format!("export {{ {} as default }}\n", entity.name));
            continue;
        }
        if is_inline(ctx, entity) {
            continue;
        }
        let line = if exported == entity.name {
            format!("export {{ {exported} }}\n")
        } else {
            format!("export {{ {} as {exported} }}\n", entity.name)
        };
        lines.push((exported, line));
    }
    if ctx.config.export_order == ExportOrder::Alphabetical {
        lines.sort_by(|a, b| a.0.cmp(b.0));
    }

    let mut out: String = lines.into_iter().map(|(_, line)| line).collect();
    let has_default = default_line.is_some();
    if let Some(line) = default_line {
        out.push_str(&line);
    }
    for package in resolution.star_externals_of(table.entry()) {
        out.push_str(&format!("export * from \"{package}\";\n"));
    }
    if sentinel && !has_default {
        out.push_str("export { }\n");
    }
    out
}

/// Header text with a synthesized name inserted and references renamed to
/// their emitted entity names.
pub(crate) fn header_text(ctx: ExtractorContext<'_>, decl: DeclId) -> String {
    let table = ctx.table;
    let declaration = table.decl(decl);
    let text = if declaration.synthesized {
        insert_name(declaration.kind, &declaration.text, table.name(declaration.name))
    } else {
        declaration.text.clone()
    };
    rewrite_identifiers(&text, &renames(ctx, decl))
}

fn renames<'a>(ctx: ExtractorContext<'a>, decl: DeclId) -> HashMap<&'a str, &'a str> {
    let table = ctx.table;
    let resolution = ctx.resolution;
    let declaration = table.decl(decl);
    let mut renames = HashMap::new();

    if declaration.parent.is_none()
        && let Some(id) = resolution.entity_of(Target::Symbol(declaration.symbol))
    {
        let emitted = resolution.entity(id).name.as_str();
        let declared = table.name(declaration.name);
        if emitted != declared {
            renames.insert(declared, emitted);
        }
    }

    for (reference, bound) in declaration
        .references
        .iter()
        .zip(resolution.references_of(decl))
    {
        let Some(root) = bound.root else {
            continue;
        };
        if let Target::Symbol(symbol) = root
            && table.symbol(symbol).parent.is_some()
        {
            continue;
        }
        let Some(id) = resolution.entity_of(root) else {
            continue;
        };
        let emitted = resolution.entity(id).name.as_str();
        let local = table.name(reference.root);
        if emitted != local {
            renames.insert(local, emitted);
        }
    }
    renames
}

fn join_members(items: Vec<Item>, container: Container) -> String {
    let last_decl = items.iter().rposition(|i| matches!(i, Item::Decl(_)));
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Item::Decl(text) => {
                out.push_str(&text);
                if container == Container::Enum && Some(i) != last_decl {
                    out.push(',');
                }
            }
            Item::Marker(text) => out.push_str(&text),
        }
        out.push('\n');
    }
    out
}
