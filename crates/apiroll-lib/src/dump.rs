//! Human-readable dump of the resolved graph, for debugging.

use std::fmt::Write as _;

use apiroll_core::Colors;

use crate::extractor::ExtractorContext;
use crate::resolve::{EdgeRole, EdgeSource, EdgeState, Target};

/// Generate a dump of modules, export edges and entities.
pub fn dump(ctx: ExtractorContext<'_>, colors: Colors) -> String {
    let mut out = String::new();
    dump_modules(&mut out, ctx, colors);
    dump_edges(&mut out, ctx, colors);
    dump_entities(&mut out, ctx, colors);
    out
}

fn dump_modules(out: &mut String, ctx: ExtractorContext<'_>, c: Colors) {
    out.push_str("[modules]\n");
    for (id, module) in ctx.table.modules() {
        let entry = if id == ctx.table.entry() { " (entry)" } else { "" };
        writeln!(
            out,
            "M{} {}{}{}{entry} decls={}",
            id.as_u32(),
            c.dim,
            module.path,
            c.reset,
            module.declarations.len(),
        )
        .unwrap();
    }
    out.push('\n');
}

fn dump_edges(out: &mut String, ctx: ExtractorContext<'_>, c: Colors) {
    out.push_str("[edges]\n");
    for (id, edge, state) in ctx.resolution.edges() {
        let role = match edge.role {
            EdgeRole::Export => "export",
            EdgeRole::Import => "import",
        };
        let module = &ctx.table.module(edge.module).path;
        let state = match state {
            EdgeState::Pending => "pending".to_string(),
            EdgeState::Failed => "failed".to_string(),
            EdgeState::Resolved(target) => format!("-> {}", describe(ctx, target)),
        };
        let name = ctx.table.name(edge.name);
        let from = source(ctx, &edge.source);
        writeln!(
            out,
            "E{} {role} {}{module}:{}{}{name}{} <- {from}  {}; {state}{}",
            id.as_u32(),
            c.dim,
            c.reset,
            c.blue,
            c.reset,
            c.dim,
            c.reset,
        )
        .unwrap();
    }
    out.push('\n');
}

fn dump_entities(out: &mut String, ctx: ExtractorContext<'_>, c: Colors) {
    out.push_str("[entities]\n");
    for (_, entity) in ctx.resolution.entities() {
        let mut notes = Vec::new();
        if let Target::Symbol(symbol) = entity.target {
            notes.push(format!("{}{}{}", c.green, ctx.release.symbol_tag(symbol).doc_tag(), c.reset));
        }
        if !entity.export_names.is_empty() {
            let names: Vec<&str> = entity.export_names.iter().map(|&n| ctx.table.name(n)).collect();
            notes.push(format!("exported as {}", names.join(", ")));
        }
        if entity.namespace_member {
            notes.push("namespace member".to_string());
        }
        if entity.is_forgotten() {
            notes.push("forgotten".to_string());
        }
        write!(out, "{}{}{} = {}", c.blue, entity.name, c.reset, describe(ctx, entity.target)).unwrap();
        if !notes.is_empty() {
            write!(out, "  {}; {}{}", c.dim, notes.join(", "), c.reset).unwrap();
        }
        out.push('\n');
    }
}

fn source(ctx: ExtractorContext<'_>, source: &EdgeSource) -> String {
    match source {
        EdgeSource::Local(name) => format!("local {}", ctx.table.name(*name)),
        EdgeSource::Reexport { module, name } => {
            format!("{}:{}", ctx.table.module(*module).path, ctx.table.name(*name))
        }
        EdgeSource::External(id) => describe(ctx, Target::External(*id)),
        EdgeSource::Namespace(module) => format!("{}:*", ctx.table.module(*module).path),
        EdgeSource::MissingModule(specifier) => format!("missing '{specifier}'"),
    }
}

fn describe(ctx: ExtractorContext<'_>, target: Target) -> String {
    match target {
        Target::Symbol(symbol) => {
            let module = ctx.table.symbol(symbol).module;
            format!("{}:{}", ctx.table.module(module).path, ctx.table.qualified_name(symbol))
        }
        Target::External(id) => {
            let external = ctx.resolution.external(id);
            match external.imported {
                Some(imported) => format!("'{}'.{}", external.package, ctx.table.name(imported)),
                None => format!("'{}'.*", external.package),
            }
        }
        Target::Namespace(module) => format!("{}:*", ctx.table.module(module).path),
    }
}
