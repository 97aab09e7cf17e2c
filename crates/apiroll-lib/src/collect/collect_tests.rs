use serde_json::json;

use apiroll_core::DeclarationKind;

use super::*;
use crate::graph::ExportSpec;
use crate::test_utils::{package, single_module};

#[test]
fn merges_declarations_into_one_symbol() {
    let model = single_module(json!([
        { "kind": "function", "name": "parse", "text": "function parse(s: string): number", "exported": true },
        { "kind": "function", "name": "parse", "text": "function parse(s: string, radix: number): number" },
        { "kind": "interface", "name": "Options", "text": "interface Options" }
    ]));

    let (table, diag) = collect(&package(model)).unwrap();

    assert!(diag.is_empty());
    assert_eq!(table.decl_count(), 3);
    assert_eq!(table.symbol_count(), 2);
    let parse = table.lookup("index", "parse").unwrap();
    assert_eq!(table.symbol(parse).declarations.len(), 2);
    assert_eq!(table.symbol(parse).kind, DeclarationKind::Function);
}

#[test]
fn members_get_their_own_scope() {
    let model = single_module(json!([{
        "kind": "class",
        "name": "Widget",
        "text": "class Widget",
        "exported": true,
        "members": [
            { "kind": "constructor", "text": "constructor(id: string)" },
            { "kind": "method", "name": "render", "text": "render(): void" },
            { "kind": "method", "name": "render", "text": "render(target: Element): void" }
        ]
    }]));

    let (table, _) = collect(&package(model)).unwrap();

    let widget = table.lookup("index", "Widget").unwrap();
    let members: Vec<&str> = table
        .symbol(widget)
        .members
        .keys()
        .map(|&n| table.name(n))
        .collect();
    assert_eq!(members, ["(constructor)", "render"]);

    let render = table.symbol(widget).members[&table.interner().get("render").unwrap()];
    assert_eq!(table.qualified_name(render), "Widget.render");
    assert_eq!(table.symbol(render).declarations.len(), 2);
}

#[test]
fn inline_export_flags_become_export_specs() {
    let model = single_module(json!([
        { "kind": "class", "name": "Widget", "text": "class Widget", "exported": true, "default": true }
    ]));

    let (table, _) = collect(&package(model)).unwrap();

    let module = table.module(table.entry());
    let names: Vec<&str> = module
        .exports
        .iter()
        .map(|spec| match spec {
            ExportSpec::Named { name, .. } => table.name(*name),
            other => panic!("unexpected export {other:?}"),
        })
        .collect();
    assert_eq!(names, ["Widget", "default"]);
}

#[test]
fn anonymous_default_export_gets_a_synthesized_name() {
    let model = single_module(json!([{
        "kind": "class",
        "text": "class extends Base",
        "default": true,
        "location": { "line": 3, "column": 1 }
    }]));

    let (table, _) = collect(&package(model)).unwrap();

    let symbol = table.lookup("index", "_anonymous_3_1").unwrap();
    let decl = table.symbol(symbol).declarations[0];
    assert!(table.decl(decl).synthesized);
}

#[test]
fn nameless_declaration_is_malformed() {
    let model = single_module(json!([
        { "kind": "function", "text": "function (): void", "location": { "line": 2, "column": 5 } }
    ]));

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"malformed declaration at index:2:5: function declaration has no name");
}

#[test]
fn member_kind_outside_a_container_is_malformed() {
    let model = single_module(json!([
        { "kind": "method", "name": "run", "text": "run(): void" }
    ]));

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"malformed declaration at index: a method cannot appear at module scope");
}

#[test]
fn enum_only_accepts_enum_members() {
    let model = single_module(json!([{
        "kind": "enum",
        "name": "Color",
        "text": "enum Color",
        "members": [{ "kind": "property", "name": "red", "text": "red: number" }]
    }]));

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"malformed declaration at index: a property cannot be a member of a enum");
}

#[test]
fn empty_text_is_malformed() {
    let model = single_module(json!([
        { "kind": "interface", "name": "Empty", "text": "  " }
    ]));

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"malformed declaration at index: interface `Empty` has no text");
}

#[test]
fn duplicate_module_path() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{ "path": "index.d.ts" }, { "path": "./index.ts" }]
    });

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"module `index` appears more than once");
}

#[test]
fn missing_entry_point() {
    let model = json!({
        "name": "demo",
        "entryPoint": "lib/main",
        "modules": [{ "path": "index.d.ts" }]
    });

    let err = collect(&package(model)).unwrap_err();

    insta::assert_snapshot!(err, @"entry point `lib/main` is not one of the package modules");
}

#[test]
fn conflicting_exports_of_one_name() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{
            "path": "index.d.ts",
            "declarations": [
                { "kind": "class", "name": "A", "text": "class A" },
                { "kind": "class", "name": "B", "text": "class B" }
            ],
            "exports": [
                { "kind": "named", "name": "Thing", "local": "A" },
                { "kind": "named", "name": "Thing", "local": "B" },
                { "kind": "named", "name": "Thing", "local": "A" }
            ]
        }]
    });

    let (table, diag) = collect(&package(model)).unwrap();

    assert_eq!(diag.count_of(DiagnosticKind::DuplicateExport), 1);
    insta::assert_snapshot!(diag.render(), @"index - error (ae-duplicate-export): `Thing` is exported more than once");
    assert_eq!(table.module(table.entry()).exports.len(), 1);
}

#[test]
fn doc_comment_issues_are_reported_against_the_declaration() {
    let model = single_module(json!([{
        "kind": "function",
        "name": "run",
        "text": "function run(): void",
        "doc": "/** Runs the thing. @beta @public */",
        "exported": true
    }]));

    let (table, diag) = collect(&package(model)).unwrap();

    assert_eq!(diag.count_of(DiagnosticKind::ExtraReleaseTag), 1);
    let run = table.lookup("index", "run").unwrap();
    let decl = table.symbol(run).declarations[0];
    assert_eq!(diag.iter().next().and_then(|d| d.subject()), Some(decl));
}

#[test]
fn package_documentation_tag_on_a_declaration() {
    let model = single_module(json!([{
        "kind": "function",
        "name": "run",
        "text": "function run(): void",
        "doc": "/** Runs the thing. @packageDocumentation */"
    }]));

    let (_, diag) = collect(&package(model)).unwrap();

    assert!(diag.contains(DiagnosticKind::MisplacedPackageTag));
}

#[test]
fn references_keep_their_qualifiers() {
    let model = single_module(json!([{
        "kind": "variable",
        "name": "config",
        "text": "config: Settings.Options",
        "references": ["Settings.Options", "typeof defaults"]
    }]));

    let (table, _) = collect(&package(model)).unwrap();

    let config = table.lookup("index", "config").unwrap();
    let decl = table.decl(table.symbol(config).declarations[0]);
    let rendered: Vec<(String, bool)> = decl
        .references
        .iter()
        .map(|r| {
            let mut parts = vec![table.name(r.root)];
            parts.extend(r.rest.iter().map(|&n| table.name(n)));
            (parts.join("."), r.is_typeof)
        })
        .collect();
    assert_eq!(
        rendered,
        [
            ("Settings.Options".to_string(), false),
            ("defaults".to_string(), true)
        ]
    );
}

#[test]
fn module_lookup_normalizes_paths() {
    let model = json!({
        "name": "demo",
        "entryPoint": "./src/index.d.ts",
        "modules": [{ "path": "src/index.d.ts" }]
    });

    let (table, _) = collect(&package(model)).unwrap();

    assert_eq!(table.module_by_path("./src/index.ts"), Some(table.entry()));
    assert_eq!(table.module(table.entry()).path, "src/index");
}
