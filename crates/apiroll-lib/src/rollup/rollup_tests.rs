use serde_json::{Value, json};

use apiroll_core::ReleaseTag;

use crate::Extractor;
use crate::config::{ExportOrder, ExtractorConfig, Newline};
use crate::test_utils::single_module;

fn widgets() -> Value {
    single_module(json!([
        {
            "kind": "class",
            "name": "Widget",
            "text": "class Widget",
            "doc": "/** A widget on screen. @public */",
            "exported": true,
            "members": [
                { "kind": "method", "name": "render", "text": "render(): void", "doc": "/** Draws the widget. */" },
                { "kind": "method", "name": "_debug", "text": "_debug(): string", "doc": "/** Debug dump. @internal */" }
            ]
        },
        {
            "kind": "function",
            "name": "parse",
            "text": "function parse(s: string): Widget",
            "doc": "/** Parses a widget. @beta */",
            "exported": true,
            "references": ["Widget"]
        },
        {
            "kind": "function",
            "name": "parse",
            "text": "function parse(s: string, strict: boolean): Widget",
            "doc": "/** Parses a widget strictly. @alpha */",
            "references": ["Widget"]
        },
        {
            "kind": "interface",
            "name": "_Hooks",
            "text": "interface _Hooks",
            "doc": "/** Test hooks. @internal */",
            "exported": true
        }
    ]))
}

#[test]
fn public_rollup() {
    let extractor = Extractor::expect_clean(widgets());

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** A widget on screen. @public */
    export declare class Widget {
        /** Draws the widget. */
        render(): void;
        /* Excluded from this release type: _debug */
    }

    /* Excluded from this release type: _Hooks */

    /* Excluded from this release type: parse */

    export { }
    ");
}

#[test]
fn beta_rollup_trims_the_alpha_overload() {
    let extractor = Extractor::expect_clean(widgets());

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Beta), @r"
    /** A widget on screen. @public */
    export declare class Widget {
        /** Draws the widget. */
        render(): void;
        /* Excluded from this release type: _debug */
    }

    /* Excluded from this release type: _Hooks */

    /** Parses a widget. @beta */
    export declare function parse(s: string): Widget;
    /* Excluded from this release type: parse */

    export { }
    ");
}

#[test]
fn untrimmed_rollup_keeps_everything() {
    let extractor = Extractor::expect_clean(widgets());

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Internal), @r"
    /** A widget on screen. @public */
    export declare class Widget {
        /** Draws the widget. */
        render(): void;
        /** Debug dump. @internal */
        _debug(): string;
    }

    /** Test hooks. @internal */
    export declare interface _Hooks {
    }

    /** Parses a widget. @beta */
    export declare function parse(s: string): Widget;
    /** Parses a widget strictly. @alpha */
    export declare function parse(s: string, strict: boolean): Widget;

    export { }
    ");
}

#[test]
fn consecutive_trimmed_overloads_share_one_marker() {
    let model = single_module(json!([
        { "kind": "function", "name": "load", "text": "function load(): void", "doc": "/** Loads it. @alpha */", "exported": true },
        { "kind": "function", "name": "load", "text": "function load(a: string): void", "doc": "/** Loads it. @alpha */" },
        { "kind": "function", "name": "load", "text": "function load(a: string, b: string): void", "doc": "/** Loads it. @beta */" },
        { "kind": "function", "name": "load", "text": "function load(a: number): void", "doc": "/** Loads it. @public */" }
    ]));

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Beta), @r"
    /* Excluded from this release type: load */
    /** Loads it. @beta */
    export declare function load(a: string, b: string): void;
    /** Loads it. @public */
    export declare function load(a: number): void;

    export { }
    ");
}

#[test]
fn omitted_trimming_comments() {
    let config = ExtractorConfig::new().omit_trimming_comments(true);
    let extractor = Extractor::expect_with(widgets(), config);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** A widget on screen. @public */
    export declare class Widget {
        /** Draws the widget. */
        render(): void;
    }

    export { }
    ");
}

#[test]
fn tiers_are_monotonic() {
    let extractor = Extractor::expect_clean(widgets());

    let public = extractor.included_entities(ReleaseTag::Public);
    let beta = extractor.included_entities(ReleaseTag::Beta);
    let alpha = extractor.included_entities(ReleaseTag::Alpha);
    let internal = extractor.included_entities(ReleaseTag::Internal);

    assert_eq!(public, ["Widget"]);
    assert_eq!(beta, ["Widget", "parse"]);
    assert_eq!(alpha, ["Widget", "parse"]);
    assert_eq!(internal, ["Widget", "_Hooks", "parse"]);
    for (smaller, larger) in [(&public, &beta), (&beta, &alpha), (&alpha, &internal)] {
        assert!(smaller.iter().all(|name| larger.contains(name)));
    }
}

#[test]
fn emission_is_deterministic() {
    let first = Extractor::expect(widgets());
    let second = Extractor::expect(widgets());

    for tier in ReleaseTag::ALL {
        assert_eq!(first.rollup(tier), first.rollup(tier));
        assert_eq!(first.rollup(tier), second.rollup(tier));
    }
}

#[test]
fn global_collision_is_renamed_and_reexported() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [
            {
                "path": "index.d.ts",
                "declarations": [
                    {
                        "kind": "class",
                        "name": "Date",
                        "text": "class Date",
                        "doc": "/** A calendar date without a time. @public */",
                        "exported": true
                    },
                    {
                        "kind": "function",
                        "name": "today",
                        "text": "function today(): Date",
                        "doc": "/** The current calendar date. @public */",
                        "exported": true,
                        "references": ["Date"]
                    }
                ],
                "exports": [{ "kind": "reexport", "name": "now", "imported": "now", "from": "./clock" }]
            },
            {
                "path": "clock.d.ts",
                "declarations": [{
                    "kind": "function",
                    "name": "now",
                    "text": "function now(): Date",
                    "doc": "/** Current wall clock time. @public */",
                    "exported": true,
                    "references": ["Date"]
                }]
            }
        ]
    });

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** A calendar date without a time. @public */
    declare class Date_2 {
    }

    /** Current wall clock time. @public */
    export declare function now(): Date;

    /** The current calendar date. @public */
    export declare function today(): Date_2;

    export { Date_2 as Date }
    export { }
    ");
}

#[test]
fn forgotten_reference_is_emitted_unexported() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [
            {
                "path": "index.d.ts",
                "exports": [
                    { "kind": "reexport", "name": "Options", "imported": "Options", "from": "./a" },
                    { "kind": "reexport", "name": "make", "imported": "make", "from": "./b" }
                ]
            },
            {
                "path": "a.d.ts",
                "declarations": [{
                    "kind": "interface",
                    "name": "Options",
                    "text": "interface Options",
                    "doc": "/** Public options. @public */",
                    "exported": true
                }]
            },
            {
                "path": "b.d.ts",
                "declarations": [
                    { "kind": "interface", "name": "Options", "text": "interface Options", "doc": "/** Private options. @public */" },
                    {
                        "kind": "function",
                        "name": "make",
                        "text": "function make(options: Options): void",
                        "doc": "/** Makes a thing. @public */",
                        "exported": true,
                        "references": ["Options"]
                    }
                ]
            }
        ]
    });

    let extractor = Extractor::expect(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** Public options. @public */
    export declare interface Options {
    }

    /** Private options. @public */
    declare interface Options_2 {
    }

    /** Makes a thing. @public */
    export declare function make(options: Options_2): void;

    export { }
    ");
}

#[test]
fn external_imports_and_directives() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "typeReferences": ["node"],
        "modules": [{
            "path": "index.d.ts",
            "imports": [{ "kind": "named", "local": "Emitter", "name": "EventEmitter", "from": "events" }],
            "exports": [{ "kind": "star", "from": "lodash" }],
            "declarations": [{
                "kind": "class",
                "name": "Bus",
                "text": "class Bus extends Emitter",
                "doc": "/** Message bus for events. @public */",
                "exported": true,
                "references": ["Emitter"]
            }]
        }]
    });

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r#"
    /// <reference types="node" />

    import { EventEmitter as Emitter } from 'events';

    /** Message bus for events. @public */
    export declare class Bus extends Emitter {
    }

    export * from "lodash";
    export { }
    "#);
}

#[test]
fn namespace_export_lists_visible_members() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [
            {
                "path": "index.d.ts",
                "exports": [{ "kind": "namespace", "name": "shapes", "from": "./shapes" }]
            },
            {
                "path": "shapes.d.ts",
                "declarations": [
                    { "kind": "class", "name": "Circle", "text": "class Circle", "doc": "/** A round shape. @public */", "exported": true },
                    { "kind": "class", "name": "_Secret", "text": "class _Secret", "doc": "/** Hidden shape. @internal */", "exported": true }
                ]
            }
        ]
    });

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** A round shape. @public */
    declare class Circle {
    }

    export declare namespace shapes {
        export {
            Circle
        }
    }

    export { }
    ");
}

#[test]
fn anonymous_default_export() {
    let model = single_module(json!([{
        "kind": "function",
        "text": "function (): void",
        "doc": "/** Entry point of the demo. @public */",
        "default": true,
        "location": { "line": 1, "column": 1 }
    }]));

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** Entry point of the demo. @public */
    declare function _anonymous_1_1(): void;

    export { _anonymous_1_1 as default }
    ");
}

#[test]
fn enum_members_are_comma_separated() {
    let model = single_module(json!([{
        "kind": "enum",
        "name": "Color",
        "text": "enum Color",
        "doc": "/** Primary colors. @public */",
        "exported": true,
        "members": [
            { "kind": "enumMember", "name": "Red", "text": "Red = 0" },
            { "kind": "enumMember", "name": "Green", "text": "Green = 1" },
            { "kind": "enumMember", "name": "Blue", "text": "Blue = 2", "doc": "/** Not yet stable. @beta */" }
        ]
    }]));

    let extractor = Extractor::expect_clean(model);

    insta::assert_snapshot!(extractor.rollup(ReleaseTag::Public), @r"
    /** Primary colors. @public */
    export declare enum Color {
        Red = 0,
        Green = 1
        /* Excluded from this release type: Blue */
    }

    export { }
    ");
}

#[test]
fn modifiers_are_emitted_in_canonical_order() {
    let model = single_module(json!([{
        "kind": "class",
        "name": "Counter",
        "text": "class Counter",
        "doc": "/** Counts things. @public */",
        "exported": true,
        "members": [{
            "kind": "property",
            "name": "limit",
            "text": "limit: number",
            "modifiers": ["readonly", "static"]
        }]
    }]));

    let extractor = Extractor::expect_clean(model);

    assert!(
        extractor
            .rollup(ReleaseTag::Public)
            .contains("    static readonly limit: number;\n")
    );
}

fn export_statements(rollup: &str) -> Vec<&str> {
    rollup.lines().filter(|l| l.starts_with("export {")).collect()
}

#[test]
fn export_order_policies() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{
            "path": "index.d.ts",
            "declarations": [
                { "kind": "class", "name": "Impl", "text": "class Impl", "doc": "/** Implementation. @public */" },
                { "kind": "class", "name": "Core", "text": "class Core", "doc": "/** Core engine. @public */" }
            ],
            "exports": [
                { "kind": "named", "name": "Zeta", "local": "Impl" },
                { "kind": "named", "name": "Beta", "local": "Core" },
                { "kind": "named", "name": "Alpha", "local": "Impl" },
                { "kind": "named", "name": "Delta", "local": "Core" }
            ]
        }]
    });

    let alphabetical = Extractor::expect(model.clone()).rollup(ReleaseTag::Public);
    let first_declared = Extractor::expect_with(
        model,
        ExtractorConfig::new().export_order(ExportOrder::FirstDeclared),
    )
    .rollup(ReleaseTag::Public);

    assert_eq!(
        export_statements(&alphabetical),
        [
            "export { Alpha }",
            "export { Beta }",
            "export { Beta as Delta }",
            "export { Alpha as Zeta }",
            "export { }"
        ]
    );
    assert_eq!(
        export_statements(&first_declared),
        [
            "export { Zeta }",
            "export { Beta }",
            "export { Zeta as Alpha }",
            "export { Beta as Delta }",
            "export { }"
        ]
    );
}

#[test]
fn crlf_newlines() {
    let config = ExtractorConfig::new().newline(Newline::CrLf);
    let extractor = Extractor::expect_with(widgets(), config);

    let rollup = extractor.rollup(ReleaseTag::Public);

    assert!(rollup.contains("render(): void;\r\n"));
    assert!(!rollup.replace("\r\n", "").contains('\n'));
}
