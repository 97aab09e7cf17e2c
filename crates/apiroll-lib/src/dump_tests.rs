use serde_json::json;

use apiroll_core::Colors;

use crate::Extractor;

fn imported_widget() -> serde_json::Value {
    json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [
            {
                "path": "index.d.ts",
                "imports": [{ "kind": "named", "local": "W", "name": "Widget", "from": "./widget" }],
                "exports": [{ "kind": "named", "name": "Widget", "local": "W" }]
            },
            {
                "path": "widget.d.ts",
                "declarations": [{
                    "kind": "class",
                    "name": "Widget",
                    "text": "class Widget",
                    "doc": "/** A widget on screen. @public */",
                    "exported": true
                }]
            }
        ]
    })
}

#[test]
fn dump_plain() {
    let extractor = Extractor::expect_clean(imported_widget());

    insta::assert_snapshot!(extractor.dump(Colors::OFF), @r"
    [modules]
    M0 index (entry) decls=0
    M1 widget decls=1

    [edges]
    E0 import index:W <- widget:Widget  ; -> widget:Widget
    E1 export index:Widget <- local W  ; -> widget:Widget
    E2 export widget:Widget <- local Widget  ; -> widget:Widget

    [entities]
    Widget = widget:Widget  ; @public, exported as Widget
    ");
}

#[test]
fn dump_failed_edges() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{
            "path": "index.d.ts",
            "exports": [{ "kind": "reexport", "name": "Gone", "imported": "Gone", "from": "./missing" }]
        }]
    });

    let extractor = Extractor::expect(model);

    insta::assert_snapshot!(extractor.dump(Colors::OFF), @r"
    [modules]
    M0 index (entry) decls=0

    [edges]
    E0 export index:Gone <- missing './missing'  ; failed

    [entities]
    ");
}

#[test]
fn dump_colored() {
    let extractor = Extractor::expect_clean(imported_widget());

    let out = extractor.dump(Colors::ON);

    assert!(out.contains("\x1b[34mWidget\x1b[0m = widget:Widget"));
    assert!(out.contains("\x1b[32m@public\x1b[0m"));
}
