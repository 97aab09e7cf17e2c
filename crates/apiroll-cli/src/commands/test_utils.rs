use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

/// One module with a public class, a beta function and an internal helper.
pub fn widgets() -> Value {
    json!({
        "name": "@acme/widgets",
        "entryPoint": "index",
        "modules": [{
            "path": "index.d.ts",
            "declarations": [
                {
                    "kind": "class",
                    "name": "Widget",
                    "text": "class Widget",
                    "doc": "/** A widget on screen. @public */",
                    "exported": true
                },
                {
                    "kind": "function",
                    "name": "preview",
                    "text": "function preview(w: Widget): string",
                    "doc": "/** Renders a preview. @beta */",
                    "exported": true,
                    "references": ["Widget"]
                },
                {
                    "kind": "function",
                    "name": "_makeWidget",
                    "text": "function _makeWidget(): Widget",
                    "doc": "/** Test factory only. @internal */",
                    "exported": true,
                    "references": ["Widget"]
                }
            ]
        }]
    })
}

#[track_caller]
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, value.to_string()).unwrap();
    path
}
