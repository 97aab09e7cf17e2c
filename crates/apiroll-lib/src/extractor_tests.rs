use serde_json::json;

use apiroll_core::ReleaseTag;

use crate::config::ExtractorConfig;
use crate::diagnostics::{DiagnosticKind, Reporting, ReportingPolicy, Severity};
use crate::extractor::{Extractor, ExtractorBuilder};
use crate::test_utils::{package, single_module};
use crate::Error;

fn widget() -> serde_json::Value {
    single_module(json!([{
        "kind": "class",
        "name": "Widget",
        "text": "class Widget",
        "doc": "/** A widget on screen. @public */",
        "exported": true
    }]))
}

fn untagged() -> serde_json::Value {
    single_module(json!([{
        "kind": "function",
        "name": "make",
        "text": "function make(): void",
        "doc": "/** Makes the thing. */",
        "exported": true
    }]))
}

#[test]
fn from_json_runs_the_whole_pipeline() {
    let extractor = Extractor::from_json(&widget().to_string()).unwrap();

    assert!(extractor.is_valid());
    assert_eq!(extractor.included_entities(ReleaseTag::Public), ["Widget"]);
}

#[test]
fn from_json_rejects_bad_shapes() {
    let err = Extractor::from_json(r#"{ "name": "demo" }"#).unwrap_err();

    assert!(matches!(err, Error::InvalidModel(_)));
    assert!(err.to_string().starts_with("invalid declaration model: "));
}

#[test]
fn malformed_input_stops_at_collect() {
    let model = json!({
        "name": "demo",
        "entryPoint": "main",
        "modules": [{ "path": "index.d.ts" }]
    });

    let err = ExtractorBuilder::new(&package(model)).collect().unwrap_err();

    insta::assert_snapshot!(err, @"entry point `main` is not one of the package modules");
}

#[test]
fn stages_expose_their_output() {
    let raw = package(widget());

    let collected = ExtractorBuilder::new(&raw).collect().unwrap();
    assert!(collected.symbol_table().lookup("index", "Widget").is_some());
    assert!(collected.diagnostics().is_empty());

    let resolved = collected.resolve();
    assert_eq!(resolved.resolution().entities().count(), 1);

    let analyzed = resolved.analyze();
    let symbol = analyzed.symbol_table().lookup("index", "Widget").unwrap();
    assert_eq!(analyzed.release_info().symbol_tag(symbol), ReleaseTag::Public);
}

#[test]
fn strict_mode_fails_on_any_diagnostic() {
    let lenient = Extractor::expect(untagged());
    assert!(lenient.check_strict().is_ok());

    let strict = Extractor::expect_with(untagged(), ExtractorConfig::new().strict(true));
    let err = strict.check_strict().unwrap_err();

    insta::assert_snapshot!(err, @"analysis failed in strict mode with 0 errors and 1 warnings");
    let Error::StrictModeViolation(diag) = err else {
        panic!("expected a strict mode violation");
    };
    assert!(diag.contains(DiagnosticKind::MissingReleaseTag));
}

#[test]
fn strict_mode_passes_clean_packages() {
    let extractor = Extractor::expect_with(widget(), ExtractorConfig::new().strict(true));

    assert!(extractor.check_strict().is_ok());
}

#[test]
fn strict_mode_respects_the_policy() {
    let policy = ReportingPolicy::new().set(DiagnosticKind::MissingReleaseTag, Reporting::None);
    let config = ExtractorConfig::new().strict(true).reporting(policy);

    let extractor = Extractor::expect_with(untagged(), config);

    assert!(extractor.check_strict().is_ok());
    assert_eq!(extractor.raw_diagnostics().len(), 1);
    assert!(extractor.diagnostics().is_empty());
}

#[test]
fn policy_regrades_severity() {
    let policy = ReportingPolicy::new().set(DiagnosticKind::MissingReleaseTag, Reporting::Error);

    let extractor = Extractor::expect_with(untagged(), ExtractorConfig::new().reporting(policy));

    assert_eq!(extractor.raw_diagnostics().error_count(), 0);
    let diag = extractor.diagnostics();
    assert_eq!(diag.error_count(), 1);
    assert_eq!(diag.iter().next().unwrap().severity(), Severity::Error);
    assert!(!extractor.is_valid());
}

#[test]
fn sources_keep_module_order() {
    let model = json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [
            { "path": "index.d.ts", "source": "export * from './a';" },
            { "path": "b.d.ts" },
            { "path": "a.d.ts", "source": "export declare const a: number;" }
        ]
    });

    let extractor = Extractor::expect(model);
    let sources = extractor.sources();

    assert_eq!(sources.keys().collect::<Vec<_>>(), ["index", "a"]);
    assert_eq!(sources["a"], "export declare const a: number;");
}

#[test]
fn rollups_can_be_rendered_repeatedly() {
    let extractor = Extractor::expect_clean(widget());

    let first = extractor.rollup(ReleaseTag::Beta);
    let second = extractor.rollup(ReleaseTag::Beta);

    assert_eq!(first, second);
    assert!(first.contains("export declare class Widget"));
}
