use indexmap::IndexMap;

use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::CircularReference, Location::module("index"))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(
        diagnostics.render(),
        @"index - error (ae-circular-reference): circular reference between exports"
    );
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ForgottenExport, Location::new("src/widget", 4, 1))
        .message("Options")
        .emit();

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);
    insta::assert_snapshot!(
        diagnostics.render(),
        @"src/widget:4:1 - warning (ae-forgotten-export): the symbol `Options` needs to be exported by the entry point"
    );
}

#[test]
fn related_info_in_plain_output() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::AmbiguousReexport, Location::module("index"))
        .message("`Shape` is provided by two star exports")
        .related_to("first provided here", Location::module("a"))
        .emit();

    insta::assert_snapshot!(
        diagnostics.render(),
        @"index - error (ae-ambiguous-reexport): `Shape` is provided by two star exports (related: first provided here at a)"
    );
}

#[test]
fn codes_roundtrip() {
    for kind in DiagnosticKind::ALL {
        assert_eq!(DiagnosticKind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(DiagnosticKind::from_code("ae-nonsense"), None);
}

#[test]
fn policy_overrides_and_silences() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ForgottenExport, Location::module("index"))
        .emit();
    diagnostics
        .report(DiagnosticKind::MissingReleaseTag, Location::module("index"))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnresolvedExport, Location::module("index"))
        .emit();

    let policy = ReportingPolicy::new()
        .set(DiagnosticKind::ForgottenExport, Reporting::Error)
        .set(DiagnosticKind::MissingReleaseTag, Reporting::None);
    let graded = diagnostics.apply_policy(&policy);

    assert_eq!(graded.len(), 2);
    assert_eq!(graded.error_count(), 2);
    assert!(!graded.contains(DiagnosticKind::MissingReleaseTag));
    // The original collection is untouched.
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.render().is_empty());
}

#[test]
fn printer_with_source_snippet() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnresolvedExport,
            Location::new("test.d.ts", 1, 1).with_range(0..5),
        )
        .message("Thing")
        .emit();

    let mut sources = IndexMap::new();
    sources.insert("test.d.ts".to_string(), "hello world".to_string());

    let result = diagnostics.printer().sources(&sources).render();
    insta::assert_snapshot!(result, @r"
    error: `Thing` could not be resolved (ae-unresolved-export)
     --> test.d.ts:1:1
      |
    1 | hello world
      | ^^^^^ `Thing` could not be resolved
    ");
}

#[test]
fn printer_without_range_falls_back_to_plain() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnresolvedModule, Location::new("test.d.ts", 2, 3))
        .message("./missing")
        .emit();

    let mut sources = IndexMap::new();
    sources.insert("test.d.ts".to_string(), "a\nb".to_string());

    insta::assert_snapshot!(
        diagnostics.printer().sources(&sources).render(),
        @"test.d.ts:2:3 - error (ae-unresolved-module): cannot find module `./missing`"
    );
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnresolvedExport,
            Location::new("m", 1, 1).with_range(0..5),
        )
        .emit();

    let mut sources = IndexMap::new();
    sources.insert("m".to_string(), "hello".to_string());

    let result = diagnostics.printer().sources(&sources).colored(true).render();
    assert!(result.contains("export could not be resolved"));
    assert!(result.contains('\x1b'));
}
