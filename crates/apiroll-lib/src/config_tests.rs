use std::path::{Path, PathBuf};

use apiroll_core::ReleaseTag;
use indoc::indoc;

use crate::api_model::ApiModelOptions;
use crate::config::{ConfigFile, ExportOrder, Newline};
use crate::diagnostics::{DiagnosticKind, Severity};

#[test]
fn parse_full_config() {
    let config = ConfigFile::parse(indoc! {r#"
        {
            "dtsRollup": {
                "enabled": true,
                "untrimmedFilePath": "dist/demo-untrimmed.d.ts",
                "publicTrimmedFilePath": "dist/demo.d.ts",
                "omitTrimmingComments": true
            },
            "apiReport": { "enabled": true, "reportFolder": "etc" },
            "messages": { "ae-missing-release-tag": "none", "ae-forgotten-export": "error" },
            "exportOrder": "firstDeclared",
            "strict": true,
            "ambientGlobals": ["Buffer"],
            "newlineKind": "crlf"
        }
    "#})
    .unwrap();

    assert_eq!(config.export_order, ExportOrder::FirstDeclared);
    assert_eq!(config.newline_kind, Newline::CrLf);
    assert_eq!(
        config.rollup_targets(),
        vec![
            (ReleaseTag::Internal, PathBuf::from("dist/demo-untrimmed.d.ts")),
            (ReleaseTag::Public, PathBuf::from("dist/demo.d.ts")),
        ]
    );

    let extractor = config.to_extractor_config().unwrap();
    assert!(extractor.is_strict());
    assert!(extractor.omit_trimming_comments);
    assert_eq!(extractor.ambient_globals, vec!["Buffer".to_string()]);
    let policy = extractor.reporting_policy();
    assert_eq!(policy.severity_for(DiagnosticKind::MissingReleaseTag), None);
    assert_eq!(
        policy.severity_for(DiagnosticKind::ForgottenExport),
        Some(Severity::Error)
    );
    assert_eq!(
        policy.severity_for(DiagnosticKind::UnresolvedLink),
        Some(Severity::Warning)
    );
}

#[test]
fn defaults() {
    let config = ConfigFile::parse("{}").unwrap();

    assert_eq!(config, ConfigFile::default());
    assert_eq!(config.export_order, ExportOrder::Alphabetical);
    assert!(config.rollup_targets().is_empty());
    assert_eq!(config.report_path("demo"), None);
}

#[test]
fn unknown_message_code_is_rejected() {
    let config = ConfigFile::parse(r#"{ "messages": { "ae-bogus": "none" } }"#).unwrap();
    let err = config.to_extractor_config().unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"invalid configuration: unknown message code `ae-bogus`");
}

#[test]
fn invalid_json_is_a_config_error() {
    let err = ConfigFile::parse(r#"{ "strict": "yes" }"#).unwrap_err();
    assert!(err.to_string().starts_with("invalid configuration:"));
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let config = ConfigFile::parse(indoc! {r#"
        {
            "dtsRollup": { "enabled": true, "betaTrimmedFilePath": "out/beta.d.ts" },
            "apiReport": { "enabled": true, "reportFolder": "/abs/reports" }
        }
    "#})
    .unwrap()
    .resolve_paths(Path::new("/work/pkg"));

    assert_eq!(
        config.rollup_targets(),
        vec![(ReleaseTag::Beta, PathBuf::from("/work/pkg/out/beta.d.ts"))]
    );
    assert_eq!(
        config.report_path("@scope/demo"),
        Some(PathBuf::from("/abs/reports/demo.api.md"))
    );
}

#[test]
fn report_file_name_template() {
    let config = ConfigFile::parse(
        r#"{ "apiReport": { "enabled": true, "reportFileName": "<unscopedPackageName>.public.api.md" } }"#,
    )
    .unwrap();

    assert_eq!(
        config.report_path("@scope/demo"),
        Some(PathBuf::from("./demo.public.api.md"))
    );
}

#[test]
fn export_order_from_str() {
    assert_eq!("alphabetical".parse(), Ok(ExportOrder::Alphabetical));
    assert_eq!("first-declared".parse(), Ok(ExportOrder::FirstDeclared));
    assert!("random".parse::<ExportOrder>().is_err());
}

#[test]
fn crlf_conversion() {
    assert_eq!(Newline::CrLf.apply("a\nb\n".to_string()), "a\r\nb\r\n");
    assert_eq!(Newline::Lf.apply("a\nb\n".to_string()), "a\nb\n");
}

#[test]
fn doc_model_section() {
    let config = ConfigFile::parse(indoc! {r#"
        {
            "docModel": {
                "enabled": true,
                "apiJsonFilePath": "temp/<unscopedPackageName>.api.json",
                "releaseTagsToTrim": ["internal", "alpha"],
                "includeForgottenExports": true
            }
        }
    "#})
    .unwrap()
    .resolve_paths(Path::new("/work/pkg"));

    assert_eq!(
        config.doc_model_path("@scope/demo"),
        Some(PathBuf::from("/work/pkg/temp/demo.api.json"))
    );
    let options = config.doc_model.options();
    assert_eq!(
        options.release_tags_to_trim,
        vec![ReleaseTag::Internal, ReleaseTag::Alpha]
    );
    assert!(options.include_forgotten_exports);
}

#[test]
fn doc_model_defaults() {
    let config = ConfigFile::parse(r#"{ "docModel": { "enabled": true } }"#).unwrap();

    assert_eq!(config.doc_model_path("demo"), Some(PathBuf::from("demo.api.json")));
    assert_eq!(config.doc_model.options(), ApiModelOptions::default());
    assert_eq!(ConfigFile::default().doc_model_path("demo"), None);
}
