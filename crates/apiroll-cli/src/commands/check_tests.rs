use serde_json::json;

use super::CliError;
use super::check::{CheckArgs, execute};
use super::test_utils::{widgets, write_json};

fn args(model: std::path::PathBuf) -> CheckArgs {
    CheckArgs {
        model_path: model,
        config: None,
        strict: false,
        color: false,
    }
}

fn untagged() -> serde_json::Value {
    json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{
            "path": "index.d.ts",
            "declarations": [{
                "kind": "function",
                "name": "make",
                "text": "function make(): void",
                "doc": "/** Makes the thing. */",
                "exported": true
            }]
        }]
    })
}

#[test]
fn clean_model_passes() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_json(dir.path(), "model.json", &widgets());

    assert!(execute(&CheckArgs { strict: true, ..args(model) }).is_ok());
}

#[test]
fn errors_fail_the_check() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = widgets();
    model["modules"][0]["exports"] = json!([{ "kind": "star", "from": "./gone" }]);
    let model = write_json(dir.path(), "model.json", &model);

    let err = execute(&args(model)).unwrap_err();

    assert!(matches!(err, CliError::Failed(1)));
    insta::assert_snapshot!(err, @"analysis failed with 1 errors");
}

#[test]
fn warnings_fail_only_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_json(dir.path(), "model.json", &untagged());

    assert!(execute(&args(model.clone())).is_ok());

    let err = execute(&CheckArgs { strict: true, ..args(model) }).unwrap_err();
    assert!(matches!(
        err,
        CliError::Extract(apiroll_lib::Error::StrictModeViolation(_))
    ));
}

#[test]
fn config_messages_apply_before_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_json(dir.path(), "model.json", &untagged());
    let config = write_json(
        dir.path(),
        "apiroll.json",
        &json!({ "strict": true, "messages": { "ae-missing-release-tag": "none" } }),
    );

    let result = execute(&CheckArgs {
        config: Some(config),
        ..args(model)
    });

    assert!(result.is_ok());
}

#[test]
fn malformed_models_stop_before_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let model = json!({ "name": "demo", "entryPoint": "main", "modules": [] });
    let model = write_json(dir.path(), "model.json", &model);

    let err = execute(&args(model)).unwrap_err();

    insta::assert_snapshot!(err, @"entry point `main` is not one of the package modules");
}
