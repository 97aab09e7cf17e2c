use std::path::PathBuf;

use log::info;

use super::loader::{analyze, finish, load_config, report_diagnostics, write_output};
use super::{CliError, exit_with};

pub struct RunArgs {
    pub model_path: PathBuf,
    pub config: PathBuf,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: RunArgs) {
    if let Err(err) = execute(&args) {
        exit_with(err);
    }
}

/// Write every enabled output and return the files written.
pub fn execute(args: &RunArgs) -> Result<Vec<PathBuf>, CliError> {
    let file = load_config(&args.config)?;
    let mut config = file.to_extractor_config()?;
    if args.strict {
        config = config.strict(true);
    }
    let extractor = analyze(&args.model_path, config)?;

    let mut outputs: Vec<(PathBuf, String)> = file
        .rollup_targets()
        .into_iter()
        .map(|(tier, path)| (path, extractor.rollup(tier)))
        .collect();
    let package = &extractor.symbol_table().package().name;
    if let Some(path) = file.report_path(package) {
        outputs.push((path, extractor.report()));
    }
    if let Some(path) = file.doc_model_path(package) {
        outputs.push((path, extractor.api_json(&file.doc_model.options())?));
    }
    if outputs.is_empty() {
        return Err(CliError::NothingToDo);
    }
    report_diagnostics(&extractor, args.color)?;

    for (path, text) in &outputs {
        write_output(Some(path), text)?;
    }
    info!(package = package.as_str(), outputs = outputs.len(); "run finished");

    finish(&extractor)?;
    Ok(outputs.into_iter().map(|(path, _)| path).collect())
}
