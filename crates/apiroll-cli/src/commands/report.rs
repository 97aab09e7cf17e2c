use std::path::PathBuf;

use super::loader::{analyze, extractor_config, finish, report_diagnostics, write_output};
use super::{CliError, exit_with};

pub struct ReportArgs {
    pub model_path: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: ReportArgs) {
    if let Err(err) = execute(&args) {
        exit_with(err);
    }
}

pub fn execute(args: &ReportArgs) -> Result<(), CliError> {
    let config = extractor_config(args.config.as_deref(), args.strict)?;
    let extractor = analyze(&args.model_path, config)?;
    report_diagnostics(&extractor, args.color)?;
    write_output(args.output.as_deref(), &extractor.report())?;
    finish(&extractor)
}
