use std::path::PathBuf;

use super::loader::{analyze, extractor_config, finish, report_diagnostics};
use super::{CliError, exit_with};

pub struct CheckArgs {
    pub model_path: PathBuf,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    if let Err(err) = execute(&args) {
        exit_with(err);
    }
    // Silent on success (like cargo check)
}

pub fn execute(args: &CheckArgs) -> Result<(), CliError> {
    let config = extractor_config(args.config.as_deref(), args.strict)?;
    let extractor = analyze(&args.model_path, config)?;
    report_diagnostics(&extractor, args.color)?;
    finish(&extractor)
}
