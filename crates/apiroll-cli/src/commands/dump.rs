use std::path::PathBuf;

use apiroll_core::Colors;

use super::loader::{analyze, extractor_config, write_output};
use super::{CliError, exit_with};

pub struct DumpArgs {
    pub model_path: PathBuf,
    pub config: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    if let Err(err) = execute(&args) {
        exit_with(err);
    }
}

pub fn execute(args: &DumpArgs) -> Result<(), CliError> {
    let config = extractor_config(args.config.as_deref(), false)?;
    let extractor = analyze(&args.model_path, config)?;
    write_output(None, &extractor.dump(Colors::new(args.color)))
}
