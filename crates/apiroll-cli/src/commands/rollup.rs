use std::path::PathBuf;

use apiroll_core::ReleaseTag;
use apiroll_lib::ExportOrder;

use super::loader::{analyze, extractor_config, finish, report_diagnostics, write_output};
use super::{CliError, exit_with};

pub struct RollupArgs {
    pub model_path: PathBuf,
    pub tier: ReleaseTag,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub omit_trimming_comments: bool,
    pub export_order: Option<ExportOrder>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: RollupArgs) {
    if let Err(err) = execute(&args) {
        exit_with(err);
    }
}

pub fn execute(args: &RollupArgs) -> Result<(), CliError> {
    let mut config = extractor_config(args.config.as_deref(), args.strict)?;
    // Flags only ever override the config file.
    if args.omit_trimming_comments {
        config = config.omit_trimming_comments(true);
    }
    if let Some(order) = args.export_order {
        config = config.export_order(order);
    }

    let extractor = analyze(&args.model_path, config)?;
    report_diagnostics(&extractor, args.color)?;
    write_output(args.output.as_deref(), &extractor.rollup(args.tier))?;
    finish(&extractor)
}
