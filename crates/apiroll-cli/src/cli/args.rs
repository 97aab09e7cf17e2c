//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

use apiroll_core::ReleaseTag;
use apiroll_lib::ExportOrder;

/// Declaration model JSON (positional, `-` for stdin).
pub fn model_path_arg() -> Arg {
    Arg::new("model_path")
        .value_name("MODEL")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Declaration model JSON file, or - for stdin")
}

/// Config file (-c/--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("apiroll.json configuration file")
}

/// Same as `config_arg`, but mandatory.
pub fn required_config_arg() -> Arg {
    config_arg().required(true)
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Fail on any diagnostic, not only errors")
}

/// Release tier of a rollup (-t/--tier).
pub fn tier_arg() -> Arg {
    Arg::new("tier")
        .short('t')
        .long("tier")
        .value_name("TIER")
        .default_value("public")
        .value_parser(|s: &str| s.parse::<ReleaseTag>())
        .help("Lowest release tag kept: public, beta, alpha or internal")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}

/// Drop trimming markers (--omit-trimming-comments).
pub fn omit_trimming_comments_arg() -> Arg {
    Arg::new("omit_trimming_comments")
        .long("omit-trimming-comments")
        .action(ArgAction::SetTrue)
        .help("Leave out the /* Excluded from this release type */ markers")
}

/// Export name ranking (--export-order).
pub fn export_order_arg() -> Arg {
    Arg::new("export_order")
        .long("export-order")
        .value_name("ORDER")
        .value_parser(|s: &str| s.parse::<ExportOrder>())
        .help("Rank export names: alphabetical or first-declared")
}

/// Log verbosity (--log-level).
pub fn log_level_arg() -> Arg {
    Arg::new("log_level")
        .long("log-level")
        .value_name("LEVEL")
        .default_value("warn")
        .global(true)
        .help("Log level (off, error, warn, info, debug, trace)")
}
