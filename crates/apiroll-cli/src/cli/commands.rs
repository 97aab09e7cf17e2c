//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("apiroll")
        .about("Public API reports and trimmed declaration rollups")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(log_level_arg())
        .subcommand(check_command())
        .subcommand(rollup_command())
        .subcommand(report_command())
        .subcommand(run_command())
        .subcommand(dump_command())
}

/// Analyze a model and print its diagnostics.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Analyze a declaration model and report problems")
        .after_help(
            r#"EXAMPLES:
  apiroll check model.json                  # errors fail, warnings print
  apiroll check model.json --strict         # any diagnostic fails
  apiroll check model.json -c apiroll.json  # message levels from config"#,
        )
        .arg(model_path_arg())
        .arg(config_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Emit one declaration rollup.
pub fn rollup_command() -> Command {
    Command::new("rollup")
        .about("Emit a single-file declaration rollup for one release tier")
        .after_help(
            r#"EXAMPLES:
  apiroll rollup model.json                      # public rollup to stdout
  apiroll rollup model.json -t beta -o beta.d.ts # beta rollup to a file
  apiroll rollup model.json --export-order first-declared"#,
        )
        .arg(model_path_arg())
        .arg(tier_arg())
        .arg(output_file_arg())
        .arg(config_arg())
        .arg(omit_trimming_comments_arg())
        .arg(export_order_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Emit the API report.
pub fn report_command() -> Command {
    Command::new("report")
        .about("Emit the API report of the whole package")
        .arg(model_path_arg())
        .arg(output_file_arg())
        .arg(config_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Write every configured output.
pub fn run_command() -> Command {
    Command::new("run")
        .about("Write every rollup, report and doc model the config file enables")
        .after_help(
            r#"EXAMPLES:
  apiroll run model.json -c apiroll.json"#,
        )
        .arg(model_path_arg())
        .arg(required_config_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Show the resolved graph.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show modules, export edges and entities after resolution")
        .arg(model_path_arg())
        .arg(config_arg())
        .arg(color_arg())
}
