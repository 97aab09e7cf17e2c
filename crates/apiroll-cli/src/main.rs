mod cli;
mod commands;

use std::str::FromStr;

use log::{LevelFilter, debug};

use cli::{CheckParams, DumpParams, ReportParams, RollupParams, RunParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    let level = matches
        .get_one::<String>("log_level")
        .map(String::as_str)
        .unwrap_or("warn");
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(log_level:?; "logger initialized");

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("rollup", m)) => {
            let params = RollupParams::from_matches(m);
            commands::rollup::run(params.into());
        }
        Some(("report", m)) => {
            let params = ReportParams::from_matches(m);
            commands::report::run(params.into());
        }
        Some(("run", m)) => {
            let params = RunParams::from_matches(m);
            commands::run::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
