pub mod check;
pub mod dump;
pub mod loader;
pub mod report;
pub mod rollup;
pub mod run;

#[cfg(test)]
mod check_tests;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

/// Failures that end a command with exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid declaration model in '{}': {source}", path.display())]
    Model {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Extract(#[from] apiroll_lib::Error),

    #[error("analysis failed with {0} errors")]
    Failed(usize),

    #[error("the config file enables no outputs")]
    NothingToDo,
}

/// Print `err` and exit with status 1.
pub fn exit_with(err: CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
