//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use apiroll_core::ReleaseTag;
use apiroll_lib::ExportOrder;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::report::ReportArgs;
use crate::commands::rollup::RollupArgs;
use crate::commands::run::RunArgs;

pub struct CheckParams {
    pub model_path: PathBuf,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            config: m.get_one::<PathBuf>("config").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            model_path: p.model_path,
            config: p.config,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct RollupParams {
    pub model_path: PathBuf,
    pub tier: ReleaseTag,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub omit_trimming_comments: bool,
    pub export_order: Option<ExportOrder>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl RollupParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            tier: m
                .get_one::<ReleaseTag>("tier")
                .copied()
                .unwrap_or(ReleaseTag::Public),
            output: m.get_one::<PathBuf>("output").cloned(),
            config: m.get_one::<PathBuf>("config").cloned(),
            omit_trimming_comments: m.get_flag("omit_trimming_comments"),
            export_order: m.get_one::<ExportOrder>("export_order").copied(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<RollupParams> for RollupArgs {
    fn from(p: RollupParams) -> Self {
        Self {
            model_path: p.model_path,
            tier: p.tier,
            output: p.output,
            config: p.config,
            omit_trimming_comments: p.omit_trimming_comments,
            export_order: p.export_order,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ReportParams {
    pub model_path: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl ReportParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            config: m.get_one::<PathBuf>("config").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<ReportParams> for ReportArgs {
    fn from(p: ReportParams) -> Self {
        Self {
            model_path: p.model_path,
            output: p.output,
            config: p.config,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct RunParams {
    pub model_path: PathBuf,
    pub config: PathBuf,
    pub strict: bool,
    pub color: ColorChoice,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            // Required by clap.
            config: m.get_one::<PathBuf>("config").cloned().unwrap_or_default(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            model_path: p.model_path,
            config: p.config,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub model_path: PathBuf,
    pub config: Option<PathBuf>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            model_path: model_path(m),
            config: m.get_one::<PathBuf>("config").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            model_path: p.model_path,
            config: p.config,
            color: p.color.should_colorize(),
        }
    }
}

fn model_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("model_path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
