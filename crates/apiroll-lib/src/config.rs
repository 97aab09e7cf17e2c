//! Extractor configuration: the in-memory builder and the JSON config file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use apiroll_core::ReleaseTag;

use crate::api_model::ApiModelOptions;
use crate::diagnostics::{DiagnosticKind, Reporting, ReportingPolicy};
use crate::{Error, Result};

/// How the export names of one entity are ranked.
///
/// The first name in this order is the entity's primary export name; it also
/// orders the `export { X as Y }` lines of a rollup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportOrder {
    /// Ascending by export name.
    #[default]
    Alphabetical,
    /// In the order the entry point declares its exports.
    FirstDeclared,
}

impl FromStr for ExportOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(Self::Alphabetical),
            "first-declared" | "firstDeclared" => Ok(Self::FirstDeclared),
            other => Err(format!(
                "unknown export order '{other}' (expected alphabetical or first-declared)"
            )),
        }
    }
}

/// Line terminator of emitted documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    #[default]
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Convert LF-terminated text.
    pub fn apply(self, text: String) -> String {
        match self {
            Self::Lf => text,
            Self::CrLf => text.replace('\n', "\r\n"),
        }
    }
}

/// Options shared by every stage after collection.
#[derive(Clone, Debug, Default)]
pub struct ExtractorConfig {
    pub(crate) export_order: ExportOrder,
    /// Drop `/* Excluded from this release type */` markers.
    pub(crate) omit_trimming_comments: bool,
    /// Turn any surviving diagnostic into a fatal error.
    pub(crate) strict: bool,
    /// Extra global names that local declarations must not shadow.
    pub(crate) ambient_globals: Vec<String>,
    pub(crate) reporting: ReportingPolicy,
    pub(crate) newline: Newline,
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export_order(mut self, value: ExportOrder) -> Self {
        self.export_order = value;
        self
    }

    pub fn omit_trimming_comments(mut self, value: bool) -> Self {
        self.omit_trimming_comments = value;
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    pub fn ambient_global(mut self, name: impl Into<String>) -> Self {
        self.ambient_globals.push(name.into());
        self
    }

    pub fn reporting(mut self, policy: ReportingPolicy) -> Self {
        self.reporting = policy;
        self
    }

    pub fn newline(mut self, value: Newline) -> Self {
        self.newline = value;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn reporting_policy(&self) -> &ReportingPolicy {
        &self.reporting
    }
}

/// `dtsRollup` section of the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DtsRollupConfig {
    pub enabled: bool,
    pub untrimmed_file_path: Option<PathBuf>,
    pub alpha_trimmed_file_path: Option<PathBuf>,
    pub beta_trimmed_file_path: Option<PathBuf>,
    pub public_trimmed_file_path: Option<PathBuf>,
    pub omit_trimming_comments: bool,
}

/// `apiReport` section of the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiReportConfig {
    pub enabled: bool,
    pub report_folder: Option<PathBuf>,
    /// May contain `<unscopedPackageName>`.
    pub report_file_name: Option<String>,
}

/// `docModel` section of the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocModelConfig {
    pub enabled: bool,
    /// May contain `<unscopedPackageName>`.
    pub api_json_file_path: Option<PathBuf>,
    pub release_tags_to_trim: Vec<ReleaseTag>,
    pub include_forgotten_exports: bool,
}

impl Default for DocModelConfig {
    fn default() -> Self {
        let options = ApiModelOptions::default();
        Self {
            enabled: false,
            api_json_file_path: None,
            release_tags_to_trim: options.release_tags_to_trim,
            include_forgotten_exports: options.include_forgotten_exports,
        }
    }
}

impl DocModelConfig {
    pub fn options(&self) -> ApiModelOptions {
        ApiModelOptions {
            release_tags_to_trim: self.release_tags_to_trim.clone(),
            include_forgotten_exports: self.include_forgotten_exports,
        }
    }
}

const UNSCOPED_PACKAGE_NAME: &str = "<unscopedPackageName>";

/// On-disk configuration, deserialized from JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub dts_rollup: DtsRollupConfig,
    pub api_report: ApiReportConfig,
    pub doc_model: DocModelConfig,
    /// Diagnostic code → reporting override.
    pub messages: IndexMap<String, Reporting>,
    pub export_order: ExportOrder,
    pub strict: bool,
    pub ambient_globals: Vec<String>,
    pub newline_kind: Newline,
}

impl ConfigFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Resolve every relative output path against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |path: &mut Option<PathBuf>| {
            if let Some(p) = path
                && p.is_relative()
            {
                *p = base.join(&*p);
            }
        };
        join(&mut self.dts_rollup.untrimmed_file_path);
        join(&mut self.dts_rollup.alpha_trimmed_file_path);
        join(&mut self.dts_rollup.beta_trimmed_file_path);
        join(&mut self.dts_rollup.public_trimmed_file_path);
        join(&mut self.api_report.report_folder);
        join(&mut self.doc_model.api_json_file_path);
        self
    }

    pub fn to_extractor_config(&self) -> Result<ExtractorConfig> {
        let mut policy = ReportingPolicy::new();
        for (code, reporting) in &self.messages {
            let kind = DiagnosticKind::from_code(code)
                .ok_or_else(|| Error::InvalidConfig(format!("unknown message code `{code}`")))?;
            policy = policy.set(kind, *reporting);
        }

        let mut config = ExtractorConfig::new()
            .export_order(self.export_order)
            .omit_trimming_comments(self.dts_rollup.omit_trimming_comments)
            .strict(self.strict)
            .reporting(policy)
            .newline(self.newline_kind);
        for global in &self.ambient_globals {
            config = config.ambient_global(global.as_str());
        }
        Ok(config)
    }

    /// Rollup outputs to write, untrimmed first.
    pub fn rollup_targets(&self) -> Vec<(ReleaseTag, PathBuf)> {
        if !self.dts_rollup.enabled {
            return Vec::new();
        }
        let rollup = &self.dts_rollup;
        [
            (ReleaseTag::Internal, &rollup.untrimmed_file_path),
            (ReleaseTag::Alpha, &rollup.alpha_trimmed_file_path),
            (ReleaseTag::Beta, &rollup.beta_trimmed_file_path),
            (ReleaseTag::Public, &rollup.public_trimmed_file_path),
        ]
        .into_iter()
        .filter_map(|(tier, path)| Some((tier, path.clone()?)))
        .collect()
    }

    /// Where the API report for `package` goes, if enabled.
    pub fn report_path(&self, package: &str) -> Option<PathBuf> {
        if !self.api_report.enabled {
            return None;
        }
        let unscoped = unscoped_name(package);
        let file_name = match &self.api_report.report_file_name {
            Some(name) => name.replace(UNSCOPED_PACKAGE_NAME, unscoped),
            None => format!("{unscoped}.api.md"),
        };
        let folder = self
            .api_report
            .report_folder
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Some(folder.join(file_name))
    }

    /// Where the doc model for `package` goes, if enabled.
    pub fn doc_model_path(&self, package: &str) -> Option<PathBuf> {
        if !self.doc_model.enabled {
            return None;
        }
        let unscoped = unscoped_name(package);
        let path = match &self.doc_model.api_json_file_path {
            Some(path) => {
                let path = path.to_string_lossy().replace(UNSCOPED_PACKAGE_NAME, unscoped);
                PathBuf::from(path)
            }
            None => PathBuf::from(format!("{unscoped}.api.json")),
        };
        Some(path)
    }
}

/// `@scope/demo` → `demo`.
fn unscoped_name(package: &str) -> &str {
    package.rsplit('/').next().unwrap_or(package)
}
