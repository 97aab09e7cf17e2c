//! Staged facade over the pipeline.
//!
//! `ExtractorBuilder` → `ExtractorCollected` → `ExtractorResolved` →
//! `ExtractorAnalyzed`. Each stage owns the previous stage's output; the last
//! one is frozen and renders any number of rollups.

use indexmap::IndexMap;
use log::info;

use apiroll_core::{Colors, RawPackage, ReleaseTag, parse_package};

use crate::api_model::{self, ApiModel, ApiModelOptions};
use crate::collect::{SymbolTable, collect};
use crate::config::ExtractorConfig;
use crate::diagnostics::Diagnostics;
use crate::release::{ReleaseInfo, propagate};
use crate::resolve::{Resolution, resolve};
use crate::{Error, Result, dump, report, rollup};

pub struct ExtractorBuilder<'p> {
    package: &'p RawPackage,
    config: ExtractorConfig,
}

impl<'p> ExtractorBuilder<'p> {
    pub fn new(package: &'p RawPackage) -> Self {
        Self {
            package,
            config: ExtractorConfig::default(),
        }
    }

    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn collect(self) -> Result<ExtractorCollected> {
        let (table, diag) = collect(self.package)?;
        Ok(ExtractorCollected {
            table,
            config: self.config,
            diag,
        })
    }
}

#[derive(Debug)]
pub struct ExtractorCollected {
    table: SymbolTable,
    config: ExtractorConfig,
    diag: Diagnostics,
}

impl ExtractorCollected {
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diag.clone()
    }

    pub fn resolve(mut self) -> ExtractorResolved {
        let resolution = resolve(&self.table, &self.config, &mut self.diag);
        ExtractorResolved {
            collected: self,
            resolution,
        }
    }
}

#[derive(Debug)]
pub struct ExtractorResolved {
    collected: ExtractorCollected,
    resolution: Resolution,
}

impl ExtractorResolved {
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.collected.table
    }

    pub fn analyze(mut self) -> ExtractorAnalyzed {
        let release = propagate(
            &self.collected.table,
            &self.resolution,
            &mut self.collected.diag,
        );
        ExtractorAnalyzed {
            resolved: self,
            release,
        }
    }
}

pub type Extractor = ExtractorAnalyzed;

/// References into a frozen analysis, shared by the emitters.
#[derive(Clone, Copy)]
pub struct ExtractorContext<'a> {
    pub table: &'a SymbolTable,
    pub resolution: &'a Resolution,
    pub release: &'a ReleaseInfo,
    pub config: &'a ExtractorConfig,
}

#[derive(Debug)]
pub struct ExtractorAnalyzed {
    resolved: ExtractorResolved,
    release: ReleaseInfo,
}

impl ExtractorAnalyzed {
    /// Run the whole pipeline with default configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let package = parse_package(json).map_err(|e| Error::InvalidModel(e.to_string()))?;
        Self::from_package(&package, ExtractorConfig::default())
    }

    pub fn from_package(package: &RawPackage, config: ExtractorConfig) -> Result<Self> {
        let analyzed = ExtractorBuilder::new(package)
            .config(config)
            .collect()?
            .resolve()
            .analyze();
        let diag = analyzed.diagnostics();
        info!(
            package = package.name.as_str(),
            errors = diag.error_count(),
            warnings = diag.warning_count();
            "analysis finished"
        );
        Ok(analyzed)
    }

    pub fn context(&self) -> ExtractorContext<'_> {
        ExtractorContext {
            table: &self.resolved.collected.table,
            resolution: &self.resolved.resolution,
            release: &self.release,
            config: &self.resolved.collected.config,
        }
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.resolved.collected.table
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolved.resolution
    }

    pub fn release_info(&self) -> &ReleaseInfo {
        &self.release
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.resolved.collected.config
    }

    /// Every diagnostic, as reported by the stages.
    pub fn raw_diagnostics(&self) -> &Diagnostics {
        &self.resolved.collected.diag
    }

    /// Diagnostics after the configured reporting policy.
    pub fn diagnostics(&self) -> Diagnostics {
        self.raw_diagnostics()
            .apply_policy(self.config().reporting_policy())
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics().has_errors()
    }

    /// In strict mode any diagnostic that survives the policy is fatal.
    pub fn check_strict(&self) -> Result<()> {
        let diag = self.diagnostics();
        if self.config().is_strict() && !diag.is_empty() {
            return Err(Error::StrictModeViolation(diag));
        }
        Ok(())
    }

    pub fn sources(&self) -> IndexMap<String, String> {
        self.symbol_table().sources()
    }

    pub fn rollup(&self, tier: ReleaseTag) -> String {
        rollup::emit_rollup(self.context(), tier)
    }

    /// Emitted names of the entities a rollup for `tier` contains, sorted.
    pub fn included_entities(&self, tier: ReleaseTag) -> Vec<&str> {
        let included = rollup::included_entities(self.context(), tier);
        let mut names: Vec<&str> = self
            .resolution()
            .entities()
            .filter(|(id, _)| included[id.index()])
            .map(|(_, entity)| entity.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn report(&self) -> String {
        report::emit_report(self.context(), &self.diagnostics())
    }

    pub fn api_model(&self, options: &ApiModelOptions) -> ApiModel {
        api_model::build_api_model(self.context(), options)
    }

    /// The doc model as pretty JSON, with the configured newlines.
    pub fn api_json(&self, options: &ApiModelOptions) -> Result<String> {
        let mut json = self.api_model(options).to_json()?;
        json.push('\n');
        Ok(self.config().newline.apply(json))
    }

    pub fn dump(&self, colors: Colors) -> String {
        dump::dump(self.context(), colors)
    }
}
