use serde_json::{Value, json};

use apiroll_core::RawPackage;

use crate::config::ExtractorConfig;
use crate::diagnostics::DiagnosticKind;
use crate::extractor::{ExtractorAnalyzed, ExtractorBuilder};

/// A package named `demo` whose only module, `index`, is the entry point.
pub fn single_module(declarations: Value) -> Value {
    json!({
        "name": "demo",
        "entryPoint": "index",
        "modules": [{ "path": "index.d.ts", "declarations": declarations }]
    })
}

#[track_caller]
pub fn package(model: Value) -> RawPackage {
    serde_json::from_value(model).unwrap()
}

impl ExtractorAnalyzed {
    #[track_caller]
    pub fn expect(model: Value) -> Self {
        Self::expect_with(model, ExtractorConfig::default())
    }

    #[track_caller]
    pub fn expect_with(model: Value, config: ExtractorConfig) -> Self {
        ExtractorBuilder::new(&package(model))
            .config(config)
            .collect()
            .unwrap()
            .resolve()
            .analyze()
    }

    /// Analysis that reported nothing at all.
    #[track_caller]
    pub fn expect_clean(model: Value) -> Self {
        let extractor = Self::expect(model);
        if !extractor.diagnostics().is_empty() {
            panic!(
                "Expected no diagnostics, got:\n{}",
                extractor.diagnostics().render()
            );
        }
        extractor
    }

    /// Diagnostic codes in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.diagnostics().iter().map(|d| d.kind().code()).collect()
    }

    /// Messages of every diagnostic of `kind`.
    pub fn messages(&self, kind: DiagnosticKind) -> Vec<String> {
        self.diagnostics()
            .iter()
            .filter(|d| d.kind() == kind)
            .map(|d| d.message().to_string())
            .collect()
    }

    pub fn dump_diagnostics(&self) -> String {
        self.diagnostics().render()
    }
}
