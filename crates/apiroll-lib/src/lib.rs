//! apiroll: public API surface extraction for compiled type declarations.
//!
//! The pipeline runs four stages over an in-memory declaration model:
//! collect → resolve → release → rollup. Each stage returns its output together
//! with the non-fatal diagnostics it found.
//!
//! # Example
//!
//! ```
//! use apiroll_core::ReleaseTag;
//! use apiroll_lib::Extractor;
//!
//! let model = r#"{
//!     "name": "demo",
//!     "entryPoint": "index",
//!     "modules": [{
//!         "path": "index.d.ts",
//!         "declarations": [{
//!             "kind": "class",
//!             "name": "Widget",
//!             "text": "class Widget",
//!             "doc": "/** A widget on screen. @public */",
//!             "exported": true
//!         }]
//!     }]
//! }"#;
//!
//! let extractor = Extractor::from_json(model).expect("valid model");
//! let rollup = extractor.rollup(ReleaseTag::Public);
//! assert!(rollup.contains("export declare class Widget"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api_model;
pub mod collect;
pub mod config;
pub mod diagnostics;
pub mod doc;
pub mod dump;
pub mod extractor;
pub mod graph;
pub mod release;
pub mod report;
pub mod resolve;
pub mod rollup;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod extractor_tests;
#[cfg(test)]
pub(crate) mod test_utils;

/// Result type for pipeline stages that produce both output and diagnostics.
///
/// Each stage returns its typed output alongside any diagnostics it collected.
/// Malformed input uses the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use api_model::{ApiItem, ApiItemKind, ApiModel, ApiModelOptions};
pub use config::{ConfigFile, DocModelConfig, ExportOrder, ExtractorConfig, Newline};
pub use diagnostics::{
    Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Reporting, ReportingPolicy,
    Severity,
};
pub use extractor::{
    Extractor, ExtractorAnalyzed, ExtractorBuilder, ExtractorCollected, ExtractorContext,
    ExtractorResolved,
};

/// Errors that stop the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The declaration model JSON does not match the expected shape.
    #[error("invalid declaration model: {0}")]
    InvalidModel(String),

    #[error("malformed declaration at {location}: {reason}")]
    MalformedDeclaration { location: String, reason: String },

    #[error("module `{0}` appears more than once")]
    DuplicateModule(String),

    #[error("entry point `{0}` is not one of the package modules")]
    MissingEntryPoint(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot serialize doc model: {0}")]
    DocModel(String),

    /// Strict mode is on and diagnostics survived the reporting policy.
    #[error(
        "analysis failed in strict mode with {} errors and {} warnings",
        .0.error_count(),
        .0.warning_count()
    )]
    StrictModeViolation(Diagnostics),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
