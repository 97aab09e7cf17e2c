#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for apiroll.
//!
//! Two layers:
//! - **Deserialization layer** (`model`): 1:1 mapping to the declaration model JSON
//!   produced by a compiler front-end
//! - **Shared vocabulary**: release tags, interned names, terminal colors

pub mod colors;
pub mod interner;
pub mod model;
pub mod release_tag;
pub mod utils;

pub use colors::Colors;
pub use interner::{Interner, Name};
pub use model::{
    DeclarationKind, Modifier, RawDeclaration, RawExport, RawImport, RawLocation, RawModule,
    RawPackage, parse_package,
};
pub use release_tag::ReleaseTag;

#[cfg(test)]
mod interner_tests;
#[cfg(test)]
mod release_tag_tests;
