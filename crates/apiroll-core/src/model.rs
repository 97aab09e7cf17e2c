//! Declaration model consumed by the extractor.
//!
//! A compiler front-end lowers a package's `.d.ts` output into this shape: modules
//! with their import/export statements and a tree of declaration headers. Bodies are
//! never part of the model; containers list their members instead.

use serde::{Deserialize, Serialize};

/// Root of the declaration model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackage {
    pub name: String,
    /// Module path of the package entry point.
    pub entry_point: String,
    /// Package-level header block (`/** ... @packageDocumentation */`).
    #[serde(default)]
    pub doc: Option<String>,
    /// `/// <reference types="..." />` directives.
    #[serde(default)]
    pub type_references: Vec<String>,
    /// `/// <reference lib="..." />` directives.
    #[serde(default)]
    pub lib_references: Vec<String>,
    #[serde(default)]
    pub modules: Vec<RawModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModule {
    pub path: String,
    /// Original text, used only to render diagnostic snippets.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub imports: Vec<RawImport>,
    #[serde(default)]
    pub exports: Vec<RawExport>,
    #[serde(default)]
    pub declarations: Vec<RawDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawImport {
    /// `import { name as local } from "from"`; a default import uses `name = "default"`.
    Named {
        local: String,
        name: String,
        from: String,
    },
    /// `import * as local from "from"`
    Namespace { local: String, from: String },
}

impl RawImport {
    pub fn local(&self) -> &str {
        match self {
            Self::Named { local, .. } | Self::Namespace { local, .. } => local,
        }
    }

    pub fn specifier(&self) -> &str {
        match self {
            Self::Named { from, .. } | Self::Namespace { from, .. } => from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawExport {
    /// `export { local as name }`
    Named { name: String, local: String },
    /// `export { imported as name } from "from"`
    Reexport {
        name: String,
        imported: String,
        from: String,
    },
    /// `export * from "from"`
    Star { from: String },
    /// `export * as name from "from"`
    Namespace { name: String, from: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeclaration {
    pub kind: DeclarationKind,
    #[serde(default)]
    pub name: Option<String>,
    /// Declaration header without body and without `export`/`declare`/modifier keywords.
    pub text: String,
    /// Raw `/** ... */` block attached to the declaration.
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub exported: bool,
    #[serde(default, rename = "default")]
    pub default_export: bool,
    /// Identifiers mentioned by the header: `Foo`, `Ns.Foo` or `typeof foo`.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub members: Vec<RawDeclaration>,
    #[serde(default)]
    pub location: Option<RawLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    /// 1-based.
    pub line: u32,
    /// 1-based.
    pub column: u32,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub end: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Class,
    Interface,
    Function,
    Enum,
    Namespace,
    Variable,
    TypeAlias,
    Method,
    Property,
    Constructor,
    GetAccessor,
    SetAccessor,
    EnumMember,
    CallSignature,
    ConstructSignature,
    IndexSignature,
}

impl DeclarationKind {
    /// Kinds that may appear at module scope or directly inside a namespace.
    pub fn is_top_level(self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Interface
                | Self::Function
                | Self::Enum
                | Self::Namespace
                | Self::Variable
                | Self::TypeAlias
        )
    }

    /// Kinds that render a `{ ... }` body listing their members.
    pub fn has_body(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Enum | Self::Namespace
        )
    }

    /// Kinds whose declarations overload rather than conflict when repeated.
    pub fn is_overloadable(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::Constructor
                | Self::CallSignature
                | Self::ConstructSignature
                | Self::IndexSignature
        )
    }

    /// Name assigned to member kinds that never carry one.
    pub fn implicit_name(self) -> Option<&'static str> {
        match self {
            Self::Constructor => Some("(constructor)"),
            Self::CallSignature => Some("(call)"),
            Self::ConstructSignature => Some("(new)"),
            Self::IndexSignature => Some("(index)"),
            _ => None,
        }
    }

    /// Keyword that introduces the declaration text, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Class => Some("class"),
            Self::Interface => Some("interface"),
            Self::Function => Some("function"),
            Self::Enum => Some("enum"),
            Self::Namespace => Some("namespace"),
            Self::TypeAlias => Some("type"),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Variable => "variable",
            Self::TypeAlias => "type alias",
            Self::Method => "method",
            Self::Property => "property",
            Self::Constructor => "constructor",
            Self::GetAccessor => "get accessor",
            Self::SetAccessor => "set accessor",
            Self::EnumMember => "enum member",
            Self::CallSignature => "call signature",
            Self::ConstructSignature => "construct signature",
            Self::IndexSignature => "index signature",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Private,
    Protected,
    Static,
    Abstract,
    Readonly,
    Override,
}

impl Modifier {
    /// Keyword as written in a declaration, in canonical emission order.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::Override => "override",
            Self::Readonly => "readonly",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Private | Self::Protected => 0,
            Self::Static => 1,
            Self::Abstract => 2,
            Self::Override => 3,
            Self::Readonly => 4,
        }
    }

    /// Sorts modifiers into TypeScript's accepted keyword order.
    pub fn canonical_order(modifiers: &[Modifier]) -> Vec<Modifier> {
        let mut sorted = modifiers.to_vec();
        sorted.sort_by_key(|m| m.rank());
        sorted.dedup();
        sorted
    }
}

/// Parse a declaration model from JSON.
pub fn parse_package(json: &str) -> Result<RawPackage, serde_json::Error> {
    serde_json::from_str(json)
}
