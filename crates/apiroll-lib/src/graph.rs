//! Arena-backed nodes shared by every pipeline stage.
//!
//! All cross references are typed indices into the arenas owned by
//! [`SymbolTable`](crate::collect::SymbolTable); nothing is reference counted and
//! nothing is copied when two export names alias the same symbol.

use indexmap::IndexMap;

use apiroll_core::{DeclarationKind, Modifier, Name, RawLocation};

use crate::doc::DocComment;

macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(u32);

            impl $name {
                #[inline]
                pub fn from_raw(index: u32) -> Self {
                    Self(index)
                }

                #[inline]
                pub fn as_u32(self) -> u32 {
                    self.0
                }

                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

define_id!(
    /// Index of a module in the symbol table.
    ModuleId,
    /// Index of a single declaration (one overload, one merged namespace block).
    DeclId,
    /// Index of a canonical symbol: all declarations sharing one name in one scope.
    SymbolId,
    /// Index of an export or import edge.
    EdgeId,
    /// Index of an interned external binding.
    ExternalId,
    /// Index of a rollup entity.
    EntityId,
);

#[derive(Debug, Clone)]
pub struct Module {
    pub path: String,
    pub source: Option<String>,
    /// Module-scope symbols by local name.
    pub locals: IndexMap<Name, SymbolId>,
    /// Top-level declarations in source order.
    pub declarations: Vec<DeclId>,
    pub imports: Vec<ImportSpec>,
    pub exports: Vec<ExportSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpec {
    Named {
        local: Name,
        imported: Name,
        specifier: String,
    },
    Namespace {
        local: Name,
        specifier: String,
    },
}

impl ImportSpec {
    pub fn local(&self) -> Name {
        match self {
            Self::Named { local, .. } | Self::Namespace { local, .. } => *local,
        }
    }

    pub fn specifier(&self) -> &str {
        match self {
            Self::Named { specifier, .. } | Self::Namespace { specifier, .. } => specifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSpec {
    /// Local binding exported under `name`; inline `export` keywords land here too.
    Named { name: Name, local: Name },
    Reexport {
        name: Name,
        imported: Name,
        specifier: String,
    },
    Star { specifier: String },
    Namespace { name: Name, specifier: String },
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: Name,
    /// The name was synthesized for an anonymous declaration.
    pub synthesized: bool,
    pub text: String,
    pub raw_doc: Option<String>,
    pub doc: DocComment,
    pub modifiers: Vec<Modifier>,
    pub references: Vec<Reference>,
    pub members: Vec<DeclId>,
    pub parent: Option<DeclId>,
    pub symbol: SymbolId,
    pub module: ModuleId,
    pub location: Option<RawLocation>,
    /// Carries its own `export` keyword (meaningful for namespace members).
    pub exported: bool,
}

impl Declaration {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: Name,
    /// Kind of the first declaration.
    pub kind: DeclarationKind,
    pub module: ModuleId,
    /// Enclosing container symbol for members.
    pub parent: Option<SymbolId>,
    pub declarations: Vec<DeclId>,
    /// Members merged across every declaration of this symbol.
    pub members: IndexMap<Name, SymbolId>,
}

/// An identifier mentioned by a declaration header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub root: Name,
    /// Qualifier path after the root (`Ns.Inner.Leaf` → `[Inner, Leaf]`).
    pub rest: Vec<Name>,
    pub is_typeof: bool,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PackageInfo {
    pub name: String,
    pub doc: Option<String>,
    pub type_references: Vec<String>,
    pub lib_references: Vec<String>,
}
