//! String interning for identifier names.
//!
//! Converts heap-allocated names into cheap integer handles (`Name`).
//! Scope tables key on `Name`, so lookups compare integers instead of strings.

use std::collections::HashMap;

/// A lightweight handle to an interned identifier.
///
/// Names are ordered by insertion order, not lexicographically.
/// Use `Interner::resolve` when string ordering matters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Name(u32);

impl Name {
    /// Raw index for debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier interner. Deduplicates strings and returns cheap `Name` handles.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: HashMap<String, Name>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing handle when already present.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }

        let name = Name(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), name);
        name
    }

    /// Look up a string without interning it.
    ///
    /// A string that was never interned cannot name anything in a scope table.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Name> {
        self.map.get(s).copied()
    }

    /// Resolve a handle back to its string.
    ///
    /// # Panics
    /// Panics if the handle was not created by this interner.
    #[inline]
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
