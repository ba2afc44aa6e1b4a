//! String interner for identifiers.
//!
//! One interner is owned by each compilation; nothing is shared across
//! compilation units.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default, Debug)]
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<Arc<str>, Name>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<Arc<str>>,
}

/// String interner with interior mutability.
///
/// The lexer interns through a shared reference while later phases look
/// names up, so the table sits behind a `RwLock`.
#[derive(Debug)]
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as
    /// [`Name::EMPTY`].
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(InternTable::default()),
        };
        interner.intern("");
        interner
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.table.read().map.get(s) {
            return name;
        }

        let mut table = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&name) = table.map.get(s) {
            return name;
        }

        let raw = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        let name = Name::from_raw(raw);
        let stored: Arc<str> = Arc::from(s);
        table.strings.push(Arc::clone(&stored));
        table.map.insert(stored, name);
        name
    }

    /// Look up the string for a Name.
    ///
    /// Returns the empty string for names not produced by this interner.
    pub fn lookup(&self, name: Name) -> Arc<str> {
        self.table
            .read()
            .strings
            .get(name.index())
            .map_or_else(|| Arc::from(""), Arc::clone)
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied()
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
