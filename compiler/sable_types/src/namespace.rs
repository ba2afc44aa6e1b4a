//! Namespace Registry.
//!
//! One table per compilation holding every top-level name. A name may be
//! declared once across all kinds: an enum cannot share a name with an
//! event, a struct, a function, or another enum.

use std::fmt;

use rustc_hash::FxHashMap;
use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{Name, Span, StringInterner};

use crate::Ty;

/// Kind of a top-level declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Enum,
    Struct,
    Event,
    Interface,
    Function,
    Constant,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Enum => "enum",
            SymbolKind::Struct => "struct",
            SymbolKind::Event => "event",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
        }
    }

    /// Whether the name denotes a type usable in annotations.
    pub fn is_type(self) -> bool {
        matches!(self, SymbolKind::Enum | SymbolKind::Struct)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared top-level name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamespaceEntry {
    pub name: Name,
    pub kind: SymbolKind,
    /// The type the name denotes (for enums and structs) or holds (for
    /// constants). `None` for events, interfaces, and functions.
    pub ty: Option<Ty>,
    pub span: Span,
}

/// A name was declared twice.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{kind} name is already declared as {}", .existing.kind)]
pub struct NamespaceCollision {
    pub name: Name,
    pub kind: SymbolKind,
    pub span: Span,
    pub existing: NamespaceEntry,
}

impl NamespaceCollision {
    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        let name = interner.lookup(self.name);
        let mut diag = Diagnostic::error(ErrorCode::E2006)
            .with_message(format!(
                "`{name}` is already declared as {} {}",
                article(self.existing.kind),
                self.existing.kind
            ))
            .with_label(self.span, format!("{} `{name}` redeclared here", self.kind));
        if self.existing.span != Span::DUMMY {
            diag = diag.with_secondary_label(self.existing.span, "first declared here");
        }
        diag
    }
}

pub(crate) fn article(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Enum | SymbolKind::Event | SymbolKind::Interface => "an",
        SymbolKind::Struct | SymbolKind::Function | SymbolKind::Constant => "a",
    }
}

/// Registry of every top-level name in a compilation unit.
///
/// Lookup is O(1); declaration order is kept for deterministic iteration.
#[derive(Clone, Debug, Default)]
pub struct NamespaceRegistry {
    by_name: FxHashMap<Name, usize>,
    entries: Vec<NamespaceEntry>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a name. Fails if the name exists under any kind.
    pub fn declare(
        &mut self,
        name: Name,
        kind: SymbolKind,
        ty: Option<Ty>,
        span: Span,
    ) -> Result<(), NamespaceCollision> {
        if let Some(existing) = self.get(name) {
            return Err(NamespaceCollision {
                name,
                kind,
                span,
                existing: *existing,
            });
        }
        self.by_name.insert(name, self.entries.len());
        self.entries.push(NamespaceEntry {
            name,
            kind,
            ty,
            span,
        });
        tracing::debug!(?name, %kind, "declared");
        Ok(())
    }

    /// Record the type of an already declared name.
    pub(crate) fn set_type(&mut self, name: Name, ty: Ty) {
        if let Some(&index) = self.by_name.get(&name) {
            self.entries[index].ty = Some(ty);
        }
    }

    pub fn get(&self, name: Name) -> Option<&NamespaceEntry> {
        self.by_name.get(&name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: Name) -> bool {
        self.by_name.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &NamespaceEntry> {
        self.entries.iter()
    }
}
