//! Enum Type Registry.
//!
//! Finalized [`EnumType`]s by name. Populated during the declarations pass,
//! only after the [`NamespaceRegistry`](crate::NamespaceRegistry) accepted
//! the name, and read-only afterward.

use rustc_hash::FxHashMap;
use sable_ir::Name;

use crate::{EnumId, EnumType};

#[derive(Clone, Debug, Default)]
pub struct EnumRegistry {
    enums: Vec<EnumType>,
    by_name: FxHashMap<Name, EnumId>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next registered enum will receive.
    pub fn next_id(&self) -> EnumId {
        EnumId::new(u32::try_from(self.enums.len()).unwrap_or(u32::MAX))
    }

    /// Register a finalized enum and return its id.
    ///
    /// The name must already have been accepted by the namespace registry,
    /// so it is never present here.
    pub fn register(&mut self, ty: EnumType) -> EnumId {
        debug_assert!(
            !self.by_name.contains_key(&ty.name()),
            "enum registered twice; namespace check skipped"
        );
        let id = self.next_id();
        tracing::debug!(name = ?ty.name(), members = ty.len(), ?id, "registered enum");
        self.by_name.insert(ty.name(), id);
        self.enums.push(ty);
        id
    }

    /// Look up an enum by name.
    pub fn resolve(&self, name: Name) -> Option<&EnumType> {
        self.resolve_id(name).map(|id| self.get(id))
    }

    pub fn resolve_id(&self, name: Name) -> Option<EnumId> {
        self.by_name.get(&name).copied()
    }

    /// Get an enum by id. Ids are only minted by [`register`](Self::register).
    pub fn get(&self, id: EnumId) -> &EnumType {
        &self.enums[id.index()]
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }

    /// Enums in declaration order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EnumId, &EnumType)> {
        self.enums.iter().enumerate().map(|(i, ty)| {
            (EnumId::new(u32::try_from(i).unwrap_or(u32::MAX)), ty)
        })
    }
}

#[cfg(test)]
mod tests;
