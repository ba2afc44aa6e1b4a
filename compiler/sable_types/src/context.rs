//! Per-compilation state.

use rustc_hash::FxHashMap;
use sable_ir::{Name, StringInterner};

use crate::{
    ConstantDef, EnumRegistry, EventDef, FuncId, FunctionSig, InterfaceDef, NamespaceRegistry,
    StructRegistry,
};

/// Everything the declarations pass learns about a compilation unit.
///
/// Created once per `compile` call and dropped with it; nothing is shared
/// between compilations. Immutable after the declarations pass.
#[derive(Debug, Default)]
pub struct CompilationContext {
    pub interner: StringInterner,
    pub namespace: NamespaceRegistry,
    pub enums: EnumRegistry,
    pub structs: StructRegistry,
    functions: Vec<FunctionSig>,
    function_ids: FxHashMap<Name, FuncId>,
    constants: FxHashMap<Name, ConstantDef>,
    pub events: Vec<EventDef>,
    pub interfaces: Vec<InterfaceDef>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_function(&mut self, sig: FunctionSig) -> FuncId {
        let id = FuncId::new(u32::try_from(self.functions.len()).unwrap_or(u32::MAX));
        self.function_ids.insert(sig.name, id);
        self.functions.push(sig);
        id
    }

    pub fn function(&self, id: FuncId) -> &FunctionSig {
        &self.functions[id.index()]
    }

    pub fn resolve_function(&self, name: Name) -> Option<FuncId> {
        self.function_ids.get(&name).copied()
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = (FuncId, &FunctionSig)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, sig)| (FuncId::new(u32::try_from(i).unwrap_or(u32::MAX)), sig))
    }

    pub(crate) fn add_constant(&mut self, def: ConstantDef) {
        self.constants.insert(def.name, def);
    }

    pub fn constant(&self, name: Name) -> Option<&ConstantDef> {
        self.constants.get(&name)
    }

    /// Resolve a name to its string form.
    pub fn name_str(&self, name: Name) -> std::sync::Arc<str> {
        self.interner.lookup(name)
    }
}
