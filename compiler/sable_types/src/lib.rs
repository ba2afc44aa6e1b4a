//! Sable semantic analysis.
//!
//! - [`EnumType::build`]: the Member Set Builder
//! - [`NamespaceRegistry`]: every top-level name, unique across kinds
//! - [`EnumRegistry`]: finalized enums by name
//! - [`resolve_binary`] / [`resolve_unary`]: the Operator Resolver
//! - [`collect_declarations`]: the declarations pass
//! - [`check_module`]: the body checker, producing a [`TypedModule`]
//!
//! All state for one compilation lives in a [`CompilationContext`].

mod check;
mod context;
mod declarations;
mod enum_registry;
mod enum_type;
mod items;
mod namespace;
mod operators;
mod ty;
mod typed;

#[cfg(test)]
mod test_helpers;

pub use check::check_module;
pub use context::CompilationContext;
pub use declarations::collect_declarations;
pub use enum_registry::EnumRegistry;
pub use enum_type::{EnumDeclarationError, EnumId, EnumType, MAX_ENUM_MEMBERS};
pub use items::{
    ConstantDef, EventDef, FieldDef, FuncId, FunctionSig, InterfaceDef, MethodSig, StructDef,
    StructId, StructRegistry,
};
pub use namespace::{NamespaceCollision, NamespaceEntry, NamespaceRegistry, SymbolKind};
pub use operators::{
    resolve_binary, resolve_unary, ArithOp, BinaryKind, BinaryResolution, CmpOp, LogicOp,
    Operand, OperatorError, Side,
};
pub use ty::Ty;
pub use typed::{ExprInfo, LocalVar, Resolution, TypedFunction, TypedModule};
