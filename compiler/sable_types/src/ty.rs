//! Static types.

use crate::{CompilationContext, EnumId, StructId};

/// The static type of a Sable value.
///
/// Every type except `Struct` occupies exactly one 256-bit word; structs
/// are flattened into consecutive words.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ty {
    Uint256,
    Uint8,
    Bool,
    Address,
    Bytes32,
    /// A value of a declared enum: a bit-mask over its members.
    Enum(EnumId),
    Struct(StructId),
    /// A list literal of enum values; only valid as the right side of `in`.
    List(EnumId),
    /// No value (functions without a return type).
    Unit,
}

impl Ty {
    /// Resolve a builtin type name.
    pub fn builtin(name: &str) -> Option<Ty> {
        match name {
            "uint256" => Some(Ty::Uint256),
            "uint8" => Some(Ty::Uint8),
            "bool" => Some(Ty::Bool),
            "address" => Some(Ty::Address),
            "bytes32" => Some(Ty::Bytes32),
            _ => None,
        }
    }

    /// The enum this is a value of, if any.
    pub fn as_enum(self) -> Option<EnumId> {
        match self {
            Ty::Enum(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Ty::Uint256 | Ty::Uint8)
    }

    /// Number of words a value of this type occupies.
    pub fn width(self, ctx: &CompilationContext) -> u32 {
        ctx.structs.width_of(self)
    }

    /// Source-level spelling, for diagnostics.
    pub fn display(self, ctx: &CompilationContext) -> String {
        match self {
            Ty::Uint256 => "uint256".to_string(),
            Ty::Uint8 => "uint8".to_string(),
            Ty::Bool => "bool".to_string(),
            Ty::Address => "address".to_string(),
            Ty::Bytes32 => "bytes32".to_string(),
            Ty::Enum(id) => ctx.interner.lookup(ctx.enums.get(id).name()).to_string(),
            Ty::Struct(id) => ctx.interner.lookup(ctx.structs.get(id).name).to_string(),
            Ty::List(id) => format!(
                "list of {}",
                ctx.interner.lookup(ctx.enums.get(id).name())
            ),
            Ty::Unit => "no value".to_string(),
        }
    }
}
