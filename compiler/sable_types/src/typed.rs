//! Type checker output.
//!
//! Everything later phases need to know about a checked module, keyed by
//! [`ExprId`] for O(1) access. Nothing here refers back to the AST except
//! through ids.

use rustc_hash::FxHashMap;
use sable_ir::{ExprId, Name};

use crate::{BinaryKind, EnumId, FuncId, Ty};

/// What an expression refers to, beyond its type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Resolution {
    /// Literals, unary operators, and list literals.
    None,
    /// A local variable or parameter, by first frame slot.
    Local { slot: u32 },
    /// A module-level constant, inlined at every use.
    Constant(Name),
    /// `Enum.Member`: a single-bit value.
    EnumMember { enum_id: EnumId, bit: u32 },
    /// `value.field`: word offset of the field inside the struct.
    Field { offset: u32 },
    Binary(BinaryKind),
    Call(FuncId),
    /// Struct literal initializers reordered to declaration order.
    StructLit(Vec<ExprId>),
}

/// Checked facts about one expression.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExprInfo {
    pub ty: Ty,
    pub constant: bool,
    pub resolution: Resolution,
}

impl ExprInfo {
    pub fn static_type(&self) -> Ty {
        self.ty
    }

    /// Whether every leaf of the expression is known at compile time.
    pub fn is_compile_time_constant(&self) -> bool {
        self.constant
    }
}

/// A local variable or parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocalVar {
    pub slot: u32,
    pub ty: Ty,
    pub is_param: bool,
}

/// Frame layout of a checked function.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypedFunction {
    pub locals: FxHashMap<Name, LocalVar>,
    /// Words needed for parameters and locals.
    pub frame_size: u32,
}

/// Type-checked module.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypedModule {
    /// Indexed by `ExprId`; `None` for expressions never checked as values
    /// (e.g. the `Role` in `Role.ADMIN`).
    exprs: Vec<Option<ExprInfo>>,
    /// Indexed by `FuncId`.
    pub functions: Vec<TypedFunction>,
}

impl TypedModule {
    pub(crate) fn with_capacity(expr_count: usize) -> Self {
        TypedModule {
            exprs: vec![None; expr_count],
            functions: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, id: ExprId, info: ExprInfo) {
        if id.index() >= self.exprs.len() {
            self.exprs.resize(id.index() + 1, None);
        }
        self.exprs[id.index()] = Some(info);
    }

    pub fn expr(&self, id: ExprId) -> Option<&ExprInfo> {
        self.exprs.get(id.index()).and_then(Option::as_ref)
    }

    pub fn static_type(&self, id: ExprId) -> Option<Ty> {
        self.expr(id).map(ExprInfo::static_type)
    }

    pub fn is_compile_time_constant(&self, id: ExprId) -> bool {
        self.expr(id).is_some_and(ExprInfo::is_compile_time_constant)
    }

    pub fn function(&self, id: FuncId) -> Option<&TypedFunction> {
        self.functions.get(id.index())
    }
}
