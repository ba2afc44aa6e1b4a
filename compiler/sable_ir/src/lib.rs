//! Sable IR - Intermediate Representation Types
//!
//! This crate contains the core data structures shared by every phase of the
//! Sable compiler:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `Word`, the 256-bit unsigned machine word every value lowers to
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (declarations, statements, expressions)
//! - Arena allocation for expressions
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Closed Variants**: every node kind is a variant of one enum, so each
//!   pass matches exhaustively and cannot silently skip a shape

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
mod span;
mod token;
mod word;

pub use arena::ExprArena;
pub use ast::{
    BinaryOp, ConstantDecl, Decorator, EnumDecl, EnumMember, EventDecl, Expr, ExprKind,
    FieldDecl, FieldInit, FunctionDecl, InterfaceDecl, InterfaceMethod, Item, Module, Mutability,
    Param, Stmt, StmtKind, StructDecl, TypeExpr, UnaryOp, Visibility,
};
pub use expr_id::{ExprId, ExprRange};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use word::{Word, WORD_BITS};
