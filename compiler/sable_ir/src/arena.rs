//! Arena allocation for the flat AST.
//!
//! - Contiguous storage for all expressions of a module
//! - Child references use `ExprId` indices
//! - Expression lists (call arguments, list literals) use `ExprRange`

use crate::ast::Expr;
use crate::{ExprId, ExprRange};

/// Contiguous storage for all expressions in a module.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,

    /// Flattened expression lists.
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: ~1 expression per 16 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 16;
        ExprArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 4),
        }
    }

    // ===== Expression allocation =====

    /// Allocate expression, return ID.
    ///
    /// # Panics
    /// Panics if the arena holds more than `u32::MAX` expressions.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX entries"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get number of expressions.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ===== Expression list allocation =====

    /// Allocate expression list, return range.
    ///
    /// # Panics
    /// Panics if the list storage exceeds `u32::MAX` entries.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(exprs);
        let to_u32 = |n: usize| {
            u32::try_from(n).unwrap_or_else(|_| panic!("expression list storage exceeded u32::MAX"))
        };
        ExprRange::new(to_u32(start), to_u32(self.expr_lists.len() - start))
    }

    /// Get expression list by range.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }
}
