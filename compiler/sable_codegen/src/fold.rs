//! Constant Folder.
//!
//! Evaluates compile-time constant expressions to a single word. Every
//! operation here matches the instruction sequence [`lower`](crate::lower)
//! would emit for the same expression, bit for bit; [`apply_binary`] and
//! [`apply_unary`] are that shared meaning.

use sable_ir::{ExprId, ExprKind, Module, UnaryOp, Word};
use sable_types::{
    ArithOp, BinaryKind, CmpOp, CompilationContext, LogicOp, Resolution, Ty, TypedModule,
};

/// Keep the low byte of a `uint8` result.
pub(crate) fn truncate(ty: Ty, word: Word) -> Word {
    if ty == Ty::Uint8 {
        &word & &Word::from_u64(0xff)
    } else {
        word
    }
}

/// Result of a resolved binary operator on two words, or `None` where the
/// machine would fault (division by zero).
pub fn apply_binary(kind: BinaryKind, ty: Ty, a: &Word, b: &Word) -> Option<Word> {
    let word = match kind {
        BinaryKind::EnumUnion => a | b,
        BinaryKind::EnumEq => Word::from_bool((a ^ b).is_zero()),
        BinaryKind::EnumContains => Word::from_bool(&(a & b) == a),
        BinaryKind::EnumContainsAny => Word::from_bool(a == b),
        BinaryKind::Arith(op) => {
            let raw = match op {
                ArithOp::Add => a.wrapping_add(b),
                ArithOp::Sub => a.wrapping_sub(b),
                ArithOp::Mul => a.wrapping_mul(b),
                ArithOp::Div => a.checked_div(b)?,
                ArithOp::Mod => a.checked_rem(b)?,
            };
            truncate(ty, raw)
        }
        BinaryKind::Compare(op) => Word::from_bool(match op {
            CmpOp::Eq => a == b,
            CmpOp::NotEq => a != b,
            CmpOp::Lt => a < b,
            CmpOp::LtEq => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::GtEq => a >= b,
        }),
        BinaryKind::Logic(LogicOp::And) => a & b,
        BinaryKind::Logic(LogicOp::Or) => a | b,
    };
    Some(word)
}

/// Result of a unary operator applied to a value of type `ty`.
pub fn apply_unary(op: UnaryOp, ty: Ty, word: &Word) -> Word {
    match op {
        UnaryOp::Not => Word::from_bool(word.is_zero()),
        UnaryOp::Neg => truncate(ty, Word::zero().wrapping_sub(word)),
    }
}

/// Folds checked expressions to words.
pub struct Folder<'a> {
    module: &'a Module,
    ctx: &'a CompilationContext,
    typed: &'a TypedModule,
}

impl<'a> Folder<'a> {
    pub fn new(module: &'a Module, ctx: &'a CompilationContext, typed: &'a TypedModule) -> Self {
        Folder { module, ctx, typed }
    }

    /// The value of `id`, if it is a single-word compile-time constant that
    /// evaluates without faulting.
    pub fn fold(&self, id: ExprId) -> Option<Word> {
        let info = self.typed.expr(id)?;
        if !info.is_compile_time_constant() || self.ctx.structs.width_of(info.ty) != 1 {
            return None;
        }
        let expr = self.module.arena.get_expr(id);
        match (&expr.kind, &info.resolution) {
            (ExprKind::Int(value) | ExprKind::Hex { value, .. }, _) => Some(value.clone()),
            (ExprKind::Bool(value), _) => Some(Word::from_bool(*value)),
            (ExprKind::Name(_), Resolution::Constant(name)) => {
                self.fold(self.ctx.constant(*name)?.value)
            }
            (ExprKind::Attribute { .. }, Resolution::EnumMember { bit, .. }) => Word::bit(*bit),
            (
                ExprKind::Binary { left, right, .. },
                Resolution::Binary(BinaryKind::EnumContainsAny),
            ) => {
                let lhs = self.fold(*left)?;
                let ExprKind::List(range) = self.module.arena.get_expr(*right).kind else {
                    return None;
                };
                let mut found = false;
                for &elem in self.module.arena.get_expr_list(range) {
                    found |= self.fold(elem)? == lhs;
                }
                Some(Word::from_bool(found))
            }
            (ExprKind::Binary { left, right, .. }, Resolution::Binary(kind)) => {
                let lhs = self.fold(*left)?;
                let rhs = self.fold(*right)?;
                let ty = self.typed.static_type(*left)?;
                apply_binary(*kind, ty, &lhs, &rhs)
            }
            (ExprKind::Unary { op, operand }, _) => {
                let value = self.fold(*operand)?;
                Some(apply_unary(*op, info.ty, &value))
            }
            _ => None,
        }
    }
}
