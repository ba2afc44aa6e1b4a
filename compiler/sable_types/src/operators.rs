//! Operator Resolver.
//!
//! Decides, from static operand types alone, whether an operator is legal
//! and what it produces. Enum operands get set semantics:
//!
//! | Operator | Operands | Result |
//! |---|---|---|
//! | `+` | `T + T` | `T`, union of masks |
//! | `==`, `is` | `T == T` | `bool`, masks equal |
//! | `in` | `T in T` | `bool`, `lhs & rhs == lhs` |
//! | `in` | `T in [T, ...]` | `bool`, any element equals `lhs` |
//!
//! Any other operator on an enum is an invalid operation; mixing an enum
//! with anything but the same enum is a type mismatch.

use sable_ir::{BinaryOp, UnaryOp};

use crate::Ty;

/// Which operand of a binary operator an error refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Side {
    Left,
    Right,
}

/// An operand as the resolver sees it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Operand<'a> {
    /// A bare type name, e.g. `Role` in `Role + x`.
    TypeRef(Ty),
    /// A value of the given type.
    Value(Ty),
    /// The element types of a list literal.
    List(&'a [Ty]),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicOp {
    And,
    Or,
}

/// How a resolved binary operator is evaluated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryKind {
    /// `a + b` on enums: `a | b`.
    EnumUnion,
    /// `a == b` / `a is b` on enums: `(a ^ b) == 0`.
    EnumEq,
    /// `a in b` on enums: `(a & b) == a`.
    EnumContains,
    /// `a in [e0, e1, ...]`: `a == e0 or a == e1 or ...`.
    EnumContainsAny,
    Arith(ArithOp),
    Compare(CmpOp),
    Logic(LogicOp),
}

/// A legal binary operation and its result type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BinaryResolution {
    pub kind: BinaryKind,
    pub ty: Ty,
}

/// Why an operator application was rejected.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum OperatorError {
    /// A type name appeared where a value is required.
    #[error("type used as a value")]
    InvalidReference { side: Side },
    /// Operand types do not match.
    #[error("operand types do not match")]
    TypeMismatch { expected: Ty, found: Ty, side: Side },
    /// A list element does not match the left operand.
    #[error("list element type does not match")]
    ListElementMismatch {
        index: usize,
        expected: Ty,
        found: Ty,
    },
    /// The operator is not defined for the operand type.
    #[error("operator not supported for operand type")]
    InvalidOperation { ty: Ty },
    /// A list literal outside the right side of `in`.
    #[error("list literal used outside `in`")]
    MisplacedList { side: Side },
}

/// Resolve a binary operator.
pub fn resolve_binary(
    op: BinaryOp,
    lhs: Operand<'_>,
    rhs: Operand<'_>,
) -> Result<BinaryResolution, OperatorError> {
    let left = match lhs {
        Operand::TypeRef(_) => return Err(OperatorError::InvalidReference { side: Side::Left }),
        Operand::List(_) => return Err(OperatorError::MisplacedList { side: Side::Left }),
        Operand::Value(ty) => ty,
    };

    let right = match rhs {
        Operand::TypeRef(_) => {
            return Err(OperatorError::InvalidReference { side: Side::Right })
        }
        Operand::List(elems) if op == BinaryOp::In => {
            return resolve_sequence_in(left, elems);
        }
        Operand::List(_) => return Err(OperatorError::MisplacedList { side: Side::Right }),
        Operand::Value(ty) => ty,
    };

    match (left.as_enum(), right.as_enum()) {
        (Some(a), Some(b)) if a != b => Err(OperatorError::TypeMismatch {
            expected: left,
            found: right,
            side: Side::Right,
        }),
        (Some(_), Some(_)) => resolve_enum(op, left),
        (Some(_), None) => Err(OperatorError::TypeMismatch {
            expected: left,
            found: right,
            side: Side::Right,
        }),
        (None, Some(_)) => Err(OperatorError::TypeMismatch {
            expected: right,
            found: left,
            side: Side::Left,
        }),
        (None, None) => resolve_scalar(op, left, right),
    }
}

/// `lhs in [elems]`
fn resolve_sequence_in(left: Ty, elems: &[Ty]) -> Result<BinaryResolution, OperatorError> {
    if left.as_enum().is_none() {
        return Err(OperatorError::InvalidOperation { ty: left });
    }
    if let Some((index, &found)) = elems.iter().enumerate().find(|(_, &ty)| ty != left) {
        return Err(OperatorError::ListElementMismatch {
            index,
            expected: left,
            found,
        });
    }
    Ok(BinaryResolution {
        kind: BinaryKind::EnumContainsAny,
        ty: Ty::Bool,
    })
}

/// Both operands are values of the same enum.
fn resolve_enum(op: BinaryOp, ty: Ty) -> Result<BinaryResolution, OperatorError> {
    let (kind, result) = match op {
        BinaryOp::Add => (BinaryKind::EnumUnion, ty),
        BinaryOp::Eq | BinaryOp::Is => (BinaryKind::EnumEq, Ty::Bool),
        BinaryOp::In => (BinaryKind::EnumContains, Ty::Bool),
        BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::And
        | BinaryOp::Or => return Err(OperatorError::InvalidOperation { ty }),
    };
    Ok(BinaryResolution { kind, ty: result })
}

/// Neither operand is an enum.
fn resolve_scalar(op: BinaryOp, left: Ty, right: Ty) -> Result<BinaryResolution, OperatorError> {
    let invalid = Err(OperatorError::InvalidOperation { ty: left });
    let supported = match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            left.is_numeric()
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => left.is_numeric(),
        BinaryOp::Eq | BinaryOp::NotEq => {
            matches!(
                left,
                Ty::Uint256 | Ty::Uint8 | Ty::Bool | Ty::Address | Ty::Bytes32
            )
        }
        BinaryOp::And | BinaryOp::Or => left == Ty::Bool,
        BinaryOp::In | BinaryOp::Is => false,
    };
    if !supported {
        return invalid;
    }
    if left != right {
        return Err(OperatorError::TypeMismatch {
            expected: left,
            found: right,
            side: Side::Right,
        });
    }

    let (kind, ty) = match op {
        BinaryOp::Add => (BinaryKind::Arith(ArithOp::Add), left),
        BinaryOp::Sub => (BinaryKind::Arith(ArithOp::Sub), left),
        BinaryOp::Mul => (BinaryKind::Arith(ArithOp::Mul), left),
        BinaryOp::Div => (BinaryKind::Arith(ArithOp::Div), left),
        BinaryOp::Mod => (BinaryKind::Arith(ArithOp::Mod), left),
        BinaryOp::Eq => (BinaryKind::Compare(CmpOp::Eq), Ty::Bool),
        BinaryOp::NotEq => (BinaryKind::Compare(CmpOp::NotEq), Ty::Bool),
        BinaryOp::Lt => (BinaryKind::Compare(CmpOp::Lt), Ty::Bool),
        BinaryOp::LtEq => (BinaryKind::Compare(CmpOp::LtEq), Ty::Bool),
        BinaryOp::Gt => (BinaryKind::Compare(CmpOp::Gt), Ty::Bool),
        BinaryOp::GtEq => (BinaryKind::Compare(CmpOp::GtEq), Ty::Bool),
        BinaryOp::And => (BinaryKind::Logic(LogicOp::And), Ty::Bool),
        BinaryOp::Or => (BinaryKind::Logic(LogicOp::Or), Ty::Bool),
        BinaryOp::In | BinaryOp::Is => return invalid,
    };
    Ok(BinaryResolution { kind, ty })
}

/// Resolve a unary operator; returns the result type.
pub fn resolve_unary(op: UnaryOp, operand: Operand<'_>) -> Result<Ty, OperatorError> {
    let ty = match operand {
        Operand::TypeRef(_) => return Err(OperatorError::InvalidReference { side: Side::Right }),
        Operand::List(_) => return Err(OperatorError::MisplacedList { side: Side::Right }),
        Operand::Value(ty) => ty,
    };
    match (op, ty) {
        (UnaryOp::Not, Ty::Bool) => Ok(Ty::Bool),
        (UnaryOp::Neg, Ty::Uint256 | Ty::Uint8) => Ok(ty),
        _ => Err(OperatorError::InvalidOperation { ty }),
    }
}
