//! AST node types.
//!
//! Declarations own their statement lists directly; expressions live in the
//! module's [`ExprArena`] and are referenced by [`ExprId`].

use std::fmt;

use crate::{ExprArena, ExprId, ExprRange, Name, Span, Word};

// ===== Module =====

/// A parsed compilation unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Module {
    /// Top-level items in source order.
    pub items: Vec<Item>,
    /// Storage for every expression in the module.
    pub arena: ExprArena,
}

/// A top-level declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Enum(EnumDecl),
    Struct(StructDecl),
    Event(EventDecl),
    Interface(InterfaceDecl),
    Constant(ConstantDecl),
    Function(FunctionDecl),
}

impl Item {
    /// Declared name of the item.
    pub fn name(&self) -> Name {
        match self {
            Item::Enum(decl) => decl.name,
            Item::Struct(decl) => decl.name,
            Item::Event(decl) => decl.name,
            Item::Interface(decl) => decl.name,
            Item::Constant(decl) => decl.name,
            Item::Function(decl) => decl.name,
        }
    }

    /// Span of the declared name.
    pub fn name_span(&self) -> Span {
        match self {
            Item::Enum(decl) => decl.name_span,
            Item::Struct(decl) => decl.name_span,
            Item::Event(decl) => decl.name_span,
            Item::Interface(decl) => decl.name_span,
            Item::Constant(decl) => decl.name_span,
            Item::Function(decl) => decl.name_span,
        }
    }
}

// ===== Declarations =====

/// `enum Name:` followed by an indented block of members.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumDecl {
    pub name: Name,
    pub name_span: Span,
    /// Raw member lines in declaration order.
    pub members: Vec<EnumMember>,
    pub span: Span,
}

/// One line of an enum body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EnumMember {
    /// A bare identifier.
    Named { name: Name, span: Span },
    /// The `pass` placeholder.
    Pass(Span),
}

impl EnumMember {
    pub fn span(&self) -> Span {
        match self {
            EnumMember::Named { span, .. } | EnumMember::Pass(span) => *span,
        }
    }
}

/// `struct Name:` with typed fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructDecl {
    pub name: Name,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// `event Name:` with typed fields (or `pass`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventDecl {
    pub name: Name,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// `name: type` inside a struct or event body.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `interface Name:` with method signatures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceDecl {
    pub name: Name,
    pub name_span: Span,
    pub methods: Vec<InterfaceMethod>,
    pub span: Span,
}

/// `def name(params) -> ret: mutability`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceMethod {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub mutability: Mutability,
    pub span: Span,
}

/// `NAME: constant(type) = value`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConstantDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: TypeExpr,
    pub value: ExprId,
    pub span: Span,
}

/// A decorated function definition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDecl {
    pub name: Name,
    pub name_span: Span,
    pub decorators: Vec<(Decorator, Span)>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Function decorator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Decorator {
    Visibility(Visibility),
    Mutability(Mutability),
}

/// Who may call a function.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Visibility {
    External,
    #[default]
    Internal,
}

/// State mutability of a function.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl Mutability {
    pub fn as_str(self) -> &'static str {
        match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::Nonpayable => "nonpayable",
            Mutability::Payable => "payable",
        }
    }
}

/// Function parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Param {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A type annotation. Sable types are all nominal, so this is a name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeExpr {
    pub name: Name,
    pub span: Span,
}

// ===== Statements =====

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum StmtKind {
    /// `pass`
    Pass,
    /// `return` / `return value`
    Return(Option<ExprId>),
    /// `name: type = value`
    Let {
        name: Name,
        name_span: Span,
        ty: TypeExpr,
        value: ExprId,
    },
    /// `name = value`
    Assign {
        target: Name,
        target_span: Span,
        value: ExprId,
    },
    /// `assert condition`
    Assert(ExprId),
    /// Bare expression statement.
    Expr(ExprId),
}

// ===== Expressions =====

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants. All children are arena indices.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    // ===== Literals =====
    /// Decimal integer literal.
    Int(Word),
    /// Hex literal with the number of digits written.
    Hex { value: Word, digits: u16 },
    /// `True` / `False`
    Bool(bool),

    // ===== References =====
    /// Bare identifier: variable, constant, function, or type name.
    Name(Name),
    /// `value.attr` (enum member access or struct field access).
    Attribute {
        value: ExprId,
        attr: Name,
        attr_span: Span,
    },

    // ===== Compound =====
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// `func(args)`
    Call { func: ExprId, args: ExprRange },
    /// `Name({field: value, ...})`
    StructLit {
        name: Name,
        name_span: Span,
        fields: Vec<FieldInit>,
    },
    /// `[a, b, c]`
    List(ExprRange),
}

/// `field: value` inside a struct literal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Membership / identity
    In,
    Is,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::In => "in",
            BinaryOp::Is => "is",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "-",
        }
    }
}
