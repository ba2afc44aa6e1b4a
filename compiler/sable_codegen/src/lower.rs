//! Lowering from the checked AST to [`Instr`] sequences.
//!
//! Enum operators lower to plain bit-wise instructions:
//!
//! ```text
//! a + b          a b OR
//! a == b, a is b a b XOR ISZERO
//! a in b         a b AND a EQ
//! a in [x, y]    a x EQ a y EQ OR      (empty list: PUSH 0)
//! ```
//!
//! When folding is on, any single-word compile-time constant becomes one
//! `PUSH` instead.
//!
//! External functions start by rejecting enum arguments that set bits
//! outside their type's members:
//!
//! ```text
//! LOAD slot PUSH mask NOT AND ISZERO ASSERT
//! ```

use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{
    ExprId, ExprKind, FunctionDecl, Item, Module, Span, Stmt, StmtKind, UnaryOp, Visibility, Word,
};
use sable_types::{
    ArithOp, BinaryKind, CmpOp, CompilationContext, ExprInfo, FunctionSig, LogicOp, Resolution,
    Ty, TypedFunction, TypedModule,
};

use crate::{CompiledFunction, Folder, Instr, Program};

/// Lower every function of a checked module.
#[tracing::instrument(level = "debug", skip_all, fields(fold_constants = fold_constants))]
pub fn lower_module(
    module: &Module,
    ctx: &CompilationContext,
    typed: &TypedModule,
    fold_constants: bool,
) -> Result<Program, Diagnostic> {
    let folder = fold_constants.then(|| Folder::new(module, ctx, typed));
    let mut program = Program::default();

    for (id, sig) in ctx.functions() {
        let Some(Item::Function(decl)) = module.items.get(sig.item_index) else {
            return Err(internal(sig.span, "function signature does not point at a function"));
        };
        let Some(frame) = typed.function(id) else {
            return Err(internal(sig.span, "function was never checked"));
        };

        let mut lowerer = FunctionLowerer {
            module,
            ctx,
            typed,
            folder: folder.as_ref(),
            frame,
            code: Vec::new(),
            temp_top: frame.frame_size,
            temp_max: frame.frame_size,
        };
        lowerer.lower_body(decl, sig)?;

        let params_words: u32 = sig
            .params
            .iter()
            .map(|&(_, ty)| ctx.structs.width_of(ty))
            .sum();
        let name = ctx.name_str(sig.name).to_string();
        tracing::debug!(%name, instrs = lowerer.code.len(), "lowered function");
        program.functions.push(CompiledFunction {
            name,
            external: sig.visibility == Visibility::External,
            params_words,
            return_words: sig.ret.map_or(0, |ty| ctx.structs.width_of(ty)),
            frame_size: lowerer.temp_max,
            code: lowerer.code,
        });
    }
    Ok(program)
}

struct FunctionLowerer<'a> {
    module: &'a Module,
    ctx: &'a CompilationContext,
    typed: &'a TypedModule,
    folder: Option<&'a Folder<'a>>,
    frame: &'a TypedFunction,
    code: Vec<Instr>,
    /// First free temporary slot.
    temp_top: u32,
    temp_max: u32,
}

impl<'a> FunctionLowerer<'a> {
    fn lower_body(&mut self, decl: &FunctionDecl, sig: &FunctionSig) -> Result<(), Diagnostic> {
        if sig.visibility == Visibility::External {
            for &(name, ty) in &sig.params {
                let Some(local) = self.frame.locals.get(&name) else {
                    return Err(internal(sig.span, "parameter has no slot"));
                };
                let slot = local.slot;
                self.guard_enum_bits(ty, slot);
            }
        }
        for stmt in &decl.body {
            self.lower_stmt(stmt)?;
        }
        if !matches!(self.code.last(), Some(Instr::Return { .. })) {
            self.code.push(Instr::Return { words: 0 });
        }
        Ok(())
    }

    /// Assert that every enum word of a `ty` value stored at `slot` only
    /// sets declared member bits.
    fn guard_enum_bits(&mut self, ty: Ty, slot: u32) {
        match ty {
            Ty::Enum(id) => {
                let mask = self.ctx.enums.get(id).all_members_mask();
                self.code.extend([
                    Instr::Load(slot),
                    Instr::Push(mask),
                    Instr::Not,
                    Instr::And,
                    Instr::IsZero,
                    Instr::Assert,
                ]);
            }
            Ty::Struct(id) => {
                let ctx = self.ctx;
                for field in &ctx.structs.get(id).fields {
                    self.guard_enum_bits(field.ty, slot + field.offset);
                }
            }
            _ => {}
        }
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), Diagnostic> {
        match &stmt.kind {
            StmtKind::Pass => {}
            StmtKind::Expr(value) => {
                self.lower_expr(*value)?;
                for _ in 0..self.width(*value)? {
                    self.code.push(Instr::Pop);
                }
            }
            StmtKind::Return(value) => {
                let words = match value {
                    Some(value) => {
                        self.lower_expr(*value)?;
                        self.width(*value)?
                    }
                    None => 0,
                };
                self.code.push(Instr::Return { words });
            }
            StmtKind::Let { name, value, .. }
            | StmtKind::Assign {
                target: name,
                value,
                ..
            } => {
                let Some(local) = self.frame.locals.get(name) else {
                    return Err(internal(stmt.span, "assignment to an unbound local"));
                };
                let slot = local.slot;
                self.lower_expr(*value)?;
                for word in (0..self.width(*value)?).rev() {
                    self.code.push(Instr::Store(slot + word));
                }
            }
            StmtKind::Assert(cond) => {
                self.lower_expr(*cond)?;
                self.code.push(Instr::Assert);
            }
        }
        Ok(())
    }

    fn lower_expr(&mut self, id: ExprId) -> Result<(), Diagnostic> {
        let (module, ctx) = (self.module, self.ctx);
        let info = self.info(id)?;

        if info.is_compile_time_constant() {
            if let Some(word) = self.folder.and_then(|folder| folder.fold(id)) {
                tracing::trace!(?id, %word, "folded");
                self.code.push(Instr::Push(word));
                return Ok(());
            }
        }

        let expr = module.arena.get_expr(id);
        match (&expr.kind, &info.resolution) {
            (ExprKind::Int(value) | ExprKind::Hex { value, .. }, _) => {
                self.code.push(Instr::Push(value.clone()));
            }
            (ExprKind::Bool(value), _) => self.code.push(Instr::Push(Word::from_bool(*value))),
            (ExprKind::Name(_), Resolution::Local { slot }) => {
                for word in 0..self.ctx.structs.width_of(info.ty) {
                    self.code.push(Instr::Load(slot + word));
                }
            }
            (ExprKind::Name(_), Resolution::Constant(name)) => {
                let Some(def) = ctx.constant(*name) else {
                    return Err(internal(expr.span, "constant has no definition"));
                };
                self.lower_expr(def.value)?;
            }
            (ExprKind::Attribute { .. }, Resolution::EnumMember { bit, .. }) => {
                let Some(word) = Word::bit(*bit) else {
                    return Err(internal(expr.span, "enum member outside the word"));
                };
                self.code.push(Instr::Push(word));
            }
            (ExprKind::Attribute { value, .. }, Resolution::Field { offset }) => {
                let width = self.ctx.structs.width_of(info.ty);
                self.lower_field(*value, *offset, width)?;
            }
            (ExprKind::Binary { left, right, .. }, Resolution::Binary(kind)) => {
                let operand_ty = self.info(*left)?.ty;
                self.lower_binary(*kind, operand_ty, *left, *right)?;
            }
            (ExprKind::Unary { op, operand }, _) => {
                if *op == UnaryOp::Neg {
                    self.code.push(Instr::Push(Word::zero()));
                }
                self.lower_expr(*operand)?;
                match op {
                    UnaryOp::Not => self.code.push(Instr::IsZero),
                    UnaryOp::Neg => {
                        self.code.push(Instr::Sub);
                        self.truncate(info.ty);
                    }
                }
            }
            (ExprKind::Call { args, .. }, Resolution::Call(func)) => {
                let mut words = 0;
                for &arg in module.arena.get_expr_list(*args) {
                    self.lower_expr(arg)?;
                    words += self.width(arg)?;
                }
                let Ok(func) = u32::try_from(func.index()) else {
                    return Err(internal(expr.span, "function index overflow"));
                };
                self.code.push(Instr::Call { func, args: words });
            }
            (ExprKind::StructLit { .. }, Resolution::StructLit(values)) => {
                for &value in values {
                    self.lower_expr(value)?;
                }
            }
            _ => return Err(internal(expr.span, "expression has no lowering")),
        }
        Ok(())
    }

    fn lower_binary(
        &mut self,
        kind: BinaryKind,
        ty: Ty,
        left: ExprId,
        right: ExprId,
    ) -> Result<(), Diagnostic> {
        if kind == BinaryKind::EnumContainsAny {
            return self.lower_contains_any(left, right);
        }

        self.lower_expr(left)?;
        self.lower_expr(right)?;
        match kind {
            BinaryKind::EnumUnion | BinaryKind::Logic(LogicOp::Or) => self.code.push(Instr::Or),
            BinaryKind::Logic(LogicOp::And) => self.code.push(Instr::And),
            BinaryKind::EnumEq => self.code.extend([Instr::Xor, Instr::IsZero]),
            BinaryKind::EnumContains => {
                self.code.push(Instr::And);
                self.lower_expr(left)?;
                self.code.push(Instr::Eq);
            }
            BinaryKind::Arith(op) => {
                self.code.push(match op {
                    ArithOp::Add => Instr::Add,
                    ArithOp::Sub => Instr::Sub,
                    ArithOp::Mul => Instr::Mul,
                    ArithOp::Div => Instr::Div,
                    ArithOp::Mod => Instr::Mod,
                });
                self.truncate(ty);
            }
            BinaryKind::Compare(op) => match op {
                CmpOp::Eq => self.code.push(Instr::Eq),
                CmpOp::NotEq => self.code.extend([Instr::Eq, Instr::IsZero]),
                CmpOp::Lt => self.code.push(Instr::Lt),
                CmpOp::LtEq => self.code.extend([Instr::Gt, Instr::IsZero]),
                CmpOp::Gt => self.code.push(Instr::Gt),
                CmpOp::GtEq => self.code.extend([Instr::Lt, Instr::IsZero]),
            },
            BinaryKind::EnumContainsAny => {}
        }
        Ok(())
    }

    fn lower_contains_any(&mut self, left: ExprId, right: ExprId) -> Result<(), Diagnostic> {
        let module = self.module;
        let expr = module.arena.get_expr(right);
        let ExprKind::List(range) = expr.kind else {
            return Err(internal(expr.span, "`in` sequence is not a list literal"));
        };
        let elems = module.arena.get_expr_list(range);
        if elems.is_empty() {
            self.code.push(Instr::Push(Word::zero()));
            return Ok(());
        }
        for (index, &elem) in elems.iter().enumerate() {
            self.lower_expr(left)?;
            self.lower_expr(elem)?;
            self.code.push(Instr::Eq);
            if index > 0 {
                self.code.push(Instr::Or);
            }
        }
        Ok(())
    }

    /// Push `width` words at `offset` inside the struct value `base`.
    fn lower_field(&mut self, base: ExprId, offset: u32, width: u32) -> Result<(), Diagnostic> {
        if let Resolution::Local { slot } = self.info(base)?.resolution {
            for word in 0..width {
                self.code.push(Instr::Load(slot + offset + word));
            }
            return Ok(());
        }

        let base_width = self.width(base)?;
        self.lower_expr(base)?;
        let temp = self.temp_top;
        self.temp_top += base_width;
        self.temp_max = self.temp_max.max(self.temp_top);
        for word in (0..base_width).rev() {
            self.code.push(Instr::Store(temp + word));
        }
        for word in 0..width {
            self.code.push(Instr::Load(temp + offset + word));
        }
        self.temp_top -= base_width;
        Ok(())
    }

    fn truncate(&mut self, ty: Ty) {
        if ty == Ty::Uint8 {
            self.code
                .extend([Instr::Push(Word::from_u64(0xff)), Instr::And]);
        }
    }

    fn info(&self, id: ExprId) -> Result<&'a ExprInfo, Diagnostic> {
        let typed: &'a TypedModule = self.typed;
        typed
            .expr(id)
            .ok_or_else(|| internal(self.module.arena.get_expr(id).span, "expression was never typed"))
    }

    fn width(&self, id: ExprId) -> Result<u32, Diagnostic> {
        Ok(self.ctx.structs.width_of(self.info(id)?.ty))
    }
}

fn internal(span: Span, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001)
        .with_message(format!("internal compiler error: {message}"))
        .with_label(span, "while lowering this")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap checked fixtures")]
mod tests;
