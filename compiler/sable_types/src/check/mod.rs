//! Body checker.
//!
//! Runs after the declarations pass, against a read-only
//! [`CompilationContext`]:
//!
//! ```text
//! Constants: each initializer, dependencies first (cycles rejected)
//! Functions: parameters bound to frame slots, then statements in order
//! ```
//!
//! Every expression checked as a value gets an [`ExprInfo`] in the
//! resulting [`TypedModule`]. Operands are always checked before their
//! operator, so the innermost violation is the one reported.

mod expr;
mod stmt;

use rustc_hash::FxHashMap;
use sable_diagnostic::{type_mismatch, Diagnostic, ErrorCode};
use sable_ir::{ExprId, FunctionDecl, Item, Module, Name, Span, StmtKind};

use crate::declarations::describe;
use crate::{
    CompilationContext, ExprInfo, FuncId, FunctionSig, LocalVar, Ty, TypedFunction, TypedModule,
};

/// Type-check every constant and function body in `module`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_module(module: &Module, ctx: &CompilationContext) -> Result<TypedModule, Diagnostic> {
    let mut checker = Checker::new(module, ctx);

    for item in &module.items {
        if let Item::Constant(decl) = item {
            checker.ensure_constant(decl.name, decl.name_span)?;
        }
    }

    for (id, sig) in ctx.functions() {
        let Some(Item::Function(decl)) = module.items.get(sig.item_index) else {
            return Err(internal_error(
                sig.span,
                "function signature does not point at a function",
            ));
        };
        let frame = checker.check_function(id, sig, decl)?;
        checker.typed.functions.push(frame);
    }

    Ok(checker.typed)
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum ConstState {
    InProgress,
    Done,
}

pub(crate) struct Checker<'a> {
    module: &'a Module,
    ctx: &'a CompilationContext,
    typed: TypedModule,
    constants: FxHashMap<Name, ConstState>,
}

/// Names visible inside one function body (or none, for a constant).
pub(crate) struct Scope<'a> {
    sig: Option<&'a FunctionSig>,
    frame: TypedFunction,
}

impl<'a> Scope<'a> {
    fn function(sig: &'a FunctionSig) -> Self {
        Scope {
            sig: Some(sig),
            frame: TypedFunction::default(),
        }
    }

    fn constant() -> Self {
        Scope {
            sig: None,
            frame: TypedFunction::default(),
        }
    }

    fn local(&self, name: Name) -> Option<LocalVar> {
        self.frame.locals.get(&name).copied()
    }

    fn ret(&self) -> Option<Ty> {
        self.sig.and_then(|sig| sig.ret)
    }
}

impl<'a> Checker<'a> {
    fn new(module: &'a Module, ctx: &'a CompilationContext) -> Self {
        Checker {
            module,
            ctx,
            typed: TypedModule::with_capacity(module.arena.expr_count()),
            constants: FxHashMap::default(),
        }
    }

    fn check_function(
        &mut self,
        id: FuncId,
        sig: &'a FunctionSig,
        decl: &'a FunctionDecl,
    ) -> Result<TypedFunction, Diagnostic> {
        tracing::debug!(?id, name = %self.ctx.name_str(sig.name), "checking function");
        let mut scope = Scope::function(sig);
        for (param, &(_, ty)) in decl.params.iter().zip(&sig.params) {
            self.bind(&mut scope, param.name, param.span, ty, true)?;
        }

        for stmt in &decl.body {
            self.check_stmt(&mut scope, stmt)?;
        }

        if let Some(ret) = sig.ret {
            let returns = decl
                .body
                .last()
                .is_some_and(|stmt| matches!(stmt.kind, StmtKind::Return(_)));
            if !returns {
                return Err(Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "function `{}` must end with a `return` of type `{}`",
                        self.ctx.name_str(sig.name),
                        ret.display(self.ctx)
                    ))
                    .with_label(decl.name_span, "missing final return"));
            }
        }

        Ok(scope.frame)
    }

    /// Check a constant initializer once, checking the constants it uses
    /// first.
    fn ensure_constant(&mut self, name: Name, use_span: Span) -> Result<(), Diagnostic> {
        match self.constants.get(&name) {
            Some(ConstState::Done) => return Ok(()),
            Some(ConstState::InProgress) => {
                return Err(Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "constant `{}` depends on itself",
                        self.ctx.name_str(name)
                    ))
                    .with_label(use_span, "cyclic reference"));
            }
            None => {}
        }
        let ctx = self.ctx;
        let Some(def) = ctx.constant(name) else {
            return Err(internal_error(use_span, "constant has no definition"));
        };

        self.constants.insert(name, ConstState::InProgress);
        let scope = Scope::constant();
        let found = self.check_expr(&scope, def.value, Some(def.ty))?;
        let value_span = self.span_of(def.value);
        self.expect_type(def.ty, found, value_span, "constant initializer")?;
        if !self.typed.is_compile_time_constant(def.value) {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "initializer of constant `{}` is not a compile-time constant",
                    self.ctx.name_str(name)
                ))
                .with_label(value_span, "not known at compile time"));
        }
        self.constants.insert(name, ConstState::Done);
        tracing::debug!(name = %self.ctx.name_str(name), "checked constant");
        Ok(())
    }

    /// Bind a parameter or local to the next free frame slots.
    fn bind(
        &mut self,
        scope: &mut Scope<'_>,
        name: Name,
        span: Span,
        ty: Ty,
        is_param: bool,
    ) -> Result<(), Diagnostic> {
        let text = self.ctx.name_str(name);
        if let Some(entry) = self.ctx.namespace.get(name) {
            return Err(Diagnostic::error(ErrorCode::E2006)
                .with_message(format!(
                    "`{text}` is already declared as {}",
                    describe(entry.kind)
                ))
                .with_label(span, "local name shadows a top-level declaration")
                .with_secondary_label(entry.span, "first declared here"));
        }
        if scope.local(name).is_some() {
            return Err(Diagnostic::error(ErrorCode::E2006)
                .with_message(format!("`{text}` is already declared in this function"))
                .with_label(span, "redeclared here"));
        }

        let slot = scope.frame.frame_size;
        scope.frame.frame_size += self.ctx.structs.width_of(ty);
        scope.frame.locals.insert(
            name,
            LocalVar {
                slot,
                ty,
                is_param,
            },
        );
        Ok(())
    }

    fn expect_type(
        &self,
        expected: Ty,
        found: Ty,
        span: Span,
        context: &str,
    ) -> Result<(), Diagnostic> {
        if expected == found {
            return Ok(());
        }
        let mut diag = type_mismatch(
            span,
            &expected.display(self.ctx),
            &found.display(self.ctx),
            context,
        );
        if expected.as_enum().is_some() && found.as_enum().is_some() {
            diag = diag.with_note("values of different enum types never convert");
        }
        Err(diag)
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.module.arena.get_expr(id).span
    }

    fn record(&mut self, id: ExprId, info: ExprInfo) -> Ty {
        let ty = info.ty;
        self.typed.record(id, info);
        ty
    }
}

pub(crate) fn internal_error(span: Span, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001)
        .with_message(format!("internal compiler error: {message}"))
        .with_label(span, "here")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap checked fixtures")]
mod tests;
