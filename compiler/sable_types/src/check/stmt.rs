//! Statement checking.

use sable_diagnostic::{type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use sable_ir::{Stmt, StmtKind};

use super::{Checker, Scope};
use crate::declarations::{describe, resolve_type};
use crate::{SymbolKind, Ty};

impl Checker<'_> {
    pub(super) fn check_stmt(&mut self, scope: &mut Scope<'_>, stmt: &Stmt) -> Result<(), Diagnostic> {
        match &stmt.kind {
            StmtKind::Pass => Ok(()),
            StmtKind::Expr(value) => self.check_expr(scope, *value, None).map(|_| ()),
            StmtKind::Return(value) => self.check_return(scope, *value, stmt),
            StmtKind::Let {
                name,
                name_span,
                ty,
                value,
            } => {
                let ty = resolve_type(self.ctx, *ty)?;
                let found = self.check_expr(scope, *value, Some(ty))?;
                self.expect_type(ty, found, self.span_of(*value), "assignment")?;
                self.bind(scope, *name, *name_span, ty, false)
            }
            StmtKind::Assign {
                target,
                target_span,
                value,
            } => {
                let text = self.ctx.name_str(*target);
                let Some(local) = scope.local(*target) else {
                    return Err(match self.ctx.namespace.get(*target) {
                        Some(entry) if entry.kind == SymbolKind::Constant => {
                            Diagnostic::error(ErrorCode::E2009)
                                .with_message(format!("cannot assign to constant `{text}`"))
                                .with_label(*target_span, "constants are immutable")
                        }
                        Some(entry) => Diagnostic::error(ErrorCode::E2008)
                            .with_message(format!(
                                "`{text}` is {}, not a variable",
                                describe(entry.kind)
                            ))
                            .with_label(*target_span, "cannot be assigned"),
                        None => unknown_identifier(*target_span, &text),
                    });
                };
                if local.is_param {
                    return Err(Diagnostic::error(ErrorCode::E2009)
                        .with_message(format!("cannot assign to parameter `{text}`"))
                        .with_label(*target_span, "parameters are immutable"));
                }
                let found = self.check_expr(scope, *value, Some(local.ty))?;
                self.expect_type(local.ty, found, self.span_of(*value), "assignment")
            }
            StmtKind::Assert(cond) => {
                let found = self.check_expr(scope, *cond, Some(Ty::Bool))?;
                if found == Ty::Bool {
                    Ok(())
                } else {
                    Err(type_mismatch(
                        self.span_of(*cond),
                        "bool",
                        &found.display(self.ctx),
                        "assertion",
                    ))
                }
            }
        }
    }

    fn check_return(
        &mut self,
        scope: &Scope<'_>,
        value: Option<sable_ir::ExprId>,
        stmt: &Stmt,
    ) -> Result<(), Diagnostic> {
        match (value, scope.ret()) {
            (Some(value), Some(ret)) => {
                let found = self.check_expr(scope, value, Some(ret))?;
                self.expect_type(ret, found, self.span_of(value), "return value")
            }
            (Some(value), None) => {
                self.check_expr(scope, value, None)?;
                Err(Diagnostic::error(ErrorCode::E2009)
                    .with_message("function without a return type returns a value")
                    .with_label(self.span_of(value), "unexpected return value"))
            }
            (None, Some(ret)) => Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "`return` without a value in a function returning `{}`",
                    ret.display(self.ctx)
                ))
                .with_label(stmt.span, "missing return value")),
            (None, None) => Ok(()),
        }
    }
}
