//! Expression checking.

use sable_diagnostic::{invalid_operation, type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use sable_ir::{BinaryOp, ExprId, ExprKind, ExprRange, FieldInit, Name, Span, UnaryOp, Word};

use super::{internal_error, Checker, Scope};
use crate::declarations::describe;
use crate::{
    resolve_binary, resolve_unary, ExprInfo, Operand, OperatorError, Resolution, Side,
    SymbolKind, Ty,
};

/// An operand after checking, before its operator is resolved.
enum Checked {
    TypeRef(Ty),
    Value(Ty),
    List(Vec<Ty>),
}

impl Checked {
    fn as_operand(&self) -> Operand<'_> {
        match self {
            Checked::TypeRef(ty) => Operand::TypeRef(*ty),
            Checked::Value(ty) => Operand::Value(*ty),
            Checked::List(elems) => Operand::List(elems),
        }
    }

    fn value_type(&self) -> Option<Ty> {
        match self {
            Checked::Value(ty) => Some(*ty),
            Checked::TypeRef(_) | Checked::List(_) => None,
        }
    }
}

fn literal_int_type(value: &Word, expected: Option<Ty>) -> Ty {
    match expected {
        Some(Ty::Uint8) if value.to_u64().is_some_and(|v| v <= u64::from(u8::MAX)) => Ty::Uint8,
        _ => Ty::Uint256,
    }
}

fn is_arithmetic(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
    )
}

impl Checker<'_> {
    /// Check `id` as a value, recording its [`ExprInfo`].
    ///
    /// `expected` only guides literal typing; callers compare the result.
    pub(super) fn check_expr(
        &mut self,
        scope: &Scope<'_>,
        id: ExprId,
        expected: Option<Ty>,
    ) -> Result<Ty, Diagnostic> {
        let module = self.module;
        let expr = module.arena.get_expr(id);
        let span = expr.span;
        tracing::trace!(?id, "check expr");

        let info = match &expr.kind {
            ExprKind::Int(value) => literal(literal_int_type(value, expected)),
            ExprKind::Hex { value, digits } => literal(match digits {
                40 => Ty::Address,
                64 => Ty::Bytes32,
                _ => literal_int_type(value, expected),
            }),
            ExprKind::Bool(_) => literal(Ty::Bool),
            ExprKind::Name(name) => self.check_name(scope, *name, span)?,
            ExprKind::Attribute {
                value,
                attr,
                attr_span,
            } => self.check_attribute(scope, *value, *attr, *attr_span)?,
            ExprKind::Binary { op, left, right } => {
                self.check_binary(scope, *op, *left, *right, span, expected)?
            }
            ExprKind::Unary { op, operand } => {
                self.check_unary(scope, *op, *operand, span, expected)?
            }
            ExprKind::Call { func, args } => self.check_call(scope, *func, *args, span)?,
            ExprKind::StructLit {
                name,
                name_span,
                fields,
            } => self.check_struct_lit(scope, *name, *name_span, fields)?,
            ExprKind::List(_) => return Err(misplaced_list(span)),
        };
        Ok(self.record(id, info))
    }

    /// Check an operand, keeping type names and list literals apart from
    /// values so the operator resolver can classify them.
    fn check_operand(
        &mut self,
        scope: &Scope<'_>,
        id: ExprId,
        expected: Option<Ty>,
    ) -> Result<Checked, Diagnostic> {
        let module = self.module;
        match &module.arena.get_expr(id).kind {
            ExprKind::Name(name) if scope.local(*name).is_none() => {
                if let Some(entry) = self.ctx.namespace.get(*name) {
                    if let (true, Some(ty)) = (entry.kind.is_type(), entry.ty) {
                        return Ok(Checked::TypeRef(ty));
                    }
                }
            }
            ExprKind::List(range) => {
                let elems = module.arena.get_expr_list(*range);
                let mut tys = Vec::with_capacity(elems.len());
                for &elem in elems {
                    match self.check_operand(scope, elem, expected)? {
                        Checked::Value(ty) => tys.push(ty),
                        Checked::TypeRef(_) => return Err(self.invalid_reference(elem)),
                        Checked::List(_) => return Err(misplaced_list(self.span_of(elem))),
                    }
                }
                return Ok(Checked::List(tys));
            }
            _ => {}
        }
        self.check_expr(scope, id, expected).map(Checked::Value)
    }

    fn check_name(
        &mut self,
        scope: &Scope<'_>,
        name: Name,
        span: Span,
    ) -> Result<ExprInfo, Diagnostic> {
        if let Some(local) = scope.local(name) {
            return Ok(ExprInfo {
                ty: local.ty,
                constant: false,
                resolution: Resolution::Local { slot: local.slot },
            });
        }

        let text = self.ctx.name_str(name);
        let Some(entry) = self.ctx.namespace.get(name).copied() else {
            return Err(unknown_identifier(span, &text));
        };
        if entry.kind != SymbolKind::Constant {
            return Err(Diagnostic::error(ErrorCode::E2008)
                .with_message(format!(
                    "`{text}` is {}, not a value",
                    describe(entry.kind)
                ))
                .with_label(span, "used as a value")
                .with_secondary_label(entry.span, "declared here"));
        }

        self.ensure_constant(name, span)?;
        let Some(def) = self.ctx.constant(name) else {
            return Err(internal_error(span, "constant has no definition"));
        };
        Ok(ExprInfo {
            ty: def.ty,
            constant: true,
            resolution: Resolution::Constant(name),
        })
    }

    fn check_attribute(
        &mut self,
        scope: &Scope<'_>,
        value: ExprId,
        attr: Name,
        attr_span: Span,
    ) -> Result<ExprInfo, Diagnostic> {
        let attr_text = self.ctx.name_str(attr);
        match self.check_operand(scope, value, None)? {
            Checked::TypeRef(Ty::Enum(enum_id)) => {
                let enum_ty = self.ctx.enums.get(enum_id);
                let Some(bit) = enum_ty.bit_index(attr) else {
                    return Err(Diagnostic::error(ErrorCode::E2007)
                        .with_message(format!(
                            "enum `{}` has no member `{attr_text}`",
                            self.ctx.name_str(enum_ty.name())
                        ))
                        .with_label(attr_span, "unknown member")
                        .with_secondary_label(enum_ty.span(), "enum declared here"));
                };
                Ok(ExprInfo {
                    ty: Ty::Enum(enum_id),
                    constant: true,
                    resolution: Resolution::EnumMember { enum_id, bit },
                })
            }
            Checked::TypeRef(ty) => Err(Diagnostic::error(ErrorCode::E2007)
                .with_message(format!(
                    "type `{}` has no attribute `{attr_text}`",
                    ty.display(self.ctx)
                ))
                .with_label(attr_span, "unknown attribute")),
            Checked::Value(ty @ Ty::Enum(_)) => Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "cannot access `{attr_text}` on a value of enum `{}`",
                    ty.display(self.ctx)
                ))
                .with_label(attr_span, "attribute of an enum value")
                .with_note("members are accessed through the enum name")),
            Checked::Value(ty @ Ty::Struct(struct_id)) => {
                let def = self.ctx.structs.get(struct_id);
                let Some(field) = def.field(attr) else {
                    return Err(Diagnostic::error(ErrorCode::E2007)
                        .with_message(format!(
                            "struct `{}` has no field `{attr_text}`",
                            ty.display(self.ctx)
                        ))
                        .with_label(attr_span, "unknown field"));
                };
                Ok(ExprInfo {
                    ty: field.ty,
                    constant: self.typed.is_compile_time_constant(value),
                    resolution: Resolution::Field {
                        offset: field.offset,
                    },
                })
            }
            Checked::Value(ty) => Err(Diagnostic::error(ErrorCode::E2007)
                .with_message(format!(
                    "`{}` has no attribute `{attr_text}`",
                    ty.display(self.ctx)
                ))
                .with_label(attr_span, "unknown attribute")),
            Checked::List(_) => Err(misplaced_list(self.span_of(value))),
        }
    }

    fn check_binary(
        &mut self,
        scope: &Scope<'_>,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
        expected: Option<Ty>,
    ) -> Result<ExprInfo, Diagnostic> {
        let module = self.module;
        let hint = if is_arithmetic(op) { expected } else { None };
        let is_int = |id: ExprId| matches!(module.arena.get_expr(id).kind, ExprKind::Int(_));

        // A bare integer on the left takes its type from the right.
        let (lhs, rhs) = if is_int(left) && !is_int(right) {
            let rhs = self.check_operand(scope, right, hint)?;
            let lhs = self.check_operand(scope, left, rhs.value_type().or(hint))?;
            (lhs, rhs)
        } else {
            let lhs = self.check_operand(scope, left, hint)?;
            let rhs = self.check_operand(scope, right, lhs.value_type().or(hint))?;
            (lhs, rhs)
        };

        let resolved = resolve_binary(op, lhs.as_operand(), rhs.as_operand())
            .map_err(|err| self.binary_error(err, op, left, right, span))?;

        let constant = self.operand_constant(left, &lhs) && self.operand_constant(right, &rhs);
        if let (Checked::List(_), Some(enum_id)) = (&rhs, lhs.value_type().and_then(Ty::as_enum)) {
            let list_constant = self.operand_constant(right, &rhs);
            self.record(
                right,
                ExprInfo {
                    ty: Ty::List(enum_id),
                    constant: list_constant,
                    resolution: Resolution::None,
                },
            );
        }

        tracing::trace!(?op, kind = ?resolved.kind, constant, "resolved binary");
        Ok(ExprInfo {
            ty: resolved.ty,
            constant,
            resolution: Resolution::Binary(resolved.kind),
        })
    }

    fn check_unary(
        &mut self,
        scope: &Scope<'_>,
        op: UnaryOp,
        operand: ExprId,
        span: Span,
        expected: Option<Ty>,
    ) -> Result<ExprInfo, Diagnostic> {
        let hint = match op {
            UnaryOp::Neg => expected,
            UnaryOp::Not => None,
        };
        let checked = self.check_operand(scope, operand, hint)?;
        let ty = resolve_unary(op, checked.as_operand()).map_err(|err| match err {
            OperatorError::InvalidReference { .. } => self.invalid_reference(operand),
            OperatorError::MisplacedList { .. } => misplaced_list(self.span_of(operand)),
            OperatorError::InvalidOperation { ty } => {
                invalid_operation(span, op.as_symbol(), &ty.display(self.ctx))
            }
            OperatorError::TypeMismatch { .. } | OperatorError::ListElementMismatch { .. } => {
                internal_error(span, "unary operator reported a mismatch")
            }
        })?;
        Ok(ExprInfo {
            ty,
            constant: self.operand_constant(operand, &checked),
            resolution: Resolution::None,
        })
    }

    fn check_call(
        &mut self,
        scope: &Scope<'_>,
        func: ExprId,
        args: ExprRange,
        span: Span,
    ) -> Result<ExprInfo, Diagnostic> {
        let (module, ctx) = (self.module, self.ctx);
        let callee = module.arena.get_expr(func);
        let ExprKind::Name(name) = callee.kind else {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message("only functions can be called")
                .with_label(callee.span, "not a function name"));
        };
        let text = self.ctx.name_str(name);
        if scope.local(name).is_some() {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!("`{text}` is a variable, not a function"))
                .with_label(callee.span, "not callable"));
        }
        let Some(entry) = self.ctx.namespace.get(name).copied() else {
            return Err(unknown_identifier(callee.span, &text));
        };
        match entry.kind {
            SymbolKind::Function => {}
            SymbolKind::Struct => {
                return Err(Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("`{text}` is a struct, not a function"))
                    .with_label(callee.span, "not callable")
                    .with_note(format!("construct it with `{text}({{field: value}})`")));
            }
            SymbolKind::Enum => {
                return Err(Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("`{text}` is an enum, not a function"))
                    .with_label(callee.span, "not callable"));
            }
            kind @ (SymbolKind::Event | SymbolKind::Interface | SymbolKind::Constant) => {
                return Err(Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!("`{text}` is {}, not a function", describe(kind)))
                    .with_label(callee.span, "not callable"));
            }
        }

        let Some(func_id) = self.ctx.resolve_function(name) else {
            return Err(internal_error(callee.span, "function has no signature"));
        };
        let sig = ctx.function(func_id);
        if sig.visibility == sable_ir::Visibility::External {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "external function `{text}` cannot be called from inside the contract"
                ))
                .with_label(callee.span, "external function")
                .with_secondary_label(sig.span, "declared `@external` here"));
        }

        let args = module.arena.get_expr_list(args);
        if args.len() != sig.params.len() {
            return Err(Diagnostic::error(ErrorCode::E2004)
                .with_message(format!(
                    "function `{text}` takes {} argument{} but {} were supplied",
                    sig.params.len(),
                    if sig.params.len() == 1 { "" } else { "s" },
                    args.len()
                ))
                .with_label(span, "wrong number of arguments"));
        }
        for (&arg, &(_, param_ty)) in args.iter().zip(&sig.params) {
            let found = self.check_expr(scope, arg, Some(param_ty))?;
            self.expect_type(param_ty, found, self.span_of(arg), "argument")?;
        }

        Ok(ExprInfo {
            ty: sig.ret.unwrap_or(Ty::Unit),
            constant: false,
            resolution: Resolution::Call(func_id),
        })
    }

    fn check_struct_lit(
        &mut self,
        scope: &Scope<'_>,
        name: Name,
        name_span: Span,
        inits: &[FieldInit],
    ) -> Result<ExprInfo, Diagnostic> {
        let ctx = self.ctx;
        let text = ctx.name_str(name);
        let struct_id = match self.ctx.namespace.get(name).copied() {
            Some(entry) => match (entry.kind, entry.ty) {
                (SymbolKind::Struct, Some(Ty::Struct(id))) => id,
                (kind, _) => {
                    return Err(Diagnostic::error(ErrorCode::E2008)
                        .with_message(format!("`{text}` is {}, not a struct", describe(kind)))
                        .with_label(name_span, "expected a struct"));
                }
            },
            None => {
                return Err(Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!("unknown type `{text}`"))
                    .with_label(name_span, "not declared"));
            }
        };
        let def = ctx.structs.get(struct_id);

        for init in inits {
            let hint = def.field(init.name).map(|f| f.ty);
            self.check_expr(scope, init.value, hint)?;
        }

        let mut ordered: Vec<Option<ExprId>> = vec![None; def.fields.len()];
        for init in inits {
            let Some(index) = def.fields.iter().position(|f| f.name == init.name) else {
                return Err(Diagnostic::error(ErrorCode::E2007)
                    .with_message(format!(
                        "struct `{text}` has no field `{}`",
                        self.ctx.name_str(init.name)
                    ))
                    .with_label(init.span, "unknown field"));
            };
            if ordered[index].replace(init.value).is_some() {
                return Err(Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "field `{}` specified more than once",
                        self.ctx.name_str(init.name)
                    ))
                    .with_label(init.span, "duplicate field"));
            }
        }
        if let Some(missing) = ordered.iter().position(Option::is_none) {
            return Err(Diagnostic::error(ErrorCode::E2004)
                .with_message(format!(
                    "struct `{text}` has {} fields but {} were given",
                    def.fields.len(),
                    inits.len()
                ))
                .with_label(name_span, "wrong number of fields")
                .with_note(format!(
                    "missing field `{}`",
                    self.ctx.name_str(def.fields[missing].name)
                )));
        }

        let mut constant = true;
        for init in inits {
            let Some(field) = def.field(init.name) else {
                continue;
            };
            let Some(found) = self.typed.static_type(init.value) else {
                return Err(internal_error(init.span, "field value was not checked"));
            };
            self.expect_type(field.ty, found, self.span_of(init.value), "struct field")?;
            constant &= self.typed.is_compile_time_constant(init.value);
        }

        Ok(ExprInfo {
            ty: Ty::Struct(struct_id),
            constant,
            resolution: Resolution::StructLit(ordered.into_iter().flatten().collect()),
        })
    }

    fn operand_constant(&self, id: ExprId, checked: &Checked) -> bool {
        match checked {
            Checked::Value(_) => self.typed.is_compile_time_constant(id),
            Checked::TypeRef(_) => false,
            Checked::List(_) => {
                let module = self.module;
                match &module.arena.get_expr(id).kind {
                    ExprKind::List(range) => module
                        .arena
                        .get_expr_list(*range)
                        .iter()
                        .all(|&elem| self.typed.is_compile_time_constant(elem)),
                    _ => false,
                }
            }
        }
    }

    fn binary_error(
        &self,
        err: OperatorError,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> Diagnostic {
        let side_id = |side: Side| match side {
            Side::Left => left,
            Side::Right => right,
        };
        let context = format!("operator `{}`", op.as_symbol());
        match err {
            OperatorError::InvalidReference { side } => self.invalid_reference(side_id(side)),
            OperatorError::TypeMismatch {
                expected,
                found,
                side,
            } => {
                let diag = type_mismatch(
                    self.span_of(side_id(side)),
                    &expected.display(self.ctx),
                    &found.display(self.ctx),
                    &context,
                );
                if expected.as_enum().is_some() && found.as_enum().is_some() {
                    diag.with_note("values of different enum types cannot be combined")
                } else {
                    diag
                }
            }
            OperatorError::ListElementMismatch {
                index,
                expected,
                found,
            } => {
                let module = self.module;
                let elem_span = match &module.arena.get_expr(right).kind {
                    ExprKind::List(range) => module
                        .arena
                        .get_expr_list(*range)
                        .get(index)
                        .map_or(span, |&elem| self.span_of(elem)),
                    _ => span,
                };
                type_mismatch(
                    elem_span,
                    &expected.display(self.ctx),
                    &found.display(self.ctx),
                    "`in` list element",
                )
            }
            OperatorError::InvalidOperation { ty } => {
                invalid_operation(span, op.as_symbol(), &ty.display(self.ctx))
            }
            OperatorError::MisplacedList { side } => misplaced_list(self.span_of(side_id(side))),
        }
    }

    /// A type name where a value is required.
    fn invalid_reference(&self, id: ExprId) -> Diagnostic {
        let module = self.module;
        let expr = module.arena.get_expr(id);
        let what = match expr.kind {
            ExprKind::Name(name) => format!("`{}`", self.ctx.name_str(name)),
            _ => "type".to_string(),
        };
        Diagnostic::error(ErrorCode::E2008)
            .with_message(format!("{what} is a type, not a value"))
            .with_label(expr.span, "expected a value")
    }
}

fn literal(ty: Ty) -> ExprInfo {
    ExprInfo {
        ty,
        constant: true,
        resolution: Resolution::None,
    }
}

fn misplaced_list(span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2009)
        .with_message("list literals are only allowed on the right of `in`")
        .with_label(span, "list literal here")
}
