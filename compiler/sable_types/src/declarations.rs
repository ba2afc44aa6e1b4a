//! Declarations pass.
//!
//! Populates a [`CompilationContext`] from a parsed module:
//!
//! - **Pass 1**: every top-level name, in source order. Enums are built by
//!   the Member Set Builder, declared in the namespace, then registered.
//!   Struct ids are reserved so fields may name structs declared later.
//! - **Pass 2**: struct fields, depth-first so nested struct widths are
//!   known before their containers.
//! - **Pass 3**: event fields, interface methods, function signatures and
//!   constant types.
//!
//! The first violation aborts the pass.

use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{
    ConstantDecl, Decorator, EventDecl, FieldDecl, FunctionDecl, InterfaceDecl, Item, Module,
    Mutability, Name, Span, StructDecl, TypeExpr, Visibility,
};

use crate::namespace::article;
use crate::{
    CompilationContext, ConstantDef, EnumType, EventDef, FunctionSig, InterfaceDef, MethodSig,
    StructId, SymbolKind, Ty,
};

/// Run the declarations pass over `module`.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn collect_declarations(module: &Module, ctx: &mut CompilationContext) -> Result<(), Diagnostic> {
    for item in &module.items {
        declare_item(item, ctx)?;
    }

    let structs: Vec<(StructId, &StructDecl)> = module
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(decl) => ctx.structs.resolve_id(decl.name).map(|id| (id, decl)),
            _ => None,
        })
        .collect();
    let mut state = vec![Visit::Pending; ctx.structs.len()];
    for &(id, _) in &structs {
        define_struct(id, &structs, &mut state, ctx)?;
    }

    for (index, item) in module.items.iter().enumerate() {
        match item {
            Item::Event(decl) => collect_event(decl, ctx)?,
            Item::Interface(decl) => collect_interface(decl, ctx)?,
            Item::Function(decl) => collect_function(decl, index, ctx)?,
            Item::Constant(decl) => collect_constant(decl, ctx)?,
            Item::Enum(_) | Item::Struct(_) => {}
        }
    }
    Ok(())
}

fn declare_item(item: &Item, ctx: &mut CompilationContext) -> Result<(), Diagnostic> {
    let name = item.name();
    let span = item.name_span();
    let text = ctx.name_str(name);
    if Ty::builtin(&text).is_some() {
        return Err(Diagnostic::error(ErrorCode::E2006)
            .with_message(format!("`{text}` is already declared as a builtin type"))
            .with_label(span, "builtin type name reused here"));
    }

    match item {
        Item::Enum(decl) => {
            let ty = EnumType::build(decl.name, decl.name_span, &decl.members)
                .map_err(|err| err.to_diagnostic(&ctx.interner))?;
            let id = ctx.enums.next_id();
            ctx.namespace
                .declare(name, SymbolKind::Enum, Some(Ty::Enum(id)), span)
                .map_err(|err| err.to_diagnostic(&ctx.interner))?;
            ctx.enums.register(ty);
        }
        Item::Struct(_) => {
            let id = ctx.structs.next_id();
            ctx.namespace
                .declare(name, SymbolKind::Struct, Some(Ty::Struct(id)), span)
                .map_err(|err| err.to_diagnostic(&ctx.interner))?;
            ctx.structs.reserve(name, span);
        }
        Item::Event(_) => declare_untyped(name, SymbolKind::Event, span, ctx)?,
        Item::Interface(_) => declare_untyped(name, SymbolKind::Interface, span, ctx)?,
        Item::Function(_) => declare_untyped(name, SymbolKind::Function, span, ctx)?,
        Item::Constant(_) => declare_untyped(name, SymbolKind::Constant, span, ctx)?,
    }
    Ok(())
}

fn declare_untyped(
    name: Name,
    kind: SymbolKind,
    span: Span,
    ctx: &mut CompilationContext,
) -> Result<(), Diagnostic> {
    ctx.namespace
        .declare(name, kind, None, span)
        .map_err(|err| err.to_diagnostic(&ctx.interner))
}

/// Resolve a type annotation.
pub(crate) fn resolve_type(ctx: &CompilationContext, ty: TypeExpr) -> Result<Ty, Diagnostic> {
    let text = ctx.name_str(ty.name);
    if let Some(builtin) = Ty::builtin(&text) {
        return Ok(builtin);
    }
    match ctx.namespace.get(ty.name) {
        Some(entry) if entry.kind.is_type() => entry.ty.ok_or_else(|| {
            Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("type `{text}` has no recorded definition"))
                .with_label(ty.span, "here")
        }),
        Some(entry) => Err(Diagnostic::error(ErrorCode::E2008)
            .with_message(format!("`{text}` is {}, not a type", describe(entry.kind)))
            .with_label(ty.span, "expected a type")
            .with_secondary_label(entry.span, "declared here")),
        None => Err(Diagnostic::error(ErrorCode::E2002)
            .with_message(format!("unknown type `{text}`"))
            .with_label(ty.span, "not declared")),
    }
}

/// `an event`, `a function`, ...
pub(crate) fn describe(kind: SymbolKind) -> String {
    format!("{} {kind}", article(kind))
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Visit {
    Pending,
    Active,
    Done,
}

fn define_struct(
    id: StructId,
    structs: &[(StructId, &StructDecl)],
    state: &mut [Visit],
    ctx: &mut CompilationContext,
) -> Result<(), Diagnostic> {
    let Some(&(_, decl)) = structs.iter().find(|(sid, _)| *sid == id) else {
        return Ok(());
    };
    match state[id.index()] {
        Visit::Done => return Ok(()),
        Visit::Active => {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "struct `{}` contains itself",
                    ctx.name_str(decl.name)
                ))
                .with_label(decl.name_span, "recursive struct")
                .with_note("a struct value occupies a fixed number of words"));
        }
        Visit::Pending => {}
    }
    state[id.index()] = Visit::Active;

    let mut fields = Vec::with_capacity(decl.fields.len());
    check_unique_fields(&decl.fields, "struct", ctx)?;
    for field in &decl.fields {
        let ty = resolve_type(ctx, field.ty)?;
        if let Ty::Struct(inner) = ty {
            define_struct(inner, structs, state, ctx)?;
        }
        fields.push((field.name, ty, field.span));
    }
    ctx.structs.define(id, fields);
    state[id.index()] = Visit::Done;
    tracing::debug!(name = ?decl.name, width = ctx.structs.get(id).width, "defined struct");
    Ok(())
}

fn check_unique_fields(
    fields: &[FieldDecl],
    owner: &str,
    ctx: &CompilationContext,
) -> Result<(), Diagnostic> {
    for (i, field) in fields.iter().enumerate() {
        if let Some(first) = fields[..i].iter().find(|f| f.name == field.name) {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "{owner} field `{}` declared twice",
                    ctx.name_str(field.name)
                ))
                .with_label(field.span, "duplicate field")
                .with_secondary_label(first.span, "first declared here"));
        }
    }
    Ok(())
}

fn collect_event(decl: &EventDecl, ctx: &mut CompilationContext) -> Result<(), Diagnostic> {
    check_unique_fields(&decl.fields, "event", ctx)?;
    let fields = decl
        .fields
        .iter()
        .map(|f| resolve_type(ctx, f.ty).map(|ty| (f.name, ty)))
        .collect::<Result<Vec<_>, _>>()?;
    ctx.events.push(EventDef {
        name: decl.name,
        fields,
        span: decl.span,
    });
    Ok(())
}

fn collect_interface(decl: &InterfaceDecl, ctx: &mut CompilationContext) -> Result<(), Diagnostic> {
    let mut methods: Vec<MethodSig> = Vec::with_capacity(decl.methods.len());
    for method in &decl.methods {
        if methods.iter().any(|m| m.name == method.name) {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "interface method `{}` declared twice",
                    ctx.name_str(method.name)
                ))
                .with_label(method.span, "duplicate method"));
        }
        let params = method
            .params
            .iter()
            .map(|p| resolve_type(ctx, p.ty))
            .collect::<Result<Vec<_>, _>>()?;
        let ret = method.ret.map(|ty| resolve_type(ctx, ty)).transpose()?;
        methods.push(MethodSig {
            name: method.name,
            params,
            ret,
            mutability: method.mutability,
        });
    }
    ctx.interfaces.push(InterfaceDef {
        name: decl.name,
        methods,
        span: decl.span,
    });
    Ok(())
}

fn collect_function(
    decl: &FunctionDecl,
    item_index: usize,
    ctx: &mut CompilationContext,
) -> Result<(), Diagnostic> {
    let mut visibility: Option<(Visibility, Span)> = None;
    let mut mutability: Option<(Mutability, Span)> = None;
    for &(decorator, span) in &decl.decorators {
        let previous = match decorator {
            Decorator::Visibility(v) => visibility.replace((v, span)).map(|(_, s)| s),
            Decorator::Mutability(m) => mutability.replace((m, span)).map(|(_, s)| s),
        };
        if let Some(first) = previous {
            return Err(Diagnostic::error(ErrorCode::E2009)
                .with_message(format!(
                    "conflicting decorators on function `{}`",
                    ctx.name_str(decl.name)
                ))
                .with_label(span, "second decorator of the same kind")
                .with_secondary_label(first, "first decorator here"));
        }
    }

    let params = decl
        .params
        .iter()
        .map(|p| resolve_type(ctx, p.ty).map(|ty| (p.name, ty)))
        .collect::<Result<Vec<_>, _>>()?;
    let ret = decl.ret.map(|ty| resolve_type(ctx, ty)).transpose()?;

    ctx.add_function(FunctionSig {
        name: decl.name,
        span: decl.name_span,
        params,
        ret,
        visibility: visibility.map(|(v, _)| v).unwrap_or_default(),
        mutability: mutability.map(|(m, _)| m).unwrap_or_default(),
        item_index,
    });
    Ok(())
}

fn collect_constant(decl: &ConstantDecl, ctx: &mut CompilationContext) -> Result<(), Diagnostic> {
    let ty = resolve_type(ctx, decl.ty)?;
    ctx.namespace.set_type(decl.name, ty);
    ctx.add_constant(ConstantDef {
        name: decl.name,
        ty,
        value: decl.value,
        span: decl.name_span,
    });
    Ok(())
}

#[cfg(test)]
mod tests;
