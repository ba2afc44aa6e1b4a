//! Shared helpers for semantic analysis tests.

use sable_diagnostic::Diagnostic;
use sable_ir::Module;

use crate::{check_module, collect_declarations, CompilationContext, TypedModule};

fn parse(source: &str, ctx: &CompilationContext) -> Result<Module, Diagnostic> {
    let tokens = sable_lexer::lex(source, &ctx.interner)?;
    sable_parse::parse(&tokens, &ctx.interner)
}

/// Run the declarations pass, panicking on any error.
pub(crate) fn declare_ok(source: &str) -> (Module, CompilationContext) {
    let mut ctx = CompilationContext::new();
    let module = match parse(source, &ctx) {
        Ok(module) => module,
        Err(diag) => panic!("parse error: {diag}"),
    };
    if let Err(diag) = collect_declarations(&module, &mut ctx) {
        panic!("declaration error: {diag}");
    }
    (module, ctx)
}

/// Run the declarations pass, returning the diagnostic that must occur.
pub(crate) fn declare_err(source: &str) -> Diagnostic {
    let mut ctx = CompilationContext::new();
    let module = match parse(source, &ctx) {
        Ok(module) => module,
        Err(diag) => panic!("parse error: {diag}"),
    };
    match collect_declarations(&module, &mut ctx) {
        Ok(()) => panic!("expected a declaration error"),
        Err(diag) => diag,
    }
}

/// Declare and check, panicking on any error.
pub(crate) fn check_ok(source: &str) -> (Module, CompilationContext, TypedModule) {
    let (module, ctx) = declare_ok(source);
    match check_module(&module, &ctx) {
        Ok(typed) => (module, ctx, typed),
        Err(diag) => panic!("check error: {diag}"),
    }
}

/// Declare and check, returning the first diagnostic from either pass.
pub(crate) fn check_err(source: &str) -> Diagnostic {
    let mut ctx = CompilationContext::new();
    let module = match parse(source, &ctx) {
        Ok(module) => module,
        Err(diag) => panic!("parse error: {diag}"),
    };
    if let Err(diag) = collect_declarations(&module, &mut ctx) {
        return diag;
    }
    match check_module(&module, &ctx) {
        Ok(_) => panic!("expected a check error"),
        Err(diag) => diag,
    }
}
