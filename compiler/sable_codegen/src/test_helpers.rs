//! Shared helpers for codegen tests.

use sable_ir::{Module, Word};
use sable_types::{check_module, collect_declarations, CompilationContext, TypedModule};

use crate::{lower_module, Machine, Program};

/// Everything a test needs from the front end.
pub(crate) struct Checked {
    pub module: Module,
    pub ctx: CompilationContext,
    pub typed: TypedModule,
}

pub(crate) fn check(source: &str) -> Checked {
    let mut ctx = CompilationContext::new();
    let tokens = sable_lexer::lex(source, &ctx.interner).unwrap_or_else(|d| panic!("{d}"));
    let module = sable_parse::parse(&tokens, &ctx.interner).unwrap_or_else(|d| panic!("{d}"));
    if let Err(diag) = collect_declarations(&module, &mut ctx) {
        panic!("{diag}");
    }
    let typed = check_module(&module, &ctx).unwrap_or_else(|d| panic!("{d}"));
    Checked { module, ctx, typed }
}

pub(crate) fn lower(source: &str, fold_constants: bool) -> Program {
    let checked = check(source);
    lower_module(&checked.module, &checked.ctx, &checked.typed, fold_constants)
        .unwrap_or_else(|d| panic!("{d}"))
}

/// Run the zero-argument function `name` and return its single word.
pub(crate) fn run_word(program: &Program, name: &str) -> Word {
    match Machine::new(program).run(name, &[]) {
        Ok(words) if words.len() == 1 => words[0].clone(),
        Ok(words) => panic!("expected one word, got {}", words.len()),
        Err(err) => panic!("{err}"),
    }
}
