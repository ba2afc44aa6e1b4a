//! Shared helpers for parser unit tests.

use sable_diagnostic::Diagnostic;
use sable_ir::{Item, Module, StringInterner};

use crate::parse;

/// Lex and parse, panicking on any error.
pub(crate) fn parse_ok(source: &str) -> (Module, StringInterner) {
    let interner = StringInterner::new();
    let tokens = match sable_lexer::lex(source, &interner) {
        Ok(tokens) => tokens,
        Err(diag) => panic!("lex error: {diag}"),
    };
    match parse(&tokens, &interner) {
        Ok(module) => (module, interner),
        Err(diag) => panic!("parse error: {diag}"),
    }
}

/// Lex and parse, returning the diagnostic that must occur.
pub(crate) fn parse_err(source: &str) -> Diagnostic {
    let interner = StringInterner::new();
    let tokens = match sable_lexer::lex(source, &interner) {
        Ok(tokens) => tokens,
        Err(diag) => return diag,
    };
    match parse(&tokens, &interner) {
        Ok(module) => panic!("expected parse error, got {} items", module.items.len()),
        Err(diag) => diag,
    }
}

/// The single item of a one-item module.
pub(crate) fn only_item(module: &Module) -> &Item {
    match module.items.as_slice() {
        [item] => item,
        items => panic!("expected one item, got {}", items.len()),
    }
}
