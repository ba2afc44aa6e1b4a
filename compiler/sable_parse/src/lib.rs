//! Recursive descent parser for Sable.
//!
//! Consumes the layout-aware token stream from `sable_lexer` and produces a
//! flat [`Module`] whose expressions live in an [`ExprArena`]. Parsing is
//! fail-fast: the first error aborts and is returned as a [`Diagnostic`].

mod cursor;
mod error;
mod grammar;
#[cfg(test)]
mod test_helpers;

pub use cursor::Cursor;
pub use error::ParseError;

use sable_diagnostic::Diagnostic;
use sable_ir::{ExprArena, Module, StringInterner, TokenList};

/// Maximum nesting depth of expressions before parsing gives up.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::new(),
            depth: 0,
        }
    }

    /// Parse a whole compilation unit.
    pub fn parse_module(mut self) -> Result<Module, ParseError> {
        let mut items = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.is_at_end() {
                break;
            }
            items.push(self.parse_item()?);
        }
        tracing::debug!(items = items.len(), exprs = self.arena.expr_count(), "parsed module");
        Ok(Module {
            items,
            arena: self.arena,
        })
    }
}

/// Parse tokens into a module.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Module, Diagnostic> {
    Parser::new(tokens, interner)
        .parse_module()
        .map_err(|e| e.to_diagnostic())
}

#[cfg(test)]
mod tests;
