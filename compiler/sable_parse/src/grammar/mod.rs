//! Grammar rules, one module per syntactic category.
//!
//! - `item`: top-level declarations
//! - `stmt`: statements inside function bodies
//! - `expr`: expressions and operator precedence

mod expr;
mod item;
mod stmt;

use sable_ir::{Span, TokenKind, TypeExpr};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse an indented block, or a single line following `:` on the same
    /// line.
    ///
    /// `line` parses one line including its terminating `Newline`. A header
    /// followed by a newline with no indented block yields an empty list.
    pub(crate) fn parse_block<T>(
        &mut self,
        mut line: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        if self.cursor.eat(&TokenKind::Newline).is_none() {
            return Ok(vec![line(self)?]);
        }
        if self.cursor.eat(&TokenKind::Indent).is_none() {
            return Ok(Vec::new());
        }

        let mut lines = Vec::new();
        while !self.cursor.check(&TokenKind::Dedent) && !self.cursor.is_at_end() {
            lines.push(line(self)?);
        }
        self.cursor.expect(&TokenKind::Dedent)?;
        Ok(lines)
    }

    /// Parse a type annotation. All Sable types are plain names.
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let (name, span) = self
            .cursor
            .expect_ident()
            .map_err(|e| e.with_context("expected a type name"))?;
        Ok(TypeExpr { name, span })
    }

    /// Expect the end of a logical line.
    pub(crate) fn expect_line_end(&mut self) -> Result<Span, ParseError> {
        if self.cursor.is_at_end() {
            return Ok(self.cursor.current_span());
        }
        self.cursor.expect(&TokenKind::Newline)
    }

    /// Span from `start` to the end of the previously consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }
}
