//! Statements inside function bodies.

use sable_diagnostic::ErrorCode;
use sable_ir::{Stmt, StmtKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement line, including its trailing newline.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Pass => {
                self.cursor.advance();
                StmtKind::Pass
            }
            TokenKind::Return => {
                self.cursor.advance();
                if matches!(
                    self.cursor.current_kind(),
                    TokenKind::Newline | TokenKind::Eof
                ) {
                    StmtKind::Return(None)
                } else {
                    StmtKind::Return(Some(self.parse_expr()?))
                }
            }
            TokenKind::Assert => {
                self.cursor.advance();
                StmtKind::Assert(self.parse_expr()?)
            }
            TokenKind::Ident(_) if self.cursor.next_is(&TokenKind::Colon) => {
                let (name, name_span) = self.cursor.expect_ident()?;
                self.cursor.advance();
                let ty = self.parse_type()?;
                self.cursor.expect(&TokenKind::Eq)?;
                let value = self.parse_expr()?;
                StmtKind::Let {
                    name,
                    name_span,
                    ty,
                    value,
                }
            }
            TokenKind::Ident(_) if self.cursor.next_is(&TokenKind::Eq) => {
                let (target, target_span) = self.cursor.expect_ident()?;
                self.cursor.advance();
                let value = self.parse_expr()?;
                StmtKind::Assign {
                    target,
                    target_span,
                    value,
                }
            }
            TokenKind::Indent => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "unexpected indentation",
                    start,
                ))
            }
            _ => StmtKind::Expr(self.parse_expr()?),
        };
        let span = self.span_from(start);
        self.expect_line_end()?;
        Ok(Stmt::new(kind, span))
    }
}
