//! Expression parsing.
//!
//! Precedence, lowest first:
//!
//! | Level | Operators |
//! |---|---|
//! | or | `or` |
//! | and | `and` |
//! | not | prefix `not` |
//! | comparison | `==` `!=` `<` `<=` `>` `>=` `in` `is` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | unary | prefix `-` |
//! | postfix | `.attr`, `(args)` |

mod operators;

use sable_diagnostic::ErrorCode;
use sable_ir::{BinaryOp, Expr, ExprId, ExprKind, FieldInit, Span, TokenKind, UnaryOp};
use tracing::trace;

use crate::{ParseError, Parser, MAX_EXPR_DEPTH};

impl Parser<'_> {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        if self.depth >= MAX_EXPR_DEPTH {
            return Err(ParseError::new(
                ErrorCode::E1002,
                "expression is nested too deeply",
                self.cursor.current_span(),
            ));
        }
        self.depth += 1;
        let result = self.parse_or();
        self.depth -= 1;
        result
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.span_of(left).merge(self.span_of(right));
        self.alloc(ExprKind::Binary { op, left, right }, span)
    }

    /// Parse `or` (lowest precedence binary).
    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(&TokenKind::Or).is_some() {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_not()?;
        while self.cursor.eat(&TokenKind::And).is_some() {
            let right = self.parse_not()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<ExprId, ParseError> {
        if let Some(start) = self.cursor.eat(&TokenKind::Not) {
            let operand = self.parse_not()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        if let Some(start) = self.cursor.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand,
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cursor.eat(&TokenKind::Dot).is_some() {
                let (attr, attr_span) = self
                    .cursor
                    .expect_ident()
                    .map_err(|e| e.with_context("expected attribute name after `.`"))?;
                let span = self.span_of(expr).merge(attr_span);
                expr = self.alloc(
                    ExprKind::Attribute {
                        value: expr,
                        attr,
                        attr_span,
                    },
                    span,
                );
            } else if let Some(open) = self.cursor.eat(&TokenKind::LParen) {
                let args = self.parse_comma_list(&TokenKind::RParen, open)?;
                let args = self.arena.alloc_expr_list(args);
                let span = self.span_from(self.span_of(expr));
                expr = self.alloc(ExprKind::Call { func: expr, args }, span);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.current_span();
        trace!(kind = self.cursor.current_kind().describe(), "parse_primary");
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(value) => ExprKind::Int(value.clone()),
            TokenKind::Hex { value, digits } => ExprKind::Hex {
                value: value.clone(),
                digits: *digits,
            },
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Ident(name) => {
                let name = *name;
                if self.cursor.next_is(&TokenKind::LParen)
                    && matches!(self.cursor.peek_kind_at(2), TokenKind::LBrace)
                {
                    return self.parse_struct_literal();
                }
                ExprKind::Name(name)
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect_closing(&TokenKind::RParen, span)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let elems = self.parse_comma_list(&TokenKind::RBracket, span)?;
                let elems = self.arena.alloc_expr_list(elems);
                let span = self.span_from(span);
                return Ok(self.alloc(ExprKind::List(elems), span));
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found {}", other.describe()),
                    span,
                )
                .with_context("expected expression"));
            }
        };
        self.cursor.advance();
        Ok(self.alloc(kind, span))
    }

    /// `Name({field: value, ...})`
    fn parse_struct_literal(&mut self) -> Result<ExprId, ParseError> {
        let (name, name_span) = self.cursor.expect_ident()?;
        let paren = self.cursor.expect(&TokenKind::LParen)?;
        let brace = self.cursor.expect(&TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            let (field, field_span) = self.cursor.expect_ident()?;
            self.cursor.expect(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            fields.push(FieldInit {
                name: field,
                value,
                span: field_span.merge(self.span_of(value)),
            });
            if self.cursor.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
        self.cursor.expect_closing(&TokenKind::RBrace, brace)?;
        self.cursor.expect_closing(&TokenKind::RParen, paren)?;

        let span = self.span_from(name_span);
        Ok(self.alloc(
            ExprKind::StructLit {
                name,
                name_span,
                fields,
            },
            span,
        ))
    }

    /// Comma-separated expressions up to `close`; trailing comma allowed.
    fn parse_comma_list(
        &mut self,
        close: &TokenKind,
        open: Span,
    ) -> Result<Vec<ExprId>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close)
            && !matches!(
                self.cursor.current_kind(),
                TokenKind::Newline | TokenKind::Eof
            )
        {
            items.push(self.parse_expr()?);
            if self.cursor.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
        self.cursor.expect_closing(close, open)?;
        Ok(items)
    }
}
