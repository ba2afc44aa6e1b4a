//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use std::mem;

use sable_diagnostic::ErrorCode;
use sable_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};
use tracing::trace;

use crate::ParseError;

/// Cursor for navigating tokens.
///
/// Invariant: the token list is non-empty and ends with `Eof`; the cursor
/// never moves past it.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    interner: &'a StringInterner,
    pos: usize,
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens: &tokens.tokens,
            interner,
            pos: 0,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Get the current position in the token stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    /// Peek at the token kind at offset `n` from the current position.
    ///
    /// `peek_kind_at(0)` is the current token. Returns `Eof` past the end.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(&EOF.kind, |t| &t.kind)
    }

    /// Span of the token at offset `n` from the current position.
    pub fn peek_span_at(&self, n: usize) -> Span {
        self.tokens.get(self.pos + n).map_or(Span::DUMMY, |t| t.span)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check if the current token has the same kind as `kind`, ignoring
    /// payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(self.current_kind()) == mem::discriminant(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Check if the token after the current one has the same kind as `kind`.
    #[inline]
    pub fn next_is(&self, kind: &TokenKind) -> bool {
        mem::discriminant(self.peek_kind_at(1)) == mem::discriminant(kind)
    }

    /// Consume the current token and return its span. Stays on `Eof`.
    pub fn advance(&mut self) -> Span {
        let token = self.current();
        trace!(pos = self.pos, kind = token.kind.describe(), "advance");
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token.span
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> Option<Span> {
        self.check(kind).then(|| self.advance())
    }

    pub fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Expect the current token to be of the given kind, advance and return
    /// its span.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    fn make_expect_error(&self, kind: &TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                kind.describe(),
                self.current_kind().describe()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.describe()))
    }

    /// Expect the closing delimiter of a group opened at `open`.
    pub fn expect_closing(&mut self, kind: &TokenKind, open: Span) -> Result<Span, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let code = if matches!(
            self.current_kind(),
            TokenKind::Eof | TokenKind::Newline | TokenKind::Dedent
        ) {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        Err(ParseError::new(
            code,
            format!(
                "expected {}, found {}",
                kind.describe(),
                self.current_kind().describe()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", kind.describe()))
        .with_related(open, "group opened here"))
    }

    /// Expect and consume an identifier.
    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            let span = self.advance();
            Ok((name, span))
        } else {
            Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected identifier, found {}", self.current_kind().describe()),
                self.current_span(),
            )
            .with_context("expected identifier"))
        }
    }
}
