//! Lexer for Sable.
//!
//! Two stages:
//! - logos splits the source into [`RawToken`](raw::RawToken)s, skipping
//!   horizontal whitespace and `#` comments;
//! - a layout pass turns line structure into `Newline`, `Indent` and
//!   `Dedent` tokens, interns identifiers and parses literals.
//!
//! Inside `()`, `[]` and `{}` line breaks and indentation are ignored.
//! Blank and comment-only lines never produce layout tokens.

mod raw;

use logos::Logos;
use sable_diagnostic::{Diagnostic, ErrorCode};
use sable_ir::{Span, StringInterner, Token, TokenKind, TokenList, Word};

use raw::RawToken;

/// Lex source code into a token list terminated by `Eof`.
///
/// Fails on the first invalid character, oversized literal, or bad
/// indentation.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, Diagnostic> {
    let tokens = Lexer::new(source, interner).lex_all()?;
    tracing::debug!(tokens = tokens.len(), "lexed source");
    Ok(tokens)
}

struct Lexer<'src, 'i> {
    source: &'src str,
    interner: &'i StringInterner,
    out: TokenList,
    /// Indentation widths of the enclosing blocks; bottom is always 0.
    indents: Vec<u32>,
    depth: u32,
    at_line_start: bool,
}

impl<'src, 'i> Lexer<'src, 'i> {
    fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer {
            source,
            interner,
            out: TokenList::new(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        }
    }

    fn lex_all(mut self) -> Result<TokenList, Diagnostic> {
        let mut logos = RawToken::lexer(self.source);

        while let Some(result) = logos.next() {
            let span = to_span(logos.span())?;
            let Ok(raw) = result else {
                return Err(invalid_character(logos.slice(), span));
            };

            match raw {
                RawToken::Comment => continue,
                RawToken::Newline => {
                    if self.depth == 0 {
                        if !self.at_line_start {
                            self.out.push(Token::new(TokenKind::Newline, span));
                        }
                        self.at_line_start = true;
                    }
                    continue;
                }
                _ => {}
            }

            if self.at_line_start {
                self.handle_indentation(span)?;
                self.at_line_start = false;
            }

            let kind = self.convert_token(raw, logos.slice(), span)?;
            self.depth = self.depth.saturating_add_signed(raw.depth_delta());
            self.out.push(Token::new(kind, span));
        }

        let eof = Span::point(u32::try_from(self.source.len()).unwrap_or(u32::MAX));
        if !self.at_line_start {
            self.out.push(Token::new(TokenKind::Newline, eof));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.out.push(Token::new(TokenKind::Dedent, eof));
        }
        self.out.push(Token::new(TokenKind::Eof, eof));
        Ok(self.out)
    }

    /// Compare the indentation of the line starting at `first` with the
    /// enclosing blocks and emit `Indent`/`Dedent` tokens.
    fn handle_indentation(&mut self, first: Span) -> Result<(), Diagnostic> {
        let start = first.start as usize;
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &self.source[line_start..start];

        if let Some(tab) = prefix.find('\t') {
            let at = u32::try_from(line_start + tab).unwrap_or(u32::MAX);
            return Err(Diagnostic::error(ErrorCode::E0003)
                .with_message("tabs are not allowed in indentation")
                .with_label(Span::new(at, at.saturating_add(1)), "tab here")
                .with_note("indent with spaces"));
        }

        let width = u32::try_from(prefix.trim_end_matches('\r').len()).unwrap_or(u32::MAX);
        let current = self.indents.last().copied().unwrap_or(0);
        let at = Span::point(first.start);

        if width > current {
            self.indents.push(width);
            self.out.push(Token::new(TokenKind::Indent, at));
            return Ok(());
        }

        while width < self.indents.last().copied().unwrap_or(0) {
            self.indents.pop();
            self.out.push(Token::new(TokenKind::Dedent, at));
        }
        let enclosing = self.indents.last().copied().unwrap_or(0);
        if width != enclosing {
            return Err(Diagnostic::error(ErrorCode::E0004)
                .with_message(format!(
                    "unindent to column {} does not match any outer indentation level",
                    width + 1
                ))
                .with_label(first, "inconsistent indentation"));
        }
        Ok(())
    }

    fn convert_token(
        &self,
        raw: RawToken,
        slice: &str,
        span: Span,
    ) -> Result<TokenKind, Diagnostic> {
        let kind = match raw {
            RawToken::Int => {
                let digits = slice.replace('_', "");
                let value = Word::parse_decimal(&digits)
                    .ok_or_else(|| literal_out_of_range(span))?;
                TokenKind::Int(value)
            }
            RawToken::HexInt => {
                let digits = &slice[2..];
                let value =
                    Word::parse_hex(digits).ok_or_else(|| literal_out_of_range(span))?;
                TokenKind::Hex {
                    value,
                    digits: u16::try_from(digits.len()).unwrap_or(u16::MAX),
                }
            }
            RawToken::Ident => TokenKind::Ident(self.interner.intern(slice)),

            // Keywords
            RawToken::Enum => TokenKind::Enum,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Event => TokenKind::Event,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Def => TokenKind::Def,
            RawToken::Return => TokenKind::Return,
            RawToken::Pass => TokenKind::Pass,
            RawToken::Assert => TokenKind::Assert,
            RawToken::Constant => TokenKind::Constant,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Not => TokenKind::Not,
            RawToken::In => TokenKind::In,
            RawToken::Is => TokenKind::Is,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,

            // Delimiters
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,

            // Punctuation
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::At => TokenKind::At,
            RawToken::Eq => TokenKind::Eq,

            // Operators
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,

            RawToken::Comment | RawToken::Newline => {
                return Err(Diagnostic::error(ErrorCode::E9001)
                    .with_message("layout token reached token conversion")
                    .with_label(span, "here"));
            }
        };
        Ok(kind)
    }
}

fn to_span(range: std::ops::Range<usize>) -> Result<Span, Diagnostic> {
    Span::try_from_range(range).map_err(|e| {
        Diagnostic::error(ErrorCode::E9001).with_message(format!("source too large: {e}"))
    })
}

fn invalid_character(slice: &str, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0001)
        .with_message(format!("invalid character `{}`", slice.escape_debug()))
        .with_label(span, "not valid in Sable source")
}

fn literal_out_of_range(span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0002)
        .with_message("integer literal does not fit in 256 bits")
        .with_label(span, "literal out of range")
}
