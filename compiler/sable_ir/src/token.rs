//! Token types produced by the lexer.

use std::fmt;

use crate::{Name, Span, Word};

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Sable.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // === Literals ===
    /// Decimal integer literal: 42, `1_000`
    Int(Word),
    /// Hex literal; `digits` is the number of hex digits written, which
    /// decides between `uint256`, `address` (40) and `bytes32` (64).
    Hex { value: Word, digits: u16 },

    // === Identifiers ===
    Ident(Name),

    // === Keywords ===
    Enum,
    Struct,
    Event,
    Interface,
    Def,
    Return,
    Pass,
    Assert,
    Constant,
    And,
    Or,
    Not,
    In,
    Is,
    True,
    False,

    // === Symbols ===
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Dot,
    Arrow,
    At,
    Eq,

    // === Operators ===
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // === Layout ===
    /// End of a logical line.
    Newline,
    /// Indentation increased.
    Indent,
    /// Indentation decreased by one level.
    Dedent,

    Eof,
}

impl TokenKind {
    /// Human-readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer literal",
            TokenKind::Hex { .. } => "hex literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Enum => "`enum`",
            TokenKind::Struct => "`struct`",
            TokenKind::Event => "`event`",
            TokenKind::Interface => "`interface`",
            TokenKind::Def => "`def`",
            TokenKind::Return => "`return`",
            TokenKind::Pass => "`pass`",
            TokenKind::Assert => "`assert`",
            TokenKind::Constant => "`constant`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::In => "`in`",
            TokenKind::Is => "`is`",
            TokenKind::True => "`True`",
            TokenKind::False => "`False`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Arrow => "`->`",
            TokenKind::At => "`@`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indented block",
            TokenKind::Dedent => "end of block",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Lexer output: tokens including layout tokens, terminated by `Eof`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Get number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token kinds only, for tests and debugging.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }
}
