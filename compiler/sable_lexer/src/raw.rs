//! Raw tokens produced by logos, before interning and layout.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,

    // === Keywords ===
    #[token("enum")]
    Enum,
    #[token("struct")]
    Struct,
    #[token("event")]
    Event,
    #[token("interface")]
    Interface,
    #[token("def")]
    Def,
    #[token("return")]
    Return,
    #[token("pass")]
    Pass,
    #[token("assert")]
    Assert,
    #[token("constant")]
    Constant,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("True")]
    True,
    #[token("False")]
    False,

    // === Literals ===
    #[regex(r"0x[0-9a-fA-F]+")]
    HexInt,
    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // === Punctuation ===
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("@")]
    At,
    #[token("=")]
    Eq,

    // === Operators ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
}

impl RawToken {
    /// Change in bracket nesting depth caused by this token.
    pub(crate) fn depth_delta(self) -> i32 {
        match self {
            RawToken::LParen | RawToken::LBracket | RawToken::LBrace => 1,
            RawToken::RParen | RawToken::RBracket | RawToken::RBrace => -1,
            _ => 0,
        }
    }
}
