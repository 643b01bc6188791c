//! logos-based stylesheet tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#fff` as HexColor beats `#` as Hash)
//! 2. For equal length matches, earlier-defined variants win
//!
//! So `4dp` lexes as one [`Token::Dimension`] and `:hover` as one
//! [`Token::PseudoClass`]. `#add-button` and `#deadbeefc` lex as one
//! [`Token::HashIdent`]. A `#name` that is entirely 3 to 8 hex digits lexes as
//! [`Token::HexColor`] by priority; the parser accepts that as an id in
//! selector position.

use logos::Logos;

/// Stylesheet token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `!important` flag.
    #[token("!important")]
    Important,

    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}", priority = 10)]
    HexColor,

    /// `#name` id reference: `#sidebar`, `#add-button`.
    #[regex(r"#[a-zA-Z_][a-zA-Z0-9_-]*", priority = 5)]
    HashIdent,

    /// Number with a unit suffix: `12px`, `4dp`, `10pt`, `50%`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?(px|dp|pt|%)")]
    Dimension,

    /// Pseudo-class: `:hover`, `:active`, `:focus`, `:disabled`.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Unitless number, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: property names, type names, class names, keywords.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("#")]
    Hash,

    #[token("*")]
    Star,

    #[token(">")]
    GreaterThan,
}
