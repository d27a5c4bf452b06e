//! Core token definitions for the zatlin lexer
//!
//! These are the raw tokens produced by the logos lexer. They carry no payload: the lexing
//! stage slices the source text by span and turns each raw token into a [`Token`], decoding
//! quote literals and recording diagnostics for the malformed ones.
//!
//! [`Token`]: crate::zatlin::token::Token
use logos::Logos;

/// All raw tokens in the zatlin format
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
// Unicode blanks and the byte order mark other than newline, and `#` comments up to (not
// including) the newline
#[logos(skip r"[[\p{White_Space}\x{FEFF}]&&[^\n]]+|#[^\n]*")]
pub enum RawToken {
    // Line breaks end sentences, so they are never skipped
    #[token("\n")]
    Newline,

    #[token("=")]
    Equal,
    #[token("|")]
    Vertical,
    #[token("-")]
    Minus,
    #[token("^")]
    Circumflex,
    #[token("%")]
    Percent,
    #[token(";")]
    Semicolon,

    // Escapes are validated later, here a backslash just pairs with the next character
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    Literal,
    // Same body with no closing quote before the end of the line
    #[regex(r#""([^"\\\n]|\\[^\n])*\\?"#)]
    UnterminatedLiteral,

    // "1", "1.", "1.5" and ".5"; a lone "." is not a number
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+")]
    Numeric,
    // A number glued to letters ("3abc") is consumed whole so it is not split silently
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)[A-Za-z_][0-9A-Za-z_]*")]
    InvalidNumeric,

    #[regex(r"[A-Za-z_][0-9A-Za-z_]*")]
    Identifier,
}
