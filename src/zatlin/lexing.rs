//! Lexer
//!
//! This module turns zatlin source text into a flat token sequence.
//!
//! Structure:
//!     Raw tokenization is done by the logos lexer in [tokens_core]. This stage then slices the
//!     source by span, converts byte offsets into line/column positions, decodes quote literals
//!     through [escapes] and records a diagnostic for every malformed token.
//!
//! Guarantees:
//!     - Tokenization never fails and always terminates. Malformed input becomes
//!       [`TokenKind::Invalid`] tokens plus diagnostics.
//!     - Newlines are always emitted, comments never swallow them.
//!     - A synthetic newline (empty text) is appended at the end of input, so sentence
//!       splitting never has to special-case the end of the stream.

pub mod escapes;
pub mod tokens_core;

use crate::zatlin::diagnostics::{Diagnostic, Diagnostics};
use crate::zatlin::token::{SourceLocation, Token, TokenKind};
use logos::Logos;
pub use tokens_core::RawToken;

/// Tokens and lexical diagnostics for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

/// Tokenize a zatlin source.
pub fn tokenize(source: &str) -> LexOutput {
    let location = SourceLocation::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let position = location.byte_to_position(span.start);

        let kind = match result {
            Ok(RawToken::Newline) => TokenKind::Newline,
            Ok(RawToken::Equal) => TokenKind::Equal,
            Ok(RawToken::Vertical) => TokenKind::Vertical,
            Ok(RawToken::Minus) => TokenKind::Minus,
            Ok(RawToken::Circumflex) => TokenKind::Circumflex,
            Ok(RawToken::Percent) => TokenKind::Percent,
            Ok(RawToken::Semicolon) => TokenKind::Semicolon,
            Ok(RawToken::Numeric) => TokenKind::Numeric,
            Ok(RawToken::Identifier) => TokenKind::Identifier,
            Ok(RawToken::Literal) => {
                let body = &text[1..text.len() - 1];
                let decoded = decode_literal(body, span.start + 1, &location, &mut diagnostics);
                if decoded.is_valid() {
                    TokenKind::Literal(decoded.value)
                } else {
                    TokenKind::Invalid
                }
            }
            Ok(RawToken::UnterminatedLiteral) => {
                decode_literal(&text[1..], span.start + 1, &location, &mut diagnostics);
                let token = Token::new(TokenKind::Invalid, text, position);
                diagnostics.error(Diagnostic::bare(
                    "The line ended before a string literal is closed",
                    &token,
                ));
                tokens.push(token);
                continue;
            }
            Ok(RawToken::InvalidNumeric) => {
                let token = Token::new(TokenKind::Invalid, text, position);
                diagnostics.error(Diagnostic::new("Invalid numeric literal", &token));
                tokens.push(token);
                continue;
            }
            Err(()) => {
                let token = Token::new(TokenKind::Invalid, text, position);
                diagnostics.error(Diagnostic::new("Invalid symbol", &token));
                tokens.push(token);
                continue;
            }
        };

        tokens.push(Token::new(kind, text, position));
    }

    tokens.push(Token::new(
        TokenKind::Newline,
        "",
        location.byte_to_position(source.len()),
    ));

    tracing::trace!(
        tokens = tokens.len(),
        errors = diagnostics.errors.len(),
        "tokenized source"
    );

    LexOutput {
        tokens,
        diagnostics,
    }
}

/// Decodes a literal body starting at byte `body_start`, recording one diagnostic per invalid
/// escape at the escape's own position.
fn decode_literal(
    body: &str,
    body_start: usize,
    location: &SourceLocation,
    diagnostics: &mut Diagnostics,
) -> escapes::Decoded {
    let decoded = escapes::decode(body);
    for error in &decoded.errors {
        let token = Token::new(
            TokenKind::Invalid,
            error.text.as_str(),
            location.byte_to_position(body_start + error.offset),
        );
        diagnostics.error(Diagnostic::new("Invalid escape sequence", &token));
    }
    decoded
}
