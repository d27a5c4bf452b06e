//! Token types shared by the lexer, parser, validator and tooling.
//!
//!     Tokens are produced once per load and never mutated afterwards. Each token carries its
//!     source text and the position of its first character, which is all the editor integration
//!     needs to map a diagnostic back to a source range `(line, column, column + text length)`.
//!
//!     Quote literals are the only tokens with a payload: [`TokenKind::Literal`] holds the
//!     escape-decoded value. Everything else is identified by its kind and text alone.

use serde::Serialize;
use std::fmt;

/// A 0-based line:column position in source code.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..byte_offset)
            .map_or(byte_offset - line_start, |prefix| prefix.chars().count());

        Position::new(line, column)
    }
}

/// Token classification.
///
/// These are also the kinds exposed to editor integrations for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TokenKind {
    Identifier,
    /// A quote literal with its escape-decoded value.
    Literal(String),
    Numeric,
    Equal,
    Vertical,
    Minus,
    Circumflex,
    Percent,
    Semicolon,
    Newline,
    /// Anything the lexer rejected. The matching diagnostic is recorded separately.
    Invalid,
}

impl TokenKind {
    /// Short name used in token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Literal(_) => "literal",
            TokenKind::Numeric => "numeric",
            TokenKind::Equal => "=",
            TokenKind::Vertical => "|",
            TokenKind::Minus => "-",
            TokenKind::Circumflex => "^",
            TokenKind::Percent => "%",
            TokenKind::Semicolon => ";",
            TokenKind::Newline => "newline",
            TokenKind::Invalid => "invalid",
        }
    }
}

/// A lexed token with its source text and start position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// The decoded value of a quote literal, `None` for every other kind.
    pub fn literal_value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier)
    }

    /// `;` and newline both end a sentence.
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, TokenKind::Semicolon | TokenKind::Newline)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, TokenKind::Invalid)
    }

    /// Length of the source text in characters, used to build lint ranges.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind.name(), self.text, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_position_counts_characters() {
        let source = "ab\n\"é\" x";
        let location = SourceLocation::new(source);

        assert_eq!(location.byte_to_position(0), Position::new(0, 0));
        assert_eq!(location.byte_to_position(3), Position::new(1, 0));
        // "é" is two bytes wide but a single column
        assert_eq!(location.byte_to_position(source.len() - 1), Position::new(1, 4));
    }

    #[test]
    fn test_position_at_end_of_input() {
        let source = "a\n";
        let location = SourceLocation::new(source);
        assert_eq!(location.byte_to_position(2), Position::new(1, 0));
    }

    #[test]
    fn test_literal_value_only_for_literals() {
        let literal = Token::new(
            TokenKind::Literal("A".into()),
            "\"\\u0041\"",
            Position::default(),
        );
        let ident = Token::new(TokenKind::Identifier, "A", Position::default());

        assert_eq!(literal.literal_value(), Some("A"));
        assert_eq!(ident.literal_value(), None);
        assert_eq!(literal.width(), 8);
    }
}
