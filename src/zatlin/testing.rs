//! Test helpers shared by unit and integration tests.
//!
//! [`ScriptedSource`] replays a fixed list of draws so tests can force specific choices and
//! exhaust exclusion retries deterministically. The token builders keep hand-built fixtures short.

use crate::zatlin::generator::RandomSource;
use crate::zatlin::token::{Position, Token, TokenKind};

/// A [`RandomSource`] that cycles through a scripted list of values.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    draws: usize,
}

impl ScriptedSource {
    /// Values must lie in `[0, 1)`. An empty script always draws `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, draws: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.draws % self.values.len()]
        };
        self.draws += 1;
        value
    }
}

/// An identifier token at the origin.
pub fn ident(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Position::default())
}

/// A literal token at the origin, quoted text and decoded value both taken from `value`.
pub fn literal(value: &str) -> Token {
    Token::new(
        TokenKind::Literal(value.to_string()),
        format!("\"{}\"", value),
        Position::default(),
    )
}

/// Messages of a diagnostic list, for compact assertions.
pub fn messages(diagnostics: &[crate::zatlin::diagnostics::Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}
