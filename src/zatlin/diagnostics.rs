//! Diagnostic records produced by every compiler stage.
//!
//! Problems in a zatlin source are never Rust errors. Each stage appends [`Diagnostic`]s to a
//! shared [`Diagnostics`] sink and keeps going, so a single load reports everything wrong with
//! the whole source. Every diagnostic is anchored on exactly one token.

use crate::zatlin::token::{Position, Token};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A message anchored on the token that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub token: Token,
}

impl Diagnostic {
    /// Builds a diagnostic whose message is suffixed with the offending token's text.
    pub fn new(message: &str, token: &Token) -> Self {
        Self {
            message: format!("{} {}", message, token.text),
            token: token.clone(),
        }
    }

    /// Builds a diagnostic that keeps the message as is.
    pub fn bare(message: &str, token: &Token) -> Self {
        Self {
            message: message.to_string(),
            token: token.clone(),
        }
    }

    pub fn position(&self) -> Position {
        self.token.position
    }

    pub fn line(&self) -> usize {
        self.token.position.line
    }

    pub fn column(&self) -> usize {
        self.token.position.column
    }

    pub fn token_text(&self) -> &str {
        &self.token.text
    }

    /// Column just past the anchored token, for editor lint ranges.
    pub fn end_column(&self) -> usize {
        self.column() + self.token.width()
    }

    pub fn to_record(&self, severity: Severity) -> DiagnosticRecord {
        DiagnosticRecord {
            severity,
            message: self.message.clone(),
            line: self.line(),
            column: self.column(),
            end_column: self.end_column(),
            token_text: self.token.text.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position(), self.message)
    }
}

/// Flat, serializable view of a diagnostic for hosts and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
    pub token_text: String,
}

/// Ordered error and warning lists accumulated across one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn warning(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors first, then warnings, each in recording order.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.errors
            .iter()
            .map(|d| d.to_record(Severity::Error))
            .chain(self.warnings.iter().map(|d| d.to_record(Severity::Warning)))
            .collect()
    }
}
