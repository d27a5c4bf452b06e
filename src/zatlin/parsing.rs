//! Parser
//!
//! Splits the token stream into sentences and collects their definitions and the main pattern.
//!
//! Sentence splitting:
//!     A sentence is a maximal run of tokens ended by `;` or a newline. A sentence made of its
//!     terminator alone is skipped. A sentence containing an invalid token is skipped too: the
//!     lexer already reported it, and parsing it would only produce follow-up noise.
//!
//! Program rules:
//!     - Definition names are unique. A duplicate is reported and discarded.
//!     - Exactly one main pattern. The first one wins, later ones are reported.
//!     - A missing main pattern is reported on the final synthetic newline.

pub mod cursor;
pub mod sentence;

use crate::zatlin::diagnostics::{Diagnostic, Diagnostics};
use crate::zatlin::generator::{CompiledGenerator, Definitions};
use crate::zatlin::token::Token;
pub use sentence::{parse_sentence, Sentence};

/// Definitions and main pattern of a parsed source, not yet validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedProgram {
    pub definitions: Definitions,
    pub main: Option<CompiledGenerator>,
    pub diagnostics: Diagnostics,
}

/// Parse a token stream produced by [`tokenize`](crate::zatlin::lexing::tokenize).
pub fn parse(tokens: &[Token]) -> ParsedProgram {
    let mut program = ParsedProgram::default();
    let mut start = 0;
    let mut has_invalid = false;

    for (index, token) in tokens.iter().enumerate() {
        if token.is_terminator() {
            let sentence = &tokens[start..=index];
            if sentence.len() > 1 && !has_invalid {
                parse_into(&mut program, sentence);
            } else if has_invalid {
                tracing::trace!(line = sentence[0].position.line, "skipping invalid sentence");
            }
            start = index + 1;
            has_invalid = false;
        } else if token.is_invalid() {
            has_invalid = true;
        }
    }

    if program.main.is_none() {
        if let Some(last) = tokens.last() {
            program
                .diagnostics
                .error(Diagnostic::bare("No main pattern", last));
        }
    }

    program
}

fn parse_into(program: &mut ParsedProgram, tokens: &[Token]) {
    let (sentence, errors) = parse_sentence(tokens);
    for error in errors {
        program.diagnostics.error(error);
    }

    match sentence {
        Some(Sentence::Main(generator)) => {
            if program.main.is_none() {
                program.main = Some(generator);
            } else {
                program.diagnostics.error(Diagnostic::bare(
                    "Duplicate definition of the main pattern",
                    &tokens[0],
                ));
            }
        }
        Some(Sentence::Definition { name, generator }) => {
            let duplicate = Diagnostic::new("Duplicate definition", &name);
            if !program.definitions.insert(name, generator) {
                program.diagnostics.error(duplicate);
            }
        }
        None => {}
    }
}
