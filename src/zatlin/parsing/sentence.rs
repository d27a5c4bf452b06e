//! Recursive-descent parsing of a single sentence.
//!
//! Grammar:
//!
//! ```text
//! sentence    := main | definition
//! main        := '%' selection ( '-' disjunction )? terminator
//! definition  := IDENT '=' selection ( '-' disjunction )? terminator
//! selection   := choice ( '|' choice )*
//! choice      := ( IDENT | LITERAL )+ NUMERIC?
//! disjunction := pattern ( '|' pattern )*
//! pattern     := '^'? LITERAL '^'?
//! terminator  := ';' | NEWLINE
//! ```
//!
//! Errors do not abort the sentence: every sub-parser reports what it finds and keeps scanning
//! up to the terminator. A sentence with any error yields no [`Sentence`].

use crate::zatlin::diagnostics::Diagnostic;
use crate::zatlin::generator::{Choice, CompiledGenerator, Pattern};
use crate::zatlin::parsing::cursor::Cursor;
use crate::zatlin::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    Main(CompiledGenerator),
    Definition {
        name: Token,
        generator: CompiledGenerator,
    },
}

/// Parse one sentence. `tokens` must end with its terminator.
pub fn parse_sentence(tokens: &[Token]) -> (Option<Sentence>, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut cursor = Cursor::new(tokens);

    let head = cursor.peek();
    let name = match head.kind {
        TokenKind::Percent => {
            cursor.advance();
            None
        }
        TokenKind::Identifier => {
            cursor.advance();
            if cursor.peek().kind != TokenKind::Equal {
                errors.push(Diagnostic::bare("Invalid definition sentence", cursor.peek()));
                return (None, errors);
            }
            cursor.advance();
            Some(head.clone())
        }
        _ => {
            errors.push(Diagnostic::bare("Invalid definition sentence", head));
            return (None, errors);
        }
    };

    let selection = parse_selection(&mut cursor, &mut errors);

    let mut disjunction = Vec::new();
    if cursor.peek().kind == TokenKind::Minus {
        cursor.advance();
        disjunction = parse_disjunction(&mut cursor, &mut errors);
    }

    if !cursor.peek().is_terminator() {
        errors.push(Diagnostic::bare("Invalid definition sentence", cursor.peek()));
    }

    if !errors.is_empty() {
        return (None, errors);
    }

    let generator = CompiledGenerator::new(selection, disjunction);
    let sentence = match name {
        Some(name) => Sentence::Definition { name, generator },
        None => Sentence::Main(generator),
    };
    (Some(sentence), errors)
}

/// Parses choices separated by `|`. Stops on the first token that cannot continue a choice,
/// leaving it under the cursor.
pub fn parse_selection(cursor: &mut Cursor<'_>, errors: &mut Vec<Diagnostic>) -> Vec<Choice> {
    let mut selection = Vec::new();
    let mut choice = Choice::new(Vec::new(), 1.0);
    let mut after_weight = false;

    loop {
        let token = cursor.peek();
        match &token.kind {
            TokenKind::Literal(_) | TokenKind::Identifier => {
                choice.sequence.push(token.clone());
                if after_weight {
                    if let Some(weight) = cursor.previous() {
                        errors.push(Diagnostic::bare("Weight is not at the rightmost", weight));
                    }
                    after_weight = false;
                }
            }
            TokenKind::Numeric => {
                if let Ok(weight) = token.text.parse::<f64>() {
                    choice.weight = weight;
                }
                after_weight = true;
            }
            _ => {
                if choice.sequence.is_empty() {
                    errors.push(Diagnostic::bare("Invalid selection expression", token));
                } else {
                    selection.push(choice);
                }
                if token.kind != TokenKind::Vertical {
                    break;
                }
                choice = Choice::new(Vec::new(), 1.0);
                after_weight = false;
            }
        }
        cursor.advance();
    }

    selection
}

/// Parses exclusion patterns separated by `|`, leaving the first token that cannot continue a
/// pattern under the cursor.
pub fn parse_disjunction(cursor: &mut Cursor<'_>, errors: &mut Vec<Diagnostic>) -> Vec<Pattern> {
    let mut disjunction = Vec::new();
    let mut literal: Option<(&Token, &str)> = None;
    let mut leading = false;
    let mut trailing = false;

    loop {
        let token = cursor.peek();
        match &token.kind {
            TokenKind::Literal(value) => {
                if literal.is_none() {
                    literal = Some((token, value.as_str()));
                } else {
                    errors.push(Diagnostic::bare(
                        "Two or more quote literals in the single expression",
                        token,
                    ));
                }
            }
            TokenKind::Circumflex => {
                let anchor = if literal.is_some() {
                    &mut trailing
                } else {
                    &mut leading
                };
                if *anchor {
                    errors.push(Diagnostic::bare("Duplicate circumflex", token));
                } else {
                    *anchor = true;
                }
            }
            _ => {
                match literal.take() {
                    Some((literal_token, value)) => disjunction.push(Pattern::new(
                        literal_token.clone(),
                        value.to_string(),
                        leading,
                        trailing,
                    )),
                    None => {
                        // a dangling "^" is a better anchor than whatever follows it
                        let anchor = match cursor.previous() {
                            Some(previous) if previous.kind == TokenKind::Circumflex => previous,
                            _ => token,
                        };
                        errors.push(Diagnostic::bare("Invalid disjunction expression", anchor));
                    }
                }
                if token.kind != TokenKind::Vertical {
                    break;
                }
                leading = false;
                trailing = false;
            }
        }
        cursor.advance();
    }

    disjunction
}
