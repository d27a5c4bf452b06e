//! Explicit scanning position over one sentence.
//!
//! The cursor is a plain value handed to each parsing function, so sentence parsing has no
//! hidden state and any sub-parser can be exercised on its own token slice.

use crate::zatlin::token::Token;

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    /// `tokens` must end with a terminator; the cursor never moves past it.
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn at(tokens: &'t [Token], pos: usize) -> Self {
        Self { tokens, pos }
    }

    /// Current token. Past the end this keeps returning the last token.
    pub fn peek(&self) -> &'t Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// The token before the current one, if any.
    pub fn previous(&self) -> Option<&'t Token> {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }
}
