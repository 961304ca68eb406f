use crate::error::{ErrorKind, SyntaxError};
use crate::token::{Pos, Token, TokenKind};

static END: Token = Token {
    kind: TokenKind::EndOfInput,
    pos: Pos { line: 0, column: 0 },
};

/// Read position in a token stream. Past the last token the cursor keeps
/// returning `EndOfInput`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, index: 0 }
    }

    pub fn peek(&self) -> &'a Token {
        self.tokens.get(self.index).unwrap_or(&END)
    }

    pub fn peek_kind(&self) -> &'a TokenKind {
        &self.peek().kind
    }

    pub fn take(&mut self) -> &'a Token {
        let token = self.peek();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn is_at_line_end(&self) -> bool {
        self.peek_kind().is_line_end()
    }

    /// Consumes the next token when it has exactly `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.take();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: &TokenKind, what: &'static str) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(ErrorKind::Expected(what)))
        }
    }

    /// Error pointing at the next token.
    pub fn error(&self, kind: ErrorKind) -> SyntaxError {
        let token = self.peek();
        if token.kind == TokenKind::EndOfInput {
            let pos = self.tokens.last().map(|t| t.pos).unwrap_or_default();
            return SyntaxError {
                pos,
                kind,
                token: Some(TokenKind::EndOfInput),
            };
        }
        SyntaxError::at(token, kind)
    }

    /// Skips to the next `NewLine` without consuming it.
    pub fn skip_line(&mut self) {
        while !self.is_at_line_end() {
            self.take();
        }
    }
}
