//! Positioned cursor over the token vector.
//!
//! The cursor is the only mutable view the parser has of its input. Besides
//! the position index it keeps a one-slot pushback buffer, charged when the
//! `>>`-split rule fires while closing nested generic argument lists; the
//! backing vector itself is never mutated.

use forge_token::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};

/// Saved cursor state for speculative parsing (generic-argument lookahead).
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    pos: usize,
    pushback: Option<Token>,
}

/// Positioned view over the token vector.
pub(crate) struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    /// Token spliced in front of the stream by the `>>` split.
    pushback: Option<Token>,
    /// The most recently consumed token, for `peek(-1)`.
    previous: Option<Token>,
}

impl TokenCursor {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        TokenCursor { tokens, pos: 0, pushback: None, previous: None }
    }

    /// The current token. Past the end returns the final `Eof` token if the
    /// stream carries one.
    pub(crate) fn current(&self) -> Option<&Token> {
        if let Some(pushed) = &self.pushback {
            return Some(pushed);
        }
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Kind of the current token; `Eof` past the end of input.
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    /// Peek at the token `offset` positions ahead. Offset 0 is the current
    /// token; negative offsets look backwards (`-1` is the token just
    /// consumed).
    pub(crate) fn peek(&self, offset: isize) -> Option<&Token> {
        if offset == 0 {
            return self.current();
        }
        if offset < 0 {
            if offset == -1 {
                if self.previous.is_some() {
                    return self.previous.as_ref();
                }
            }
            let back = offset.unsigned_abs();
            return self.pos.checked_sub(back).and_then(|i| self.tokens.get(i));
        }
        // Positive offsets: account for the pushback slot occupying offset 0.
        let mut ahead = offset as usize;
        if self.pushback.is_some() {
            ahead -= 1;
        }
        self.tokens.get(self.pos + ahead)
    }

    /// Kind of the token `offset` positions ahead; `Eof` out of range.
    pub(crate) fn peek_kind(&self, offset: isize) -> TokenKind {
        self.peek(offset).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    /// Non-consuming match against one kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Non-consuming match against any of the given kinds.
    pub(crate) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Consume the current token if it matches `kind`; returns whether it did.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches any of `kinds`, returning it.
    pub(crate) fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if self.check_any(kinds) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail with an expected/got error.
    pub(crate) fn consume(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let (found, line, column) = self.describe_current();
            Err(ParseError::expected(expected, found, line, column))
        }
    }

    /// Consume and return the current token. At the end of input keeps
    /// returning the `Eof` token.
    pub(crate) fn advance(&mut self) -> Token {
        if let Some(pushed) = self.pushback.take() {
            self.previous = Some(pushed.clone());
            return pushed;
        }
        let token = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", 0, 0, 0));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.previous = Some(token.clone());
        token
    }

    /// Splice a token in front of the current position. Only the `>>` split
    /// uses this; the slot holds at most one token.
    pub(crate) fn insert(&mut self, token: Token) {
        debug_assert!(self.pushback.is_none(), "pushback slot already charged");
        self.pushback = Some(token);
    }

    /// Whether the cursor sits on the terminal `Eof` token.
    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Save the cursor state for later rewind.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint { pos: self.pos, pushback: self.pushback.clone() }
    }

    /// Rewind to a previously saved state.
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.pushback = checkpoint.pushback;
    }

    /// Text, line, and column of the current token for error construction.
    pub(crate) fn describe_current(&self) -> (String, u32, u32) {
        match self.current() {
            Some(token) => {
                let text = if token.text.is_empty() {
                    format!("{:?}", token.kind)
                } else {
                    token.text.to_string()
                };
                (text, token.line, token.column)
            }
            None => ("end of input".to_string(), 0, 0),
        }
    }
}
