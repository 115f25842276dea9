//! The shared recursive-descent parser.
//!
//! One `Parser` instance owns one token vector and parses one file; dialects
//! differ only through the [`Dialect`] descriptor. Parsing is a single
//! forward pass: no rollback beyond the generic-argument lookahead, no reuse
//! across files.
//!
//! Submodules are organized by concern: expressions (the Pratt ladder),
//! types, generic parameters and constraints, patterns, statements, and
//! declarations. The driver loop, error recovery, and the indentation state
//! machine live here.

pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod generics;
pub(crate) mod literals;
pub(crate) mod patterns;
pub(crate) mod statements;
pub(crate) mod types;

use std::sync::Arc;

use forge_ast::{Program, SourceLocation};
use forge_diagnostics::{CompileWarning, WarningCode};
use forge_token::{Token, TokenKind};

use crate::context::{ContextFlags, NameScopes};
use crate::cursor::TokenCursor;
use crate::dialect::Dialect;
use crate::error::{ParseError, ParseResult};

const MAX_RECURSION_DEPTH: usize = 500;

/// Recursive-descent parser over a pre-lexed token vector.
///
/// Constructed per file; not reusable. The caller receives the `Program` and
/// the buffered warnings when parsing finishes.
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    pub(crate) file: Arc<str>,
    pub(crate) dialect: Dialect,
    pub(crate) flags: ContextFlags,
    pub(crate) scopes: NameScopes,
    warnings: Vec<CompileWarning>,
    /// Depth of currently open indentation blocks.
    indent_depth: u32,
    indents_consumed: usize,
    dedents_consumed: usize,
    recursion_depth: usize,
}

impl Parser {
    /// Create a parser for one file's token vector.
    pub fn new(tokens: Vec<Token>, file: impl Into<Arc<str>>, dialect: Dialect) -> Self {
        Parser {
            cursor: TokenCursor::new(tokens),
            file: file.into(),
            dialect,
            flags: ContextFlags::default(),
            scopes: NameScopes::default(),
            warnings: Vec::new(),
            indent_depth: 0,
            indents_consumed: 0,
            dedents_consumed: 0,
            recursion_depth: 0,
        }
    }

    /// Parse the whole file. One bad declaration does not hide the next: the
    /// error is reported, the cursor re-anchors at the next declaration, and
    /// the loop continues.
    pub fn parse_program(&mut self) -> Program {
        let start = self.location_here();
        let mut declarations = Vec::new();

        loop {
            self.skip_newlines();
            if self.cursor.is_at_end() {
                break;
            }
            match self.parse_declaration() {
                Ok(declaration) => declarations.push(declaration),
                Err(error) => {
                    self.report(&error);
                    self.synchronize();
                }
            }
        }

        Program::new(declarations, start)
    }

    /// Buffered warnings accumulated so far.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Consume the parser, returning the buffered warnings.
    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.warnings
    }

    // ——— Location and diagnostics helpers ———

    /// Source location of the current token.
    pub(crate) fn location_here(&self) -> SourceLocation {
        match self.cursor.current() {
            Some(token) => token.location(&self.file),
            None => SourceLocation::new(Arc::clone(&self.file), 0, 0, 0),
        }
    }

    /// Source location of a specific token.
    pub(crate) fn location_of(&self, token: &Token) -> SourceLocation {
        token.location(&self.file)
    }

    /// Buffer a warning anchored at `token`.
    pub(crate) fn warn(&mut self, code: WarningCode, message: impl Into<String>, token: &Token) {
        self.warnings.push(CompileWarning::new(code, message, token.line, token.column));
    }

    /// Report a hard error on stderr in the `Parse error[file:line:col]:`
    /// format and leave a trace record for debugging.
    fn report(&self, error: &ParseError) {
        let (line, column) = error.position().unwrap_or_else(|| {
            self.cursor.current().map(|t| (t.line, t.column)).unwrap_or((0, 0))
        });
        tracing::debug!(dialect = self.dialect.name, %error, line, column, "parse error");
        eprintln!("Parse error[{}:{}:{}]: {}", self.file, line, column, error);
    }

    // ——— Error recovery ———

    /// Skip to the next safe parse point: just past a newline, or at a token
    /// that starts a declaration or control-flow statement. Block closers
    /// also stop the scan so enclosing loops see them.
    pub(crate) fn synchronize(&mut self) {
        if self.cursor.is_at_end() {
            return;
        }
        // Always make progress, even when the failure consumed nothing.
        let kind = self.cursor.advance().kind;
        self.note_structure(kind);

        while !self.cursor.is_at_end() {
            if self.cursor.peek_kind(-1) == TokenKind::Newline {
                break;
            }
            let kind = self.cursor.current_kind();
            if kind.starts_declaration()
                || kind.starts_control_flow()
                || kind == TokenKind::RightBrace
                || kind == TokenKind::Dedent
            {
                break;
            }
            let advanced_kind = self.cursor.advance().kind;
            self.note_structure(advanced_kind);
        }
        tracing::debug!(dialect = self.dialect.name, "synchronized after parse error");
    }

    /// Keep the indentation bookkeeping consistent for tokens skipped during
    /// recovery.
    fn note_structure(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::Indent => {
                self.indent_depth += 1;
                self.indents_consumed += 1;
            }
            TokenKind::Dedent => {
                self.indent_depth = self.indent_depth.saturating_sub(1);
                self.dedents_consumed += 1;
            }
            _ => {}
        }
    }

    // ——— Recursion guard ———

    #[inline(always)]
    pub(crate) fn check_recursion(&mut self) -> ParseResult<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(ParseError::RecursionLimit);
        }
        Ok(())
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // ——— Context flags ———

    /// Run `body` with the flags adjusted by `set`, restoring the previous
    /// flag state afterwards regardless of success or failure.
    pub(crate) fn with_flags<T>(
        &mut self,
        set: impl FnOnce(&mut ContextFlags),
        body: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.flags;
        set(&mut self.flags);
        let result = body(self);
        self.flags = saved;
        result
    }

    // ——— Newlines and statement boundaries ———

    /// Consume any run of newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.cursor.check(TokenKind::Newline) {
            self.cursor.advance();
        }
    }

    /// Enforce the statement terminator rules: a newline ends a statement; a
    /// block closer, `else`/`elseif`, or end of input also terminates without
    /// being consumed. A statement that just closed a block needs no
    /// terminator of its own.
    pub(crate) fn expect_statement_end(&mut self) -> ParseResult<()> {
        if self.cursor.check(TokenKind::Newline) {
            self.skip_newlines();
            return Ok(());
        }
        match self.cursor.current_kind() {
            TokenKind::RightBrace
            | TokenKind::Dedent
            | TokenKind::Else
            | TokenKind::Elseif
            | TokenKind::Comma
            | TokenKind::Eof => Ok(()),
            _ => {
                // A body that ended with `}` or a dedent terminates the
                // statement by itself, as does a newline the statement's own
                // lookahead already consumed.
                if matches!(
                    self.cursor.peek_kind(-1),
                    TokenKind::RightBrace | TokenKind::Dedent | TokenKind::Newline
                ) {
                    return Ok(());
                }
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected("end of statement", found, line, column))
            }
        }
    }

    // ——— Indentation state machine ———

    /// Consume an `Indent`, pushing one accepted level.
    pub(crate) fn consume_indent(&mut self) -> ParseResult<()> {
        self.cursor.consume(TokenKind::Indent, "an indented block")?;
        self.indent_depth += 1;
        self.indents_consumed += 1;
        Ok(())
    }

    /// Consume a `Dedent`, popping one level. Dedenting below the base level
    /// is a hard error.
    pub(crate) fn consume_dedent(&mut self) -> ParseResult<()> {
        let token = self.cursor.consume(TokenKind::Dedent, "end of indented block")?;
        if self.indent_depth == 0 {
            return Err(ParseError::UnexpectedDedent { line: token.line, column: token.column });
        }
        self.indent_depth -= 1;
        self.dedents_consumed += 1;
        Ok(())
    }

    /// Indent/Dedent consumption counters; equal after any successful parse
    /// of an indentation dialect.
    pub fn indent_balance(&self) -> (usize, usize) {
        (self.indents_consumed, self.dedents_consumed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str, column: u32) -> Token {
        Token::new(kind, text, 1, column, column as usize)
    }

    fn with_eof(mut tokens: Vec<Token>) -> Vec<Token> {
        let column = tokens.last().map(|t| t.column + 1).unwrap_or(1);
        tokens.push(tok(TokenKind::Eof, "", column));
        tokens
    }

    #[test]
    fn empty_token_stream_yields_empty_program() {
        let mut parser = Parser::new(with_eof(vec![]), "empty.forge", Dialect::forge());
        let program = parser.parse_program();
        assert!(program.declarations.is_empty());
        assert_eq!(&*program.location.file, "empty.forge");
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn dedent_below_base_is_an_error() {
        let mut parser = Parser::new(
            with_eof(vec![tok(TokenKind::Dedent, "", 1)]),
            "bad.suflae",
            Dialect::suflae(),
        );
        let err = match parser.consume_dedent() {
            Err(err) => err,
            Ok(()) => panic!("dedent below base must fail"),
        };
        assert!(matches!(err, ParseError::UnexpectedDedent { .. }));
    }

    #[test]
    fn with_flags_restores_on_error() {
        let mut parser = Parser::new(with_eof(vec![]), "flags.forge", Dialect::forge());
        let result: ParseResult<()> = parser.with_flags(
            |flags| flags.in_when_pattern = true,
            |parser| {
                assert!(parser.flags.in_when_pattern);
                Err(ParseError::UnexpectedEof)
            },
        );
        assert!(result.is_err());
        assert!(!parser.flags.in_when_pattern);
    }

    #[test]
    fn synchronize_always_advances() {
        let mut parser = Parser::new(
            with_eof(vec![
                tok(TokenKind::Plus, "+", 1),
                tok(TokenKind::Plus, "+", 2),
                tok(TokenKind::Entity, "entity", 3),
            ]),
            "sync.forge",
            Dialect::forge(),
        );
        parser.synchronize();
        assert_eq!(parser.cursor.current_kind(), TokenKind::Entity);
    }
}
