//! Statement parsing: control flow, blocks, scoped-access statements, and
//! declaration statements.

use forge_ast::{
    Expression, ExpressionKind, LiteralValue, Pattern, PatternKind, Statement, StatementKind,
    WhenClause,
};
use forge_diagnostics::WarningCode;
use forge_token::TokenKind;

use crate::dialect::BlockStyle;
use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;

impl Parser {
    /// Parse one statement.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.check_recursion()?;
        let result = self.parse_statement_inner();
        self.exit_recursion();
        result
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        match self.cursor.current_kind() {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Unless => self.parse_unless_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Loop => self.parse_loop_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::When => self.parse_when_statement(),

            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.at_statement_boundary() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                Ok(Statement::new(StatementKind::Return(value), location))
            }
            TokenKind::Break => {
                self.cursor.advance();
                Ok(Statement::new(StatementKind::Break, location))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                Ok(Statement::new(StatementKind::Continue, location))
            }
            TokenKind::Throw => {
                self.cursor.advance();
                let value = if self.at_statement_boundary() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                Ok(Statement::new(StatementKind::Throw(value), location))
            }
            TokenKind::Absent => {
                self.cursor.advance();
                Ok(Statement::new(StatementKind::Absent, location))
            }
            TokenKind::Pass => {
                self.cursor.advance();
                Ok(Statement::new(StatementKind::Pass, location))
            }

            TokenKind::Viewing => self.parse_handle_statement(TokenKind::Viewing),
            TokenKind::Hijacking => self.parse_handle_statement(TokenKind::Hijacking),
            TokenKind::Inspecting => self.parse_from_statement(TokenKind::Inspecting),
            TokenKind::Seizing => self.parse_from_statement(TokenKind::Seizing),
            TokenKind::Danger => self.parse_unsafe_statement(TokenKind::Danger),
            TokenKind::Mayhem => self.parse_unsafe_statement(TokenKind::Mayhem),

            // Declaration statements.
            TokenKind::Var | TokenKind::Let => self.parse_binding_statement(),
            TokenKind::Preset => {
                let declaration = self.parse_declaration()?;
                Ok(Statement::new(StatementKind::Declaration(declaration), location))
            }

            // Legacy output sugar: `display(...)` is an ordinary call.
            TokenKind::Display => {
                let token = self.cursor.advance();
                if !self.dialect.legacy_keywords {
                    self.warn(
                        WarningCode::DeprecatedKeyword,
                        "legacy 'display' call",
                        &token,
                    );
                }
                let args = self.parse_arguments()?;
                let callee = Expression::new(
                    ExpressionKind::Identifier("display".to_string()),
                    location.clone(),
                );
                let call = Expression::new(
                    ExpressionKind::Call { callee: Box::new(callee), args, failable: false },
                    location.clone(),
                );
                Ok(Statement::new(StatementKind::Expression(call), location))
            }

            TokenKind::LeftBrace if self.dialect.block_style == BlockStyle::Braces => {
                let statements = self.parse_brace_block_statements()?;
                Ok(Statement::new(StatementKind::Block(statements), location))
            }

            _ => {
                let expression = self.parse_expression()?;
                Ok(Statement::new(StatementKind::Expression(expression), location))
            }
        }
    }

    /// Whether the current token terminates a statement without an
    /// expression (used by `return` / `throw`).
    fn at_statement_boundary(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Newline
                | TokenKind::RightBrace
                | TokenKind::Dedent
                | TokenKind::Comma
                | TokenKind::Eof
        )
    }

    // ——— Control flow ———

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_block()?);

        self.skip_newlines();
        let else_branch = if self.cursor.check(TokenKind::Elseif) {
            // `elseif` chains by nesting the next `If` into the tail `else`.
            let nested_location = self.location_here();
            self.cursor.advance();
            let nested_condition = self.parse_condition()?;
            let nested_then = Box::new(self.parse_block()?);
            self.skip_newlines();
            let nested_else = self.parse_else_tail()?;
            Some(Box::new(Statement::new(
                StatementKind::If {
                    condition: nested_condition,
                    then_branch: nested_then,
                    else_branch: nested_else,
                },
                nested_location,
            )))
        } else if self.cursor.eat(TokenKind::Else) {
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::If { condition, then_branch, else_branch },
            location,
        ))
    }

    /// The recursive tail of an `elseif` chain.
    fn parse_else_tail(&mut self) -> ParseResult<Option<Box<Statement>>> {
        if self.cursor.check(TokenKind::Elseif) {
            let location = self.location_here();
            self.cursor.advance();
            let condition = self.parse_condition()?;
            let then_branch = Box::new(self.parse_block()?);
            self.skip_newlines();
            let else_branch = self.parse_else_tail()?;
            return Ok(Some(Box::new(Statement::new(
                StatementKind::If { condition, then_branch, else_branch },
                location,
            ))));
        }
        if self.cursor.eat(TokenKind::Else) {
            return Ok(Some(Box::new(self.parse_block()?)));
        }
        Ok(None)
    }

    /// `unless cond body` is `if (not cond) body`.
    fn parse_unless_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let condition = self.parse_condition()?;
        let negated = Expression::new(
            ExpressionKind::Unary {
                op: forge_ast::UnaryOp::Not,
                operand: Box::new(condition),
            },
            location.clone(),
        );
        let body = Box::new(self.parse_block()?);
        Ok(Statement::new(
            StatementKind::If { condition: negated, then_branch: body, else_branch: None },
            location,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_block()?);
        Ok(Statement::new(StatementKind::While { condition, body }, location))
    }

    /// `loop body` is `while true body`.
    fn parse_loop_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let condition =
            Expression::new(ExpressionKind::Literal(LiteralValue::Boolean(true)), location.clone());
        let body = Box::new(self.parse_block()?);
        Ok(Statement::new(StatementKind::While { condition, body }, location))
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let variable = self.cursor.consume(TokenKind::Identifier, "a loop variable")?;
        self.cursor.consume(TokenKind::In, "'in'")?;
        let iterable = self.parse_expression()?;
        let body = Box::new(self.parse_block()?);
        Ok(Statement::new(
            StatementKind::For { variable: variable.text.to_string(), iterable, body },
            location,
        ))
    }

    /// Condition of `if` / `unless` / `while`. In the indentation dialects a
    /// fully parenthesized condition is flagged as C-style syntax.
    fn parse_condition(&mut self) -> ParseResult<Expression> {
        let parenthesized = self.cursor.check(TokenKind::LeftParen);
        let open = self.cursor.current().cloned();
        let condition = self.parse_expression()?;
        if parenthesized
            && self.dialect.is_indented()
            && self.cursor.peek_kind(-1) == TokenKind::RightParen
        {
            if let Some(open) = open {
                self.warn(
                    WarningCode::CStyleSyntax,
                    "parenthesized condition",
                    &open,
                );
            }
        }
        Ok(condition)
    }

    // ——— Scoped-access statements ———

    /// `viewing e as h { ... }` / `hijacking e as h { ... }`
    fn parse_handle_statement(&mut self, keyword: TokenKind) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let source = self.parse_expression()?;
        self.cursor.consume(TokenKind::As, "'as'")?;
        let handle = self.cursor.consume(TokenKind::Identifier, "a handle name")?;
        let body = Box::new(self.parse_block()?);
        let handle = handle.text.to_string();
        let kind = if keyword == TokenKind::Viewing {
            StatementKind::Viewing { source, handle, body }
        } else {
            StatementKind::Hijacking { source, handle, body }
        };
        Ok(Statement::new(kind, location))
    }

    /// `inspecting h from e { ... }` / `seizing h from e { ... }`
    fn parse_from_statement(&mut self, keyword: TokenKind) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        let handle = self.cursor.consume(TokenKind::Identifier, "a handle name")?;
        self.cursor.consume(TokenKind::From, "'from'")?;
        let source = self.parse_expression()?;
        let body = Box::new(self.parse_block()?);
        let handle = handle.text.to_string();
        let kind = if keyword == TokenKind::Inspecting {
            StatementKind::Inspecting { handle, source, body }
        } else {
            StatementKind::Seizing { handle, source, body }
        };
        Ok(Statement::new(kind, location))
    }

    /// `danger! { ... }` / `mayhem! { ... }`
    fn parse_unsafe_statement(&mut self, keyword: TokenKind) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();
        self.cursor.consume(TokenKind::Bang, "'!'")?;
        let body = Box::new(self.parse_block()?);
        let kind = if keyword == TokenKind::Danger {
            StatementKind::Danger { body }
        } else {
            StatementKind::Mayhem { body }
        };
        Ok(Statement::new(kind, location))
    }

    // ——— Binding statements ———

    /// `var` / `let` in statement position; `let (a, b) = e` destructures.
    fn parse_binding_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        let mutable = self.cursor.current_kind() == TokenKind::Var;
        if self.cursor.peek_kind(1) == TokenKind::LeftParen {
            self.cursor.advance();
            let pattern_location = self.location_here();
            let bindings = self.parse_destructuring_bindings()?;
            let pattern = Pattern::new(PatternKind::Destructuring { bindings }, pattern_location);
            self.cursor.consume(TokenKind::Assign, "'='")?;
            let value = self.parse_expression()?;
            return Ok(Statement::new(
                StatementKind::Destructuring { pattern, value, mutable },
                location,
            ));
        }
        let declaration = self.parse_declaration()?;
        Ok(Statement::new(StatementKind::Declaration(declaration), location))
    }

    // ——— `when` ———

    /// `when subject { clauses }` or `when { clauses }`. Clause patterns and
    /// bodies run under their respective suppression flags.
    fn parse_when_statement(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        self.cursor.advance();

        let subject = if self.at_block_open() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut clauses = Vec::new();
        match self.dialect.block_style {
            BlockStyle::Braces => {
                self.cursor.consume(TokenKind::LeftBrace, "'{'")?;
                self.skip_newlines();
                while !self.cursor.check(TokenKind::RightBrace) {
                    if self.cursor.is_at_end() {
                        return Err(ParseError::UnexpectedEof);
                    }
                    clauses.push(self.parse_when_clause()?);
                    self.eat_clause_separators();
                }
                self.cursor.consume(TokenKind::RightBrace, "'}'")?;
            }
            BlockStyle::Indentation => {
                self.cursor.consume(TokenKind::Colon, "':'")?;
                self.skip_newlines();
                self.consume_indent()?;
                self.skip_newlines();
                while !self.cursor.check(TokenKind::Dedent) {
                    if self.cursor.is_at_end() {
                        return Err(ParseError::UnexpectedEof);
                    }
                    clauses.push(self.parse_when_clause()?);
                    self.eat_clause_separators();
                }
                self.consume_dedent()?;
            }
        }

        Ok(Statement::new(StatementKind::When { subject, clauses }, location))
    }

    fn at_block_open(&self) -> bool {
        match self.dialect.block_style {
            BlockStyle::Braces => self.cursor.check(TokenKind::LeftBrace),
            BlockStyle::Indentation => self.cursor.check(TokenKind::Colon),
        }
    }

    /// Clauses are separated by commas or newlines.
    fn eat_clause_separators(&mut self) {
        loop {
            if self.cursor.check(TokenKind::Comma) || self.cursor.check(TokenKind::Newline) {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    /// One `pattern => body` clause.
    fn parse_when_clause(&mut self) -> ParseResult<WhenClause> {
        let location = self.location_here();

        let pattern = if self.cursor.check(TokenKind::Else) {
            // `else` optionally binds a name, otherwise matches anything.
            let else_location = self.location_here();
            self.cursor.advance();
            if self.cursor.check(TokenKind::Identifier) {
                let name = self.cursor.advance();
                Pattern::new(PatternKind::Identifier(name.text.to_string()), else_location)
            } else {
                Pattern::new(PatternKind::Wildcard, else_location)
            }
        } else {
            self.with_flags(
                |flags| flags.in_when_pattern = true,
                |parser| {
                    if parser.cursor.eat(TokenKind::Is) {
                        let head = parser.parse_is_target()?;
                        parser.parse_optional_guard(head)
                    } else {
                        parser.parse_pattern()
                    }
                },
            )?
        };

        self.cursor.consume(TokenKind::FatArrow, "'=>'")?;
        let body = self.with_flags(
            |flags| flags.in_when_clause_body = true,
            Parser::parse_statement,
        )?;

        Ok(WhenClause { pattern, body, location })
    }

    // ——— Blocks ———

    /// Parse a block body in the dialect's style.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Statement> {
        let location = self.location_here();
        let statements = match self.dialect.block_style {
            BlockStyle::Braces => self.parse_brace_block_statements()?,
            BlockStyle::Indentation => self.parse_indented_block_statements()?,
        };
        Ok(Statement::new(StatementKind::Block(statements), location))
    }

    /// `{ stmt* }`. One bad statement does not hide the rest of the block.
    pub(crate) fn parse_brace_block_statements(&mut self) -> ParseResult<Vec<Statement>> {
        self.cursor.consume(TokenKind::LeftBrace, "'{'")?;
        self.skip_newlines();
        let mut statements = Vec::new();
        while !self.cursor.check(TokenKind::RightBrace) {
            if self.cursor.is_at_end() {
                return Err(ParseError::UnexpectedEof);
            }
            match self.parse_statement().and_then(|statement| {
                self.expect_statement_end()?;
                Ok(statement)
            }) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.report(&error);
                    self.synchronize();
                }
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightBrace, "'}'")?;
        Ok(statements)
    }

    /// `:` Newline Indent stmt* Dedent. A stray `}` draws CK001 and is
    /// skipped.
    fn parse_indented_block_statements(&mut self) -> ParseResult<Vec<Statement>> {
        self.cursor.consume(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        self.consume_indent()?;
        self.skip_newlines();
        let mut statements = Vec::new();
        while !self.cursor.check(TokenKind::Dedent) {
            if self.cursor.is_at_end() {
                return Err(ParseError::UnexpectedEof);
            }
            if self.cursor.check(TokenKind::RightBrace) {
                let token = self.cursor.advance();
                self.warn(
                    WarningCode::UnnecessaryClosingBrace,
                    "unnecessary closing brace",
                    &token,
                );
                self.skip_newlines();
                continue;
            }
            match self.parse_statement().and_then(|statement| {
                self.expect_statement_end()?;
                Ok(statement)
            }) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.report(&error);
                    self.synchronize();
                }
            }
            self.skip_newlines();
        }
        self.consume_dedent()?;
        Ok(statements)
    }
}
