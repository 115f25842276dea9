//! Expression parsing: the precedence ladder.
//!
//! Explicit cascade, lowest binding first: assignment, inline conditional,
//! `??`, `or`, range, `and`, comparison (with chaining), `is`, bitwise or /
//! xor / and, shift, additive, multiplicative, unary, power, postfix,
//! primary. Comparison collects operands into a chain; two or more operators
//! produce a `ChainedComparison` validated for direction consistency.

use forge_ast::{
    Argument, BinaryOp, ChainDirection, Expression, ExpressionKind, Parameter, Pattern,
    PatternKind, UnaryOp, WithField,
};
use forge_diagnostics::WarningCode;
use forge_token::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::parser::literals::{is_sign_foldable, literal_from_token};
use crate::parser::Parser;

impl Parser {
    /// Parse one expression at the lowest precedence.
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.check_recursion()?;
        let result = self.parse_assignment();
        self.exit_recursion();
        result
    }

    /// Assignment, right-associative. Compound assignment desugars
    /// `a <op>= b` into `a = a <op> b`, duplicating the target subtree: the
    /// two copies share a location but are distinct nodes.
    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let target = self.parse_inline_conditional()?;
        let kind = self.cursor.current_kind();

        if kind == TokenKind::Assign {
            self.cursor.advance();
            let value = self.parse_assignment()?;
            let location = target.location.clone();
            return Ok(Expression::new(
                ExpressionKind::Assignment { target: Box::new(target), value: Box::new(value) },
                location,
            ));
        }

        if let Some(op) = BinaryOp::from_compound_assign(kind) {
            self.cursor.advance();
            let rhs = self.parse_assignment()?;
            let location = target.location.clone();
            let duplicate = target.clone();
            let value = Expression::new(
                ExpressionKind::Binary { op, left: Box::new(duplicate), right: Box::new(rhs) },
                location.clone(),
            );
            return Ok(Expression::new(
                ExpressionKind::Assignment { target: Box::new(target), value: Box::new(value) },
                location,
            ));
        }

        Ok(target)
    }

    /// `if c then a else b` and the ternary `c ? a : b`, both right-nesting.
    fn parse_inline_conditional(&mut self) -> ParseResult<Expression> {
        if self.cursor.check(TokenKind::If) {
            let location = self.location_here();
            self.cursor.advance();
            let condition = self.parse_none_coalesce()?;
            self.cursor.consume(TokenKind::Then, "'then'")?;
            let then_branch = self.with_flags(
                |flags| flags.parsing_inline_conditional = true,
                Parser::parse_inline_conditional,
            )?;
            self.cursor.consume(TokenKind::Else, "'else'")?;
            let else_branch = self.with_flags(
                |flags| flags.parsing_inline_conditional = true,
                Parser::parse_inline_conditional,
            )?;
            return Ok(Expression::new(
                ExpressionKind::Conditional {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                location,
            ));
        }

        let expr = self.parse_none_coalesce()?;
        if self.cursor.eat(TokenKind::Question) {
            let then_branch = self.with_flags(
                |flags| flags.parsing_inline_conditional = true,
                Parser::parse_inline_conditional,
            )?;
            self.cursor.consume(TokenKind::Colon, "':'")?;
            let else_branch = self.with_flags(
                |flags| flags.parsing_inline_conditional = true,
                Parser::parse_inline_conditional,
            )?;
            let location = expr.location.clone();
            return Ok(Expression::new(
                ExpressionKind::Conditional {
                    condition: Box::new(expr),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                location,
            ));
        }
        Ok(expr)
    }

    /// `??`, left-associative.
    fn parse_none_coalesce(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_or()?;
        while self.cursor.check(TokenKind::QuestionQuestion) {
            self.cursor.advance();
            let right = self.parse_or()?;
            expr = binary(BinaryOp::NoneCoalesce, expr, right);
        }
        Ok(expr)
    }

    /// `or`, left-associative, short-circuit downstream.
    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_range()?;
        while self.cursor.check(TokenKind::Or) {
            self.cursor.advance();
            let right = self.parse_range()?;
            expr = binary(BinaryOp::LogicalOr, expr, right);
        }
        Ok(expr)
    }

    /// `a to b by s` / `a downto b by s`, non-associative. The legacy
    /// dialect spells the step keyword `step`.
    fn parse_range(&mut self) -> ParseResult<Expression> {
        let start = self.parse_and()?;
        let descending = match self.cursor.current_kind() {
            TokenKind::To => false,
            TokenKind::Downto => true,
            _ => return Ok(start),
        };
        self.cursor.advance();
        let end = self.parse_and()?;

        let step = if self.cursor.check(self.dialect.step_keyword) {
            self.cursor.advance();
            Some(Box::new(self.parse_and()?))
        } else if self.cursor.check(TokenKind::Step) && !self.dialect.legacy_keywords {
            let token = self.cursor.advance();
            self.warn(
                WarningCode::DeprecatedKeyword,
                "legacy 'step' keyword; use 'by'",
                &token,
            );
            Some(Box::new(self.parse_and()?))
        } else {
            None
        };

        if self.cursor.check_any(&[TokenKind::To, TokenKind::Downto]) {
            let (found, line, column) = self.cursor.describe_current();
            return Err(ParseError::UnexpectedToken { found, line, column });
        }

        let location = start.location.clone();
        Ok(Expression::new(
            ExpressionKind::Range {
                start: Box::new(start),
                end: Box::new(end),
                step,
                descending,
            },
            location,
        ))
    }

    /// `and`, left-associative.
    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_comparison()?;
        while self.cursor.check(TokenKind::And) {
            self.cursor.advance();
            let right = self.parse_comparison()?;
            expr = binary(BinaryOp::LogicalAnd, expr, right);
        }
        Ok(expr)
    }

    /// Comparison and equality, collected as a chain. One operator folds to
    /// an ordinary binary; two or more become a `ChainedComparison` whose
    /// operators may not mix ascending and descending directions.
    ///
    /// A `>` immediately followed by `(` is the shape a failed
    /// generic-argument attempt leaves behind (`a < b > (c)`); from that
    /// point the level nests plain left-associative binaries instead of
    /// chaining.
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let first = self.parse_is_expression()?;
        let mut tail: Vec<(BinaryOp, Token, Expression)> = Vec::new();

        loop {
            let Some(op) = comparison_op(self.cursor.current_kind()) else {
                break;
            };

            if op == BinaryOp::Greater && self.cursor.peek_kind(1) == TokenKind::LeftParen {
                let mut expr = fold_comparison(first, tail)?;
                while let Some(op) = comparison_op(self.cursor.current_kind()) {
                    self.cursor.advance();
                    let right = self.parse_is_expression()?;
                    expr = binary(op, expr, right);
                }
                return Ok(expr);
            }

            let token = self.cursor.advance();
            let right = self.parse_is_expression()?;
            tail.push((op, token, right));
        }

        fold_comparison(first, tail)
    }

    /// `expr is Type`, `expr is Type name`, `expr is Type (...)`, and the
    /// `isnot` negation. Suppressed inside `when` patterns and clause bodies.
    fn parse_is_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_bitwise_or()?;
        while !self.flags.suppresses_is()
            && self.cursor.check_any(&[TokenKind::Is, TokenKind::IsNot])
        {
            let negated = self.cursor.current_kind() == TokenKind::IsNot;
            self.cursor.advance();
            let pattern = self.parse_is_target()?;
            let location = expr.location.clone();
            expr = Expression::new(
                ExpressionKind::IsPattern {
                    value: Box::new(expr),
                    pattern: Box::new(pattern),
                    negated,
                },
                location,
            );
        }
        Ok(expr)
    }

    /// The right side of an `is` test: a type, optionally a binding name,
    /// optionally a destructuring list.
    pub(crate) fn parse_is_target(&mut self) -> ParseResult<Pattern> {
        let location = self.location_here();
        let ty = self.parse_type()?;
        if self.cursor.check(TokenKind::LeftParen) {
            let bindings = self.parse_destructuring_bindings()?;
            return Ok(Pattern::new(PatternKind::TypeDestructuring { ty, bindings }, location));
        }
        let binding = if self.cursor.check(TokenKind::Identifier) {
            Some(self.cursor.advance().text.to_string())
        } else {
            None
        };
        Ok(Pattern::new(PatternKind::Type { ty, binding }, location))
    }

    fn parse_bitwise_or(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_bitwise_xor()?;
        while self.cursor.check(TokenKind::VerticalBar) {
            self.cursor.advance();
            let right = self.parse_bitwise_xor()?;
            expr = binary(BinaryOp::BitOr, expr, right);
        }
        Ok(expr)
    }

    fn parse_bitwise_xor(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_bitwise_and()?;
        while self.cursor.check(TokenKind::Caret) {
            self.cursor.advance();
            let right = self.parse_bitwise_and()?;
            expr = binary(BinaryOp::BitXor, expr, right);
        }
        Ok(expr)
    }

    fn parse_bitwise_and(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_shift()?;
        while self.cursor.check(TokenKind::Ampersand) {
            self.cursor.advance();
            let right = self.parse_shift()?;
            expr = binary(BinaryOp::BitAnd, expr, right);
        }
        Ok(expr)
    }

    fn parse_shift(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::LeftShift => BinaryOp::ShiftLeft,
                TokenKind::RightShift => BinaryOp::ShiftRight,
                TokenKind::LeftShiftLogical => BinaryOp::ShiftLeftLogical,
                TokenKind::RightShiftLogical => BinaryOp::ShiftRightLogical,
                TokenKind::LeftShiftChecked => BinaryOp::ShiftLeftChecked,
                TokenKind::RightShiftChecked => BinaryOp::ShiftRightChecked,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_additive()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::PlusPercent => BinaryOp::AddWrap,
                TokenKind::PlusCaret => BinaryOp::AddSaturate,
                TokenKind::PlusBang => BinaryOp::AddChecked,
                TokenKind::Minus => BinaryOp::Subtract,
                TokenKind::MinusPercent => BinaryOp::SubtractWrap,
                TokenKind::MinusCaret => BinaryOp::SubtractSaturate,
                TokenKind::MinusBang => BinaryOp::SubtractChecked,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::StarPercent => BinaryOp::MultiplyWrap,
                TokenKind::StarCaret => BinaryOp::MultiplySaturate,
                TokenKind::StarBang => BinaryOp::MultiplyChecked,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::SlashSlash => BinaryOp::IntegerDivide,
                TokenKind::Percent => BinaryOp::Modulo,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_unary()?;
            expr = binary(op, expr, right);
        }
        Ok(expr)
    }

    /// Prefix operators, right-associative. A `-` directly before a numeric
    /// literal folds into the literal, so the `s64` minimum parses as one
    /// node.
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let Some(op) = UnaryOp::from_token(self.cursor.current_kind()) else {
            return self.parse_power();
        };
        let op_token = self.cursor.advance();
        let location = self.location_of(&op_token);

        if op == UnaryOp::Negate && is_sign_foldable(self.cursor.current_kind()) {
            let literal_token = self.cursor.advance();
            let value = literal_from_token(&literal_token, true)?;
            let literal = Expression::new(ExpressionKind::Literal(value), location);
            // The folded literal still takes a power tail: `-2 ** 3`.
            return self.parse_power_tail(literal);
        }

        let operand = self.parse_unary()?;
        Ok(Expression::new(
            ExpressionKind::Unary { op, operand: Box::new(operand) },
            location,
        ))
    }

    /// `**` and its overflow variants, right-associative and binding tighter
    /// than prefix operators.
    fn parse_power(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_postfix()?;
        self.parse_power_tail(expr)
    }

    fn parse_power_tail(&mut self, expr: Expression) -> ParseResult<Expression> {
        let op = match self.cursor.current_kind() {
            TokenKind::Power => BinaryOp::Power,
            TokenKind::PowerPercent => BinaryOp::PowerWrap,
            TokenKind::PowerCaret => BinaryOp::PowerSaturate,
            TokenKind::PowerBang => BinaryOp::PowerChecked,
            _ => return Ok(expr),
        };
        self.cursor.advance();
        let right = self.parse_unary()?;
        Ok(binary(op, expr, right))
    }

    /// Postfix loop: calls, failable calls, indexing, member access, generic
    /// method calls, and `with (...)` record updates.
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::LeftParen => {
                    let args = self.parse_arguments()?;
                    let location = expr.location.clone();
                    expr = Expression::new(
                        ExpressionKind::Call { callee: Box::new(expr), args, failable: false },
                        location,
                    );
                }
                TokenKind::Bang if self.cursor.peek_kind(1) == TokenKind::LeftParen => {
                    self.cursor.advance();
                    let args = self.parse_arguments()?;
                    let location = expr.location.clone();
                    expr = Expression::new(
                        ExpressionKind::Call { callee: Box::new(expr), args, failable: true },
                        location,
                    );
                }
                TokenKind::LeftBracket => {
                    self.cursor.advance();
                    self.skip_newlines();
                    let index = self.parse_expression()?;
                    self.skip_newlines();
                    self.cursor.consume(TokenKind::RightBracket, "']'")?;
                    let location = expr.location.clone();
                    expr = Expression::new(
                        ExpressionKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        location,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let name = match self.cursor.current_kind() {
                        TokenKind::Identifier | TokenKind::TypeIdentifier => {
                            self.cursor.advance().text.to_string()
                        }
                        _ => {
                            let (found, line, column) = self.cursor.describe_current();
                            return Err(ParseError::expected("a member name", found, line, column));
                        }
                    };
                    let location = expr.location.clone();
                    expr = Expression::new(
                        ExpressionKind::Member { object: Box::new(expr), name },
                        location,
                    );
                }
                TokenKind::Less if self.generic_arguments_ahead() => {
                    let (result, progressed) = self.try_generic_postfix(expr)?;
                    expr = result;
                    if !progressed {
                        break;
                    }
                }
                TokenKind::With => {
                    self.cursor.advance();
                    let fields = self.parse_with_fields()?;
                    let location = expr.location.clone();
                    expr = Expression::new(
                        ExpressionKind::With { object: Box::new(expr), fields },
                        location,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Lookahead for a generic argument list in postfix position. Tracks `<`
    /// depth with `>>` counting as two closers (`>>>` as three); the match
    /// succeeds only when the closer is immediately followed by `(`, `.`, or
    /// a failable `!(`, and the first token after `<` is type-like. A plain
    /// identifier counts as type-like only when the name caches know it: a
    /// declared generic parameter, a type alias, or an imported namespace.
    fn generic_arguments_ahead(&self) -> bool {
        match self.cursor.peek_kind(1) {
            TokenKind::TypeIdentifier
            | TokenKind::Greater
            | TokenKind::Me
            | TokenKind::MyType
            | TokenKind::Routine => {}
            TokenKind::Identifier => {
                let known = self.cursor.peek(1).map(|token| {
                    self.scopes.is_generic_param(&token.text)
                        || self.scopes.known_types.contains(&*token.text)
                        || self.scopes.imported_namespaces.contains(&*token.text)
                });
                if known != Some(true) {
                    return false;
                }
            }
            kind if kind.is_literal() => {}
            _ => return false,
        }

        let mut depth: i32 = 0;
        let mut offset: isize = 0;
        loop {
            let kind = self.cursor.peek_kind(offset);
            let closed = match kind {
                TokenKind::Less => {
                    depth += 1;
                    false
                }
                TokenKind::Greater => {
                    depth -= 1;
                    depth <= 0
                }
                TokenKind::RightShift => {
                    depth -= 2;
                    depth <= 0
                }
                TokenKind::RightShiftLogical => {
                    depth -= 3;
                    depth <= 0
                }
                TokenKind::TypeIdentifier
                | TokenKind::Identifier
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Minus
                | TokenKind::Me
                | TokenKind::MyType
                | TokenKind::Routine
                | TokenKind::LeftParen
                | TokenKind::RightParen => false,
                kind if kind.is_literal() => false,
                _ => return false,
            };
            if closed {
                if depth < 0 {
                    // The closer sits inside a shift token; whatever follows
                    // the leftover `>` cannot start an argument list.
                    return false;
                }
                return matches!(
                    self.cursor.peek_kind(offset + 1),
                    TokenKind::LeftParen | TokenKind::Dot
                ) || (self.cursor.peek_kind(offset + 1) == TokenKind::Bang
                    && self.cursor.peek_kind(offset + 2) == TokenKind::LeftParen);
            }
            offset += 1;
        }
    }

    /// Attempt the generic postfix after a positive lookahead. Backtracks and
    /// reports no progress when the argument list fails to parse as types.
    fn try_generic_postfix(&mut self, callee: Expression) -> ParseResult<(Expression, bool)> {
        let checkpoint = self.cursor.checkpoint();
        let type_args = match self.parse_generic_argument_list() {
            Ok(args) => args,
            Err(_) => {
                self.cursor.rewind(checkpoint);
                return Ok((callee, false));
            }
        };

        if self.cursor.check(TokenKind::LeftParen)
            || (self.cursor.check(TokenKind::Bang)
                && self.cursor.peek_kind(1) == TokenKind::LeftParen)
        {
            let failable = self.cursor.eat(TokenKind::Bang);
            let args = self.parse_arguments()?;
            let location = callee.location.clone();
            return Ok((
                Expression::new(
                    ExpressionKind::GenericMethodCall {
                        callee: Box::new(callee),
                        type_args,
                        args,
                        failable,
                    },
                    location,
                ),
                true,
            ));
        }

        if self.cursor.check(TokenKind::Dot) {
            return match callee.kind {
                ExpressionKind::Member { object, name } => {
                    let location = object.location.clone();
                    Ok((
                        Expression::new(
                            ExpressionKind::GenericMember { object, name, type_args },
                            location,
                        ),
                        true,
                    ))
                }
                other => {
                    self.cursor.rewind(checkpoint);
                    Ok((Expression::new(other, callee.location), false))
                }
            };
        }

        self.cursor.rewind(checkpoint);
        Ok((callee, false))
    }

    /// Primary expressions: literals, identifiers, grouping, collection
    /// literals, lambdas, intrinsics, native code.
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        let kind = self.cursor.current_kind();

        if kind.is_literal() {
            let token = self.cursor.advance();
            let value = literal_from_token(&token, false)?;
            return Ok(Expression::new(ExpressionKind::Literal(value), location));
        }

        match kind {
            TokenKind::Identifier => {
                if self.cursor.peek_kind(1) == TokenKind::FatArrow
                    && !self.flags.suppresses_bare_lambda()
                {
                    return self.parse_bare_lambda();
                }
                let token = self.cursor.advance();
                Ok(Expression::new(
                    ExpressionKind::Identifier(token.text.to_string()),
                    location,
                ))
            }
            TokenKind::TypeIdentifier => {
                let token = self.cursor.advance();
                Ok(Expression::new(
                    ExpressionKind::Identifier(token.text.to_string()),
                    location,
                ))
            }
            TokenKind::Me => {
                self.cursor.advance();
                Ok(Expression::new(ExpressionKind::Identifier("me".to_string()), location))
            }
            TokenKind::LeftParen => {
                if self.lambda_parameters_ahead() {
                    return self.parse_paren_lambda();
                }
                self.cursor.advance();
                self.skip_newlines();
                let expr = self.parse_expression()?;
                self.skip_newlines();
                self.cursor.consume(TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LeftBracket => self.parse_list_literal(),
            TokenKind::LeftBrace => self.parse_dict_or_set_literal(),
            TokenKind::IntrinsicAttr => self.parse_intrinsic(),
            TokenKind::Native => self.parse_native(),
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::UnexpectedToken { found, line, column })
            }
        }
    }

    /// `x => body`
    fn parse_bare_lambda(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        let name = self.cursor.advance();
        let parameter = Parameter {
            name: name.text.to_string(),
            ty: None,
            default: None,
            variadic: false,
            location: self.location_of(&name),
        };
        self.cursor.consume(TokenKind::FatArrow, "'=>'")?;
        let body = self.parse_lambda_body()?;
        Ok(Expression::new(
            ExpressionKind::Lambda { parameters: vec![parameter], body: Box::new(body) },
            location,
        ))
    }

    /// Whether `(` opens a lambda parameter list: scan to the matching `)`
    /// and look for `=>`.
    fn lambda_parameters_ahead(&self) -> bool {
        let mut depth: i32 = 0;
        let mut offset: isize = 0;
        loop {
            match self.cursor.peek_kind(offset) {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.cursor.peek_kind(offset + 1) == TokenKind::FatArrow;
                    }
                }
                TokenKind::Newline | TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
    }

    /// `(a, b: Int) => body`
    fn parse_paren_lambda(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        let mut parameters = Vec::new();
        while !self.cursor.check(TokenKind::RightParen) {
            let name = self.cursor.consume(TokenKind::Identifier, "a parameter name")?;
            let ty = if self.cursor.eat(TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            parameters.push(Parameter {
                name: name.text.to_string(),
                ty,
                default: None,
                variadic: false,
                location: self.location_of(&name),
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        self.cursor.consume(TokenKind::FatArrow, "'=>'")?;
        let body = self.parse_lambda_body()?;
        Ok(Expression::new(
            ExpressionKind::Lambda { parameters, body: Box::new(body) },
            location,
        ))
    }

    /// Lambda bodies are expressions; in the brace dialect a `{` after `=>`
    /// opens a block expression instead.
    fn parse_lambda_body(&mut self) -> ParseResult<Expression> {
        if !self.dialect.is_indented() && self.cursor.check(TokenKind::LeftBrace) {
            let location = self.location_here();
            let statements = self.parse_brace_block_statements()?;
            return Ok(Expression::new(ExpressionKind::Block(statements), location));
        }
        self.parse_expression()
    }

    /// `[a, b, c]`
    fn parse_list_literal(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::LeftBracket, "'['")?;
        self.skip_newlines();
        let mut elements = Vec::new();
        while !self.cursor.check(TokenKind::RightBracket) {
            elements.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightBracket, "']'")?;
        Ok(Expression::new(ExpressionKind::ListLiteral(elements), location))
    }

    /// `{a, b}` set or `{k: v}` dict, decided by the `:` after the first
    /// element. `{}` is an empty dict.
    fn parse_dict_or_set_literal(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::LeftBrace, "'{'")?;
        self.skip_newlines();
        if self.cursor.eat(TokenKind::RightBrace) {
            return Ok(Expression::new(ExpressionKind::DictLiteral(Vec::new()), location));
        }

        let first = self.parse_expression()?;
        if self.cursor.eat(TokenKind::Colon) {
            let value = self.parse_expression()?;
            let mut entries = vec![(first, value)];
            self.skip_newlines();
            while self.cursor.eat(TokenKind::Comma) {
                self.skip_newlines();
                if self.cursor.check(TokenKind::RightBrace) {
                    break;
                }
                let key = self.parse_expression()?;
                self.cursor.consume(TokenKind::Colon, "':'")?;
                let value = self.parse_expression()?;
                entries.push((key, value));
                self.skip_newlines();
            }
            self.skip_newlines();
            self.cursor.consume(TokenKind::RightBrace, "'}'")?;
            return Ok(Expression::new(ExpressionKind::DictLiteral(entries), location));
        }

        let mut elements = vec![first];
        self.skip_newlines();
        while self.cursor.eat(TokenKind::Comma) {
            self.skip_newlines();
            if self.cursor.check(TokenKind::RightBrace) {
                break;
            }
            elements.push(self.parse_expression()?);
            self.skip_newlines();
        }
        self.skip_newlines();
        self.cursor.consume(TokenKind::RightBrace, "'}'")?;
        Ok(Expression::new(ExpressionKind::SetLiteral(elements), location))
    }

    /// `@intrinsic(name, args...)` in expression position.
    fn parse_intrinsic(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::IntrinsicAttr, "'@intrinsic'")?;
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        let name = match self.cursor.current_kind() {
            TokenKind::Identifier | TokenKind::TypeIdentifier => {
                self.cursor.advance().text.to_string()
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                return Err(ParseError::expected("an intrinsic name", found, line, column));
            }
        };
        let mut args = Vec::new();
        while self.cursor.eat(TokenKind::Comma) {
            args.push(self.parse_expression()?);
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(Expression::new(ExpressionKind::Intrinsic { name, args }, location))
    }

    /// `native("...")`
    fn parse_native(&mut self) -> ParseResult<Expression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::Native, "'native'")?;
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        let token = self.cursor.advance();
        let code = match literal_from_token(&token, false) {
            Ok(forge_ast::LiteralValue::Text { value, .. }) => value,
            _ => {
                return Err(ParseError::expected(
                    "a text literal",
                    token.text.to_string(),
                    token.line,
                    token.column,
                ));
            }
        };
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(Expression::new(ExpressionKind::Native { code }, location))
    }

    /// `( arg, name: arg, ... )` with named arguments accepted anywhere.
    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<Argument>> {
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        self.skip_newlines();
        let mut args = Vec::new();
        while !self.cursor.check(TokenKind::RightParen) {
            let name = if self.cursor.check(TokenKind::Identifier)
                && self.cursor.peek_kind(1) == TokenKind::Colon
            {
                let name = self.cursor.advance();
                self.cursor.advance();
                Some(name.text.to_string())
            } else {
                None
            };
            let value = self.parse_expression()?;
            args.push(Argument { name, value });
            self.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(args)
    }

    /// `( field: value, ... )` after `with`.
    fn parse_with_fields(&mut self) -> ParseResult<Vec<WithField>> {
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        self.skip_newlines();
        let mut fields = Vec::new();
        while !self.cursor.check(TokenKind::RightParen) {
            let name = self.cursor.consume(TokenKind::Identifier, "a field name")?;
            self.cursor.consume(TokenKind::Colon, "':'")?;
            let value = self.parse_expression()?;
            fields.push(WithField { name: name.text.to_string(), value });
            self.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(fields)
    }
}

/// Left-associative binary constructor; the node takes the left operand's
/// location.
fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let location = left.location.clone();
    Expression::new(
        ExpressionKind::Binary { op, left: Box::new(left), right: Box::new(right) },
        location,
    )
}

/// Comparison tokens that participate in chain collection.
fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::NotEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::Spaceship => BinaryOp::Spaceship,
        TokenKind::In => BinaryOp::In,
        TokenKind::NotIn => BinaryOp::NotIn,
        TokenKind::From => BinaryOp::From,
        TokenKind::NotFrom => BinaryOp::NotFrom,
        TokenKind::Follows => BinaryOp::Follows,
        TokenKind::NotFollows => BinaryOp::NotFollows,
        _ => return None,
    };
    Some(op)
}

/// Fold collected comparison operands: none pass through, one is a binary,
/// two or more become a validated `ChainedComparison`.
fn fold_comparison(
    first: Expression,
    tail: Vec<(BinaryOp, Token, Expression)>,
) -> ParseResult<Expression> {
    match tail.len() {
        0 => Ok(first),
        1 => {
            let mut tail = tail;
            let Some((op, _, right)) = tail.pop() else {
                return Ok(first);
            };
            Ok(binary(op, first, right))
        }
        _ => {
            let mut ascending: Option<&Token> = None;
            let mut descending: Option<&Token> = None;
            for (op, token, _) in &tail {
                match op.chain_direction() {
                    Some(ChainDirection::Ascending) => ascending = ascending.or(Some(token)),
                    Some(ChainDirection::Descending) => descending = descending.or(Some(token)),
                    _ => {}
                }
            }
            if let (Some(_), Some(conflict)) = (ascending, descending) {
                return Err(ParseError::InvalidComparisonChain {
                    line: conflict.line,
                    column: conflict.column,
                });
            }

            let location = first.location.clone();
            let mut operands = vec![first];
            let mut operators = Vec::new();
            for (op, _, operand) in tail {
                operators.push(op);
                operands.push(operand);
            }
            Ok(Expression::new(
                ExpressionKind::ChainedComparison { operands, operators },
                location,
            ))
        }
    }
}
