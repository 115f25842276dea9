//! Pattern parsing for `when` clauses and destructuring declarations.

use forge_ast::{DestructuringBinding, ExpressionKind, Pattern, PatternKind};
use forge_token::TokenKind;

use crate::error::ParseResult;
use crate::parser::literals::{is_sign_foldable, literal_from_token};
use crate::parser::Parser;

impl Parser {
    /// Parse one pattern, including an optional trailing `if` guard.
    pub(crate) fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let pattern = self.parse_pattern_head()?;
        self.parse_optional_guard(pattern)
    }

    /// Wrap `pattern` in a guard when a trailing `if cond` follows. The guard
    /// condition is an ordinary expression; the pattern-context `is`
    /// suppression does not extend into it.
    pub(crate) fn parse_optional_guard(&mut self, pattern: Pattern) -> ParseResult<Pattern> {
        if !self.cursor.check(TokenKind::If) {
            return Ok(pattern);
        }
        self.cursor.advance();
        let condition = self.with_flags(
            |flags| flags.in_when_pattern = false,
            Parser::parse_expression,
        )?;
        let location = pattern.location.clone();
        Ok(Pattern::new(
            PatternKind::Guard { inner: Box::new(pattern), condition },
            location,
        ))
    }

    fn parse_pattern_head(&mut self) -> ParseResult<Pattern> {
        let location = self.location_here();
        match self.cursor.current_kind() {
            TokenKind::Underscore => {
                self.cursor.advance();
                Ok(Pattern::new(PatternKind::Wildcard, location))
            }
            // Type pattern, optionally with binding or destructuring.
            TokenKind::TypeIdentifier => {
                let ty = self.parse_type()?;
                if self.cursor.check(TokenKind::LeftParen) {
                    let bindings = self.parse_destructuring_bindings()?;
                    return Ok(Pattern::new(
                        PatternKind::TypeDestructuring { ty, bindings },
                        location,
                    ));
                }
                let binding = if self.cursor.check(TokenKind::Identifier) {
                    Some(self.cursor.advance().text.to_string())
                } else {
                    None
                };
                Ok(Pattern::new(PatternKind::Type { ty, binding }, location))
            }
            TokenKind::Identifier => {
                let token = self.cursor.advance();
                Ok(Pattern::new(PatternKind::Identifier(token.text.to_string()), location))
            }
            TokenKind::Minus if is_sign_foldable(self.cursor.peek_kind(1)) => {
                self.cursor.advance();
                let token = self.cursor.advance();
                let value = literal_from_token(&token, true)?;
                Ok(Pattern::new(PatternKind::Literal(value), location))
            }
            kind if kind.is_literal() => {
                let token = self.cursor.advance();
                let value = literal_from_token(&token, false)?;
                Ok(Pattern::new(PatternKind::Literal(value), location))
            }
            TokenKind::LeftParen => {
                let bindings = self.parse_destructuring_bindings()?;
                Ok(Pattern::new(PatternKind::Destructuring { bindings }, location))
            }
            // Anything else: parse an expression and collapse where possible.
            _ => {
                let expr = self.parse_expression()?;
                let kind = match expr.kind {
                    ExpressionKind::Identifier(name) => PatternKind::Identifier(name),
                    ExpressionKind::Literal(value) => PatternKind::Literal(value),
                    other => PatternKind::Expression(forge_ast::Expression::new(
                        other,
                        expr.location,
                    )),
                };
                Ok(Pattern::new(kind, location))
            }
        }
    }

    /// `( binding, ... )` destructuring list. Accepted forms: `_`, `name`,
    /// `field: binding`, `field: (...)`, `(...)`.
    pub(crate) fn parse_destructuring_bindings(
        &mut self,
    ) -> ParseResult<Vec<DestructuringBinding>> {
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        self.skip_newlines();
        let mut bindings = Vec::new();
        while !self.cursor.check(TokenKind::RightParen) {
            bindings.push(self.parse_destructuring_binding()?);
            self.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(bindings)
    }

    fn parse_destructuring_binding(&mut self) -> ParseResult<DestructuringBinding> {
        let location = self.location_here();
        match self.cursor.current_kind() {
            TokenKind::Underscore => {
                self.cursor.advance();
                Ok(DestructuringBinding {
                    field: None,
                    binding: None,
                    nested: Some(Box::new(Pattern::new(PatternKind::Wildcard, location))),
                })
            }
            TokenKind::LeftParen => {
                let bindings = self.parse_destructuring_bindings()?;
                Ok(DestructuringBinding {
                    field: None,
                    binding: None,
                    nested: Some(Box::new(Pattern::new(
                        PatternKind::Destructuring { bindings },
                        location,
                    ))),
                })
            }
            TokenKind::Identifier => {
                let field = self.cursor.advance().text.to_string();
                if !self.cursor.eat(TokenKind::Colon) {
                    // Positional: field name binds a local of the same name.
                    return Ok(DestructuringBinding {
                        field: Some(field.clone()),
                        binding: Some(field),
                        nested: None,
                    });
                }
                if self.cursor.check(TokenKind::LeftParen) {
                    let nested_location = self.location_here();
                    let bindings = self.parse_destructuring_bindings()?;
                    return Ok(DestructuringBinding {
                        field: Some(field),
                        binding: None,
                        nested: Some(Box::new(Pattern::new(
                            PatternKind::Destructuring { bindings },
                            nested_location,
                        ))),
                    });
                }
                let binding = self.cursor.consume(TokenKind::Identifier, "a binding name")?;
                Ok(DestructuringBinding {
                    field: Some(field),
                    binding: Some(binding.text.to_string()),
                    nested: None,
                })
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(crate::error::ParseError::expected(
                    "a destructuring binding",
                    found,
                    line,
                    column,
                ))
            }
        }
    }
}
