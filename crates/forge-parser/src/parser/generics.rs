//! Generic parameter lists and constraints.
//!
//! Constraints have two surfaces producing the same records: inline
//! (`<T follows P1, P2, N is uaddr>`) and clause (`requires T follows P`,
//! legacy `where`). Inline and clause constraints merge by parameter name;
//! a clause naming an undeclared parameter is a parse error.

use forge_ast::{ConstraintKind, GenericConstraint, GenericParam, SourceLocation};
use forge_diagnostics::WarningCode;
use forge_token::TokenKind;

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;

impl Parser {
    /// Parse `<T, U follows P, ...>` if present: the declared parameters plus
    /// any inline constraints. Parameters are declared into the innermost
    /// generic scope as they are read.
    pub(crate) fn parse_generic_params(
        &mut self,
    ) -> ParseResult<(Vec<GenericParam>, Vec<GenericConstraint>)> {
        let mut params = Vec::new();
        let mut constraints = Vec::new();
        if !self.cursor.check(TokenKind::Less) {
            return Ok((params, constraints));
        }
        self.cursor.advance();

        loop {
            let name_token = match self.cursor.current_kind() {
                TokenKind::Identifier | TokenKind::TypeIdentifier => self.cursor.advance(),
                _ => {
                    let (found, line, column) = self.cursor.describe_current();
                    return Err(ParseError::expected(
                        "a generic parameter name",
                        found,
                        line,
                        column,
                    ));
                }
            };
            let name = name_token.text.to_string();
            let location = self.location_of(&name_token);
            self.scopes.declare_generic(&name);
            params.push(GenericParam { name: name.clone(), location: location.clone() });

            self.parse_inline_constraints(&name, location, &mut constraints)?;

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_generic_close()?;
        Ok((params, constraints))
    }

    /// Inline constraints directly after one parameter name.
    fn parse_inline_constraints(
        &mut self,
        param: &str,
        location: SourceLocation,
        constraints: &mut Vec<GenericConstraint>,
    ) -> ParseResult<()> {
        loop {
            match self.cursor.current_kind() {
                TokenKind::Follows => {
                    self.cursor.advance();
                    let protocols = self.parse_protocol_list()?;
                    add_constraint(constraints, param, ConstraintKind::Follows(protocols), &location);
                }
                TokenKind::From => {
                    self.cursor.advance();
                    let base = self.parse_type()?;
                    add_constraint(constraints, param, ConstraintKind::From(base), &location);
                }
                TokenKind::Is => {
                    self.cursor.advance();
                    let kind = self.parse_category_or_const_generic()?;
                    add_constraint(constraints, param, kind, &location);
                }
                TokenKind::In => {
                    self.cursor.advance();
                    self.cursor.consume(TokenKind::LeftBracket, "'['")?;
                    let mut types = Vec::new();
                    loop {
                        types.push(self.parse_type()?);
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.cursor.consume(TokenKind::RightBracket, "']'")?;
                    add_constraint(constraints, param, ConstraintKind::TypeEquality(types), &location);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// After `is`: a type-category keyword, or a primitive type making the
    /// parameter a const generic.
    fn parse_category_or_const_generic(&mut self) -> ParseResult<ConstraintKind> {
        let kind = match self.cursor.current_kind() {
            TokenKind::Record => ConstraintKind::ValueType,
            TokenKind::Entity => ConstraintKind::ReferenceType,
            TokenKind::Resident => ConstraintKind::ResidentType,
            TokenKind::Routine | TokenKind::Recipe => ConstraintKind::RoutineType,
            TokenKind::Choice => ConstraintKind::ChoiceType,
            TokenKind::Variant => ConstraintKind::VariantType,
            TokenKind::Mutant | TokenKind::Chimera => ConstraintKind::MutantType,
            _ => return Ok(ConstraintKind::ConstGeneric(self.parse_type()?)),
        };
        self.cursor.advance();
        Ok(kind)
    }

    /// Comma-separated protocol list after `follows`. A following name
    /// continues the list unless it is itself constrained (then it starts the
    /// next parameter).
    fn parse_protocol_list(&mut self) -> ParseResult<Vec<forge_ast::TypeExpression>> {
        let mut protocols = vec![self.parse_type()?];
        while self.cursor.check(TokenKind::Comma) {
            let next = self.cursor.peek_kind(1);
            if !matches!(next, TokenKind::Identifier | TokenKind::TypeIdentifier) {
                break;
            }
            if matches!(
                self.cursor.peek_kind(2),
                TokenKind::Follows | TokenKind::From | TokenKind::Is | TokenKind::In
            ) {
                break;
            }
            self.cursor.advance();
            protocols.push(self.parse_type()?);
        }
        Ok(protocols)
    }

    /// `requires` / legacy `where` clauses after a header. Every named
    /// parameter must already be declared in the current generic scope.
    pub(crate) fn parse_constraint_clauses(
        &mut self,
        constraints: &mut Vec<GenericConstraint>,
    ) -> ParseResult<()> {
        while self.cursor.check_any(&[TokenKind::Requires, TokenKind::Where]) {
            let clause_token = self.cursor.advance();
            if clause_token.kind == TokenKind::Where && !self.dialect.legacy_keywords {
                self.warn(
                    WarningCode::LegacyWhereClause,
                    "legacy 'where' clause; use 'requires'",
                    &clause_token,
                );
            }

            loop {
                let name_token = match self.cursor.current_kind() {
                    TokenKind::Identifier | TokenKind::TypeIdentifier => self.cursor.advance(),
                    _ => {
                        let (found, line, column) = self.cursor.describe_current();
                        return Err(ParseError::expected(
                            "a generic parameter name",
                            found,
                            line,
                            column,
                        ));
                    }
                };
                let name = name_token.text.to_string();
                if !self.scopes.is_generic_param(&name) {
                    return Err(ParseError::UndeclaredGenericParameter {
                        name,
                        line: name_token.line,
                        column: name_token.column,
                    });
                }
                let location = self.location_of(&name_token);
                self.parse_inline_constraints(&name, location, constraints)?;

                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Merge a constraint kind into the record for `param`, creating the record
/// on first sight.
fn add_constraint(
    constraints: &mut Vec<GenericConstraint>,
    param: &str,
    kind: ConstraintKind,
    location: &SourceLocation,
) {
    if let Some(existing) = constraints.iter_mut().find(|c| c.param == param) {
        existing.kinds.push(kind);
        return;
    }
    constraints.push(GenericConstraint {
        param: param.to_string(),
        kinds: vec![kind],
        location: location.clone(),
    });
}
