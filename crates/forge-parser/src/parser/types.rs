//! Type-expression parsing.
//!
//! Named types with generic arguments, the `Me`/`MyType` self types,
//! `Routine<...>` arity types, tuple types (`__Tuple`), const generic
//! arguments, and the `>>` split that lets nested generic argument lists
//! close through a right-shift token.

use forge_ast::{TypeExpression, TUPLE_TYPE_NAME};
use forge_token::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;

impl Parser {
    /// Parse a type expression.
    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeExpression> {
        let location = self.location_here();
        match self.cursor.current_kind() {
            TokenKind::Me => {
                self.cursor.advance();
                Ok(TypeExpression::named("Me", location))
            }
            TokenKind::MyType => {
                self.cursor.advance();
                Ok(TypeExpression::named("MyType", location))
            }
            // Arity-based routine type: `Routine` or `Routine<A, B, R>`,
            // last argument being the return type.
            TokenKind::Routine => {
                self.cursor.advance();
                let args = if self.cursor.check(TokenKind::Less) {
                    self.parse_generic_argument_list()?
                } else {
                    Vec::new()
                };
                Ok(TypeExpression::generic("Routine", args, location))
            }
            TokenKind::LeftParen => self.parse_tuple_type(),
            TokenKind::TypeIdentifier | TokenKind::Identifier => {
                let name = self.parse_dotted_type_name()?;
                let args = if self.cursor.check(TokenKind::Less) {
                    self.parse_generic_argument_list()?
                } else {
                    Vec::new()
                };
                Ok(TypeExpression::generic(name, args, location))
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected("a type", found, line, column))
            }
        }
    }

    /// `( T )` and `( A, B, C )`, both represented as `__Tuple<...>`.
    fn parse_tuple_type(&mut self) -> ParseResult<TypeExpression> {
        let location = self.location_here();
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_type()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok(TypeExpression::generic(TUPLE_TYPE_NAME, elements, location))
    }

    /// Namespace-qualified type name: `Collections.List` becomes one dotted
    /// name string.
    fn parse_dotted_type_name(&mut self) -> ParseResult<String> {
        let first = self.cursor.advance();
        let mut name = first.text.to_string();
        while self.cursor.check(TokenKind::Dot)
            && matches!(
                self.cursor.peek_kind(1),
                TokenKind::Identifier | TokenKind::TypeIdentifier
            )
        {
            self.cursor.advance();
            let segment = self.cursor.advance();
            name.push('.');
            name.push_str(&segment.text);
        }
        Ok(name)
    }

    /// `<arg, arg, ...>` with the `>>` split on close.
    pub(crate) fn parse_generic_argument_list(&mut self) -> ParseResult<Vec<TypeExpression>> {
        self.cursor.consume(TokenKind::Less, "'<'")?;
        let mut args = Vec::new();
        if !self.check_generic_close() {
            loop {
                args.push(self.parse_generic_argument()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_generic_close()?;
        Ok(args)
    }

    /// One generic argument: a type, or a const generic written as a
    /// numeric/boolean/letter literal (the literal text becomes the
    /// `TypeExpression` name). `EnumType.CASE` arrives through the ordinary
    /// dotted-name path.
    fn parse_generic_argument(&mut self) -> ParseResult<TypeExpression> {
        let location = self.location_here();
        let kind = self.cursor.current_kind();
        if kind.is_literal() {
            let token = self.cursor.advance();
            let text: String = token.text.chars().filter(|c| *c != '_').collect();
            return Ok(TypeExpression::named(text, location));
        }
        if kind == TokenKind::Minus && self.cursor.peek_kind(1).is_literal() {
            self.cursor.advance();
            let token = self.cursor.advance();
            let digits: String = token.text.chars().filter(|c| *c != '_').collect();
            return Ok(TypeExpression::named(format!("-{digits}"), location));
        }
        self.parse_type()
    }

    /// Whether the current token can close a generic argument list.
    fn check_generic_close(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Greater | TokenKind::RightShift | TokenKind::RightShiftLogical
        )
    }

    /// Consume one closing `>`. When the cursor sits on `>>` (or `>>>`), the
    /// token is split: one closer is consumed and the remainder is spliced
    /// back at the same location for the enclosing list.
    pub(crate) fn expect_generic_close(&mut self) -> ParseResult<()> {
        match self.cursor.current_kind() {
            TokenKind::Greater => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::RightShift => {
                let token = self.cursor.advance();
                self.cursor.insert(Token::new(
                    TokenKind::Greater,
                    ">",
                    token.line,
                    token.column,
                    token.position,
                ));
                Ok(())
            }
            TokenKind::RightShiftLogical => {
                let token = self.cursor.advance();
                self.cursor.insert(Token::new(
                    TokenKind::RightShift,
                    ">>",
                    token.line,
                    token.column,
                    token.position,
                ));
                Ok(())
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected("'>'", found, line, column))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn tok(kind: TokenKind, text: &str, column: u32) -> Token {
        Token::new(kind, text, 1, column, column as usize)
    }

    fn parser(tokens: Vec<Token>) -> Parser {
        let mut tokens = tokens;
        let column = tokens.last().map(|t| t.column + 1).unwrap_or(1);
        tokens.push(tok(TokenKind::Eof, "", column));
        Parser::new(tokens, "types.forge", Dialect::forge())
    }

    #[test]
    fn plain_named_type() {
        let mut p = parser(vec![tok(TokenKind::TypeIdentifier, "Circle", 1)]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type Circle)");
    }

    #[test]
    fn nested_generics_split_right_shift() {
        // Dict<String, List<Int>> — the two closers arrive as one `>>`.
        let mut p = parser(vec![
            tok(TokenKind::TypeIdentifier, "Dict", 1),
            tok(TokenKind::Less, "<", 2),
            tok(TokenKind::TypeIdentifier, "String", 3),
            tok(TokenKind::Comma, ",", 4),
            tok(TokenKind::TypeIdentifier, "List", 5),
            tok(TokenKind::Less, "<", 6),
            tok(TokenKind::TypeIdentifier, "Int", 7),
            tok(TokenKind::RightShift, ">>", 8),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type Dict (type String) (type List (type Int)))");
        assert_eq!(ty.nesting_depth(), 3);
    }

    #[test]
    fn triple_nesting_splits_logical_shift() {
        // A<B<C<D>>> — innermost close arrives as `>>>`.
        let mut p = parser(vec![
            tok(TokenKind::TypeIdentifier, "A", 1),
            tok(TokenKind::Less, "<", 2),
            tok(TokenKind::TypeIdentifier, "B", 3),
            tok(TokenKind::Less, "<", 4),
            tok(TokenKind::TypeIdentifier, "C", 5),
            tok(TokenKind::Less, "<", 6),
            tok(TokenKind::TypeIdentifier, "D", 7),
            tok(TokenKind::RightShiftLogical, ">>>", 8),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type A (type B (type C (type D))))");
    }

    #[test]
    fn tuple_type_uses_pseudo_name() {
        let mut p = parser(vec![
            tok(TokenKind::LeftParen, "(", 1),
            tok(TokenKind::TypeIdentifier, "A", 2),
            tok(TokenKind::Comma, ",", 3),
            tok(TokenKind::TypeIdentifier, "B", 4),
            tok(TokenKind::RightParen, ")", 5),
        ]);
        let ty = p.parse_type().unwrap();
        assert!(ty.is_tuple());
        assert_eq!(ty.generic_args.len(), 2);
    }

    #[test]
    fn single_element_tuple_matches_grouped_type() {
        let mut p = parser(vec![
            tok(TokenKind::LeftParen, "(", 1),
            tok(TokenKind::TypeIdentifier, "T", 2),
            tok(TokenKind::RightParen, ")", 3),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type __Tuple (type T))");
    }

    #[test]
    fn const_generic_arguments() {
        // Buffer<u8, 1024>
        let mut p = parser(vec![
            tok(TokenKind::TypeIdentifier, "Buffer", 1),
            tok(TokenKind::Less, "<", 2),
            tok(TokenKind::Identifier, "u8", 3),
            tok(TokenKind::Comma, ",", 4),
            tok(TokenKind::IntegerLiteral, "1_024", 5),
            tok(TokenKind::Greater, ">", 6),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type Buffer (type u8) (type 1024))");
    }

    #[test]
    fn routine_type_with_arity() {
        let mut p = parser(vec![
            tok(TokenKind::Routine, "Routine", 1),
            tok(TokenKind::Less, "<", 2),
            tok(TokenKind::TypeIdentifier, "Int", 3),
            tok(TokenKind::Comma, ",", 4),
            tok(TokenKind::TypeIdentifier, "Bool", 5),
            tok(TokenKind::Greater, ">", 6),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.to_sexp(), "(type Routine (type Int) (type Bool))");
    }

    #[test]
    fn dotted_namespace_type() {
        let mut p = parser(vec![
            tok(TokenKind::TypeIdentifier, "Collections", 1),
            tok(TokenKind::Dot, ".", 2),
            tok(TokenKind::TypeIdentifier, "List", 3),
        ]);
        let ty = p.parse_type().unwrap();
        assert_eq!(ty.name, "Collections.List");
    }
}
