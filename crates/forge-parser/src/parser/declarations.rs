//! Declaration parsing.
//!
//! Every form follows the same outline: attributes and visibility first, then
//! the header keyword, name, optional generic parameters with inline
//! constraints, optional `requires`/`where` clause, optional inheritance
//! clauses, then the body in the dialect's block style.

use forge_ast::{
    Attribute, AttributeArg, ChoiceCase, Declaration, DeclarationKind, GenericConstraint,
    GenericParam, LiteralValue, NameSegment, Parameter, RequiredField, TypeExpression, VariantCase,
    VariantKind, Visibility,
};
use forge_diagnostics::WarningCode;
use forge_token::TokenKind;

use crate::dialect::BlockStyle;
use crate::error::{ParseError, ParseResult};
use crate::parser::literals::literal_from_token;
use crate::parser::Parser;

/// Visibility defaults to module scope when no modifier is written.
const DEFAULT_VISIBILITY: Visibility = Visibility::Internal;

impl Parser {
    /// Parse one declaration, with leading attributes and visibility.
    pub fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        self.skip_newlines();
        let attributes = self.parse_attributes()?;
        let (visibility, setter_visibility) = self.parse_visibility_spec()?;

        let kind = self.cursor.current_kind();
        if !attributes.is_empty()
            && !matches!(
                kind,
                TokenKind::Routine
                    | TokenKind::Recipe
                    | TokenKind::Entity
                    | TokenKind::Record
                    | TokenKind::Resident
            )
        {
            let (found, line, column) = self.cursor.describe_current();
            return Err(ParseError::expected(
                "a routine or type declaration after attributes",
                found,
                line,
                column,
            ));
        }

        match kind {
            TokenKind::Namespace => self.parse_namespace(),
            TokenKind::Import => self.parse_import(),
            TokenKind::Define => self.parse_define(),
            TokenKind::Using => self.parse_using(),
            TokenKind::Preset => self.parse_preset(visibility),
            TokenKind::Var | TokenKind::Let => {
                self.parse_variable(visibility, setter_visibility)
            }
            TokenKind::Routine | TokenKind::Recipe => {
                self.parse_routine(attributes, visibility, false)
            }
            TokenKind::Entity | TokenKind::Record | TokenKind::Resident => {
                self.parse_type_declaration(attributes, visibility)
            }
            TokenKind::Choice => self.parse_choice(visibility),
            TokenKind::Variant | TokenKind::Mutant | TokenKind::Chimera => {
                self.parse_variant(visibility)
            }
            TokenKind::Protocol => self.parse_protocol(visibility),
            TokenKind::Imported => self.parse_imported(),
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected("a declaration", found, line, column))
            }
        }
    }

    // ——— Attributes and visibility ———

    /// `@name` / `@name(arg, ...)`; `@intrinsic` may also arrive
    /// pre-tokenized as a single token.
    fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();
        loop {
            if self.cursor.check(TokenKind::IntrinsicAttr) {
                let token = self.cursor.advance();
                attributes.push(Attribute {
                    name: "intrinsic".to_string(),
                    args: Vec::new(),
                    location: self.location_of(&token),
                });
                self.skip_newlines();
                continue;
            }
            if !self.cursor.check(TokenKind::At) {
                break;
            }
            let at = self.cursor.advance();
            let name = match self.cursor.current_kind() {
                TokenKind::Identifier | TokenKind::TypeIdentifier => self.cursor.advance(),
                _ => {
                    let (found, line, column) = self.cursor.describe_current();
                    return Err(ParseError::expected("an attribute name", found, line, column));
                }
            };
            let mut args = Vec::new();
            if self.cursor.eat(TokenKind::LeftParen) {
                while !self.cursor.check(TokenKind::RightParen) {
                    args.push(self.parse_attribute_arg()?);
                    if !self.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.cursor.consume(TokenKind::RightParen, "')'")?;
            }
            attributes.push(Attribute {
                name: name.text.to_string(),
                args,
                location: self.location_of(&at),
            });
            self.skip_newlines();
        }
        Ok(attributes)
    }

    /// Attribute arguments are literals or bare identifiers.
    fn parse_attribute_arg(&mut self) -> ParseResult<AttributeArg> {
        let kind = self.cursor.current_kind();
        if kind.is_literal() {
            let token = self.cursor.advance();
            return Ok(AttributeArg::Literal(literal_from_token(&token, false)?));
        }
        match kind {
            TokenKind::Identifier | TokenKind::TypeIdentifier => {
                let token = self.cursor.advance();
                Ok(AttributeArg::Identifier(token.text.to_string()))
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected("a literal or identifier", found, line, column))
            }
        }
    }

    /// Zero or more visibility modifiers; `<modifier>(set)` names the setter
    /// visibility separately.
    fn parse_visibility_spec(&mut self) -> ParseResult<(Visibility, Option<Visibility>)> {
        let mut main: Option<Visibility> = None;
        let mut setter: Option<Visibility> = None;
        while self.cursor.current_kind().is_visibility() {
            let token = self.cursor.advance();
            let visibility = map_visibility(token.kind);
            if self.cursor.check(TokenKind::LeftParen)
                && self.cursor.peek_kind(1) == TokenKind::Identifier
                && self.cursor.peek(1).map(|t| &*t.text == "set").unwrap_or(false)
                && self.cursor.peek_kind(2) == TokenKind::RightParen
            {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
                setter = Some(visibility);
            } else if main.is_none() {
                main = Some(visibility);
            }
        }
        Ok((main.unwrap_or(DEFAULT_VISIBILITY), setter))
    }

    // ——— Simple forms ———

    fn parse_namespace(&mut self) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let path = self.parse_dotted_path()?;
        Ok(Declaration::new(DeclarationKind::Namespace { path }, location))
    }

    fn parse_import(&mut self) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let module_path = self.parse_dotted_path()?;
        self.scopes.imported_namespaces.insert(module_path.join("."));

        let alias = if self.cursor.eat(TokenKind::As) {
            Some(self.parse_name("an import alias")?)
        } else {
            None
        };
        let specific = if self.cursor.eat(TokenKind::LeftParen) {
            let mut names = Vec::new();
            while !self.cursor.check(TokenKind::RightParen) {
                names.push(self.parse_name("an imported name")?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.consume(TokenKind::RightParen, "')'")?;
            Some(names)
        } else {
            None
        };

        Ok(Declaration::new(
            DeclarationKind::Import { module_path, alias, specific },
            location,
        ))
    }

    /// `define Old as New`
    fn parse_define(&mut self) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let old_name = self.parse_type()?;
        self.cursor.consume(TokenKind::As, "'as'")?;
        let new_name = self.parse_name("a type alias name")?;
        self.scopes.known_types.insert(new_name.clone());
        Ok(Declaration::new(DeclarationKind::Define { old_name, new_name }, location))
    }

    /// `using A.B.C as D`
    fn parse_using(&mut self) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let target = self.parse_type()?;
        self.cursor.consume(TokenKind::As, "'as'")?;
        let alias = self.parse_name("an alias")?;
        self.scopes.known_types.insert(alias.clone());
        Ok(Declaration::new(DeclarationKind::Using { target, alias }, location))
    }

    /// `preset NAME: Type = value`
    fn parse_preset(&mut self, visibility: Visibility) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let name = self.parse_name("a constant name")?;
        self.cursor.consume(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        self.cursor.consume(TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Declaration::new(
            DeclarationKind::Preset { name, ty, value, visibility },
            location,
        ))
    }

    /// `var name: Type = init` / `let name = init`. Setter visibility must be
    /// at least as restrictive as the getter's.
    fn parse_variable(
        &mut self,
        visibility: Visibility,
        setter_visibility: Option<Visibility>,
    ) -> ParseResult<Declaration> {
        let location = self.location_here();
        let keyword = self.cursor.advance();
        let mutable = keyword.kind == TokenKind::Var;
        let name = self.cursor.consume(TokenKind::Identifier, "a variable name")?;
        let ty = if self.cursor.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let initializer = if self.cursor.eat(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let getter_visibility = visibility;
        if let Some(setter) = setter_visibility {
            if setter.rank() < getter_visibility.rank() {
                return Err(ParseError::InvalidSetterVisibility {
                    line: name.line,
                    column: name.column,
                });
            }
        }

        Ok(Declaration::new(
            DeclarationKind::Variable {
                name: name.text.to_string(),
                ty,
                initializer,
                visibility,
                mutable,
                getter_visibility,
                setter_visibility,
            },
            location,
        ))
    }

    // ——— Routines ———

    /// `routine A.B<T>.c!(params) -> Ret requires ... { body }`. Signature
    /// only when `@intrinsic` is attached or the routine sits in a protocol.
    pub(crate) fn parse_routine(
        &mut self,
        attributes: Vec<Attribute>,
        visibility: Visibility,
        in_protocol: bool,
    ) -> ParseResult<Declaration> {
        let location = self.location_here();
        let keyword = self.cursor.advance();
        if keyword.kind == TokenKind::Recipe && !self.dialect.legacy_keywords {
            self.warn(WarningCode::DeprecatedKeyword, "legacy 'recipe' keyword", &keyword);
        }

        self.scopes.push_generic_scope();
        let result = self.parse_routine_parts(attributes, visibility, in_protocol, location);
        self.scopes.pop_generic_scope();
        result
    }

    fn parse_routine_parts(
        &mut self,
        attributes: Vec<Attribute>,
        visibility: Visibility,
        in_protocol: bool,
        location: forge_ast::SourceLocation,
    ) -> ParseResult<Declaration> {
        let mut name = Vec::new();
        let mut generic_params: Vec<GenericParam> = Vec::new();
        let mut constraints: Vec<GenericConstraint> = Vec::new();
        loop {
            let segment = self.parse_name_segment(&mut constraints)?;
            generic_params.extend(segment.generic_params.iter().cloned());
            name.push(segment);
            if !self.cursor.eat(TokenKind::Dot) {
                break;
            }
        }

        let (parameters, _) = self.parse_parameter_list(false)?;
        let return_type = if self.cursor.eat(TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.parse_constraint_clauses(&mut constraints)?;

        let signature_only =
            in_protocol || attributes.iter().any(|attr| attr.name == "intrinsic");
        let body = if signature_only {
            None
        } else {
            Some(Box::new(self.parse_block()?))
        };

        Ok(Declaration::new(
            DeclarationKind::Routine {
                name,
                parameters,
                return_type,
                body,
                visibility,
                attributes,
                generic_params,
                constraints,
            },
            location,
        ))
    }

    /// One routine-name segment: name, optional generic parameters (with
    /// inline constraints), optional failable `!`.
    fn parse_name_segment(
        &mut self,
        constraints: &mut Vec<GenericConstraint>,
    ) -> ParseResult<NameSegment> {
        let name = match self.cursor.current_kind() {
            TokenKind::Identifier | TokenKind::TypeIdentifier => self.cursor.advance(),
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                return Err(ParseError::expected("a routine name", found, line, column));
            }
        };
        let generic_params = if self.cursor.check(TokenKind::Less) {
            let (params, inline) = self.parse_generic_params()?;
            constraints.extend(inline);
            params
        } else {
            Vec::new()
        };
        let failable = self.cursor.eat(TokenKind::Bang);
        Ok(NameSegment { name: name.text.to_string(), generic_params, failable })
    }

    /// `( me, name: Type = default, ... )`. Variadic `...` is only legal in
    /// imported routines.
    fn parse_parameter_list(
        &mut self,
        allow_variadic: bool,
    ) -> ParseResult<(Vec<Parameter>, bool)> {
        self.cursor.consume(TokenKind::LeftParen, "'('")?;
        self.skip_newlines();
        let mut parameters = Vec::new();
        let mut variadic = false;
        while !self.cursor.check(TokenKind::RightParen) {
            if self.cursor.check(TokenKind::Ellipsis) {
                let token = self.cursor.advance();
                if !allow_variadic {
                    return Err(ParseError::expected(
                        "a parameter (variadic '...' is only allowed in imported routines)",
                        "...",
                        token.line,
                        token.column,
                    ));
                }
                variadic = true;
                break;
            }
            parameters.push(self.parse_parameter()?);
            self.skip_newlines();
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.cursor.consume(TokenKind::RightParen, "')'")?;
        Ok((parameters, variadic))
    }

    fn parse_parameter(&mut self) -> ParseResult<Parameter> {
        let location = self.location_here();
        if self.cursor.check(TokenKind::Me) {
            let token = self.cursor.advance();
            return Ok(Parameter {
                name: token.text.to_string(),
                ty: None,
                default: None,
                variadic: false,
                location,
            });
        }
        let name = self.cursor.consume(TokenKind::Identifier, "a parameter name")?;
        self.cursor.consume(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        let default = if self.cursor.eat(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Parameter {
            name: name.text.to_string(),
            ty: Some(ty),
            default,
            variadic: false,
            location,
        })
    }

    // ——— Entity / record / resident ———

    fn parse_type_declaration(
        &mut self,
        attributes: Vec<Attribute>,
        visibility: Visibility,
    ) -> ParseResult<Declaration> {
        let location = self.location_here();
        let keyword = self.cursor.advance();
        let name = self.parse_name("a type name")?;
        self.scopes.known_types.insert(name.clone());

        self.scopes.push_generic_scope();
        let result =
            self.parse_type_declaration_parts(keyword.kind, attributes, visibility, name, location);
        self.scopes.pop_generic_scope();
        result
    }

    fn parse_type_declaration_parts(
        &mut self,
        keyword: TokenKind,
        attributes: Vec<Attribute>,
        visibility: Visibility,
        name: String,
        location: forge_ast::SourceLocation,
    ) -> ParseResult<Declaration> {
        let (generic_params, mut constraints) = self.parse_generic_params()?;

        let base_class = if self.cursor.eat(TokenKind::From) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let protocols = if self.cursor.eat(TokenKind::Follows) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };
        self.parse_constraint_clauses(&mut constraints)?;

        let members = if keyword == TokenKind::Record {
            self.with_flags(
                |flags| flags.parsing_record_body = true,
                Parser::parse_member_block,
            )?
        } else {
            self.parse_member_block()?
        };

        let kind = match keyword {
            TokenKind::Entity => DeclarationKind::Entity {
                name,
                generic_params,
                constraints,
                base_class,
                protocols,
                members,
                visibility,
                attributes,
            },
            TokenKind::Record => DeclarationKind::Record {
                name,
                generic_params,
                constraints,
                base_class,
                protocols,
                members,
                visibility,
                attributes,
            },
            _ => DeclarationKind::Resident {
                name,
                generic_params,
                constraints,
                base_class,
                protocols,
                members,
                visibility,
                attributes,
            },
        };
        Ok(Declaration::new(kind, location))
    }

    /// Member declarations inside a type body, with per-member recovery.
    fn parse_member_block(&mut self) -> ParseResult<Vec<Declaration>> {
        if self.open_decl_block()? {
            return Ok(Vec::new());
        }
        let mut members = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_decl_block_end() {
                break;
            }
            if self.cursor.check(TokenKind::Pass) {
                self.cursor.advance();
                continue;
            }
            match self.parse_declaration() {
                Ok(member) => members.push(member),
                Err(error) => {
                    self.report(&error);
                    self.synchronize();
                }
            }
        }
        self.close_decl_block()?;
        Ok(members)
    }

    // ——— Choice ———

    /// `choice Color { RED = 1, GREEN, routine describe(me) ... }`
    fn parse_choice(&mut self, visibility: Visibility) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let name = self.parse_name("a choice name")?;
        self.scopes.known_types.insert(name.clone());

        let mut cases = Vec::new();
        let mut methods = Vec::new();
        if !self.open_decl_block()? {
            loop {
                self.skip_newlines();
                if self.at_decl_block_end() {
                    break;
                }
                if self.at_member_declaration() {
                    match self.parse_declaration() {
                        Ok(method) => methods.push(method),
                        Err(error) => {
                            self.report(&error);
                            self.synchronize();
                        }
                    }
                    continue;
                }
                cases.push(self.parse_choice_case()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    if !self.cursor.check(TokenKind::Newline) && !self.at_decl_block_end() {
                        let (found, line, column) = self.cursor.describe_current();
                        return Err(ParseError::expected("',' or newline", found, line, column));
                    }
                }
            }
            self.close_decl_block()?;
        }

        Ok(Declaration::new(
            DeclarationKind::Choice { name, cases, methods, visibility },
            location,
        ))
    }

    fn parse_choice_case(&mut self) -> ParseResult<ChoiceCase> {
        let location = self.location_here();
        let name = self.parse_name("a case name")?;
        let value = if self.cursor.eat(TokenKind::Assign) {
            let negative = self.cursor.eat(TokenKind::Minus);
            let token = self.cursor.advance();
            match literal_from_token(&token, negative)? {
                LiteralValue::Integer { value, .. } => Some(value),
                _ => {
                    return Err(ParseError::InvalidLiteral {
                        literal: token.text.to_string(),
                        line: token.line,
                        column: token.column,
                    });
                }
            }
        } else {
            None
        };
        Ok(ChoiceCase { name, value, location })
    }

    // ——— Variant ———

    /// `variant Shape<T> { Circle(F64), Square(F64), ... }`; `mutant` and the
    /// legacy `chimera` differ only in kind.
    fn parse_variant(&mut self, visibility: Visibility) -> ParseResult<Declaration> {
        let location = self.location_here();
        let keyword = self.cursor.advance();
        let kind = match keyword.kind {
            TokenKind::Variant => VariantKind::Variant,
            TokenKind::Mutant => VariantKind::Mutant,
            _ => {
                if !self.dialect.legacy_keywords {
                    self.warn(
                        WarningCode::DeprecatedKeyword,
                        "legacy 'chimera' keyword",
                        &keyword,
                    );
                }
                VariantKind::Chimera
            }
        };
        let name = self.parse_name("a variant name")?;
        self.scopes.known_types.insert(name.clone());

        self.scopes.push_generic_scope();
        let result = self.parse_variant_parts(kind, visibility, name, location);
        self.scopes.pop_generic_scope();
        result
    }

    fn parse_variant_parts(
        &mut self,
        kind: VariantKind,
        visibility: Visibility,
        name: String,
        location: forge_ast::SourceLocation,
    ) -> ParseResult<Declaration> {
        let (generic_params, _constraints) = self.parse_generic_params()?;

        let mut cases = Vec::new();
        let mut methods = Vec::new();
        if !self.open_decl_block()? {
            loop {
                self.skip_newlines();
                if self.at_decl_block_end() {
                    break;
                }
                if self.at_member_declaration() {
                    match self.parse_declaration() {
                        Ok(method) => methods.push(method),
                        Err(error) => {
                            self.report(&error);
                            self.synchronize();
                        }
                    }
                    continue;
                }
                cases.push(self.parse_variant_case()?);
                self.cursor.eat(TokenKind::Comma);
            }
            self.close_decl_block()?;
        }

        Ok(Declaration::new(
            DeclarationKind::Variant { name, generic_params, cases, kind, methods, visibility },
            location,
        ))
    }

    fn parse_variant_case(&mut self) -> ParseResult<VariantCase> {
        let location = self.location_here();
        let name = self.parse_name("a case name")?;
        let associated = if self.cursor.eat(TokenKind::LeftParen) {
            let ty = self.parse_type()?;
            self.cursor.consume(TokenKind::RightParen, "')'")?;
            Some(ty)
        } else {
            None
        };
        Ok(VariantCase { name, associated, location })
    }

    // ——— Protocol ———

    /// `protocol Drawable follows Base { routine draw(me), var color: Color }`
    fn parse_protocol(&mut self, visibility: Visibility) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();
        let name = self.parse_name("a protocol name")?;
        self.scopes.known_types.insert(name.clone());

        self.scopes.push_generic_scope();
        let result = self.parse_protocol_parts(visibility, name, location);
        self.scopes.pop_generic_scope();
        result
    }

    fn parse_protocol_parts(
        &mut self,
        visibility: Visibility,
        name: String,
        location: forge_ast::SourceLocation,
    ) -> ParseResult<Declaration> {
        let (generic_params, mut constraints) = self.parse_generic_params()?;
        let parent_protocols = if self.cursor.eat(TokenKind::Follows) {
            self.parse_type_list()?
        } else {
            Vec::new()
        };
        self.parse_constraint_clauses(&mut constraints)?;

        let mut methods = Vec::new();
        let mut required_fields = Vec::new();
        if !self.open_decl_block()? {
            loop {
                self.skip_newlines();
                if self.at_decl_block_end() {
                    break;
                }
                match self.cursor.current_kind() {
                    TokenKind::Routine | TokenKind::Recipe => {
                        let method = self.parse_routine(Vec::new(), DEFAULT_VISIBILITY, true)?;
                        methods.push(method);
                    }
                    TokenKind::Var | TokenKind::Let => {
                        required_fields.push(self.parse_required_field()?);
                    }
                    TokenKind::Pass => {
                        self.cursor.advance();
                    }
                    _ => {
                        let (found, line, column) = self.cursor.describe_current();
                        return Err(ParseError::expected(
                            "a routine signature or field requirement",
                            found,
                            line,
                            column,
                        ));
                    }
                }
                self.cursor.eat(TokenKind::Comma);
            }
            self.close_decl_block()?;
        }

        Ok(Declaration::new(
            DeclarationKind::Protocol {
                name,
                generic_params,
                parent_protocols,
                methods,
                required_fields,
                visibility,
            },
            location,
        ))
    }

    /// `var name: Type` inside a protocol body.
    fn parse_required_field(&mut self) -> ParseResult<RequiredField> {
        let location = self.location_here();
        self.cursor.advance();
        let name = self.cursor.consume(TokenKind::Identifier, "a field name")?;
        self.cursor.consume(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        Ok(RequiredField { name: name.text.to_string(), ty, location })
    }

    // ——— Imported / FFI ———

    /// `imported("C") routine puts(s: Text8, ...) -> s32`
    fn parse_imported(&mut self) -> ParseResult<Declaration> {
        let location = self.location_here();
        self.cursor.advance();

        let calling_convention = if self.cursor.eat(TokenKind::LeftParen) {
            let token = self.cursor.advance();
            let convention = match literal_from_token(&token, false) {
                Ok(LiteralValue::Text { value, .. }) => value,
                _ => {
                    return Err(ParseError::expected(
                        "a calling convention string",
                        token.text.to_string(),
                        token.line,
                        token.column,
                    ));
                }
            };
            self.cursor.consume(TokenKind::RightParen, "')'")?;
            convention
        } else {
            "C".to_string()
        };

        let keyword = self.cursor.eat_any(&[TokenKind::Routine, TokenKind::Recipe]);
        if keyword.is_none() {
            let (found, line, column) = self.cursor.describe_current();
            return Err(ParseError::expected("'routine'", found, line, column));
        }

        let name = self.parse_name("an imported routine name")?;
        self.scopes.push_generic_scope();
        let result = self.parse_imported_parts(name, calling_convention, location);
        self.scopes.pop_generic_scope();
        result
    }

    fn parse_imported_parts(
        &mut self,
        name: String,
        calling_convention: String,
        location: forge_ast::SourceLocation,
    ) -> ParseResult<Declaration> {
        let (generic_params, _constraints) = self.parse_generic_params()?;
        let (parameters, variadic) = self.parse_parameter_list(true)?;
        let return_type = if self.cursor.eat(TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(Declaration::new(
            DeclarationKind::Imported {
                name,
                parameters,
                return_type,
                calling_convention,
                variadic,
                generic_params,
            },
            location,
        ))
    }

    // ——— Shared helpers ———

    fn parse_name(&mut self, expected: &str) -> ParseResult<String> {
        match self.cursor.current_kind() {
            TokenKind::Identifier | TokenKind::TypeIdentifier => {
                Ok(self.cursor.advance().text.to_string())
            }
            _ => {
                let (found, line, column) = self.cursor.describe_current();
                Err(ParseError::expected(expected, found, line, column))
            }
        }
    }

    fn parse_dotted_path(&mut self) -> ParseResult<Vec<String>> {
        let mut path = vec![self.parse_name("a namespace segment")?];
        while self.cursor.eat(TokenKind::Dot) {
            path.push(self.parse_name("a namespace segment")?);
        }
        Ok(path)
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<TypeExpression>> {
        let mut types = vec![self.parse_type()?];
        while self.cursor.eat(TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    /// Whether the cursor sits on something that must be a member
    /// declaration rather than a case (inside choice/variant bodies).
    fn at_member_declaration(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Routine
                | TokenKind::Recipe
                | TokenKind::At
                | TokenKind::IntrinsicAttr
                | TokenKind::Var
                | TokenKind::Let
                | TokenKind::Preset
        ) || self.cursor.current_kind().is_visibility()
    }

    /// Open a declaration body. Returns `true` when the body is the inline
    /// empty form (`: pass` in the indentation dialects).
    fn open_decl_block(&mut self) -> ParseResult<bool> {
        match self.dialect.block_style {
            BlockStyle::Braces => {
                self.cursor.consume(TokenKind::LeftBrace, "'{'")?;
                self.skip_newlines();
                Ok(false)
            }
            BlockStyle::Indentation => {
                self.cursor.consume(TokenKind::Colon, "':'")?;
                if self.cursor.check(TokenKind::Pass) {
                    self.cursor.advance();
                    return Ok(true);
                }
                self.skip_newlines();
                self.consume_indent()?;
                Ok(false)
            }
        }
    }

    fn at_decl_block_end(&self) -> bool {
        match self.dialect.block_style {
            BlockStyle::Braces => {
                self.cursor.check(TokenKind::RightBrace) || self.cursor.is_at_end()
            }
            BlockStyle::Indentation => {
                self.cursor.check(TokenKind::Dedent) || self.cursor.is_at_end()
            }
        }
    }

    fn close_decl_block(&mut self) -> ParseResult<()> {
        match self.dialect.block_style {
            BlockStyle::Braces => {
                self.cursor.consume(TokenKind::RightBrace, "'}'")?;
                Ok(())
            }
            BlockStyle::Indentation => self.consume_dedent(),
        }
    }
}

fn map_visibility(kind: TokenKind) -> Visibility {
    match kind {
        TokenKind::Public => Visibility::Public,
        TokenKind::Global => Visibility::Global,
        TokenKind::Common => Visibility::Common,
        TokenKind::Internal | TokenKind::Module => Visibility::Internal,
        TokenKind::Family | TokenKind::Protected => Visibility::Family,
        TokenKind::External => Visibility::External,
        _ => Visibility::Private,
    }
}
