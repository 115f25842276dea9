//! Declaration nodes and their supporting records.

use forge_token::SourceLocation;

use crate::expr::Expression;
use crate::literal::LiteralValue;
use crate::stmt::Statement;
use crate::ty::TypeExpression;

/// Visibility of a declaration. Dialects spell some of these differently
/// (`module` for internal, `protected` for family); the parser normalizes to
/// this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Global,
    Common,
    Internal,
    Family,
    Private,
    /// Visible to FFI consumers
    External,
}

impl Visibility {
    /// Restrictiveness rank; higher is more restrictive. Setter visibility
    /// must rank at least as high as getter visibility.
    pub fn rank(self) -> u8 {
        match self {
            Visibility::Public => 0,
            Visibility::Global => 1,
            Visibility::Common => 2,
            Visibility::Internal => 3,
            Visibility::External => 3,
            Visibility::Family => 4,
            Visibility::Private => 5,
        }
    }

    /// Surface spelling (modern dialect).
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Global => "global",
            Visibility::Common => "common",
            Visibility::Internal => "internal",
            Visibility::Family => "family",
            Visibility::Private => "private",
            Visibility::External => "external",
        }
    }
}

/// An attribute argument: a literal or a bare identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArg {
    Literal(LiteralValue),
    Identifier(String),
}

/// A declaration attribute: `@name` or `@name(arg, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<AttributeArg>,
    pub location: SourceLocation,
}

/// One routine parameter. The `me` self parameter has no type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Option<TypeExpression>,
    pub default: Option<Expression>,
    /// `...` trailing parameter; FFI declarations only
    pub variadic: bool,
    pub location: SourceLocation,
}

/// A declared generic parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParam {
    pub name: String,
    pub location: SourceLocation,
}

/// One constraint kind attached to a generic parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Must implement the listed protocols
    Follows(Vec<TypeExpression>),
    /// Must derive from the base class
    From(TypeExpression),
    ValueType,
    ReferenceType,
    ResidentType,
    RoutineType,
    ChoiceType,
    VariantType,
    MutantType,
    /// The parameter is a const generic of the given primitive type
    ConstGeneric(TypeExpression),
    /// Must be one of the enumerated types
    TypeEquality(Vec<TypeExpression>),
}

/// Merged constraints for one generic parameter. Inline and clause
/// constraints that name the same parameter land in one record.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericConstraint {
    pub param: String,
    pub kinds: Vec<ConstraintKind>,
    pub location: SourceLocation,
}

/// One segment of a (possibly namespace-qualified) routine name.
/// `List<T>.push<U>` has two segments, each with its own generics.
#[derive(Debug, Clone, PartialEq)]
pub struct NameSegment {
    pub name: String,
    pub generic_params: Vec<GenericParam>,
    /// Trailing `!` failable marker on this segment
    pub failable: bool,
}

/// One case of a `choice` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceCase {
    pub name: String,
    pub value: Option<i128>,
    pub location: SourceLocation,
}

/// Kind of a tagged-union declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Variant,
    /// Permits mutation of associated data
    Mutant,
    /// Legacy Cake spelling of `mutant`
    Chimera,
}

/// One case of a `variant` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCase {
    pub name: String,
    pub associated: Option<TypeExpression>,
    pub location: SourceLocation,
}

/// A field a conforming type must supply, inside a protocol body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredField {
    pub name: String,
    pub ty: TypeExpression,
    pub location: SourceLocation,
}

/// A declaration with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub location: SourceLocation,
}

/// The declaration sum type shared by all three dialects.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    /// `namespace A.B`
    Namespace { path: Vec<String> },
    /// `import A.B`, `import A.B as C`, `import A.B (x, y)`
    Import {
        module_path: Vec<String>,
        alias: Option<String>,
        specific: Option<Vec<String>>,
    },
    /// `define Old as New`
    Define { old_name: TypeExpression, new_name: String },
    /// `using A.B.C as D`
    Using { target: TypeExpression, alias: String },
    /// `preset NAME: Type = value`
    Preset {
        name: String,
        ty: TypeExpression,
        value: Expression,
        visibility: Visibility,
    },
    /// `var` / `let` declaration
    Variable {
        name: String,
        ty: Option<TypeExpression>,
        initializer: Option<Expression>,
        visibility: Visibility,
        mutable: bool,
        getter_visibility: Visibility,
        setter_visibility: Option<Visibility>,
    },
    Routine {
        name: Vec<NameSegment>,
        parameters: Vec<Parameter>,
        return_type: Option<TypeExpression>,
        /// `None` for signature-only routines (`@intrinsic`, protocol bodies)
        body: Option<Box<Statement>>,
        visibility: Visibility,
        attributes: Vec<Attribute>,
        generic_params: Vec<GenericParam>,
        constraints: Vec<GenericConstraint>,
    },
    /// Heap reference type
    Entity {
        name: String,
        generic_params: Vec<GenericParam>,
        constraints: Vec<GenericConstraint>,
        base_class: Option<TypeExpression>,
        protocols: Vec<TypeExpression>,
        members: Vec<Declaration>,
        visibility: Visibility,
        attributes: Vec<Attribute>,
    },
    /// Stack value type
    Record {
        name: String,
        generic_params: Vec<GenericParam>,
        constraints: Vec<GenericConstraint>,
        base_class: Option<TypeExpression>,
        protocols: Vec<TypeExpression>,
        members: Vec<Declaration>,
        visibility: Visibility,
        attributes: Vec<Attribute>,
    },
    /// Singleton/static type
    Resident {
        name: String,
        generic_params: Vec<GenericParam>,
        constraints: Vec<GenericConstraint>,
        base_class: Option<TypeExpression>,
        protocols: Vec<TypeExpression>,
        members: Vec<Declaration>,
        visibility: Visibility,
        attributes: Vec<Attribute>,
    },
    /// C-style enumeration
    Choice {
        name: String,
        cases: Vec<ChoiceCase>,
        methods: Vec<Declaration>,
        visibility: Visibility,
    },
    /// Tagged union with associated data
    Variant {
        name: String,
        generic_params: Vec<GenericParam>,
        cases: Vec<VariantCase>,
        kind: VariantKind,
        methods: Vec<Declaration>,
        visibility: Visibility,
    },
    Protocol {
        name: String,
        generic_params: Vec<GenericParam>,
        parent_protocols: Vec<TypeExpression>,
        methods: Vec<Declaration>,
        required_fields: Vec<RequiredField>,
        visibility: Visibility,
    },
    /// FFI declaration
    Imported {
        name: String,
        parameters: Vec<Parameter>,
        return_type: Option<TypeExpression>,
        calling_convention: String,
        variadic: bool,
        generic_params: Vec<GenericParam>,
    },
}

impl Declaration {
    /// Create a new declaration node
    pub fn new(kind: DeclarationKind, location: SourceLocation) -> Self {
        Declaration { kind, location }
    }

    /// Convert the declaration to a compact S-expression for test assertions.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            DeclarationKind::Namespace { path } => {
                format!("(namespace {})", path.join("."))
            }
            DeclarationKind::Import { module_path, alias, specific } => {
                let mut out = format!("(import {}", module_path.join("."));
                if let Some(alias) = alias {
                    out.push_str(&format!(" as {alias}"));
                }
                if let Some(specific) = specific {
                    out.push_str(&format!(" ({})", specific.join(" ")));
                }
                out.push(')');
                out
            }
            DeclarationKind::Define { old_name, new_name } => {
                format!("(define {} {new_name})", old_name.to_sexp())
            }
            DeclarationKind::Using { target, alias } => {
                format!("(using {} {alias})", target.to_sexp())
            }
            DeclarationKind::Preset { name, ty, value, .. } => {
                format!("(preset {name} {} {})", ty.to_sexp(), value.to_sexp())
            }
            DeclarationKind::Variable { name, ty, initializer, mutable, .. } => {
                let head = if *mutable { "var" } else { "let" };
                let mut out = format!("({head} {name}");
                if let Some(ty) = ty {
                    out.push_str(&format!(" {}", ty.to_sexp()));
                }
                if let Some(init) = initializer {
                    out.push_str(&format!(" {}", init.to_sexp()));
                }
                out.push(')');
                out
            }
            DeclarationKind::Routine { name, parameters, return_type, body, .. } => {
                let name = name
                    .iter()
                    .map(|seg| {
                        let mut out = seg.name.clone();
                        if !seg.generic_params.is_empty() {
                            let params = seg
                                .generic_params
                                .iter()
                                .map(|p| p.name.clone())
                                .collect::<Vec<_>>()
                                .join(" ");
                            out.push_str(&format!("<{params}>"));
                        }
                        if seg.failable {
                            out.push('!');
                        }
                        out
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                let mut out = format!("(routine {name} ({})", sexp_params(parameters));
                if let Some(ret) = return_type {
                    out.push_str(&format!(" {}", ret.to_sexp()));
                }
                if let Some(body) = body {
                    out.push_str(&format!(" {}", body.to_sexp()));
                }
                out.push(')');
                out
            }
            DeclarationKind::Entity { name, members, .. } => {
                format!("(entity {name}{})", sexp_members(members))
            }
            DeclarationKind::Record { name, members, .. } => {
                format!("(record {name}{})", sexp_members(members))
            }
            DeclarationKind::Resident { name, members, .. } => {
                format!("(resident {name}{})", sexp_members(members))
            }
            DeclarationKind::Choice { name, cases, .. } => {
                let cases = cases
                    .iter()
                    .map(|c| match c.value {
                        Some(value) => format!(" ({} {value})", c.name),
                        None => format!(" ({})", c.name),
                    })
                    .collect::<String>();
                format!("(choice {name}{cases})")
            }
            DeclarationKind::Variant { name, cases, kind, .. } => {
                let head = match kind {
                    VariantKind::Variant => "variant",
                    VariantKind::Mutant => "mutant",
                    VariantKind::Chimera => "chimera",
                };
                let cases = cases
                    .iter()
                    .map(|c| match &c.associated {
                        Some(ty) => format!(" ({} {})", c.name, ty.to_sexp()),
                        None => format!(" ({})", c.name),
                    })
                    .collect::<String>();
                format!("({head} {name}{cases})")
            }
            DeclarationKind::Protocol { name, methods, required_fields, .. } => {
                let methods =
                    methods.iter().map(|m| format!(" {}", m.to_sexp())).collect::<String>();
                let fields = required_fields
                    .iter()
                    .map(|f| format!(" (field {} {})", f.name, f.ty.to_sexp()))
                    .collect::<String>();
                format!("(protocol {name}{fields}{methods})")
            }
            DeclarationKind::Imported { name, parameters, return_type, variadic, .. } => {
                let mut out = format!("(imported {name} ({})", sexp_params(parameters));
                if *variadic {
                    out.push_str(" ...");
                }
                if let Some(ret) = return_type {
                    out.push_str(&format!(" {}", ret.to_sexp()));
                }
                out.push(')');
                out
            }
        }
    }

    /// Visibility of this declaration, where the form carries one.
    pub fn visibility(&self) -> Option<Visibility> {
        match &self.kind {
            DeclarationKind::Preset { visibility, .. }
            | DeclarationKind::Variable { visibility, .. }
            | DeclarationKind::Routine { visibility, .. }
            | DeclarationKind::Entity { visibility, .. }
            | DeclarationKind::Record { visibility, .. }
            | DeclarationKind::Resident { visibility, .. }
            | DeclarationKind::Choice { visibility, .. }
            | DeclarationKind::Variant { visibility, .. }
            | DeclarationKind::Protocol { visibility, .. } => Some(*visibility),
            _ => None,
        }
    }
}

fn sexp_params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| match &p.ty {
            Some(ty) => format!("({} {})", p.name, ty.to_sexp()),
            None => format!("({})", p.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn sexp_members(members: &[Declaration]) -> String {
    members.iter().map(|m| format!(" {}", m.to_sexp())).collect()
}

/// A parsed source file: an ordered sequence of top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub location: SourceLocation,
}

impl Program {
    /// Create a program node
    pub fn new(declarations: Vec<Declaration>, location: SourceLocation) -> Self {
        Program { declarations, location }
    }

    /// Convert the whole program to an S-expression.
    pub fn to_sexp(&self) -> String {
        let decls =
            self.declarations.iter().map(|d| format!(" {}", d.to_sexp())).collect::<String>();
        format!("(program{decls})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("test.forge", 1, 1, 0)
    }

    #[test]
    fn setter_visibility_ranks() {
        assert!(Visibility::Private.rank() > Visibility::Public.rank());
        assert!(Visibility::Family.rank() > Visibility::Internal.rank());
        assert_eq!(Visibility::Internal.rank(), Visibility::External.rank());
    }

    #[test]
    fn empty_program_sexp() {
        let program = Program::new(Vec::new(), loc());
        assert_eq!(program.to_sexp(), "(program)");
    }

    #[test]
    fn namespace_sexp() {
        let decl = Declaration::new(
            DeclarationKind::Namespace { path: vec!["Geo".to_string(), "Shapes".to_string()] },
            loc(),
        );
        assert_eq!(decl.to_sexp(), "(namespace Geo.Shapes)");
    }

    #[test]
    fn choice_with_values_sexp() {
        let decl = Declaration::new(
            DeclarationKind::Choice {
                name: "Color".to_string(),
                cases: vec![
                    ChoiceCase { name: "RED".to_string(), value: Some(1), location: loc() },
                    ChoiceCase { name: "GREEN".to_string(), value: None, location: loc() },
                ],
                methods: Vec::new(),
                visibility: Visibility::Internal,
            },
            loc(),
        );
        assert_eq!(decl.to_sexp(), "(choice Color (RED 1) (GREEN))");
    }
}
