//! Abstract Syntax Tree for the Forge language family.
//!
//! One tree shape shared by all three dialects (Forge, Suflae, Cake): the
//! parsers differ in surface syntax only and produce identical nodes. Nodes
//! are immutable once constructed, relationships are strictly tree-shaped
//! (no parent links, no cycles), and every node carries a [`SourceLocation`].
//!
//! Each syntax class gets its own sum type: [`Declaration`], [`Statement`],
//! [`Expression`], [`Pattern`], plus [`TypeExpression`] for types. The
//! `to_sexp()` methods produce compact S-expression dumps used by the test
//! suites to assert tree shape.

pub mod decl;
pub mod expr;
pub mod literal;
pub mod op;
pub mod pat;
pub mod stmt;
pub mod ty;

// Re-export SourceLocation from forge-token for unified span handling
pub use forge_token::SourceLocation;

pub use decl::{
    Attribute, AttributeArg, ChoiceCase, ConstraintKind, Declaration, DeclarationKind,
    GenericConstraint, GenericParam, NameSegment, Parameter, Program, RequiredField, VariantCase,
    VariantKind, Visibility,
};
pub use expr::{Argument, Expression, ExpressionKind, WithField};
pub use literal::{DecimalKind, FloatKind, IntKind, LiteralValue, TextKind};
pub use op::{BinaryOp, ChainDirection, UnaryOp};
pub use pat::{DestructuringBinding, Pattern, PatternKind};
pub use stmt::{Statement, StatementKind, WhenClause};
pub use ty::{TypeExpression, TUPLE_TYPE_NAME};
