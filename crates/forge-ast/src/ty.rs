//! Type expressions.

use forge_token::SourceLocation;

/// The pseudo-name denoting a tuple type; `(A, B)` is `__Tuple<A, B>`.
/// A parenthesized single type `(T)` is represented the same way.
pub const TUPLE_TYPE_NAME: &str = "__Tuple";

/// A type as written in source: a name plus optional generic arguments.
///
/// Const generic arguments are represented as a `TypeExpression` whose `name`
/// is the literal text (`"3"`, `"true"`, `"Color.RED"`) with no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpression {
    pub name: String,
    pub generic_args: Vec<TypeExpression>,
    pub location: SourceLocation,
}

impl TypeExpression {
    /// Create a plain named type with no generic arguments.
    pub fn named(name: impl Into<String>, location: SourceLocation) -> Self {
        TypeExpression { name: name.into(), generic_args: Vec::new(), location }
    }

    /// Create a generic type.
    pub fn generic(
        name: impl Into<String>,
        generic_args: Vec<TypeExpression>,
        location: SourceLocation,
    ) -> Self {
        TypeExpression { name: name.into(), generic_args, location }
    }

    /// Whether this is the tuple pseudo-type.
    pub fn is_tuple(&self) -> bool {
        self.name == TUPLE_TYPE_NAME
    }

    /// Depth of generic nesting; a plain name is 1.
    pub fn nesting_depth(&self) -> usize {
        1 + self.generic_args.iter().map(TypeExpression::nesting_depth).max().unwrap_or(0)
    }

    /// Compact rendering used by the S-expression dumps.
    pub fn to_sexp(&self) -> String {
        if self.generic_args.is_empty() {
            format!("(type {})", self.name)
        } else {
            let args =
                self.generic_args.iter().map(TypeExpression::to_sexp).collect::<Vec<_>>().join(" ");
            format!("(type {} {})", self.name, args)
        }
    }
}
