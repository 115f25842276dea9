//! Pattern nodes for `when` clauses and destructuring declarations.

use forge_token::SourceLocation;

use crate::expr::Expression;
use crate::literal::LiteralValue;
use crate::ty::TypeExpression;

/// A pattern with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub location: SourceLocation,
}

/// One binding inside a destructuring list.
///
/// Forms: `_` (wildcard nested), `name` (positional), `field: binding`
/// (rename), `field: (...)` (nested), `(...)` (anonymous nested).
#[derive(Debug, Clone, PartialEq)]
pub struct DestructuringBinding {
    /// Field being matched; `None` for positional and anonymous forms
    pub field: Option<String>,
    /// Local name bound; `None` when a nested pattern binds instead
    pub binding: Option<String>,
    /// Nested pattern for `(...)` forms and `_`
    pub nested: Option<Box<Pattern>>,
}

/// The pattern sum type.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// `_`
    Wildcard,
    /// `Circle` / `Circle c`
    Type {
        ty: TypeExpression,
        binding: Option<String>,
    },
    /// Bare identifier binding
    Identifier(String),
    /// Literal match
    Literal(LiteralValue),
    /// Arbitrary boolean expression used as a pattern
    Expression(Expression),
    /// `pattern if condition`
    Guard {
        inner: Box<Pattern>,
        condition: Expression,
    },
    /// `(x, y: py, ...)` without a type head
    Destructuring { bindings: Vec<DestructuringBinding> },
    /// `Circle (radius: r)` type head plus destructuring
    TypeDestructuring {
        ty: TypeExpression,
        bindings: Vec<DestructuringBinding>,
    },
}

impl Pattern {
    /// Create a new pattern node
    pub fn new(kind: PatternKind, location: SourceLocation) -> Self {
        Pattern { kind, location }
    }

    /// Convert the pattern to a compact S-expression for test assertions.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            PatternKind::Wildcard => "(wildcard)".to_string(),
            PatternKind::Type { ty, binding } => match binding {
                Some(binding) => format!("(type_pattern {} {binding})", ty.to_sexp()),
                None => format!("(type_pattern {})", ty.to_sexp()),
            },
            PatternKind::Identifier(name) => format!("(binding {name})"),
            PatternKind::Literal(value) => format!("(literal_pattern {})", value.to_sexp()),
            PatternKind::Expression(expr) => format!("(expr_pattern {})", expr.to_sexp()),
            PatternKind::Guard { inner, condition } => {
                format!("(guard {} {})", inner.to_sexp(), condition.to_sexp())
            }
            PatternKind::Destructuring { bindings } => {
                format!("(destructuring{})", sexp_bindings(bindings))
            }
            PatternKind::TypeDestructuring { ty, bindings } => {
                format!("(type_destructuring {}{})", ty.to_sexp(), sexp_bindings(bindings))
            }
        }
    }
}

fn sexp_bindings(bindings: &[DestructuringBinding]) -> String {
    bindings
        .iter()
        .map(|b| {
            let mut out = String::from(" (");
            match (&b.field, &b.binding, &b.nested) {
                (Some(field), Some(binding), _) if field == binding => out.push_str(field),
                (Some(field), Some(binding), _) => {
                    out.push_str(&format!("{field}: {binding}"));
                }
                (Some(field), None, Some(nested)) => {
                    out.push_str(&format!("{field}: {}", nested.to_sexp()));
                }
                (None, Some(binding), _) => out.push_str(binding),
                (None, None, Some(nested)) => out.push_str(&nested.to_sexp()),
                (Some(field), None, None) => out.push_str(field),
                (None, None, None) => out.push('_'),
            }
            out.push(')');
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("test.forge", 1, 1, 0)
    }

    #[test]
    fn type_pattern_with_binding() {
        let pattern = Pattern::new(
            PatternKind::Type {
                ty: TypeExpression::named("Circle", loc()),
                binding: Some("c".to_string()),
            },
            loc(),
        );
        assert_eq!(pattern.to_sexp(), "(type_pattern (type Circle) c)");
    }

    #[test]
    fn destructuring_with_rename() {
        let pattern = Pattern::new(
            PatternKind::Destructuring {
                bindings: vec![
                    DestructuringBinding {
                        field: Some("x".to_string()),
                        binding: Some("x".to_string()),
                        nested: None,
                    },
                    DestructuringBinding {
                        field: Some("y".to_string()),
                        binding: Some("py".to_string()),
                        nested: None,
                    },
                ],
            },
            loc(),
        );
        assert_eq!(pattern.to_sexp(), "(destructuring (x) (y: py))");
    }
}
