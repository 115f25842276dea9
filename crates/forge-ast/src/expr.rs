//! Expression nodes.

use forge_token::SourceLocation;

use crate::decl::Parameter;
use crate::literal::LiteralValue;
use crate::op::{BinaryOp, UnaryOp};
use crate::pat::Pattern;
use crate::stmt::Statement;
use crate::ty::TypeExpression;

/// An expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: SourceLocation,
}

/// One argument in a call argument list; `name: expr` arguments carry the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expression,
}

/// One `field: value` entry in a `with (...)` record update.
#[derive(Debug, Clone, PartialEq)]
pub struct WithField {
    pub name: String,
    pub value: Expression,
}

/// The expression sum type shared by all three dialects.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(LiteralValue),
    Identifier(String),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Ternary `c ? a : b` and inline `if c then a else b`
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    /// `a to b by s` / `a downto b by s`
    Range {
        start: Box<Expression>,
        end: Box<Expression>,
        step: Option<Box<Expression>>,
        descending: bool,
    },
    /// `f(args)`; `failable` marks `f!(args)`
    Call {
        callee: Box<Expression>,
        args: Vec<Argument>,
        failable: bool,
    },
    /// `f<T, U>(args)` after generic-argument disambiguation
    GenericMethodCall {
        callee: Box<Expression>,
        type_args: Vec<TypeExpression>,
        args: Vec<Argument>,
        failable: bool,
    },
    /// `obj.name`
    Member {
        object: Box<Expression>,
        name: String,
    },
    /// `obj.name<T>` without an immediate call
    GenericMember {
        object: Box<Expression>,
        name: String,
        type_args: Vec<TypeExpression>,
    },
    /// `obj[index]`
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    /// `x => body` / `(a, b) => body`
    Lambda {
        parameters: Vec<Parameter>,
        body: Box<Expression>,
    },
    /// `[a, b, c]`
    ListLiteral(Vec<Expression>),
    /// `{a, b, c}` in expression position
    SetLiteral(Vec<Expression>),
    /// `{k: v, ...}` in expression position
    DictLiteral(Vec<(Expression, Expression)>),
    /// `record with (field: value, ...)` functional update
    With {
        object: Box<Expression>,
        fields: Vec<WithField>,
    },
    /// `x is Circle c`, `x isnot Square` (negated)
    IsPattern {
        value: Box<Expression>,
        pattern: Box<Pattern>,
        negated: bool,
    },
    /// `a < b <= c == d`; `operands.len() == operators.len() + 1`
    ChainedComparison {
        operands: Vec<Expression>,
        operators: Vec<BinaryOp>,
    },
    /// Block expression (lambda bodies)
    Block(Vec<Statement>),
    /// `@intrinsic(name, args...)` compiler intrinsic reference
    Intrinsic {
        name: String,
        args: Vec<Expression>,
    },
    /// `native("...")` embedded native code
    Native {
        code: String,
    },
    /// `a = b`, including the desugared form of compound assignment
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
    },
}

impl Expression {
    /// Create a new expression node
    pub fn new(kind: ExpressionKind, location: SourceLocation) -> Self {
        Expression { kind, location }
    }

    /// Convert the expression to a compact S-expression for test assertions.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            ExpressionKind::Literal(value) => value.to_sexp(),
            ExpressionKind::Identifier(name) => format!("(identifier {name})"),
            ExpressionKind::Binary { op, left, right } => {
                format!("(binary {op} {} {})", left.to_sexp(), right.to_sexp())
            }
            ExpressionKind::Unary { op, operand } => {
                format!("(unary {op} {})", operand.to_sexp())
            }
            ExpressionKind::Conditional { condition, then_branch, else_branch } => format!(
                "(conditional {} {} {})",
                condition.to_sexp(),
                then_branch.to_sexp(),
                else_branch.to_sexp()
            ),
            ExpressionKind::Range { start, end, step, descending } => {
                let dir = if *descending { "downto" } else { "to" };
                match step {
                    Some(step) => format!(
                        "(range {dir} {} {} {})",
                        start.to_sexp(),
                        end.to_sexp(),
                        step.to_sexp()
                    ),
                    None => format!("(range {dir} {} {})", start.to_sexp(), end.to_sexp()),
                }
            }
            ExpressionKind::Call { callee, args, failable } => {
                let head = if *failable { "failable_call" } else { "call" };
                format!("({head} {}{})", callee.to_sexp(), sexp_args(args))
            }
            ExpressionKind::GenericMethodCall { callee, type_args, args, failable } => {
                let head =
                    if *failable { "failable_generic_call" } else { "generic_call" };
                format!(
                    "({head} {} ({}){})",
                    callee.to_sexp(),
                    sexp_types(type_args),
                    sexp_args(args)
                )
            }
            ExpressionKind::Member { object, name } => {
                format!("(member {} {name})", object.to_sexp())
            }
            ExpressionKind::GenericMember { object, name, type_args } => {
                format!("(generic_member {} {name} ({}))", object.to_sexp(), sexp_types(type_args))
            }
            ExpressionKind::Index { object, index } => {
                format!("(index {} {})", object.to_sexp(), index.to_sexp())
            }
            ExpressionKind::Lambda { parameters, body } => {
                let params =
                    parameters.iter().map(|p| p.name.clone()).collect::<Vec<_>>().join(" ");
                format!("(lambda ({params}) {})", body.to_sexp())
            }
            ExpressionKind::ListLiteral(elements) => {
                format!("(list{})", sexp_exprs(elements))
            }
            ExpressionKind::SetLiteral(elements) => {
                format!("(set{})", sexp_exprs(elements))
            }
            ExpressionKind::DictLiteral(entries) => {
                let entries = entries
                    .iter()
                    .map(|(k, v)| format!(" ({} {})", k.to_sexp(), v.to_sexp()))
                    .collect::<String>();
                format!("(dict{entries})")
            }
            ExpressionKind::With { object, fields } => {
                let fields = fields
                    .iter()
                    .map(|f| format!(" ({} {})", f.name, f.value.to_sexp()))
                    .collect::<String>();
                format!("(with {}{fields})", object.to_sexp())
            }
            ExpressionKind::IsPattern { value, pattern, negated } => {
                let head = if *negated { "isnot_pattern" } else { "is_pattern" };
                format!("({head} {} {})", value.to_sexp(), pattern.to_sexp())
            }
            ExpressionKind::ChainedComparison { operands, operators } => {
                let mut out = String::from("(chained_comparison");
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(&format!(" {}", operators[i - 1]));
                    }
                    out.push_str(&format!(" {}", operand.to_sexp()));
                }
                out.push(')');
                out
            }
            ExpressionKind::Block(statements) => {
                let stmts =
                    statements.iter().map(|s| format!(" {}", s.to_sexp())).collect::<String>();
                format!("(block_expr{stmts})")
            }
            ExpressionKind::Intrinsic { name, args } => {
                format!("(intrinsic {name}{})", sexp_exprs(args))
            }
            ExpressionKind::Native { code } => format!("(native {code:?})"),
            ExpressionKind::Assignment { target, value } => {
                format!("(assign {} {})", target.to_sexp(), value.to_sexp())
            }
        }
    }
}

fn sexp_exprs(exprs: &[Expression]) -> String {
    exprs.iter().map(|e| format!(" {}", e.to_sexp())).collect()
}

fn sexp_args(args: &[Argument]) -> String {
    args.iter()
        .map(|a| match &a.name {
            Some(name) => format!(" ({name}: {})", a.value.to_sexp()),
            None => format!(" {}", a.value.to_sexp()),
        })
        .collect()
}

fn sexp_types(types: &[TypeExpression]) -> String {
    types.iter().map(TypeExpression::to_sexp).collect::<Vec<_>>().join(" ")
}
