//! Statement nodes.

use forge_token::SourceLocation;

use crate::decl::Declaration;
use crate::expr::Expression;
use crate::pat::Pattern;

/// A statement with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: SourceLocation,
}

/// One `pattern => body` clause inside a `when` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    pub pattern: Pattern,
    pub body: Statement,
    pub location: SourceLocation,
}

/// The statement sum type shared by all three dialects.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Block(Vec<Statement>),
    Expression(Expression),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        /// `elseif` chains nest the next `If` here
        else_branch: Option<Box<Statement>>,
    },
    /// `while cond body`; `loop body` is `while true body`
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    For {
        variable: String,
        iterable: Expression,
        body: Box<Statement>,
    },
    When {
        /// `None` for the implicit-true form `when { ... }`
        subject: Option<Expression>,
        clauses: Vec<WhenClause>,
    },
    Return(Option<Expression>),
    Break,
    Continue,
    Throw(Option<Expression>),
    /// Return absence from a failable routine
    Absent,
    /// No-op
    Pass,
    /// `viewing e as h { ... }`
    Viewing {
        source: Expression,
        handle: String,
        body: Box<Statement>,
    },
    /// `hijacking e as h { ... }`
    Hijacking {
        source: Expression,
        handle: String,
        body: Box<Statement>,
    },
    /// `inspecting h from e { ... }`
    Inspecting {
        handle: String,
        source: Expression,
        body: Box<Statement>,
    },
    /// `seizing h from e { ... }`
    Seizing {
        handle: String,
        source: Expression,
        body: Box<Statement>,
    },
    /// `danger! { ... }`
    Danger { body: Box<Statement> },
    /// `mayhem! { ... }`
    Mayhem { body: Box<Statement> },
    /// `var` / `let` / `preset` inside a block
    Declaration(Declaration),
    /// `let (a, b: c) = expr`
    Destructuring {
        pattern: Pattern,
        value: Expression,
        mutable: bool,
    },
}

impl Statement {
    /// Create a new statement node
    pub fn new(kind: StatementKind, location: SourceLocation) -> Self {
        Statement { kind, location }
    }

    /// Convert the statement to a compact S-expression for test assertions.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            StatementKind::Block(statements) => {
                let stmts =
                    statements.iter().map(|s| format!(" {}", s.to_sexp())).collect::<String>();
                format!("(block{stmts})")
            }
            StatementKind::Expression(expr) => {
                format!("(expression_statement {})", expr.to_sexp())
            }
            StatementKind::If { condition, then_branch, else_branch } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    condition.to_sexp(),
                    then_branch.to_sexp(),
                    else_branch.to_sexp()
                ),
                None => format!("(if {} {})", condition.to_sexp(), then_branch.to_sexp()),
            },
            StatementKind::While { condition, body } => {
                format!("(while {} {})", condition.to_sexp(), body.to_sexp())
            }
            StatementKind::For { variable, iterable, body } => {
                format!("(for {variable} {} {})", iterable.to_sexp(), body.to_sexp())
            }
            StatementKind::When { subject, clauses } => {
                let clauses = clauses
                    .iter()
                    .map(|c| format!(" (clause {} {})", c.pattern.to_sexp(), c.body.to_sexp()))
                    .collect::<String>();
                match subject {
                    Some(subject) => format!("(when {}{clauses})", subject.to_sexp()),
                    None => format!("(when{clauses})"),
                }
            }
            StatementKind::Return(value) => match value {
                Some(value) => format!("(return {})", value.to_sexp()),
                None => "(return)".to_string(),
            },
            StatementKind::Break => "(break)".to_string(),
            StatementKind::Continue => "(continue)".to_string(),
            StatementKind::Throw(value) => match value {
                Some(value) => format!("(throw {})", value.to_sexp()),
                None => "(throw)".to_string(),
            },
            StatementKind::Absent => "(absent)".to_string(),
            StatementKind::Pass => "(pass)".to_string(),
            StatementKind::Viewing { source, handle, body } => {
                format!("(viewing {} {handle} {})", source.to_sexp(), body.to_sexp())
            }
            StatementKind::Hijacking { source, handle, body } => {
                format!("(hijacking {} {handle} {})", source.to_sexp(), body.to_sexp())
            }
            StatementKind::Inspecting { handle, source, body } => {
                format!("(inspecting {handle} {} {})", source.to_sexp(), body.to_sexp())
            }
            StatementKind::Seizing { handle, source, body } => {
                format!("(seizing {handle} {} {})", source.to_sexp(), body.to_sexp())
            }
            StatementKind::Danger { body } => format!("(danger {})", body.to_sexp()),
            StatementKind::Mayhem { body } => format!("(mayhem {})", body.to_sexp()),
            StatementKind::Declaration(decl) => decl.to_sexp(),
            StatementKind::Destructuring { pattern, value, mutable } => {
                let head = if *mutable { "destructuring_var" } else { "destructuring_let" };
                format!("({head} {} {})", pattern.to_sexp(), value.to_sexp())
            }
        }
    }
}
