//! Operator enums and the token-to-operator mappings.
//!
//! Both enums are closed sets; the mappings are total over the operator token
//! subset the parsers accept. A token outside that subset maps to `None`, never
//! to a catch-all operator.

use std::fmt;

use forge_token::TokenKind;

/// Binary operators, including the overflow-behavior variants and the
/// comparison operators that participate in chained comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    AddWrap,
    AddSaturate,
    AddChecked,
    Subtract,
    SubtractWrap,
    SubtractSaturate,
    SubtractChecked,
    Multiply,
    MultiplyWrap,
    MultiplySaturate,
    MultiplyChecked,
    Divide,
    IntegerDivide,
    Modulo,
    Power,
    PowerWrap,
    PowerSaturate,
    PowerChecked,

    // Shifts
    ShiftLeft,
    ShiftRight,
    ShiftLeftLogical,
    ShiftRightLogical,
    ShiftLeftChecked,
    ShiftRightChecked,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,

    // Logical
    LogicalAnd,
    LogicalOr,
    NoneCoalesce,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Spaceship,

    // Membership / derivation / conformance (chain-capable word operators)
    In,
    NotIn,
    From,
    NotFrom,
    Follows,
    NotFollows,
    Is,
    IsNot,
}

/// Direction class of a comparison operator within a chained comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDirection {
    /// `<`, `<=`, `in`, `from`, `follows`
    Ascending,
    /// `>`, `>=`, `notin`, `notfrom`, `notfollows`
    Descending,
    /// Equality-like operators; mix with either direction
    Neutral,
}

impl BinaryOp {
    /// Map an operator token to its binary operator.
    ///
    /// Total over the binary-operator token subset; `None` for any other kind.
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::PlusPercent => BinaryOp::AddWrap,
            TokenKind::PlusCaret => BinaryOp::AddSaturate,
            TokenKind::PlusBang => BinaryOp::AddChecked,
            TokenKind::Minus => BinaryOp::Subtract,
            TokenKind::MinusPercent => BinaryOp::SubtractWrap,
            TokenKind::MinusCaret => BinaryOp::SubtractSaturate,
            TokenKind::MinusBang => BinaryOp::SubtractChecked,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::StarPercent => BinaryOp::MultiplyWrap,
            TokenKind::StarCaret => BinaryOp::MultiplySaturate,
            TokenKind::StarBang => BinaryOp::MultiplyChecked,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::SlashSlash => BinaryOp::IntegerDivide,
            TokenKind::Percent => BinaryOp::Modulo,
            TokenKind::Power => BinaryOp::Power,
            TokenKind::PowerPercent => BinaryOp::PowerWrap,
            TokenKind::PowerCaret => BinaryOp::PowerSaturate,
            TokenKind::PowerBang => BinaryOp::PowerChecked,
            TokenKind::LeftShift => BinaryOp::ShiftLeft,
            TokenKind::RightShift => BinaryOp::ShiftRight,
            TokenKind::LeftShiftLogical => BinaryOp::ShiftLeftLogical,
            TokenKind::RightShiftLogical => BinaryOp::ShiftRightLogical,
            TokenKind::LeftShiftChecked => BinaryOp::ShiftLeftChecked,
            TokenKind::RightShiftChecked => BinaryOp::ShiftRightChecked,
            TokenKind::Ampersand => BinaryOp::BitAnd,
            TokenKind::VerticalBar => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::And => BinaryOp::LogicalAnd,
            TokenKind::Or => BinaryOp::LogicalOr,
            TokenKind::QuestionQuestion => BinaryOp::NoneCoalesce,
            TokenKind::EqualEqual => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::Spaceship => BinaryOp::Spaceship,
            TokenKind::In => BinaryOp::In,
            TokenKind::NotIn => BinaryOp::NotIn,
            TokenKind::From => BinaryOp::From,
            TokenKind::NotFrom => BinaryOp::NotFrom,
            TokenKind::Follows => BinaryOp::Follows,
            TokenKind::NotFollows => BinaryOp::NotFollows,
            TokenKind::Is => BinaryOp::Is,
            TokenKind::IsNot => BinaryOp::IsNot,
            _ => return None,
        };
        Some(op)
    }

    /// Map a compound-assignment token to the binary operator it desugars to
    /// (`a <op>= b` becomes `a = a <op> b`).
    pub fn from_compound_assign(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::PlusAssign => BinaryOp::Add,
            TokenKind::MinusAssign => BinaryOp::Subtract,
            TokenKind::StarAssign => BinaryOp::Multiply,
            TokenKind::SlashAssign => BinaryOp::Divide,
            TokenKind::SlashSlashAssign => BinaryOp::IntegerDivide,
            TokenKind::PercentAssign => BinaryOp::Modulo,
            TokenKind::PowerAssign => BinaryOp::Power,
            TokenKind::AmpersandAssign => BinaryOp::BitAnd,
            TokenKind::VerticalBarAssign => BinaryOp::BitOr,
            TokenKind::CaretAssign => BinaryOp::BitXor,
            TokenKind::LeftShiftAssign => BinaryOp::ShiftLeft,
            TokenKind::RightShiftAssign => BinaryOp::ShiftRight,
            TokenKind::QuestionQuestionAssign => BinaryOp::NoneCoalesce,
            _ => return None,
        };
        Some(op)
    }

    /// Direction class for chained-comparison validation. `None` for operators
    /// that cannot appear in a chain at all.
    pub fn chain_direction(self) -> Option<ChainDirection> {
        match self {
            BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::In
            | BinaryOp::From
            | BinaryOp::Follows => Some(ChainDirection::Ascending),
            BinaryOp::Greater
            | BinaryOp::GreaterEqual
            | BinaryOp::NotIn
            | BinaryOp::NotFrom
            | BinaryOp::NotFollows => Some(ChainDirection::Descending),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Spaceship
            | BinaryOp::Is
            | BinaryOp::IsNot => Some(ChainDirection::Neutral),
            _ => None,
        }
    }

    /// Whether this operator participates in the comparison precedence level.
    pub fn is_comparison(self) -> bool {
        self.chain_direction().is_some()
    }

    /// Surface spelling (modern dialect).
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::AddWrap => "+%",
            BinaryOp::AddSaturate => "+^",
            BinaryOp::AddChecked => "+!",
            BinaryOp::Subtract => "-",
            BinaryOp::SubtractWrap => "-%",
            BinaryOp::SubtractSaturate => "-^",
            BinaryOp::SubtractChecked => "-!",
            BinaryOp::Multiply => "*",
            BinaryOp::MultiplyWrap => "*%",
            BinaryOp::MultiplySaturate => "*^",
            BinaryOp::MultiplyChecked => "*!",
            BinaryOp::Divide => "/",
            BinaryOp::IntegerDivide => "//",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::PowerWrap => "**%",
            BinaryOp::PowerSaturate => "**^",
            BinaryOp::PowerChecked => "**!",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::ShiftLeftLogical => "<<<",
            BinaryOp::ShiftRightLogical => ">>>",
            BinaryOp::ShiftLeftChecked => "<<|",
            BinaryOp::ShiftRightChecked => ">>|",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LogicalAnd => "and",
            BinaryOp::LogicalOr => "or",
            BinaryOp::NoneCoalesce => "??",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Spaceship => "<=>",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "notin",
            BinaryOp::From => "from",
            BinaryOp::NotFrom => "notfrom",
            BinaryOp::Follows => "follows",
            BinaryOp::NotFollows => "notfollows",
            BinaryOp::Is => "is",
            BinaryOp::IsNot => "isnot",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unary (prefix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation: `-x`
    Negate,
    /// Logical negation: `not x`
    Not,
    /// Bitwise complement: `~x`
    BitNot,
}

impl UnaryOp {
    /// Map a prefix-operator token to its unary operator.
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }

    /// Surface spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "not",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
