//! Error types for the Forge family parsers.

use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur during parsing.
///
/// All hard failures surface as one of these variants; the driver loop catches
/// them at declaration and statement boundaries, reports, and synchronizes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Unexpected token '{found}'")]
    UnexpectedToken { found: String, line: u32, column: u32 },

    #[error("Expected {expected}, got '{found}'")]
    Expected { expected: String, found: String, line: u32, column: u32 },

    #[error("Invalid literal: {literal}")]
    InvalidLiteral { literal: String, line: u32, column: u32 },

    #[error("Unexpected dedent")]
    UnexpectedDedent { line: u32, column: u32 },

    #[error("Invalid comparison chain: cannot mix ascending and descending operators")]
    InvalidComparisonChain { line: u32, column: u32 },

    #[error("Undeclared generic parameter '{name}' in constraint clause")]
    UndeclaredGenericParameter { name: String, line: u32, column: u32 },

    #[error("Setter visibility must be at least as restrictive as getter visibility")]
    InvalidSetterVisibility { line: u32, column: u32 },

    #[error("Maximum recursion depth exceeded")]
    RecursionLimit,
}

impl ParseError {
    /// Create a new expected/got error
    pub fn expected(
        expected: impl Into<String>,
        found: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        ParseError::Expected { expected: expected.into(), found: found.into(), line, column }
    }

    /// Source position of the error, if it carries one.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            ParseError::UnexpectedToken { line, column, .. }
            | ParseError::Expected { line, column, .. }
            | ParseError::InvalidLiteral { line, column, .. }
            | ParseError::UnexpectedDedent { line, column }
            | ParseError::InvalidComparisonChain { line, column }
            | ParseError::UndeclaredGenericParameter { line, column, .. }
            | ParseError::InvalidSetterVisibility { line, column } => Some((*line, *column)),
            ParseError::UnexpectedEof | ParseError::RecursionLimit => None,
        }
    }
}
