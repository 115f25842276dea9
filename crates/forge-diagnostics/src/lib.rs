//! Stable warning codes and severity levels for the Forge family parser.
//!
//! This crate provides the canonical definitions of the recoverable
//! diagnostics the parsers emit. Hard parse errors live with the parser; the
//! codes here cover the buffered warnings that never abort a parse.
//!
//! # Code Ranges
//!
//! | Range       | Category                |
//! |-------------|-------------------------|
//! | CK001-CK099 | Cake/indentation style  |
//! | ST001-ST099 | Cross-dialect style     |
//! | DP001-DP099 | Deprecated syntax       |
//!
//! # Example
//!
//! ```
//! use forge_diagnostics::{Severity, WarningCode};
//!
//! let code = WarningCode::UnnecessaryClosingBrace;
//! assert_eq!(code.as_str(), "CK001");
//! assert_eq!(code.severity(), Severity::StyleViolation);
//! ```

use std::fmt;

/// Severity level of a buffered warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Informational message.
    Info,
    /// Non-critical issue that should be addressed.
    Warning,
    /// Style rule violation.
    StyleViolation,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::StyleViolation => write!(f, "style"),
        }
    }
}

/// Stable warning codes for the Forge family parsers.
///
/// Each code has a fixed string representation that can be referenced in
/// documentation and suppression comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningCode {
    // Cake/indentation style (CK001-CK099)
    /// Unnecessary closing brace in an indentation dialect
    UnnecessaryClosingBrace,

    // Cross-dialect style (ST001-ST099)
    /// C-style syntax where the dialect has native syntax
    CStyleSyntax,
    /// Legacy `where` constraint clause spelling
    LegacyWhereClause,

    // Deprecated syntax (DP001-DP099)
    /// Legacy keyword accepted outside the legacy dialect
    DeprecatedKeyword,
}

impl WarningCode {
    /// Get the string representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::UnnecessaryClosingBrace => "CK001",
            WarningCode::CStyleSyntax => "ST001",
            WarningCode::LegacyWhereClause => "ST002",
            WarningCode::DeprecatedKeyword => "DP001",
        }
    }

    /// Get the default severity for this code.
    pub fn severity(&self) -> Severity {
        match self {
            WarningCode::UnnecessaryClosingBrace | WarningCode::CStyleSyntax => {
                Severity::StyleViolation
            }
            WarningCode::LegacyWhereClause => Severity::Info,
            WarningCode::DeprecatedKeyword => Severity::Warning,
        }
    }

    /// Try to parse a code string back into a [`WarningCode`].
    pub fn parse_code(code: &str) -> Option<WarningCode> {
        match code {
            "CK001" => Some(WarningCode::UnnecessaryClosingBrace),
            "ST001" => Some(WarningCode::CStyleSyntax),
            "ST002" => Some(WarningCode::LegacyWhereClause),
            "DP001" => Some(WarningCode::DeprecatedKeyword),
            _ => None,
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recoverable diagnostic accumulated during parsing.
///
/// Warnings are buffered by the parser and retrievable after the parse; they
/// never abort parsing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompileWarning {
    /// Human-readable description
    pub message: String,
    /// 1-based source line
    pub line: u32,
    /// 1-based source column
    pub column: u32,
    /// Default severity, derived from the code
    pub severity: Severity,
    /// Stable warning code
    pub code: WarningCode,
}

impl CompileWarning {
    /// Create a warning at the given position; severity comes from the code.
    pub fn new(code: WarningCode, message: impl Into<String>, line: u32, column: u32) -> Self {
        CompileWarning { message: message.into(), line, column, severity: code.severity(), code }
    }
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}:{}]: {} ({})", self.severity, self.line, self.column, self.message, self.code)
    }
}
