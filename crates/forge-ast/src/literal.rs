//! Literal values carried by AST nodes.
//!
//! The parser strips digit separators and type suffixes before conversion.
//! Integer magnitudes go through `i128` so every 64-bit-suffixed literal
//! converts without truncation, including the `s64` minimum after unary-minus
//! sign folding. `d128` decimals keep their normalized digit string instead of
//! being forced through a binary float.

use std::fmt;

/// Width/signedness class of a typed integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    U8,
    U16,
    U32,
    U64,
    /// Pointer-sized unsigned (`_uaddr`)
    UAddr,
    S8,
    S16,
    S32,
    S64,
    /// Pointer-sized signed (`_saddr`)
    SAddr,
    /// No suffix; width decided downstream
    Unsuffixed,
}

impl IntKind {
    /// Suffix spelling, empty for unsuffixed literals.
    pub fn suffix(self) -> &'static str {
        match self {
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::UAddr => "uaddr",
            IntKind::S8 => "s8",
            IntKind::S16 => "s16",
            IntKind::S32 => "s32",
            IntKind::S64 => "s64",
            IntKind::SAddr => "saddr",
            IntKind::Unsuffixed => "",
        }
    }
}

/// Width class of a typed binary float literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F16,
    F32,
    F64,
    /// No suffix
    Unsuffixed,
}

/// Width class of a decimal literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecimalKind {
    D64,
    D128,
}

/// Encoding/flavor of a text literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    /// Ordinary UTF-8 text
    Plain,
    /// Raw text, escapes untouched
    Raw,
    /// Formatted text with interpolation holes
    Formatted,
    /// Explicit 8-bit encoding
    Text8,
    /// Explicit 16-bit encoding
    Text16,
}

/// A literal value attached to a `Literal` expression or pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Integer of any suffix family. Sign folding stores negative values
    /// directly, so `-9_223_372_036_854_775_808_s64` is a single literal.
    Integer { value: i128, kind: IntKind },
    /// Binary float
    Float { value: f64, kind: FloatKind },
    /// Decimal float, digits preserved exactly
    Decimal { digits: String, kind: DecimalKind },
    /// Single byte: `b'A'`
    Byte(u8),
    /// Unicode scalar: `'A'`
    Letter(char),
    /// Text in any encoding
    Text { value: String, kind: TextKind },
    Boolean(bool),
    /// Memory size, normalized to bytes: `4_KiB` is 4096
    MemorySize { bytes: u128 },
    /// Duration, normalized to nanoseconds: `250_ms` is 250_000_000
    Duration { nanos: u128 },
    /// The absence value `none`
    None,
}

impl LiteralValue {
    /// Compact rendering used by the S-expression dumps.
    pub fn to_sexp(&self) -> String {
        match self {
            LiteralValue::Integer { value, kind } => {
                if kind.suffix().is_empty() {
                    format!("(integer {value})")
                } else {
                    format!("(integer {value} {})", kind.suffix())
                }
            }
            LiteralValue::Float { value, .. } => format!("(float {value})"),
            LiteralValue::Decimal { digits, .. } => format!("(decimal {digits})"),
            LiteralValue::Byte(b) => format!("(byte {b})"),
            LiteralValue::Letter(c) => format!("(letter {c:?})"),
            LiteralValue::Text { value, .. } => format!("(text {value:?})"),
            LiteralValue::Boolean(b) => format!("(bool {b})"),
            LiteralValue::MemorySize { bytes } => format!("(memory_size {bytes})"),
            LiteralValue::Duration { nanos } => format!("(duration {nanos})"),
            LiteralValue::None => "(none)".to_string(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sexp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_minimum_fits() {
        let lit = LiteralValue::Integer { value: i64::MIN as i128, kind: IntKind::S64 };
        assert_eq!(lit.to_sexp(), "(integer -9223372036854775808 s64)");
    }

    #[test]
    fn unsigned_maximum_fits() {
        let lit = LiteralValue::Integer { value: u64::MAX as i128, kind: IntKind::U64 };
        assert_eq!(lit.to_sexp(), "(integer 18446744073709551615 u64)");
    }

    #[test]
    fn decimal_keeps_digits() {
        let lit = LiteralValue::Decimal {
            digits: "3.141592653589793238462643383279".to_string(),
            kind: DecimalKind::D128,
        };
        assert_eq!(lit.to_sexp(), "(decimal 3.141592653589793238462643383279)");
    }
}
