//! Literal token conversion.
//!
//! The lexer hands literals over with their original spelling (digit
//! separators, radix prefix, type suffix). Conversion strips separators and
//! suffixes, honors `0x`/`0b` prefixes, and goes through `i128` so no
//! 64-bit-suffixed value truncates. Decimal literals keep their digit string.

use forge_ast::{DecimalKind, FloatKind, IntKind, LiteralValue, TextKind};
use forge_token::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};

/// Convert a literal token into its value. `negative` is set when a unary
/// minus was folded into the literal.
pub(crate) fn literal_from_token(token: &Token, negative: bool) -> ParseResult<LiteralValue> {
    match token.kind {
        TokenKind::True => Ok(LiteralValue::Boolean(true)),
        TokenKind::False => Ok(LiteralValue::Boolean(false)),
        TokenKind::None => Ok(LiteralValue::None),

        TokenKind::IntegerLiteral => integer(token, negative, IntKind::Unsuffixed),
        TokenKind::U8Literal => integer(token, negative, IntKind::U8),
        TokenKind::U16Literal => integer(token, negative, IntKind::U16),
        TokenKind::U32Literal => integer(token, negative, IntKind::U32),
        TokenKind::U64Literal => integer(token, negative, IntKind::U64),
        TokenKind::UAddrLiteral => integer(token, negative, IntKind::UAddr),
        TokenKind::S8Literal => integer(token, negative, IntKind::S8),
        TokenKind::S16Literal => integer(token, negative, IntKind::S16),
        TokenKind::S32Literal => integer(token, negative, IntKind::S32),
        TokenKind::S64Literal => integer(token, negative, IntKind::S64),
        TokenKind::SAddrLiteral => integer(token, negative, IntKind::SAddr),

        TokenKind::FloatLiteral => float(token, negative, FloatKind::Unsuffixed),
        TokenKind::F16Literal => float(token, negative, FloatKind::F16),
        TokenKind::F32Literal => float(token, negative, FloatKind::F32),
        TokenKind::F64Literal => float(token, negative, FloatKind::F64),

        TokenKind::D64Literal => decimal(token, negative, DecimalKind::D64),
        TokenKind::D128Literal => decimal(token, negative, DecimalKind::D128),

        TokenKind::ByteLiteral => byte(token),
        TokenKind::LetterLiteral => letter(token),

        TokenKind::TextLiteral => text(token, TextKind::Plain),
        TokenKind::RawTextLiteral => text(token, TextKind::Raw),
        TokenKind::FormattedTextLiteral => text(token, TextKind::Formatted),
        TokenKind::Text8Literal => text(token, TextKind::Text8),
        TokenKind::Text16Literal => text(token, TextKind::Text16),

        TokenKind::MemorySizeLiteral => memory_size(token),
        TokenKind::DurationLiteral => duration(token),

        _ => Err(invalid(token)),
    }
}

/// Whether a token kind is a numeric literal eligible for unary-minus sign
/// folding.
pub(crate) fn is_sign_foldable(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntegerLiteral
            | TokenKind::U8Literal
            | TokenKind::U16Literal
            | TokenKind::U32Literal
            | TokenKind::U64Literal
            | TokenKind::UAddrLiteral
            | TokenKind::S8Literal
            | TokenKind::S16Literal
            | TokenKind::S32Literal
            | TokenKind::S64Literal
            | TokenKind::SAddrLiteral
            | TokenKind::FloatLiteral
            | TokenKind::F16Literal
            | TokenKind::F32Literal
            | TokenKind::F64Literal
            | TokenKind::D64Literal
            | TokenKind::D128Literal
    )
}

fn invalid(token: &Token) -> ParseError {
    ParseError::InvalidLiteral {
        literal: token.text.to_string(),
        line: token.line,
        column: token.column,
    }
}

/// Strip digit separators and, when present, the type suffix (optionally
/// preceded by one more separator already removed).
fn normalize<'a>(text: &'a str, suffix: &str) -> String {
    let stripped: String = text.chars().filter(|c| *c != '_').collect();
    if !suffix.is_empty() {
        if let Some(rest) = stripped.strip_suffix(suffix) {
            return rest.to_string();
        }
    }
    stripped
}

fn integer(token: &Token, negative: bool, kind: IntKind) -> ParseResult<LiteralValue> {
    let digits = normalize(&token.text, kind.suffix());
    let magnitude = parse_magnitude(&digits).ok_or_else(|| invalid(token))?;
    let value = if negative { -magnitude } else { magnitude };
    if !int_in_range(kind, value) {
        return Err(invalid(token));
    }
    Ok(LiteralValue::Integer { value, kind })
}

fn parse_magnitude(digits: &str) -> Option<i128> {
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i128::from_str_radix(bin, 2).ok()
    } else {
        digits.parse::<i128>().ok()
    }
}

/// Pointer-sized literals are validated against 64-bit ranges.
fn int_in_range(kind: IntKind, value: i128) -> bool {
    match kind {
        IntKind::U8 => (0..=u8::MAX as i128).contains(&value),
        IntKind::U16 => (0..=u16::MAX as i128).contains(&value),
        IntKind::U32 => (0..=u32::MAX as i128).contains(&value),
        IntKind::U64 | IntKind::UAddr => (0..=u64::MAX as i128).contains(&value),
        IntKind::S8 => (i8::MIN as i128..=i8::MAX as i128).contains(&value),
        IntKind::S16 => (i16::MIN as i128..=i16::MAX as i128).contains(&value),
        IntKind::S32 => (i32::MIN as i128..=i32::MAX as i128).contains(&value),
        IntKind::S64 | IntKind::SAddr => {
            (i64::MIN as i128..=i64::MAX as i128).contains(&value)
        }
        IntKind::Unsuffixed => true,
    }
}

fn float(token: &Token, negative: bool, kind: FloatKind) -> ParseResult<LiteralValue> {
    let suffix = match kind {
        FloatKind::F16 => "f16",
        FloatKind::F32 => "f32",
        FloatKind::F64 => "f64",
        FloatKind::Unsuffixed => "",
    };
    let digits = normalize(&token.text, suffix);
    let value: f64 = digits.parse().map_err(|_| invalid(token))?;
    let value = if negative { -value } else { value };
    Ok(LiteralValue::Float { value, kind })
}

fn decimal(token: &Token, negative: bool, kind: DecimalKind) -> ParseResult<LiteralValue> {
    let suffix = match kind {
        DecimalKind::D64 => "d64",
        DecimalKind::D128 => "d128",
    };
    let digits = normalize(&token.text, suffix);
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(invalid(token));
    }
    let digits = if negative { format!("-{digits}") } else { digits };
    Ok(LiteralValue::Decimal { digits, kind })
}

fn byte(token: &Token) -> ParseResult<LiteralValue> {
    let inner = token
        .text
        .strip_prefix('b')
        .and_then(|rest| rest.strip_prefix('\''))
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| invalid(token))?;
    let c = unescape_char(inner).ok_or_else(|| invalid(token))?;
    if !c.is_ascii() {
        return Err(invalid(token));
    }
    Ok(LiteralValue::Byte(c as u8))
}

fn letter(token: &Token) -> ParseResult<LiteralValue> {
    let inner = token
        .text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| invalid(token))?;
    let c = unescape_char(inner).ok_or_else(|| invalid(token))?;
    Ok(LiteralValue::Letter(c))
}

fn text(token: &Token, kind: TextKind) -> ParseResult<LiteralValue> {
    // Strip any alphabetic prefix (`r`, `f`, `t8`, `t16`) and the quotes.
    let raw = &*token.text;
    let open = raw.find('"').ok_or_else(|| invalid(token))?;
    let inner = raw
        .get(open + 1..raw.len() - 1)
        .filter(|_| raw.ends_with('"') && raw.len() > open + 1)
        .ok_or_else(|| invalid(token))?;
    let value = if kind == TextKind::Raw {
        inner.to_string()
    } else {
        unescape_text(inner).ok_or_else(|| invalid(token))?
    };
    Ok(LiteralValue::Text { value, kind })
}

fn unescape_char(inner: &str) -> Option<char> {
    let mut chars = inner.chars();
    let first = chars.next()?;
    let c = if first == '\\' {
        match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return Option::None,
        }
    } else {
        first
    };
    if chars.next().is_some() {
        return Option::None;
    }
    Some(c)
}

fn unescape_text(inner: &str) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            _ => return Option::None,
        }
    }
    Some(out)
}

fn memory_size(token: &Token) -> ParseResult<LiteralValue> {
    let (value, unit) = split_unit(&token.text).ok_or_else(|| invalid(token))?;
    let multiplier: u128 = match unit {
        "B" => 1,
        "KB" => 1_000,
        "KiB" => 1 << 10,
        "MB" => 1_000_000,
        "MiB" => 1 << 20,
        "GB" => 1_000_000_000,
        "GiB" => 1 << 30,
        "TB" => 1_000_000_000_000,
        "TiB" => 1 << 40,
        _ => return Err(invalid(token)),
    };
    let bytes = value.checked_mul(multiplier).ok_or_else(|| invalid(token))?;
    Ok(LiteralValue::MemorySize { bytes })
}

fn duration(token: &Token) -> ParseResult<LiteralValue> {
    let (value, unit) = split_unit(&token.text).ok_or_else(|| invalid(token))?;
    let multiplier: u128 = match unit {
        "ns" => 1,
        "us" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "min" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return Err(invalid(token)),
    };
    let nanos = value.checked_mul(multiplier).ok_or_else(|| invalid(token))?;
    Ok(LiteralValue::Duration { nanos })
}

/// Split `4_KiB` into magnitude and unit suffix.
fn split_unit(text: &str) -> Option<(u128, &str)> {
    let stripped: String = text.chars().filter(|c| *c != '_').collect();
    let split = stripped.find(|c: char| c.is_ascii_alphabetic())?;
    let value: u128 = stripped[..split].parse().ok()?;
    let unit_len = stripped.len() - split;
    // The unit is a suffix of the original text; reborrow from it so the
    // return type does not depend on the local String.
    let unit = &text[text.len() - unit_len..];
    Some((value, unit))
}
