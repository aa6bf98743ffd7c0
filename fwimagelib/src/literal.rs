//! Integer literals as accepted on the command line: `0x`/`0o`/`0b` prefixes (any
//! case) select the radix, decimal otherwise. Digits may be grouped with single
//! underscores and decimal literals may not carry leading zeros.

use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum LiteralError {
    /// Nothing but whitespace was given
    Empty,
    /// Not a valid integer literal
    InvalidLiteral(String),
    /// Valid literal, but the value does not fit the target type
    OutOfRange(String),
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty value"),
            Self::InvalidLiteral(s) => write!(f, "invalid integer literal: '{s}'"),
            Self::OutOfRange(s) => write!(f, "value '{s}' is out of range"),
        }
    }
}

impl Error for LiteralError {}

/// Parse an integer literal.
///
/// # Errors
/// Returns a [`LiteralError`] if `text` is empty, malformed, or does not fit in an `i128`.
///
/// # Example
/// ```
/// use fwimagelib::parse_int_literal;
///
/// assert_eq!(parse_int_literal("0xFF"), Ok(255));
/// assert_eq!(parse_int_literal("0o17"), Ok(15));
/// assert_eq!(parse_int_literal("0b1010_1010"), Ok(170));
/// assert_eq!(parse_int_literal("42"), Ok(42));
/// assert!(parse_int_literal("042").is_err());
/// ```
pub fn parse_int_literal(text: &str) -> Result<i128, LiteralError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(LiteralError::Empty);
    }
    let invalid = || LiteralError::InvalidLiteral(s.to_string());

    let (negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    let prefix = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    // A single separator may follow the radix prefix
    let digits = if radix == 10 {
        digits
    } else {
        digits.strip_prefix('_').unwrap_or(digits)
    };

    if digits.split('_').any(str::is_empty) {
        return Err(invalid());
    }
    let clean: String = digits.chars().filter(|&c| c != '_').collect();

    if radix == 10 && clean.len() > 1 && clean.starts_with('0') && clean.bytes().any(|b| b != b'0')
    {
        return Err(invalid());
    }

    let mut magnitude: i128 = 0;
    for c in clean.chars() {
        let digit = c.to_digit(radix).ok_or_else(invalid)?;
        magnitude = magnitude
            .checked_mul(i128::from(radix))
            .and_then(|v| v.checked_add(i128::from(digit)))
            .ok_or_else(|| LiteralError::OutOfRange(s.to_string()))?;
    }

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parse an integer literal that must fit in one byte (0..=255).
///
/// # Errors
/// Returns [`LiteralError::OutOfRange`] for values outside 0..=255, or the errors of
/// [`parse_int_literal`].
pub fn parse_pad_byte(text: &str) -> Result<u8, LiteralError> {
    let value = parse_int_literal(text)?;
    u8::try_from(value).map_err(|_| LiteralError::OutOfRange(text.trim().to_string()))
}

/// Parse an integer literal used as a byte count, e.g. an image size limit.
///
/// # Errors
/// Returns [`LiteralError::OutOfRange`] for negative values or values that do not
/// fit in `usize`, or the errors of [`parse_int_literal`].
///
/// # Example
/// ```
/// use fwimagelib::parse_byte_count;
///
/// assert_eq!(parse_byte_count("0x4000_0000"), Ok(1 << 30));
/// assert!(parse_byte_count("-1").is_err());
/// ```
pub fn parse_byte_count(text: &str) -> Result<usize, LiteralError> {
    let value = parse_int_literal(text)?;
    usize::try_from(value).map_err(|_| LiteralError::OutOfRange(text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("00", 0)]
    #[case("255", 255)]
    #[case("1_000", 1000)]
    #[case("0xff", 255)]
    #[case("0XFF", 255)]
    #[case("0x_A5", 0xA5)]
    #[case("0o377", 255)]
    #[case("0O7", 7)]
    #[case("0b1111_0000", 0xF0)]
    #[case("  +12 ", 12)]
    #[case("-5", -5)]
    fn test_parse_int_literal_valid(#[case] text: &str, #[case] expected: i128) {
        assert_eq!(parse_int_literal(text), Ok(expected));
    }

    #[rstest]
    #[case("0x")]
    #[case("0xG1")]
    #[case("0b102")]
    #[case("0o8")]
    #[case("012")]
    #[case("1__0")]
    #[case("_1")]
    #[case("1_")]
    #[case("ff")]
    #[case("--1")]
    fn test_parse_int_literal_invalid(#[case] text: &str) {
        assert_eq!(
            parse_int_literal(text),
            Err(LiteralError::InvalidLiteral(text.trim().to_string()))
        );
    }

    #[test]
    fn test_parse_int_literal_empty() {
        assert_eq!(parse_int_literal("   "), Err(LiteralError::Empty));
    }

    #[test]
    fn test_parse_int_literal_overflow() {
        let text = "0x1_0000_0000_0000_0000_0000_0000_0000_0000";

        assert_eq!(
            parse_int_literal(text),
            Err(LiteralError::OutOfRange(text.to_string()))
        );
    }

    #[rstest]
    #[case("0x00", 0x00)]
    #[case("0xFF", 0xFF)]
    #[case("0b1", 0x01)]
    #[case("128", 0x80)]
    fn test_parse_pad_byte_valid(#[case] text: &str, #[case] expected: u8) {
        assert_eq!(parse_pad_byte(text), Ok(expected));
    }

    #[rstest]
    #[case("256")]
    #[case("0x100")]
    #[case("-1")]
    fn test_parse_pad_byte_out_of_range(#[case] text: &str) {
        assert_eq!(
            parse_pad_byte(text),
            Err(LiteralError::OutOfRange(text.to_string()))
        );
    }

    #[rstest]
    #[case("0", 0)]
    #[case("1_048_576", 1 << 20)]
    #[case("0x2000_0001", 0x2000_0001)]
    fn test_parse_byte_count_valid(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(parse_byte_count(text), Ok(expected));
    }

    #[test]
    fn test_parse_byte_count_negative() {
        assert_eq!(
            parse_byte_count("-16"),
            Err(LiteralError::OutOfRange(String::from("-16")))
        );
    }
}
