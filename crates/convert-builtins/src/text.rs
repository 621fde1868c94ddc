//! Text conversions for numbers, booleans and characters.
//!
//! Parsing trims surrounding whitespace. Blank input yields the target's
//! zero value. Formatting honours the settings' format pattern and the
//! separators of its format provider.

use crate::error::{BuiltinError, Result};
use crate::numeric::overflow;
use convert_core::{ConversionSettings, DefinitionTable, FormatProvider};
use rust_decimal::Decimal;
use std::any::type_name;
use std::fmt::{Display, LowerHex, UpperHex};
use std::str::FromStr;

/// Run `parse` on trimmed input, or return the zero value for blank input.
pub(crate) fn lenient<T: Default>(
    input: &str,
    parse: impl FnOnce(&str) -> Result<T>,
) -> Result<T> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(T::default())
    } else {
        parse(trimmed)
    }
}

fn invalid_number<T>(input: &str) -> BuiltinError {
    BuiltinError::InvalidNumber {
        input: input.to_string(),
        target_type: type_name::<T>(),
    }
}

/// Numeric format patterns understood by the built-in formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericFormat {
    /// `G`: shortest round-trip representation.
    General,
    /// `D[n]`: integral digits, zero padded to `n`.
    Decimal(usize),
    /// `X[n]` / `x[n]`: hexadecimal, zero padded to `n`.
    Hex { upper: bool, width: usize },
    /// `F[n]`: fixed point with `n` fractional digits.
    Fixed(usize),
    /// `N[n]`: fixed point with group separators.
    Number(usize),
}

const DEFAULT_FRACTION_DIGITS: usize = 2;
const MAX_PRECISION: usize = 99;

impl NumericFormat {
    fn parse<T>(format: Option<&str>) -> Result<Self> {
        let Some(format) = format else {
            return Ok(Self::General);
        };
        let invalid = || BuiltinError::InvalidFormat {
            format: format.to_string(),
            target_type: type_name::<T>(),
        };

        let mut chars = format.chars();
        let specifier = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        let precision = if digits.is_empty() {
            None
        } else {
            let precision: usize = digits.parse().map_err(|_| invalid())?;
            if precision > MAX_PRECISION {
                return Err(invalid());
            }
            Some(precision)
        };

        Ok(match specifier {
            'G' | 'g' => Self::General,
            'D' | 'd' => Self::Decimal(precision.unwrap_or(0)),
            'X' => Self::Hex {
                upper: true,
                width: precision.unwrap_or(0),
            },
            'x' => Self::Hex {
                upper: false,
                width: precision.unwrap_or(0),
            },
            'F' | 'f' => Self::Fixed(precision.unwrap_or(DEFAULT_FRACTION_DIGITS)),
            'N' | 'n' => Self::Number(precision.unwrap_or(DEFAULT_FRACTION_DIGITS)),
            _ => return Err(invalid()),
        })
    }
}

/// Replace the invariant decimal point with the provider's separator.
fn localize(text: String, provider: &FormatProvider) -> String {
    if provider.decimal_separator == '.' {
        text
    } else {
        text.replace('.', &provider.decimal_separator.to_string())
    }
}

/// Insert group separators into the integral digits of invariant numeric text.
fn group_digits(text: &str, provider: &FormatProvider) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integral, fraction) = match unsigned.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (unsigned, None),
    };
    if !integral.bytes().all(|b| b.is_ascii_digit()) {
        return localize(text.to_string(), provider);
    }

    let mut out = String::with_capacity(text.len() + integral.len() / 3);
    out.push_str(sign);
    for (idx, digit) in integral.chars().enumerate() {
        if idx > 0 && (integral.len() - idx) % 3 == 0 {
            out.push(provider.group_separator);
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push(provider.decimal_separator);
        out.push_str(fraction);
    }
    out
}

fn pad_digits(text: String, width: usize) -> String {
    match text.strip_prefix('-') {
        Some(digits) => format!("-{digits:0>width$}"),
        None => format!("{text:0>width$}"),
    }
}

fn with_zero_fraction(text: String, digits: usize) -> String {
    if digits == 0 {
        text
    } else {
        format!("{text}.{}", "0".repeat(digits))
    }
}

/// Format an integral value.
pub fn format_integral<V>(value: &V, settings: &ConversionSettings) -> Result<String>
where
    V: Display + LowerHex + UpperHex,
{
    let provider = settings.format_provider();
    Ok(match NumericFormat::parse::<V>(settings.format())? {
        NumericFormat::General => value.to_string(),
        NumericFormat::Decimal(width) => pad_digits(value.to_string(), width),
        NumericFormat::Hex { upper: true, width } => format!("{value:0width$X}"),
        NumericFormat::Hex { upper: false, width } => format!("{value:0width$x}"),
        NumericFormat::Fixed(digits) => {
            localize(with_zero_fraction(value.to_string(), digits), provider)
        }
        NumericFormat::Number(digits) => {
            group_digits(&with_zero_fraction(value.to_string(), digits), provider)
        }
    })
}

/// Format a floating point or decimal value.
pub fn format_fractional<V: Display>(value: &V, settings: &ConversionSettings) -> Result<String> {
    let provider = settings.format_provider();
    match NumericFormat::parse::<V>(settings.format())? {
        NumericFormat::General => Ok(localize(value.to_string(), provider)),
        NumericFormat::Fixed(digits) => Ok(localize(format!("{value:.digits$}"), provider)),
        NumericFormat::Number(digits) => Ok(group_digits(&format!("{value:.digits$}"), provider)),
        NumericFormat::Decimal(_) | NumericFormat::Hex { .. } => Err(BuiltinError::InvalidFormat {
            format: settings.format().unwrap_or_default().to_string(),
            target_type: type_name::<V>(),
        }),
    }
}

/// Parse integral text. Group separators are not accepted.
pub fn parse_integral<T>(value: &String, _: &ConversionSettings) -> Result<T>
where
    T: FromStr + Default,
{
    lenient(value, |text| text.parse().map_err(|_| invalid_number::<T>(text)))
}

/// Rewrite provider-specific numeric text into invariant form.
fn normalize_fractional(text: &str, provider: &FormatProvider) -> String {
    text.chars()
        .filter(|ch| *ch != provider.group_separator || *ch == provider.decimal_separator)
        .map(|ch| if ch == provider.decimal_separator { '.' } else { ch })
        .collect()
}

fn names_infinity(text: &str) -> bool {
    let unsigned = text.trim_start_matches(|c: char| c == '+' || c == '-');
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parse floating point text, honouring the provider's separators.
///
/// Finite text beyond the target's range fails instead of becoming infinite.
pub fn parse_float<T>(value: &String, settings: &ConversionSettings) -> Result<T>
where
    T: FromStr + Default + Copy + Into<f64>,
{
    lenient(value, |text| {
        let parsed: T = normalize_fractional(text, settings.format_provider())
            .parse()
            .map_err(|_| invalid_number::<T>(text))?;
        if Into::<f64>::into(parsed).is_infinite() && !names_infinity(text) {
            return Err(overflow::<T>(&text));
        }
        Ok(parsed)
    })
}

/// Parse decimal text, accepting scientific notation.
pub fn parse_decimal(value: &String, settings: &ConversionSettings) -> Result<Decimal> {
    lenient(value, |text| {
        let normalized = normalize_fractional(text, settings.format_provider());
        Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .map_err(|_| invalid_number::<Decimal>(text))
    })
}

pub fn format_bool(value: &bool, _: &ConversionSettings) -> Result<String> {
    Ok(value.to_string())
}

/// Parse `true` / `false`, case-insensitively.
pub fn parse_bool(value: &String, _: &ConversionSettings) -> Result<bool> {
    lenient(value, |text| {
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(BuiltinError::InvalidBoolean {
                input: text.to_string(),
            })
        }
    })
}

pub fn format_char(value: &char, _: &ConversionSettings) -> Result<String> {
    Ok(value.to_string())
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// A single-character string is taken verbatim, even whitespace. Otherwise
/// the trimmed text must be exactly one character.
pub fn parse_char(value: &String, _: &ConversionSettings) -> Result<char> {
    if let Some(ch) = single_char(value) {
        return Ok(ch);
    }
    lenient(value, |text| {
        single_char(text).ok_or_else(|| BuiltinError::InvalidChar {
            input: text.to_string(),
        })
    })
}

macro_rules! register_integral_text {
    ($table:ident, $($ty:ty),+) => {
        $(
            $table.register::<String, $ty, _, _>(parse_integral::<$ty>);
            $table.register::<$ty, String, _, _>(format_integral::<$ty>);
        )+
    };
}

/// Register text conversions for numbers, booleans and characters.
pub fn register(table: &mut DefinitionTable) {
    register_integral_text!(table, i8, i16, i32, i64, u8, u16, u32, u64);

    table.register(parse_float::<f32>);
    table.register(parse_float::<f64>);
    table.register(parse_decimal);
    table.register(format_fractional::<f32>);
    table.register(format_fractional::<f64>);
    table.register(format_fractional::<Decimal>);

    table.register(parse_bool);
    table.register(format_bool);
    table.register(parse_char);
    table.register(format_char);
}
