//! Numeric conversions: integral, floating point, decimal, boolean and
//! character code points.
//!
//! Narrowing conversions are range-checked and fail with
//! [`BuiltinError::Overflow`] instead of truncating. Fractional values are
//! rounded half-to-even before they are narrowed to an integral type.

use crate::error::{BuiltinError, Result};
use convert_core::{ConversionSettings, DefinitionTable};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::any::type_name;
use std::fmt::Display;

pub(crate) fn overflow<T>(value: &dyn Display) -> BuiltinError {
    BuiltinError::Overflow {
        value: value.to_string(),
        target_type: type_name::<T>(),
    }
}

fn not_finite<T>(value: f64) -> BuiltinError {
    BuiltinError::NotFinite {
        value: value.to_string(),
        target_type: type_name::<T>(),
    }
}

/// Integral to integral, failing when the value does not fit.
pub fn integral<S, T>(value: &S, _: &ConversionSettings) -> Result<T>
where
    S: Copy + Display,
    T: TryFrom<S>,
{
    T::try_from(*value).map_err(|_| overflow::<T>(value))
}

/// Integral to `f64`.
pub fn integral_to_f64<S: ToPrimitive + Display>(
    value: &S,
    _: &ConversionSettings,
) -> Result<f64> {
    value.to_f64().ok_or_else(|| overflow::<f64>(value))
}

/// Integral to `f32`, rounding to the nearest representable value.
pub fn integral_to_f32<S: ToPrimitive + Display>(
    value: &S,
    _: &ConversionSettings,
) -> Result<f32> {
    value.to_f32().ok_or_else(|| overflow::<f32>(value))
}

/// Floating point to integral: round half-to-even, then range-check.
pub fn float_to_integral<S, T>(value: &S, _: &ConversionSettings) -> Result<T>
where
    S: Copy + Into<f64>,
    T: FromPrimitive,
{
    let value: f64 = (*value).into();
    if !value.is_finite() {
        return Err(not_finite::<T>(value));
    }
    T::from_f64(value.round_ties_even()).ok_or_else(|| overflow::<T>(&value))
}

/// `f64` to `f32`. Finite values beyond the `f32` range fail; NaN and
/// infinities carry over.
pub fn f64_to_f32(value: &f64, _: &ConversionSettings) -> Result<f32> {
    let narrowed = *value as f32;
    if value.is_finite() && !narrowed.is_finite() {
        return Err(overflow::<f32>(value));
    }
    Ok(narrowed)
}

pub fn f32_to_f64(value: &f32, _: &ConversionSettings) -> Result<f64> {
    Ok(f64::from(*value))
}

/// Integral to decimal; always exact.
pub fn integral_to_decimal<S>(value: &S, _: &ConversionSettings) -> Result<Decimal>
where
    S: Copy + Into<Decimal>,
{
    Ok((*value).into())
}

/// Decimal to integral: round half-to-even, then range-check.
pub fn decimal_to_integral<T: FromPrimitive>(
    value: &Decimal,
    _: &ConversionSettings,
) -> Result<T> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i128()
        .and_then(T::from_i128)
        .ok_or_else(|| overflow::<T>(value))
}

pub fn float_to_decimal<S>(value: &S, _: &ConversionSettings) -> Result<Decimal>
where
    S: Copy + Into<f64>,
{
    let value: f64 = (*value).into();
    if !value.is_finite() {
        return Err(not_finite::<Decimal>(value));
    }
    Decimal::from_f64(value).ok_or_else(|| overflow::<Decimal>(&value))
}

pub fn decimal_to_f64(value: &Decimal, _: &ConversionSettings) -> Result<f64> {
    value.to_f64().ok_or_else(|| overflow::<f64>(value))
}

pub fn decimal_to_f32(value: &Decimal, _: &ConversionSettings) -> Result<f32> {
    value.to_f32().ok_or_else(|| overflow::<f32>(value))
}

/// `true` becomes one, `false` becomes zero.
pub fn bool_to_number<T: From<bool>>(value: &bool, _: &ConversionSettings) -> Result<T> {
    Ok(T::from(*value))
}

pub fn bool_to_decimal(value: &bool, _: &ConversionSettings) -> Result<Decimal> {
    Ok(if *value { Decimal::ONE } else { Decimal::ZERO })
}

/// Any non-zero number is `true`.
pub fn number_to_bool<S: PartialEq + Default>(
    value: &S,
    _: &ConversionSettings,
) -> Result<bool> {
    Ok(*value != S::default())
}

/// Character to its Unicode code point, range-checked against the target.
pub fn char_to_integral<T: TryFrom<u32>>(value: &char, _: &ConversionSettings) -> Result<T> {
    let code = u32::from(*value);
    T::try_from(code).map_err(|_| overflow::<T>(&code))
}

/// Code point to character; surrogates and out-of-range values fail.
pub fn integral_to_char<S>(value: &S, _: &ConversionSettings) -> Result<char>
where
    S: Copy + Display,
    u32: TryFrom<S>,
{
    u32::try_from(*value)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| BuiltinError::InvalidCodePoint {
            value: value.to_string(),
        })
}

macro_rules! register_each {
    ($table:ident, $func:ident, $src:ty => [$($dst:ty),+ $(,)?]) => {
        $( $table.register::<$src, $dst, _, _>($func::<$src, $dst>); )+
    };
}

macro_rules! register_integral_family {
    ($table:ident, $($src:ty),+) => {
        $(
            $table.register::<$src, f64, _, _>(integral_to_f64::<$src>);
            $table.register::<$src, f32, _, _>(integral_to_f32::<$src>);
            $table.register::<$src, Decimal, _, _>(integral_to_decimal::<$src>);
            $table.register::<$src, bool, _, _>(number_to_bool::<$src>);
            $table.register::<$src, char, _, _>(integral_to_char::<$src>);
            $table.register::<f64, $src, _, _>(float_to_integral::<f64, $src>);
            $table.register::<f32, $src, _, _>(float_to_integral::<f32, $src>);
            $table.register::<Decimal, $src, _, _>(decimal_to_integral::<$src>);
            $table.register::<bool, $src, _, _>(bool_to_number::<$src>);
            $table.register::<char, $src, _, _>(char_to_integral::<$src>);
        )+
    };
}

/// Register every numeric, boolean and code point conversion.
pub fn register(table: &mut DefinitionTable) {
    register_each!(table, integral, i8 => [i16, i32, i64, u8, u16, u32, u64]);
    register_each!(table, integral, i16 => [i8, i32, i64, u8, u16, u32, u64]);
    register_each!(table, integral, i32 => [i8, i16, i64, u8, u16, u32, u64]);
    register_each!(table, integral, i64 => [i8, i16, i32, u8, u16, u32, u64]);
    register_each!(table, integral, u8 => [i8, i16, i32, i64, u16, u32, u64]);
    register_each!(table, integral, u16 => [i8, i16, i32, i64, u8, u32, u64]);
    register_each!(table, integral, u32 => [i8, i16, i32, i64, u8, u16, u64]);
    register_each!(table, integral, u64 => [i8, i16, i32, i64, u8, u16, u32]);

    register_integral_family!(table, i8, i16, i32, i64, u8, u16, u32, u64);

    table.register(f64_to_f32);
    table.register(f32_to_f64);
    table.register(float_to_decimal::<f64>);
    table.register(float_to_decimal::<f32>);
    table.register(decimal_to_f64);
    table.register(decimal_to_f32);

    table.register(number_to_bool::<f64>);
    table.register(number_to_bool::<f32>);
    table.register(number_to_bool::<Decimal>);
    table.register(bool_to_number::<f64>);
    table.register(bool_to_number::<f32>);
    table.register(bool_to_decimal);
}
