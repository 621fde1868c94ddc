//! Date-time and duration conversions.
//!
//! Default text forms are ISO 8601 round-trip representations:
//!
//! | Type                     | Default text                       |
//! | ------------------------ | ---------------------------------- |
//! | `NaiveDateTime`          | `2024-01-01T12:00:00.500`          |
//! | `DateTime<FixedOffset>`  | `2024-01-01T12:00:00.500+02:00`    |
//! | `DateTime<Utc>`          | `2024-01-01T12:00:00.500Z`         |
//! | `TimeDelta` / `Duration` | `P1DT2H3M4.5S` (`c`: `1.02:03:04.5`) |
//!
//! A format pattern in the settings is a chrono strftime pattern for
//! date-times. Offset-less input converted to an offset-aware type is taken
//! as UTC; the temporal style decides whether offsets survive conversion.

use crate::error::{BuiltinError, Result};
use crate::text::lenient;
use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc,
};
use convert_core::{ConversionSettings, DefinitionTable};
use std::any::type_name;
use std::fmt::{Display, Write};
use std::time::Duration;

const NAIVE_ROUND_TRIP: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NAIVE_FALLBACKS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const SPACED_OFFSET: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 604_800;

fn invalid_format<T>(format: &str) -> BuiltinError {
    BuiltinError::InvalidFormat {
        format: format.to_string(),
        target_type: type_name::<T>(),
    }
}

fn invalid_datetime(input: &str, reason: impl Display) -> BuiltinError {
    BuiltinError::InvalidDateTime {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate a strftime pattern up front; chrono panics on bad patterns at render time.
fn strftime_items<'a, T>(pattern: &'a str) -> Result<Vec<Item<'a>>> {
    let items: Vec<Item<'a>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid_format::<T>(pattern));
    }
    Ok(items)
}

/// Render a chrono delayed format, turning render failures (e.g. `%z` on a
/// naive value) into errors.
fn render<T>(formatted: impl Display, pattern: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| invalid_format::<T>(pattern))?;
    Ok(out)
}

pub fn format_naive(value: &NaiveDateTime, settings: &ConversionSettings) -> Result<String> {
    let pattern = settings.format().unwrap_or(NAIVE_ROUND_TRIP);
    let items = strftime_items::<NaiveDateTime>(pattern)?;
    render::<NaiveDateTime>(value.format_with_items(items.iter()), pattern)
}

pub fn format_offset(
    value: &DateTime<FixedOffset>,
    settings: &ConversionSettings,
) -> Result<String> {
    match settings.format() {
        Some(pattern) => {
            let items = strftime_items::<DateTime<FixedOffset>>(pattern)?;
            render::<DateTime<FixedOffset>>(value.format_with_items(items.iter()), pattern)
        }
        None => Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
    }
}

pub fn format_utc(value: &DateTime<Utc>, settings: &ConversionSettings) -> Result<String> {
    match settings.format() {
        Some(pattern) => {
            let items = strftime_items::<DateTime<Utc>>(pattern)?;
            render::<DateTime<Utc>>(value.format_with_items(items.iter()), pattern)
        }
        None => Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

fn parse_naive_default(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FALLBACKS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn parse_offset_default(
    text: &str,
) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).or_else(|_| DateTime::parse_from_str(text, SPACED_OFFSET))
}

/// Apply the temporal style to an offset-aware value.
fn styled(value: DateTime<FixedOffset>, settings: &ConversionSettings) -> DateTime<FixedOffset> {
    if settings.temporal_style().adjusts_to_universal() {
        value.with_timezone(&Utc).fixed_offset()
    } else {
        value
    }
}

/// Drop the offset, keeping wall-clock time unless the style adjusts to UTC.
fn to_naive(value: &DateTime<FixedOffset>, settings: &ConversionSettings) -> NaiveDateTime {
    if settings.temporal_style().adjusts_to_universal() {
        value.naive_utc()
    } else {
        value.naive_local()
    }
}

pub fn parse_naive(value: &String, settings: &ConversionSettings) -> Result<NaiveDateTime> {
    lenient(value, |text| match settings.format() {
        Some(pattern) => {
            NaiveDateTime::parse_from_str(text, pattern).map_err(|err| invalid_datetime(text, err))
        }
        None => match parse_naive_default(text) {
            Some(naive) => Ok(naive),
            None => parse_offset_default(text)
                .map(|parsed| to_naive(&parsed, settings))
                .map_err(|err| invalid_datetime(text, err)),
        },
    })
}

pub fn parse_offset(
    value: &String,
    settings: &ConversionSettings,
) -> Result<DateTime<FixedOffset>> {
    lenient(value, |text| {
        let parsed = match settings.format() {
            Some(pattern) => DateTime::parse_from_str(text, pattern).or_else(|err| {
                NaiveDateTime::parse_from_str(text, pattern)
                    .map(|naive| naive.and_utc().fixed_offset())
                    .map_err(|_| err)
            }),
            None => parse_offset_default(text).or_else(|err| {
                parse_naive_default(text)
                    .map(|naive| naive.and_utc().fixed_offset())
                    .ok_or(err)
            }),
        };
        parsed
            .map(|value| styled(value, settings))
            .map_err(|err| invalid_datetime(text, err))
    })
}

pub fn parse_utc(value: &String, settings: &ConversionSettings) -> Result<DateTime<Utc>> {
    parse_offset(value, settings).map(|value| value.with_timezone(&Utc))
}

pub fn naive_to_offset(
    value: &NaiveDateTime,
    _: &ConversionSettings,
) -> Result<DateTime<FixedOffset>> {
    Ok(value.and_utc().fixed_offset())
}

pub fn naive_to_utc(value: &NaiveDateTime, _: &ConversionSettings) -> Result<DateTime<Utc>> {
    Ok(value.and_utc())
}

pub fn offset_to_naive(
    value: &DateTime<FixedOffset>,
    settings: &ConversionSettings,
) -> Result<NaiveDateTime> {
    Ok(to_naive(value, settings))
}

pub fn offset_to_utc(
    value: &DateTime<FixedOffset>,
    _: &ConversionSettings,
) -> Result<DateTime<Utc>> {
    Ok(value.with_timezone(&Utc))
}

pub fn utc_to_naive(value: &DateTime<Utc>, _: &ConversionSettings) -> Result<NaiveDateTime> {
    Ok(value.naive_utc())
}

pub fn utc_to_offset(
    value: &DateTime<Utc>,
    _: &ConversionSettings,
) -> Result<DateTime<FixedOffset>> {
    Ok(value.fixed_offset())
}

// ============================================================================
// Durations
// ============================================================================

fn invalid_duration(input: &str) -> BuiltinError {
    BuiltinError::InvalidDuration {
        input: input.to_string(),
    }
}

fn fraction_digits(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", digits.trim_end_matches('0'))
}

/// `[-]P[nD][T[nH][nM][n[.f]S]]`, `PT0S` for zero.
fn iso_duration(value: &TimeDelta) -> String {
    let magnitude = value.abs();
    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos().unsigned_abs();
    let days = total / SECONDS_PER_DAY;
    let hours = total % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let seconds = total % SECONDS_PER_MINUTE;

    let mut out = String::new();
    if *value < TimeDelta::zero() {
        out.push('-');
    }
    out.push('P');
    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 || days == 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds > 0 || nanos > 0 || (hours == 0 && minutes == 0) {
            let _ = write!(out, "{seconds}{}S", fraction_digits(nanos));
        }
    }
    out
}

/// `[-][d.]hh:mm:ss[.f]`
fn clock_duration(value: &TimeDelta) -> String {
    let magnitude = value.abs();
    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos().unsigned_abs();
    let days = total / SECONDS_PER_DAY;

    let mut out = String::new();
    if *value < TimeDelta::zero() {
        out.push('-');
    }
    if days > 0 {
        let _ = write!(out, "{days}.");
    }
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}{}",
        total % SECONDS_PER_DAY / SECONDS_PER_HOUR,
        total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        total % SECONDS_PER_MINUTE,
        fraction_digits(nanos)
    );
    out
}

pub fn format_time_delta(value: &TimeDelta, settings: &ConversionSettings) -> Result<String> {
    match settings.format() {
        None | Some("o") | Some("O") => Ok(iso_duration(value)),
        Some("c") | Some("C") => Ok(clock_duration(value)),
        Some(other) => Err(invalid_format::<TimeDelta>(other)),
    }
}

/// Parse `seconds[.fraction]` into nanoseconds; at most nine fractional digits are kept.
fn seconds_to_nanos(text: &str) -> Option<i128> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: i128 = whole.parse().ok()?;
    let mut fraction_nanos: i128 = 0;
    for (idx, digit) in fraction.bytes().take(9).enumerate() {
        fraction_nanos += i128::from(digit - b'0') * 10_i128.pow(8 - idx as u32);
    }
    whole.checked_mul(NANOS_PER_SECOND)?.checked_add(fraction_nanos)
}

fn unit_nanos(number: &str, seconds_per_unit: i64) -> Option<i128> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let count: i128 = number.parse().ok()?;
    count
        .checked_mul(i128::from(seconds_per_unit))?
        .checked_mul(NANOS_PER_SECOND)
}

/// Split `12H30M5.5S` into `[("12", 'H'), ("30", 'M'), ("5.5", 'S')]`.
fn iso_components(text: &str) -> Option<Vec<(&str, char)>> {
    let mut components = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if ch.is_ascii_alphabetic() {
            let number = &text[start..idx];
            if number.is_empty() {
                return None;
            }
            components.push((number, ch.to_ascii_uppercase()));
            start = idx + 1;
        }
    }
    if start != text.len() {
        return None;
    }
    Some(components)
}

fn parse_iso_body(body: &str) -> Option<i128> {
    let (date_part, time_part) = match body.find(['T', 't']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mut total: i128 = 0;
    let mut seen = 0;
    for (number, unit) in iso_components(date_part)? {
        let nanos = match unit {
            'W' => unit_nanos(number, SECONDS_PER_WEEK)?,
            'D' => unit_nanos(number, SECONDS_PER_DAY)?,
            _ => return None,
        };
        total = total.checked_add(nanos)?;
        seen += 1;
    }
    if let Some(time_part) = time_part {
        let components = iso_components(time_part)?;
        if components.is_empty() {
            return None;
        }
        for (number, unit) in components {
            let nanos = match unit {
                'H' => unit_nanos(number, SECONDS_PER_HOUR)?,
                'M' => unit_nanos(number, SECONDS_PER_MINUTE)?,
                'S' => seconds_to_nanos(number)?,
                _ => return None,
            };
            total = total.checked_add(nanos)?;
            seen += 1;
        }
    }
    (seen > 0).then_some(total)
}

fn parse_clock_body(body: &str) -> Option<i128> {
    let parts: Vec<&str> = body.split(':').collect();
    let (head, minutes, seconds) = match parts.as_slice() {
        [head, minutes] => (*head, *minutes, "0"),
        [head, minutes, seconds] => (*head, *minutes, *seconds),
        _ => return None,
    };
    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (days, hours),
        None => ("0", head),
    };

    let hours_nanos = unit_nanos(hours, SECONDS_PER_HOUR)?;
    let minutes_nanos = unit_nanos(minutes, SECONDS_PER_MINUTE)?;
    let seconds_nanos = seconds_to_nanos(seconds)?;
    if hours_nanos >= i128::from(SECONDS_PER_DAY) * NANOS_PER_SECOND
        || minutes_nanos >= i128::from(SECONDS_PER_HOUR) * NANOS_PER_SECOND
        || seconds_nanos >= i128::from(SECONDS_PER_MINUTE) * NANOS_PER_SECOND
    {
        return None;
    }

    unit_nanos(days, SECONDS_PER_DAY)?
        .checked_add(hours_nanos)?
        .checked_add(minutes_nanos)?
        .checked_add(seconds_nanos)
}

fn nanos_to_time_delta(nanos: i128) -> Option<TimeDelta> {
    let seconds = i64::try_from(nanos / NANOS_PER_SECOND).ok()?;
    let subsec = u32::try_from(nanos % NANOS_PER_SECOND).ok()?;
    TimeDelta::new(seconds, subsec)
}

pub fn parse_time_delta(value: &String, _: &ConversionSettings) -> Result<TimeDelta> {
    lenient(value, |text| {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let nanos = match body.strip_prefix(['P', 'p']) {
            Some(iso) => parse_iso_body(iso),
            None => parse_clock_body(body),
        };
        let delta = nanos
            .and_then(nanos_to_time_delta)
            .ok_or_else(|| invalid_duration(text))?;
        Ok(if negative { -delta } else { delta })
    })
}

pub fn time_delta_to_std(value: &TimeDelta, _: &ConversionSettings) -> Result<Duration> {
    value
        .to_std()
        .map_err(|_| BuiltinError::DurationOutOfRange {
            value: iso_duration(value),
            target_type: type_name::<Duration>(),
        })
}

pub fn std_to_time_delta(value: &Duration, _: &ConversionSettings) -> Result<TimeDelta> {
    TimeDelta::from_std(*value).map_err(|_| BuiltinError::DurationOutOfRange {
        value: format!("{value:?}"),
        target_type: type_name::<TimeDelta>(),
    })
}

pub fn format_std_duration(value: &Duration, settings: &ConversionSettings) -> Result<String> {
    format_time_delta(&std_to_time_delta(value, settings)?, settings)
}

pub fn parse_std_duration(value: &String, settings: &ConversionSettings) -> Result<Duration> {
    time_delta_to_std(&parse_time_delta(value, settings)?, settings)
}

/// Register date-time and duration conversions.
pub fn register(table: &mut DefinitionTable) {
    table.register(format_naive);
    table.register(format_offset);
    table.register(format_utc);
    table.register(parse_naive);
    table.register(parse_offset);
    table.register(parse_utc);

    table.register(naive_to_offset);
    table.register(naive_to_utc);
    table.register(offset_to_naive);
    table.register(offset_to_utc);
    table.register(utc_to_naive);
    table.register(utc_to_offset);

    table.register(format_time_delta);
    table.register(parse_time_delta);
    table.register(format_std_duration);
    table.register(parse_std_duration);
    table.register(time_delta_to_std);
    table.register(std_to_time_delta);
}
