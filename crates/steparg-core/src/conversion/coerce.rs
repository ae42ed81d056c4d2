//! Universal primitive coercion
//!
//! Last step of the primitive converter chain. Handles text to scalar
//! parsing with locale-aware numbers and dates, numeric widening and
//! narrowing with range checks, and scalar to text formatting. Any pairing
//! not listed here is an invalid cast.
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

use crate::locale::{DateOrder, Locale};
use crate::types::{RuntimeType, Value};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Change the representation of `value` to `target`
pub fn change_type(value: &Value, target: &RuntimeType, locale: &Locale) -> Result<Value> {
    if target.is_instance(value) {
        return Ok(value.clone());
    }
    if value.is_null() {
        return if target.accepts_null() {
            Ok(Value::Null)
        } else {
            Err(Error::invalid_cast("null", target))
        };
    }

    match target {
        RuntimeType::Nullable(inner) => change_type(value, inner, locale),
        RuntimeType::String => to_text(value, locale).map(Value::String),
        RuntimeType::Bool => to_bool(value, target),
        RuntimeType::Char => to_char(value, target),
        RuntimeType::DateTime => match value {
            Value::String(s) => parse_datetime(s, locale).map(Value::DateTime),
            other => Err(Error::invalid_cast(other.type_name(), target)),
        },
        ty if ty.is_integer() => to_integer(value, ty),
        ty if ty.is_float() => to_float(value, ty, locale),
        _ => Err(Error::invalid_cast(value.type_name(), target)),
    }
}

fn to_text(value: &Value, locale: &Locale) -> Result<String> {
    match value {
        Value::F32(n) => Ok(localize_decimal(n.to_string(), locale)),
        Value::F64(n) => Ok(localize_decimal(n.to_string(), locale)),
        Value::Table(_) | Value::Object(_) => Err(Error::invalid_cast(value.type_name(), "String")),
        other => Ok(other.to_string()),
    }
}

fn localize_decimal(text: String, locale: &Locale) -> String {
    match locale.decimal_separator() {
        '.' => text,
        sep => text.replace('.', &sep.to_string()),
    }
}

fn to_bool(value: &Value, target: &RuntimeType) -> Result<Value> {
    if let Value::String(s) = value {
        let trimmed = s.trim();
        return if trimmed.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(Error::format_mismatch(s, target))
        };
    }
    if let Some(n) = integer_of(value) {
        return Ok(Value::Bool(n != 0));
    }
    if let Some(f) = float_of(value) {
        return Ok(Value::Bool(f != 0.0));
    }
    Err(Error::invalid_cast(value.type_name(), target))
}

fn to_char(value: &Value, target: &RuntimeType) -> Result<Value> {
    if let Value::String(s) = value {
        let mut chars = s.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(Error::format_mismatch(s, target)),
        };
    }
    if let Some(n) = integer_of(value) {
        return u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| Error::overflow(n, target));
    }
    Err(Error::invalid_cast(value.type_name(), target))
}

fn to_integer(value: &Value, target: &RuntimeType) -> Result<Value> {
    let n = match value {
        Value::String(s) => parse_integer(s, target)?,
        Value::Bool(b) => i128::from(*b),
        Value::Char(c) => i128::from(u32::from(*c)),
        Value::Enum(e) => e.ordinal as i128,
        other => match (integer_of(other), float_of(other)) {
            (Some(n), _) => n,
            (None, Some(f)) => round_to_integer(f, target)?,
            _ => return Err(Error::invalid_cast(other.type_name(), target)),
        },
    };
    make_integer(n, target)
}

fn to_float(value: &Value, target: &RuntimeType, locale: &Locale) -> Result<Value> {
    let f = match value {
        Value::String(s) => parse_float(s, locale, target)?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        other => match (integer_of(other), float_of(other)) {
            (Some(n), _) => n as f64,
            (None, Some(f)) => f,
            _ => return Err(Error::invalid_cast(other.type_name(), target)),
        },
    };
    Ok(match target {
        RuntimeType::F32 => Value::F32(f as f32),
        _ => Value::F64(f),
    })
}

fn integer_of(value: &Value) -> Option<i128> {
    match value {
        Value::I8(n) => Some((*n).into()),
        Value::I16(n) => Some((*n).into()),
        Value::I32(n) => Some((*n).into()),
        Value::I64(n) => Some((*n).into()),
        Value::U8(n) => Some((*n).into()),
        Value::U16(n) => Some((*n).into()),
        Value::U32(n) => Some((*n).into()),
        Value::U64(n) => Some((*n).into()),
        _ => None,
    }
}

fn float_of(value: &Value) -> Option<f64> {
    match value {
        Value::F32(n) => Some((*n).into()),
        Value::F64(n) => Some(*n),
        _ => None,
    }
}

fn integer_bounds(target: &RuntimeType) -> (i128, i128) {
    match target {
        RuntimeType::I8 => (i8::MIN.into(), i8::MAX.into()),
        RuntimeType::I16 => (i16::MIN.into(), i16::MAX.into()),
        RuntimeType::I32 => (i32::MIN.into(), i32::MAX.into()),
        RuntimeType::U8 => (0, u8::MAX.into()),
        RuntimeType::U16 => (0, u16::MAX.into()),
        RuntimeType::U32 => (0, u32::MAX.into()),
        RuntimeType::U64 => (0, u64::MAX.into()),
        _ => (i64::MIN.into(), i64::MAX.into()),
    }
}

fn round_to_integer(f: f64, target: &RuntimeType) -> Result<i128> {
    let rounded = f.round_ties_even();
    let (min, max) = integer_bounds(target);
    if !rounded.is_finite() || rounded < min as f64 || rounded > max as f64 {
        return Err(Error::overflow(f, target));
    }
    Ok(rounded as i128)
}

fn make_integer(n: i128, target: &RuntimeType) -> Result<Value> {
    let overflow = |_| Error::overflow(n, target);
    let value = match target {
        RuntimeType::I8 => Value::I8(i8::try_from(n).map_err(overflow)?),
        RuntimeType::I16 => Value::I16(i16::try_from(n).map_err(overflow)?),
        RuntimeType::I32 => Value::I32(i32::try_from(n).map_err(overflow)?),
        RuntimeType::I64 => Value::I64(i64::try_from(n).map_err(overflow)?),
        RuntimeType::U8 => Value::U8(u8::try_from(n).map_err(overflow)?),
        RuntimeType::U16 => Value::U16(u16::try_from(n).map_err(overflow)?),
        RuntimeType::U32 => Value::U32(u32::try_from(n).map_err(overflow)?),
        RuntimeType::U64 => Value::U64(u64::try_from(n).map_err(overflow)?),
        other => return Err(Error::invalid_cast("integer", other)),
    };
    Ok(value)
}

/// Integer text: surrounding whitespace and one leading sign, digits only
pub(crate) fn parse_integer(text: &str, target: &RuntimeType) -> Result<i128> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::format_mismatch(text, target));
    }

    let mut n: i128 = 0;
    for b in digits.bytes() {
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(i128::from(b - b'0')))
            .ok_or_else(|| Error::overflow(text, target))?;
    }
    Ok(if negative { -n } else { n })
}

/// Floating point text using the locale's decimal and group separators
fn parse_float(text: &str, locale: &Locale, target: &RuntimeType) -> Result<f64> {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();
    match lowered.as_str() {
        "nan" => return Ok(f64::NAN),
        "infinity" | "+infinity" | "∞" => return Ok(f64::INFINITY),
        "-infinity" | "-∞" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    let decimal = locale.decimal_separator();
    let groups = locale.group_separators();
    let mut normalized = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c == decimal {
            normalized.push('.');
        } else if groups.contains(&c) {
            continue;
        } else if c.is_ascii_digit() || matches!(c, '+' | '-' | 'e' | 'E') {
            normalized.push(c);
        } else {
            return Err(Error::format_mismatch(text, target));
        }
    }
    if !normalized.bytes().any(|b| b.is_ascii_digit()) {
        return Err(Error::format_mismatch(text, target));
    }
    normalized
        .parse::<f64>()
        .map_err(|_| Error::format_mismatch(text, target))
}

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO-8601 text or the locale's short date and date-time forms
pub(crate) fn parse_datetime(text: &str, locale: &Locale) -> Result<NaiveDateTime> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    for format in ISO_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d.and_time(chrono::NaiveTime::MIN));
    }

    for sep in ['/', '.', '-'] {
        let date = match locale.date_order() {
            DateOrder::MonthDayYear => format!("%m{sep}%d{sep}%Y"),
            DateOrder::DayMonthYear => format!("%d{sep}%m{sep}%Y"),
            DateOrder::YearMonthDay => format!("%Y{sep}%m{sep}%d"),
        };
        for time in [" %H:%M:%S", " %H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, &format!("{date}{time}")) {
                return Ok(dt);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, &date) {
            return Ok(d.and_time(chrono::NaiveTime::MIN));
        }
    }

    Err(Error::format_mismatch(text, RuntimeType::DateTime))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant() -> Locale {
        Locale::invariant()
    }

    #[test]
    fn test_text_to_integers() {
        let l = invariant();
        assert_eq!(change_type(&"42".into(), &RuntimeType::I32, &l).unwrap(), Value::I32(42));
        assert_eq!(change_type(&" -7 ".into(), &RuntimeType::I64, &l).unwrap(), Value::I64(-7));
        assert_eq!(change_type(&"+255".into(), &RuntimeType::U8, &l).unwrap(), Value::U8(255));
    }

    #[test]
    fn test_integer_overflow_and_format() {
        let l = invariant();
        assert!(matches!(
            change_type(&"256".into(), &RuntimeType::U8, &l),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            change_type(&"-1".into(), &RuntimeType::U32, &l),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            change_type(&"99999999999999999999999999999999999999999".into(), &RuntimeType::I64, &l),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            change_type(&"1,000".into(), &RuntimeType::I32, &l),
            Err(Error::FormatMismatch { .. })
        ));
        assert!(matches!(
            change_type(&"".into(), &RuntimeType::I32, &l),
            Err(Error::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_floats_follow_locale() {
        let de = Locale::parse("de-DE").unwrap();
        assert_eq!(
            change_type(&"1.234,5".into(), &RuntimeType::F64, &de).unwrap(),
            Value::F64(1234.5)
        );
        assert_eq!(
            change_type(&"1,234.5".into(), &RuntimeType::F64, &invariant()).unwrap(),
            Value::F64(1234.5)
        );
        assert!(matches!(
            change_type(&"12abc".into(), &RuntimeType::F64, &invariant()),
            Err(Error::FormatMismatch { .. })
        ));
        assert!(matches!(
            change_type(&"inf".into(), &RuntimeType::F64, &invariant()),
            Err(Error::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_float_to_integer_rounds_half_to_even() {
        let l = invariant();
        assert_eq!(change_type(&Value::F64(2.5), &RuntimeType::I32, &l).unwrap(), Value::I32(2));
        assert_eq!(change_type(&Value::F64(3.5), &RuntimeType::I32, &l).unwrap(), Value::I32(4));
        assert!(matches!(
            change_type(&Value::F64(f64::NAN), &RuntimeType::I32, &l),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            change_type(&Value::F64(1e12), &RuntimeType::I32, &l),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_bool_and_char() {
        let l = invariant();
        assert_eq!(change_type(&"True".into(), &RuntimeType::Bool, &l).unwrap(), Value::Bool(true));
        assert_eq!(change_type(&" false".into(), &RuntimeType::Bool, &l).unwrap(), Value::Bool(false));
        assert!(matches!(
            change_type(&"yes".into(), &RuntimeType::Bool, &l),
            Err(Error::FormatMismatch { .. })
        ));
        assert_eq!(change_type(&Value::I32(0), &RuntimeType::Bool, &l).unwrap(), Value::Bool(false));
        assert_eq!(change_type(&"x".into(), &RuntimeType::Char, &l).unwrap(), Value::Char('x'));
        assert!(matches!(
            change_type(&"xy".into(), &RuntimeType::Char, &l),
            Err(Error::FormatMismatch { .. })
        ));
        assert!(matches!(
            change_type(&Value::Bool(true), &RuntimeType::Char, &l),
            Err(Error::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_to_text() {
        let de = Locale::parse("de-DE").unwrap();
        assert_eq!(
            change_type(&Value::F64(2.5), &RuntimeType::String, &de).unwrap(),
            Value::from("2,5")
        );
        assert_eq!(
            change_type(&Value::Bool(true), &RuntimeType::String, &de).unwrap(),
            Value::from("True")
        );
    }

    #[test]
    fn test_null_handling() {
        let l = invariant();
        assert_eq!(change_type(&Value::Null, &RuntimeType::String, &l).unwrap(), Value::Null);
        assert!(matches!(
            change_type(&Value::Null, &RuntimeType::I32, &l),
            Err(Error::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_unrelated_types_are_invalid_casts() {
        let l = invariant();
        assert!(matches!(
            change_type(&Value::Guid(uuid::Uuid::nil()), &RuntimeType::I32, &l),
            Err(Error::InvalidCast { .. })
        ));
        assert!(matches!(
            change_type(&Value::I32(1), &RuntimeType::Guid, &l),
            Err(Error::InvalidCast { .. })
        ));
    }

    #[test]
    fn test_dates() {
        let us = Locale::parse("en-US").unwrap();
        let gb = Locale::parse("en-GB").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_time(chrono::NaiveTime::MIN);

        assert_eq!(parse_datetime("3/4/2024", &us).unwrap(), expected);
        assert_eq!(parse_datetime("04/03/2024", &gb).unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-04", &gb).unwrap(), expected);
        assert_eq!(
            parse_datetime("2024-03-04T10:30:00", &us).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
        assert!(matches!(
            parse_datetime("tomorrow", &us),
            Err(Error::FormatMismatch { .. })
        ));
    }
}
