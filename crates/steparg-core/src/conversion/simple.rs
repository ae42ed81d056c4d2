//! Primitive conversion of step arguments
//!
//! Used when no transformation applies and the value is not already of the
//! target type. Strategies are tried in a fixed order: enum parsing,
//! identifier parsing, a registered type converter, and finally universal
//! coercion. The enum and identifier cases deliberately run before any
//! registered converter for the same type.
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

use super::coerce;
use super::type_converter::ConverterRegistry;
use crate::locale::Locale;
use crate::types::{BindingType, EnumType, RuntimeType, Value};
use crate::{Error, Result};
use uuid::Uuid;

/// Convert `value` to `target` without consulting transformations
pub fn convert_simple(
    target: &BindingType,
    value: &Value,
    locale: &Locale,
    converters: &ConverterRegistry,
) -> Result<Value> {
    let runtime_type = target.as_runtime().ok_or_else(|| Error::UnsupportedTargetKind {
        target: target.to_string(),
    })?;
    convert_runtime(runtime_type, value, locale, Some(converters))
}

/// Whether [`convert_simple`] would succeed.
///
/// Conversion misses become `Ok(false)`; contract violations such as a
/// non-runtime target are returned as errors.
pub fn can_convert_simple(
    target: &BindingType,
    value: &Value,
    locale: &Locale,
    converters: &ConverterRegistry,
) -> Result<bool> {
    match convert_simple(target, value, locale, converters) {
        Ok(_) => Ok(true),
        Err(e) if e.is_conversion_miss() => {
            log::trace!("'{}' cannot be converted to {}: {}", value, target, e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Primitive conversion without registered converters
pub(crate) fn convert_builtin(target: &RuntimeType, value: &Value, locale: &Locale) -> Result<Value> {
    convert_runtime(target, value, locale, None)
}

fn convert_runtime(
    target: &RuntimeType,
    value: &Value,
    locale: &Locale,
    converters: Option<&ConverterRegistry>,
) -> Result<Value> {
    if let (RuntimeType::Enum(enum_type), Value::String(text)) = (target, value) {
        return convert_to_enum(enum_type, text);
    }

    let optional_guid = matches!(target, RuntimeType::Nullable(inner) if **inner == RuntimeType::Guid);
    if optional_guid && value.as_str().map_or(true, str::is_empty) {
        return Ok(Value::Null);
    }

    if optional_guid || *target == RuntimeType::Guid {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return parse_guid(&text).map(Value::Guid);
    }

    if let Some(converted) = converters.and_then(|c| try_convert_with_type_converter(c, target, value, locale)) {
        return Ok(converted);
    }

    coerce::change_type(value, target, locale)
}

fn try_convert_with_type_converter(
    converters: &ConverterRegistry,
    target: &RuntimeType,
    value: &Value,
    locale: &Locale,
) -> Option<Value> {
    let converter = converters.converter_for(target)?;
    if !converter.can_convert_from(value) {
        return None;
    }
    match converter.convert_from(value, locale) {
        Ok(converted) => Some(converted),
        Err(e) => {
            log::debug!(
                "Type converter for {} rejected '{}', falling back to coercion: {}",
                target,
                value,
                e
            );
            None
        }
    }
}

/// Parse `text` as a member of `enum_type`, ignoring whitespace and case.
///
/// Text consisting of digits selects the member at that ordinal.
pub fn convert_to_enum(enum_type: &EnumType, text: &str) -> Result<Value> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let wanted = compact.to_lowercase();

    let by_name = enum_type
        .members
        .iter()
        .position(|member| member.to_lowercase() == wanted);
    let by_ordinal = || {
        compact
            .parse::<usize>()
            .ok()
            .filter(|_| compact.bytes().all(|b| b.is_ascii_digit()))
    };

    by_name
        .or_else(by_ordinal)
        .and_then(|ordinal| enum_type.value_at(ordinal))
        .ok_or_else(|| Error::NoMatchingEnumMember {
            value: text.to_string(),
            enum_name: enum_type.name.clone(),
            members: enum_type.members.clone(),
        })
}

/// Parse a unique identifier in hyphenated, simple, braced, parenthesised
/// or URN form
pub fn parse_guid(text: &str) -> Result<Uuid> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);
    Uuid::parse_str(inner).map_err(|_| Error::MalformedIdentifier {
        value: text.to_string(),
    })
}
