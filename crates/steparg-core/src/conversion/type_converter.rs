//! Pluggable, locale-aware type converters
//!
//! The converter registry is consulted by the primitive converter after the
//! enum and identifier special cases. Optional types get a built-in
//! converter unless one was registered explicitly for them.
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

use super::simple;
use crate::locale::Locale;
use crate::types::{RuntimeType, Value};
use crate::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converter registered for a single target type
pub trait TypeConverter: Send + Sync {
    /// Whether this converter accepts values of `value`'s runtime type
    fn can_convert_from(&self, value: &Value) -> bool;

    /// Convert `value` to the converter's target type
    fn convert_from(&self, value: &Value, locale: &Locale) -> Result<Value>;
}

/// Function converting text to a value
pub type TextConvertFn = Arc<dyn Fn(&str, &Locale) -> Result<Value> + Send + Sync>;

/// Converter accepting textual values only
#[derive(Clone)]
pub struct TextConverter {
    convert: TextConvertFn,
}

impl TextConverter {
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&str, &Locale) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            convert: Arc::new(convert),
        }
    }
}

impl TypeConverter for TextConverter {
    fn can_convert_from(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn convert_from(&self, value: &Value, locale: &Locale) -> Result<Value> {
        match value {
            Value::String(s) => (self.convert)(s, locale),
            other => Err(crate::Error::invalid_cast(other.type_name(), "text converter")),
        }
    }
}

/// Converter for optional types: empty text is "no value", anything else
/// is converted to the underlying type
pub struct NullableConverter {
    underlying_type: RuntimeType,
    underlying: Option<Arc<dyn TypeConverter>>,
}

impl NullableConverter {
    pub fn new(underlying_type: RuntimeType, underlying: Option<Arc<dyn TypeConverter>>) -> Self {
        Self {
            underlying_type,
            underlying,
        }
    }
}

impl TypeConverter for NullableConverter {
    fn can_convert_from(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
            || self.underlying_type.is_instance(value)
            || self
                .underlying
                .as_ref()
                .is_some_and(|c| c.can_convert_from(value))
    }

    fn convert_from(&self, value: &Value, locale: &Locale) -> Result<Value> {
        if let Value::String(s) = value {
            if s.trim().is_empty() {
                return Ok(Value::Null);
            }
        }
        match &self.underlying {
            Some(converter) if converter.can_convert_from(value) => {
                converter.convert_from(value, locale)
            }
            _ => simple::convert_builtin(&self.underlying_type, value, locale),
        }
    }
}

/// Registry of type converters keyed by target type
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<RuntimeType, Arc<dyn TypeConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter` for `target`, replacing any earlier registration
    pub fn register(&mut self, target: RuntimeType, converter: Arc<dyn TypeConverter>) {
        log::debug!("Registering type converter for {}", target);
        self.converters.insert(target, converter);
    }

    /// Builder-style variant of [`ConverterRegistry::register`]
    pub fn with_converter<C>(mut self, target: RuntimeType, converter: C) -> Self
    where
        C: TypeConverter + 'static,
    {
        self.register(target, Arc::new(converter));
        self
    }

    /// Converter for `target`: an explicit registration, or the built-in
    /// converter for optional types
    pub fn converter_for(&self, target: &RuntimeType) -> Option<Arc<dyn TypeConverter>> {
        if let Some(converter) = self.converters.get(target) {
            return Some(Arc::clone(converter));
        }
        match target {
            RuntimeType::Nullable(inner) => Some(Arc::new(NullableConverter::new(
                (**inner).clone(),
                self.converter_for(inner),
            ))),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("targets", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}
