//! Step argument conversion engine
//!
//! Converts a captured step argument (step text or a data table) into a
//! value of the step parameter's declared type. Two strategies cooperate:
//!
//! - [`resolver`] - Picks a registered transformation whose return type and
//!   applicability pattern fit the value
//! - [`simple`] - Built-in conversion of scalar text: enums, identifiers,
//!   registered [`type_converter`]s and universal [`coerce`]ion
//!
//! Transformations win over primitive conversion. Their arguments are
//! either the pattern's capture groups, each converted recursively through
//! [`StepArgumentTypeConverter::convert`], or the original value.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use steparg_core::{
//!     InMemoryBindingRegistry, Locale, RuntimeType, StepArgumentConverter,
//!     StepArgumentTypeConverter, Value,
//! };
//!
//! let converter = StepArgumentTypeConverter::with_registry(Arc::new(InMemoryBindingRegistry::new()));
//! let value = converter
//!     .convert(Some(&Value::from("42")), &RuntimeType::I32.into(), &Locale::invariant())
//!     .unwrap();
//! assert_eq!(value, Value::I32(42));
//! ```
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

pub mod coerce;
pub mod resolver;
pub mod simple;
pub mod type_converter;


pub use simple::{can_convert_simple, convert_simple, convert_to_enum, parse_guid};
pub use type_converter::{ConverterRegistry, NullableConverter, TextConverter, TypeConverter};

use crate::bindings::{
    BindingInvoker, BindingRegistry, DirectInvoker, StepArgumentTransformationBinding,
};
use crate::locale::Locale;
use crate::tracer::{LogTracer, TestTracer};
use crate::types::{BindingType, Value};
use crate::{Error, Result};
use regex::Regex;
use std::sync::Arc;

/// Converts step arguments to the types step handlers declare
pub trait StepArgumentConverter: Send + Sync {
    /// Convert `value` to `target`
    fn convert(&self, value: Option<&Value>, target: &BindingType, locale: &Locale) -> Result<Value>;

    /// Whether `value` can be converted to `target`.
    ///
    /// Expected conversion misses are `Ok(false)`; contract violations are
    /// still returned as errors.
    fn can_convert(&self, value: Option<&Value>, target: &BindingType, locale: &Locale) -> Result<bool>;
}

/// Default step argument converter
///
/// Holds shared handles only, so one instance can serve concurrent
/// conversions as long as the registry is safe to read concurrently.
#[derive(Clone)]
pub struct StepArgumentTypeConverter {
    registry: Arc<dyn BindingRegistry>,
    invoker: Arc<dyn BindingInvoker>,
    tracer: Arc<dyn TestTracer>,
    converters: Arc<ConverterRegistry>,
}

impl StepArgumentTypeConverter {
    pub fn new(
        registry: Arc<dyn BindingRegistry>,
        invoker: Arc<dyn BindingInvoker>,
        tracer: Arc<dyn TestTracer>,
        converters: Arc<ConverterRegistry>,
    ) -> Self {
        Self {
            registry,
            invoker,
            tracer,
            converters,
        }
    }

    /// Converter that invokes handlers directly, logs warnings and uses only
    /// the built-in type converters
    pub fn with_registry(registry: Arc<dyn BindingRegistry>) -> Self {
        Self::new(
            registry,
            Arc::new(DirectInvoker),
            Arc::new(LogTracer),
            Arc::new(ConverterRegistry::new()),
        )
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// First transformation able to produce `target` from `value`.
    ///
    /// When several match and `trace_warning` is set, a warning naming the
    /// value and target goes to the tracer; the first match still wins.
    pub fn get_matching_step_transformation(
        &self,
        value: &Value,
        target: &BindingType,
        trace_warning: bool,
    ) -> Option<&StepArgumentTransformationBinding> {
        let matches =
            resolver::matching_transformations(self.registry.step_transformations(), value, target);

        if matches.len() > 1 && trace_warning {
            self.tracer.trace_warning(&format!(
                "Multiple step transformation matches to the input ({}, target type: {}). We use the first.",
                value, target
            ));
        }

        matches.into_iter().next()
    }

    fn do_transform(
        &self,
        binding: &StepArgumentTransformationBinding,
        value: &Value,
        locale: &Locale,
    ) -> Result<Value> {
        let arguments = match (binding.regex(), value) {
            (Some(regex), Value::String(text)) => {
                self.arguments_from_regex(binding, regex, text, locale)?
            }
            _ => vec![value.clone()],
        };

        self.invoker.invoke(binding, &arguments)
    }

    fn arguments_from_regex(
        &self,
        binding: &StepArgumentTransformationBinding,
        regex: &Regex,
        text: &str,
        locale: &Locale,
    ) -> Result<Vec<Value>> {
        let captures = regex
            .captures(text)
            .ok_or_else(|| Error::format_mismatch(text, binding.return_type()))?;

        captures
            .iter()
            .skip(1)
            .zip(binding.parameters())
            .map(|(group, parameter)| {
                let argument = Value::from(group.map_or("", |m| m.as_str()));
                self.convert(Some(&argument), &parameter.ty, locale)
            })
            .collect()
    }
}

impl StepArgumentConverter for StepArgumentTypeConverter {
    fn convert(&self, value: Option<&Value>, target: &BindingType, locale: &Locale) -> Result<Value> {
        let value = value.ok_or_else(|| Error::NullInput {
            argument: "value".to_string(),
        })?;

        if let Some(binding) = self.get_matching_step_transformation(value, target, true) {
            log::debug!(
                "Converting '{}' to {} with transformation '{}'",
                value,
                target,
                binding.name()
            );
            return self.do_transform(binding, value, locale);
        }

        if target.is_instance(value) {
            return Ok(value.clone());
        }

        convert_simple(target, value, locale, &self.converters)
    }

    fn can_convert(&self, value: Option<&Value>, target: &BindingType, locale: &Locale) -> Result<bool> {
        let value = value.ok_or_else(|| Error::NullInput {
            argument: "value".to_string(),
        })?;

        if self
            .get_matching_step_transformation(value, target, false)
            .is_some()
        {
            return Ok(true);
        }

        if target.is_instance(value) {
            return Ok(true);
        }

        can_convert_simple(target, value, locale, &self.converters)
    }
}

impl std::fmt::Debug for StepArgumentTypeConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepArgumentTypeConverter")
            .field("transformations", &self.registry.step_transformations().len())
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}
