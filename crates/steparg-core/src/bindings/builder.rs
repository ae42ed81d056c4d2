//! Builder for step argument transformation bindings
//!
//! Patterns are anchored on both ends so that a transformation only applies
//! when it accounts for the whole argument text.
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

use super::{BindingParameter, StepArgumentTransformationBinding, TransformHandler};
use crate::types::{BindingType, Value};
use crate::{Error, Result};
use regex::Regex;
use std::sync::Arc;

/// Builder for creating transformation bindings
pub struct StepTransformationBuilder {
    name: String,
    return_type: BindingType,
    pattern: Option<String>,
    parameters: Vec<BindingParameter>,
    handler: Option<TransformHandler>,
}

impl StepTransformationBuilder {
    /// Create a new binding builder
    pub fn new(name: impl Into<String>, return_type: impl Into<BindingType>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            pattern: None,
            parameters: Vec::new(),
            handler: None,
        }
    }

    /// Set the applicability pattern
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Declare the next parameter
    pub fn parameter(mut self, name: impl Into<String>, ty: impl Into<BindingType>) -> Self {
        self.parameters.push(BindingParameter::new(name, ty));
        self
    }

    /// Set the function run when the binding is applied
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Build the binding
    pub fn build(self) -> Result<StepArgumentTransformationBinding> {
        let handler = self.handler.ok_or_else(|| {
            Error::configuration("a transformation handler is required", Some(&self.name))
        })?;

        let regex = match &self.pattern {
            Some(pattern) => {
                let regex = compile_anchored(pattern).map_err(|e| {
                    Error::configuration(
                        format!("invalid transformation pattern '{}': {}", pattern, e),
                        Some(&self.name),
                    )
                })?;
                let groups = regex.captures_len() - 1;
                if groups != self.parameters.len() {
                    return Err(Error::configuration(
                        format!(
                            "pattern '{}' has {} capture groups but {} parameters are declared",
                            pattern,
                            groups,
                            self.parameters.len()
                        ),
                        Some(&self.name),
                    ));
                }
                Some(regex)
            }
            None => None,
        };

        Ok(StepArgumentTransformationBinding {
            name: self.name,
            return_type: self.return_type,
            regex,
            parameters: self.parameters,
            handler,
        })
    }
}

/// Wrap the pattern as `^(?:...)$` so alternations cannot escape the anchors
fn compile_anchored(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let body = pattern.strip_prefix('^').unwrap_or(pattern);
    let body = match body.strip_suffix('$') {
        Some(rest) if !ends_with_escape(rest) => rest,
        _ => body,
    };
    Regex::new(&format!("^(?:{})$", body))
}

/// Whether the text ends in an odd run of backslashes, escaping what follows
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuntimeType;

    fn noop(_: &[Value]) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }

    #[test]
    fn test_pattern_is_anchored() {
        let binding = StepTransformationBuilder::new("days", RuntimeType::I32)
            .regex(r"(\d+) days")
            .parameter("n", RuntimeType::I32)
            .handler(noop)
            .build()
            .unwrap();

        let regex = binding.regex().unwrap();
        assert_eq!(regex.as_str(), r"^(?:(\d+) days)$");
        assert!(regex.is_match("3 days"));
        assert!(!regex.is_match("in 3 days"));
    }

    #[test]
    fn test_existing_anchors_kept() {
        let binding = StepTransformationBuilder::new("any", RuntimeType::String)
            .regex("^.*$")
            .handler(noop)
            .build()
            .unwrap();
        assert_eq!(binding.regex().unwrap().as_str(), "^(?:.*)$");
    }

    #[test]
    fn test_alternation_stays_inside_anchors() {
        let binding = StepTransformationBuilder::new("answer", RuntimeType::Bool)
            .regex("yes|no")
            .handler(noop)
            .build()
            .unwrap();

        let regex = binding.regex().unwrap();
        assert!(regex.is_match("yes"));
        assert!(regex.is_match("no"));
        assert!(!regex.is_match("yesterday"));
        assert!(!regex.is_match("piano"));
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        let binding = StepTransformationBuilder::new("price", RuntimeType::String)
            .regex(r"(\d+)\$")
            .parameter("amount", RuntimeType::String)
            .handler(noop)
            .build()
            .unwrap();

        let regex = binding.regex().unwrap();
        assert!(regex.is_match("12$"));
        assert!(!regex.is_match("12"));
    }

    #[test]
    fn test_missing_handler() {
        let err = StepTransformationBuilder::new("t", RuntimeType::I32)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { binding: Some(ref b), .. } if b == "t"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = StepTransformationBuilder::new("t", RuntimeType::I32)
            .regex("(unclosed")
            .handler(noop)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_group_count_must_match_parameters() {
        let err = StepTransformationBuilder::new("range", RuntimeType::Object("Range".into()))
            .regex(r"(\d+)-(\d+)")
            .parameter("from", RuntimeType::I32)
            .handler(noop)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("2 capture groups but 1 parameters"));
    }

    #[test]
    fn test_table_transformation_detection() {
        let table = StepTransformationBuilder::new("people", RuntimeType::Object("People".into()))
            .parameter("table", RuntimeType::Table)
            .handler(noop)
            .build()
            .unwrap();
        assert!(table.is_table_transformation());

        let scalar = StepTransformationBuilder::new("name", RuntimeType::Object("Name".into()))
            .parameter("text", RuntimeType::String)
            .handler(noop)
            .build()
            .unwrap();
        assert!(!scalar.is_table_transformation());
    }
}
