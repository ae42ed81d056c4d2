//! Selection of step argument transformations
//!
//! Copyright (c) 2025 Steparg Team
//! Licensed under the Apache-2.0 license

use crate::bindings::StepArgumentTransformationBinding;
use crate::types::{BindingType, Value};

/// Whether `binding` can produce `target` from `value`.
///
/// The return type must equal the target exactly. A binding with a pattern
/// only applies to text its pattern matches. A binding without a pattern is
/// a table transformation when its first parameter is a table, and then
/// only applies to tables; otherwise it only applies to non-table values.
pub fn is_applicable(
    binding: &StepArgumentTransformationBinding,
    value: &Value,
    target: &BindingType,
) -> bool {
    if !binding.return_type().type_equals(target) {
        return false;
    }

    if let Some(regex) = binding.regex() {
        return match value {
            Value::String(text) => regex.is_match(text),
            _ => false,
        };
    }

    binding.is_table_transformation() == value.is_table()
}

/// Every applicable binding, in registry order
pub fn matching_transformations<'r>(
    transformations: &'r [StepArgumentTransformationBinding],
    value: &Value,
    target: &BindingType,
) -> Vec<&'r StepArgumentTransformationBinding> {
    transformations
        .iter()
        .filter(|binding| is_applicable(binding, value, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::StepTransformationBuilder;
    use crate::types::{RuntimeType, Table};

    fn range_type() -> BindingType {
        BindingType::Runtime(RuntimeType::Object("Range".into()))
    }

    fn pattern_binding() -> StepArgumentTransformationBinding {
        StepTransformationBuilder::new("range", range_type())
            .regex(r"(\d+)-(\d+)")
            .parameter("from", RuntimeType::I32)
            .parameter("to", RuntimeType::I32)
            .handler(|_| Ok(Value::Null))
            .build()
            .unwrap()
    }

    fn table_binding() -> StepArgumentTransformationBinding {
        StepTransformationBuilder::new("range table", range_type())
            .parameter("table", RuntimeType::Table)
            .handler(|_| Ok(Value::Null))
            .build()
            .unwrap()
    }

    fn scalar_binding() -> StepArgumentTransformationBinding {
        StepTransformationBuilder::new("range text", range_type())
            .parameter("text", RuntimeType::String)
            .handler(|_| Ok(Value::Null))
            .build()
            .unwrap()
    }

    fn table() -> Value {
        Value::Table(Table::new(["from", "to"]).unwrap())
    }

    #[test]
    fn test_return_type_must_match_exactly() {
        let other = BindingType::Runtime(RuntimeType::Object("Span".into()));
        assert!(!is_applicable(&pattern_binding(), &Value::from("1-2"), &other));
        assert!(!is_applicable(
            &pattern_binding(),
            &Value::from("1-2"),
            &BindingType::Named("Range".into())
        ));
    }

    #[test]
    fn test_pattern_bindings_apply_to_matching_text_only() {
        let binding = pattern_binding();
        assert!(is_applicable(&binding, &Value::from("12-34"), &range_type()));
        assert!(!is_applicable(&binding, &Value::from("12 to 34"), &range_type()));
        assert!(!is_applicable(&binding, &table(), &range_type()));
        assert!(!is_applicable(&binding, &Value::I32(12), &range_type()));
    }

    #[test]
    fn test_table_classification() {
        assert!(is_applicable(&table_binding(), &table(), &range_type()));
        assert!(!is_applicable(&table_binding(), &Value::from("1-2"), &range_type()));
        assert!(is_applicable(&scalar_binding(), &Value::from("anything"), &range_type()));
        assert!(!is_applicable(&scalar_binding(), &table(), &range_type()));
    }

    #[test]
    fn test_matches_keep_registry_order() {
        let bindings = vec![table_binding(), scalar_binding(), pattern_binding()];
        let names: Vec<_> = matching_transformations(&bindings, &Value::from("5-6"), &range_type())
            .into_iter()
            .map(|b| b.name())
            .collect();
        assert_eq!(names, ["range text", "range"]);
    }
}
