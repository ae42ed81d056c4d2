//! End-to-end conversion tests through the public API


use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use steparg_core::{
    BindingType, ConverterRegistry, DirectInvoker, Error, InMemoryBindingRegistry, Locale,
    MemoryTracer, RuntimeType, StepArgumentConverter, StepArgumentTypeConverter, Table,
    TextConverter, Value,
};
use test_support::*;
use uuid::Uuid;

fn runtime(ty: RuntimeType) -> BindingType {
    BindingType::Runtime(ty)
}

#[test]
fn test_enum_conversion_ignores_case_and_spaces() {
    let converter = plain_converter();
    let target = runtime(RuntimeType::Enum(direction()));
    let expected = direction().value_at(1).unwrap();

    for text in ["North West", "northwest", "North  West"] {
        let value = converter
            .convert(Some(&text.into()), &target, &Locale::invariant())
            .unwrap();
        assert_eq!(value, expected, "{text}");
    }

    assert!(matches!(
        converter.convert(Some(&"North East".into()), &target, &Locale::invariant()),
        Err(Error::NoMatchingEnumMember { .. })
    ));
}

#[test]
fn test_identifier_conversion() {
    let converter = plain_converter();
    let l = Locale::invariant();
    let optional = runtime(RuntimeType::nullable(RuntimeType::Guid));
    let required = runtime(RuntimeType::Guid);

    assert_eq!(converter.convert(Some(&"".into()), &optional, &l).unwrap(), Value::Null);
    assert!(matches!(
        converter.convert(Some(&"".into()), &required, &l),
        Err(Error::MalformedIdentifier { .. })
    ));

    let id = Uuid::new_v4();
    assert_eq!(
        converter.convert(Some(&id.to_string().into()), &required, &l).unwrap(),
        Value::Guid(id)
    );
    assert_eq!(
        converter.convert(Some(&id.to_string().into()), &optional, &l).unwrap(),
        Value::Guid(id)
    );
    assert!(!converter.can_convert(Some(&"not-a-guid".into()), &required, &l).unwrap());
}

#[test]
fn test_locale_sensitive_numbers() {
    let converter = plain_converter();
    let de = Locale::parse("de-DE").unwrap();
    let fr = Locale::parse("fr-FR").unwrap();

    assert_eq!(
        converter
            .convert(Some(&"3,75".into()), &runtime(RuntimeType::F64), &de)
            .unwrap(),
        Value::F64(3.75)
    );
    assert_eq!(
        converter
            .convert(Some(&"1\u{a0}250,5".into()), &runtime(RuntimeType::F64), &fr)
            .unwrap(),
        Value::F64(1250.5)
    );
    assert_eq!(
        converter
            .convert(Some(&"3.75".into()), &runtime(RuntimeType::F64), &Locale::invariant())
            .unwrap(),
        Value::F64(3.75)
    );
}

#[test]
fn test_dates_follow_locale_order() {
    let converter = plain_converter();
    let target = runtime(RuntimeType::DateTime);
    let expected = Value::DateTime(
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    );

    let us = Locale::parse("en-US").unwrap();
    let de = Locale::parse("de-DE").unwrap();
    assert_eq!(converter.convert(Some(&"1/2/2025".into()), &target, &us).unwrap(), expected);
    assert_eq!(converter.convert(Some(&"02.01.2025".into()), &target, &de).unwrap(), expected);
}

#[test]
fn test_pattern_transformation_with_converted_arguments() {
    let (converter, tracer) = converter(InMemoryBindingRegistry::new().with_transformation(days_transformation()));

    let duration = converter
        .convert(Some(&"3 days".into()), &object_type("Duration"), &Locale::invariant())
        .unwrap();
    assert_eq!(duration, Value::object("Duration", json!({ "hours": 72 })));
    assert!(tracer.warnings().is_empty());

    assert!(converter
        .can_convert(Some(&"1 day".into()), &object_type("Duration"), &Locale::invariant())
        .unwrap());
    assert!(!converter
        .can_convert(Some(&"soon".into()), &object_type("Duration"), &Locale::invariant())
        .unwrap());
}

#[test]
fn test_table_transformation() {
    let (converter, _) = converter(
        InMemoryBindingRegistry::new()
            .with_transformation(days_transformation())
            .with_transformation(people_transformation()),
    );
    let table = Table::new(["name", "age"])
        .unwrap()
        .with_row(["Ann", "31"])
        .unwrap();

    let people = converter
        .convert(Some(&Value::Table(table)), &object_type("People"), &Locale::invariant())
        .unwrap();
    assert_eq!(
        people,
        Value::object("People", json!([{ "name": "Ann", "age": "31" }]))
    );
}

#[test]
fn test_table_to_table_is_identity() {
    let converter = plain_converter();
    let table = Value::Table(Table::new(["a"]).unwrap());
    assert_eq!(
        converter
            .convert(Some(&table), &runtime(RuntimeType::Table), &Locale::invariant())
            .unwrap(),
        table
    );
}

#[test]
fn test_ambiguity_is_deterministic() {
    let (converter, tracer) = converter(
        InMemoryBindingRegistry::new()
            .with_transformation(days_transformation())
            .with_transformation(
                steparg_core::StepTransformationBuilder::new("any duration", object_type("Duration"))
                    .parameter("text", RuntimeType::String)
                    .handler(|_| Ok(Value::object("Duration", json!({ "hours": 0 }))))
                    .build()
                    .unwrap(),
            ),
    );

    let results: Vec<_> = (0..5)
        .map(|_| {
            converter
                .convert(Some(&"2 days".into()), &object_type("Duration"), &Locale::invariant())
                .unwrap()
        })
        .collect();

    assert!(results
        .iter()
        .all(|r| *r == Value::object("Duration", json!({ "hours": 48 }))));
    assert_eq!(tracer.warnings().len(), 5);
    assert!(tracer.warnings()[0].contains("2 days"));
    assert!(tracer.warnings()[0].contains("Duration"));
}

#[test]
fn test_custom_type_converter_for_domain_type() {
    let converters = ConverterRegistry::new().with_converter(
        RuntimeType::Object("Percentage".into()),
        TextConverter::new(|text, locale| {
            let number = text.trim().trim_end_matches('%');
            let value = steparg_core::convert_simple(
                &RuntimeType::F64.into(),
                &number.into(),
                locale,
                &ConverterRegistry::new(),
            )?;
            Ok(Value::object("Percentage", value.to_json()))
        }),
    );
    let converter = StepArgumentTypeConverter::new(
        Arc::new(InMemoryBindingRegistry::new()),
        Arc::new(DirectInvoker),
        Arc::new(MemoryTracer::new()),
        Arc::new(converters),
    );

    let de = Locale::parse("de-DE").unwrap();
    assert_eq!(
        converter
            .convert(Some(&"12,5%".into()), &object_type("Percentage"), &de)
            .unwrap(),
        Value::object("Percentage", json!(12.5))
    );
    assert!(!converter
        .can_convert(Some(&"lots".into()), &object_type("Percentage"), &de)
        .unwrap());
}

#[test]
fn test_numeric_values_are_widened_and_narrowed() {
    let converter = plain_converter();
    let l = Locale::invariant();

    assert_eq!(
        converter
            .convert(Some(&Value::I32(7)), &runtime(RuntimeType::I64), &l)
            .unwrap(),
        Value::I64(7)
    );
    assert!(matches!(
        converter.convert(Some(&Value::I64(70_000)), &runtime(RuntimeType::I16), &l),
        Err(Error::Overflow { .. })
    ));
    assert!(!converter
        .can_convert(Some(&Value::I64(70_000)), &runtime(RuntimeType::I16), &l)
        .unwrap());
}
