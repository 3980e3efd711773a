use alloc::string::ToString;

use crate::{
    Value, export_schema,
    tests::fixtures::{Priority, StrictPoint, Task},
};

#[test]
fn integer_schema_carries_bounds() {
    let schema = export_schema(&0u8);
    assert_eq!(schema.get("type"), Some(&Value::String("integer".to_string())));
    assert_eq!(schema.get("minimum"), Some(&Value::Uint(0)));
    assert_eq!(schema.get("maximum"), Some(&Value::Uint(255)));
}

#[test]
fn object_schema_lists_properties_and_required() {
    let schema = export_schema(&Task::default());
    assert_eq!(schema.get("type"), Some(&Value::String("object".to_string())));

    let properties = schema.get("properties").unwrap();
    assert!(properties.get("id").is_some());
    assert!(properties.get("due").is_some());

    // Only the non-optional members are required, in declaration order.
    assert_eq!(
        schema.get("required"),
        Some(&Value::Array(alloc::vec![
            Value::String("id".to_string()),
            Value::String("title".to_string()),
        ]))
    );
}

#[test]
fn strict_object_forbids_additional_properties() {
    let schema = export_schema(&StrictPoint::default());
    assert_eq!(schema.get("additionalProperties"), Some(&Value::Bool(false)));
}

#[test]
fn enum_schema_lists_names_in_authored_order() {
    let schema = export_schema(&Priority::Low);
    assert_eq!(schema.get("type"), Some(&Value::String("string".to_string())));
    assert_eq!(
        schema.get("enum"),
        Some(&Value::Array(alloc::vec![
            Value::String("low".to_string()),
            Value::String("mid".to_string()),
            Value::String("high".to_string()),
        ]))
    );
}

#[test]
fn nullable_schema_allows_null() {
    let schema = export_schema(&Option::<u32>::None);
    let any_of = schema.get("anyOf").unwrap();
    let Value::Array(options) = any_of else {
        panic!("anyOf should be an array");
    };
    assert_eq!(options.len(), 2);
    assert_eq!(
        options[0].get("type"),
        Some(&Value::String("null".to_string()))
    );
}

#[test]
fn full_document_snapshot() {
    let schema = export_schema(&StrictPoint::default());
    insta::assert_snapshot!(schema.to_string(), @r###"{"$schema":"http://json-schema.org/draft-04/schema#","additionalProperties":false,"properties":{"x":{"maximum":2147483647,"minimum":-2147483648,"type":"integer"},"y":{"maximum":2147483647,"minimum":-2147483648,"type":"integer"}},"required":["x","y"],"type":"object"}"###);
}
