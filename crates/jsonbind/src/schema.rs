//! JSON Schema export.
//!
//! Every binding exposes a schema of its own structure through
//! [`Bind::schema`]; this module only adds the document header. The output
//! follows the draft-04 flavor: `items` arrays for tuples, `required` name
//! lists, `additionalProperties: false` under `DISALLOW_UNKNOWN_KEY`.

use alloc::string::String;

use crate::{
    bind::Bind,
    value::{Map, Value},
};

const SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";

/// The JSON Schema describing `value`'s shape, with a `$schema` header.
///
/// # Examples
///
/// ```
/// let schema = jsonbind::export_schema(&Vec::<u8>::new());
/// assert_eq!(
///     schema.get("type"),
///     Some(&jsonbind::Value::String("array".into()))
/// );
/// ```
pub fn export_schema<T: Bind>(value: &T) -> Value {
    let mut map = match value.schema() {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert(String::from("value"), other);
            map
        }
    };
    map.insert(String::from("$schema"), Value::String(String::from(SCHEMA_URI)));
    Value::Object(map)
}
