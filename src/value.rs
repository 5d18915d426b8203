//! The wire value type shared by parameters, return values and error records.
//!
//! The spec assumes a JSON-equivalent wire codec; rather than invent a bespoke
//! tagged value type, this crate reuses [`serde_json::Value`] directly, which
//! already has the right shape (null / bool / number / string / array /
//! object) and composes with whatever codec a transport chooses to layer on
//! top (JSON, CBOR-as-JSON-model, msgpack via `rmp-serde`'s `Value`, ...).

/// Alias for the dynamically typed value carried across the wire.
pub type Value = serde_json::Value;

/// Maps a [`Value`] to the primitive-category tag the spec's `IParameter.type`
/// field carries. This string is preserved for debugging only — callees never
/// coerce parameters by it (see `IParameter` in [`crate::invoke`]).
///
/// `Value::Null` maps to `"object"` rather than `"undefined"`: the source
/// runtime's `typeof null === "object"`, and there is no JSON representation
/// of a true `undefined`, so a literal JSON `null` is the closest analogue.
pub fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "object",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_match_js_typeof_conventions() {
        assert_eq!(type_tag(&Value::Null), "object");
        assert_eq!(type_tag(&json!(true)), "boolean");
        assert_eq!(type_tag(&json!(42)), "number");
        assert_eq!(type_tag(&json!("x")), "string");
        assert_eq!(type_tag(&json!([1, 2])), "object");
        assert_eq!(type_tag(&json!({"a": 1})), "object");
    }
}
