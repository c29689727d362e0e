//! Total coercions from loosely typed request values.
//!
//! Every function accepts the raw field (absent when the caller did not send
//! it) and falls back to a documented default instead of failing.

use catalog_db::ObjectId;
use serde_json::Value;

/// The string itself; anything else, including absence, is `""`.
pub fn get_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// JSON booleans and the strings `"true"`/`"false"`; `default` otherwise.
pub fn get_bool_or(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s == "true" => true,
        Some(Value::String(s)) if s == "false" => false,
        _ => default,
    }
}

/// String members of an array, first occurrence kept. Non-arrays give an
/// empty set and non-string members are skipped.
pub fn get_string_set(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut set: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if let Value::String(s) = item {
            if !set.contains(s) {
                set.push(s.clone());
            }
        }
    }
    set
}

/// Parsed identifier when `value` is a well-formed one.
pub fn get_object_id(value: Option<&str>) -> Option<ObjectId> {
    value.and_then(|raw| ObjectId::parse(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_default_to_empty() {
        assert_eq!(get_string(Some(&json!("hello"))), "hello");
        assert_eq!(get_string(Some(&json!(12))), "");
        assert_eq!(get_string(Some(&Value::Null)), "");
        assert_eq!(get_string(None), "");
    }

    #[test]
    fn booleans_accept_string_forms() {
        assert!(!get_bool_or(Some(&json!(false)), true));
        assert!(!get_bool_or(Some(&json!("false")), true));
        assert!(get_bool_or(Some(&json!("true")), false));
        assert!(get_bool_or(Some(&json!("yes")), true));
        assert!(get_bool_or(Some(&json!(0)), true));
        assert!(!get_bool_or(None, false));
    }

    #[test]
    fn string_sets_dedupe_in_order() {
        let tags = get_string_set(Some(&json!(["b", "a", "b", 3, "c"])));
        assert_eq!(tags, vec!["b", "a", "c"]);
        assert!(get_string_set(Some(&json!("a,b"))).is_empty());
        assert!(get_string_set(None).is_empty());
    }

    #[test]
    fn object_ids_only_when_valid() {
        assert!(get_object_id(Some("5f1b2c3d4e5f60718293a4b5")).is_some());
        assert!(get_object_id(Some("5f1b")).is_none());
        assert!(get_object_id(None).is_none());
    }
}
