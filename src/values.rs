//! The value bundle attached to a session.

use std::collections::HashMap;

use crate::error::Error;

/// Heterogeneous key/value payload of one session.
///
/// Keys and values are opaque to the store; values may be any JSON-shaped
/// structure (strings, numbers, booleans, nested maps, sequences, null).
pub type Values = HashMap<String, serde_json::Value>;

/// Structural deep copy through a MessagePack encode/decode round trip.
///
/// The result is structurally equal to the input and shares no mutable
/// state with it, so mutations on either side stay invisible to the other.
pub(crate) fn deep_copy(values: &Values) -> Result<Values, Error> {
    let buf = rmp_serde::to_vec(values)?;
    Ok(rmp_serde::from_slice(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Values {
        let mut values = Values::new();
        values.insert(
            "user".to_string(),
            json!({"name": "foobar", "tags": ["a", "b"], "visits": 3}),
        );
        values.insert("flag".to_string(), json!(true));
        values.insert("nothing".to_string(), json!(null));
        values
    }

    #[test]
    fn test_copy_is_structurally_equal() {
        let values = sample();
        let copy = deep_copy(&values).unwrap();
        assert_eq!(copy, values);
    }

    #[test]
    fn test_copy_is_idempotent() {
        let values = sample();
        let once = deep_copy(&values).unwrap();
        let twice = deep_copy(&once).unwrap();
        assert_eq!(twice, values);
    }

    #[test]
    fn test_mutating_the_copy_leaves_the_source_untouched() {
        let values = sample();
        let mut copy = deep_copy(&values).unwrap();

        copy.get_mut("user").unwrap()["name"] = json!("changed");
        copy.get_mut("user").unwrap()["tags"][0] = json!("z");
        copy.insert("extra".to_string(), json!("new"));

        assert_eq!(values["user"]["name"], json!("foobar"));
        assert_eq!(values["user"]["tags"][0], json!("a"));
        assert!(!values.contains_key("extra"));
    }

    #[test]
    fn test_empty_bundle_copies() {
        let values = Values::new();
        let copy = deep_copy(&values).unwrap();
        assert!(copy.is_empty());
    }
}
