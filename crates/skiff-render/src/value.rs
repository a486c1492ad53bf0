use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::collections::HashMap;

/// Key type for prop maps and view-type names. Short keys stay inline.
pub type PropKey = SmartString<LazyCompact>;

/// A prop delta as shipped by the upstream layer: key → value.
pub type PropMap = HashMap<PropKey, PropValue>;

/// Self-describing value tree for props and method arguments.
///
/// The untagged serde representation means a JSON prop map like
/// `{"text": "hi", "opacity": 0.5, "hidden": false}` deserializes directly.
/// The variant order matters for untagged deserialization: `Bool` before the
/// numeric variants, `Int` before `Double`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(SmartString<LazyCompact>),
    Array(Vec<PropValue>),
    Object(HashMap<PropKey, PropValue>),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Int(n) => Some(*n as f64),
            PropValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Event-listener props use truthiness to mean "registered".
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Int(n) => *n != 0,
            PropValue::Double(n) => *n != 0.0,
            PropValue::Str(s) => !s.is_empty(),
            PropValue::Array(_) | PropValue::Object(_) => true,
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Double(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.into())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!PropValue::Null.is_truthy());
        assert!(!PropValue::Bool(false).is_truthy());
        assert!(!PropValue::Int(0).is_truthy());
        assert!(!PropValue::Str("".into()).is_truthy());
        assert!(PropValue::Bool(true).is_truthy());
        assert!(PropValue::Int(-1).is_truthy());
        assert!(PropValue::Str("x".into()).is_truthy());
        assert!(PropValue::Array(vec![]).is_truthy());
    }

    #[test]
    fn test_json_prop_map_roundtrip() {
        let json = r#"{"text":"hi","opacity":0.5,"hidden":false,"count":3,"extra":null}"#;
        let map: PropMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.get("text"), Some(&PropValue::Str("hi".into())));
        assert_eq!(map.get("opacity"), Some(&PropValue::Double(0.5)));
        assert_eq!(map.get("hidden"), Some(&PropValue::Bool(false)));
        assert_eq!(map.get("count"), Some(&PropValue::Int(3)));
        assert_eq!(map.get("extra"), Some(&PropValue::Null));

        let back = serde_json::to_string(&map).unwrap();
        let reparsed: PropMap = serde_json::from_str(&back).unwrap();
        assert_eq!(map, reparsed);
    }

    #[test]
    fn test_nested_values_deserialize() {
        let json = r#"{"style":{"margin":[1,2,3,4]}}"#;
        let map: PropMap = serde_json::from_str(json).unwrap();
        match map.get("style") {
            Some(PropValue::Object(style)) => match style.get("margin") {
                Some(PropValue::Array(items)) => assert_eq!(items.len(), 4),
                other => panic!("expected array, got {:?}", other),
            },
            other => panic!("expected object, got {:?}", other),
        }
    }
}
