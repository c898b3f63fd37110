use std::fmt;

use serde::{Deserialize, Serialize};

/// Untyped scalar supplied by the caller for a filter clause.
///
/// Conversion into the member's type happens when the clause is compiled,
/// never here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Short type label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Bool(_) => "bool",
            FilterValue::Int(_) => "int",
            FilterValue::Float(_) => "float",
            FilterValue::String(_) => "string",
        }
    }
}

/// String form of the value, used by the text operators.
impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("null"),
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Int(i) => write!(f, "{i}"),
            FilterValue::Float(x) => write!(f, "{x}"),
            FilterValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<i32> for FilterValue {
    fn from(i: i32) -> Self {
        FilterValue::Int(i64::from(i))
    }
}

impl From<f64> for FilterValue {
    fn from(x: f64) -> Self {
        FilterValue::Float(x)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FilterValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scalars_pick_the_narrowest_variant() {
        let values: Vec<FilterValue> =
            serde_json::from_str(r#"[null, true, 42, 4.5, "abc", -7, 3.0]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FilterValue::Null,
                FilterValue::Bool(true),
                FilterValue::Int(42),
                FilterValue::Float(4.5),
                FilterValue::String("abc".into()),
                FilterValue::Int(-7),
                FilterValue::Float(3.0),
            ]
        );
    }

    #[test]
    fn display_is_the_plain_string_form() {
        assert_eq!(FilterValue::from("Austin").to_string(), "Austin");
        assert_eq!(FilterValue::from(12).to_string(), "12");
        assert_eq!(FilterValue::from(true).to_string(), "true");
    }

    #[test]
    fn option_none_becomes_null() {
        assert!(FilterValue::from(None::<i64>).is_null());
        assert_eq!(FilterValue::from(Some(3_i64)), FilterValue::Int(3));
    }
}
