use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Comparison applied by a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Neq,
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Neq,
        Operator::Eq,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Wire name, as it appears in a request payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Neq => "neq",
            Operator::Eq => "eq",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
        }
    }

    /// Look up a wire name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
    }

    /// Substring, prefix and suffix tests. Only valid on text members.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// Relational comparisons that need an ordered member type.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte
        )
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        const NAMES: &[&str] = &[
            "neq", "eq", "lt", "lte", "gt", "gte", "contains", "startswith", "endswith",
        ];
        let name = String::deserialize(deserializer)?;
        Operator::from_name(&name).ok_or_else(|| D::Error::unknown_variant(&name, NAMES))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator as supplied by the caller.
///
/// Names outside the closed [`Operator`] set still deserialize so that a single
/// bad clause does not reject the whole payload; the compiler drops it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterOperator {
    Known(Operator),
    Unknown(String),
}

impl FilterOperator {
    pub fn known(&self) -> Option<Operator> {
        match self {
            FilterOperator::Known(op) => Some(*op),
            FilterOperator::Unknown(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FilterOperator::Known(op) => op.as_str(),
            FilterOperator::Unknown(name) => name,
        }
    }
}

impl From<Operator> for FilterOperator {
    fn from(op: Operator) -> Self {
        FilterOperator::Known(op)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
