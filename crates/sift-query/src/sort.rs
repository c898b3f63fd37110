use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Accepts `asc` / `desc` in any case, or their ordinals 0 / 1.
impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DirectionVisitor)
    }
}

struct DirectionVisitor;

impl Visitor<'_> for DirectionVisitor {
    type Value = SortDirection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`asc` or `desc`")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SortDirection, E> {
        if v.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if v.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(E::unknown_variant(v, &["asc", "desc"]))
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SortDirection, E> {
        match v {
            0 => Ok(SortDirection::Asc),
            1 => Ok(SortDirection::Desc),
            _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
        }
    }
}

/// One sort directive against an external field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    pub field: String,
    #[serde(default)]
    pub dir: SortDirection,
}

impl SortClause {
    pub fn new(field: impl Into<String>, dir: SortDirection) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}
