use std::str::FromStr;

use crate::filter::FilterClause;
use crate::query::QueryOptions;
use crate::sort::SortClause;

/// Payload could not be read as query options.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty payload")]
    Empty,

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON options document:
///
/// ```json
/// { "skip": 0, "take": 20,
///   "filter": [{ "field": "city", "operator": "eq", "value": "Austin" }],
///   "sort": [{ "field": "placed", "dir": "desc" }] }
/// ```
///
/// Plain JSON only; no type discriminators are read or expected. Missing
/// sequences are empty and missing numbers are zero.
pub fn parse_options(payload: &str) -> Result<QueryOptions, ParseError> {
    parse(payload)
}

/// Parse a bare JSON array of filter clauses.
pub fn parse_filters(payload: &str) -> Result<Vec<FilterClause>, ParseError> {
    parse(payload)
}

/// Parse a bare JSON array of sort clauses.
pub fn parse_sorts(payload: &str) -> Result<Vec<SortClause>, ParseError> {
    parse(payload)
}

fn parse<T: serde::de::DeserializeOwned>(payload: &str) -> Result<T, ParseError> {
    if payload.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(serde_json::from_str(payload)?)
}

impl FromStr for QueryOptions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_options(s)
    }
}
