//! Textual member expressions carried by field mappings.
//!
//! A mapping describes how to reach an external field from the internal model
//! as a projection such as `o => o.customer.address.city` or
//! `|o| o.customer.address.city`. Filtering and sorting only need the member
//! chain, so the lambda parameter is stripped and the rest is parsed as a
//! [`PropertyPath`]. Text without a lambda head is read as a bare path.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PathError;
use crate::path::PropertyPath;

const LAMBDA: &str = r"^\s*(?:\|\s*([A-Za-z_]\w*)\s*\||\(?\s*([A-Za-z_]\w*)\s*\)?\s*=>)\s*(.*?)\s*$";

fn lambda() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LAMBDA).expect("lambda pattern compiles"))
}

/// Extract the member path from a mapping expression.
pub fn member_path(expression: &str) -> Result<PropertyPath, PathError> {
    let invalid = || PathError::InvalidExpression(expression.to_string());

    let Some(caps) = lambda().captures(expression) else {
        return PropertyPath::parse(expression).map_err(|_| invalid());
    };

    let param = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .ok_or_else(invalid)?;
    let body = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    let members = body
        .strip_prefix(param)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(invalid)?;

    PropertyPath::parse(members).map_err(|_| invalid())
}
