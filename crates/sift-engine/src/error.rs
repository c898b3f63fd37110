use std::fmt;

use sift_query::{FilterValue, Operator};

use crate::schema::FieldType;

/// Which part of the request a clause came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Filter,
    Sort,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::Filter => "filter",
            ClauseKind::Sort => "sort",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An internal path that does not lead to a value on the element type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty property path")]
    Empty,

    #[error("invalid segment `{segment}` in property path `{path}`")]
    InvalidSegment { path: String, segment: String },

    #[error("invalid member expression `{0}`")]
    InvalidExpression(String),

    #[error("`{segment}` is not a member of {owner}")]
    UnknownMember { owner: String, segment: String },

    #[error("`{segment}` is a {ty} member and has no members of its own")]
    NotNested { segment: String, ty: FieldType },

    #[error("`{path}` names a nested object, not a value")]
    NotAValue { path: String },
}

/// A raw value or operator that does not fit the member it targets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("cannot convert {} value `{value}` to {ty}", .value.kind())]
    Incompatible { value: FilterValue, ty: FieldType },

    #[error("operator `{op}` is not applicable to {ty} members")]
    OperatorNotApplicable { op: Operator, ty: FieldType },

    #[error("null can only be compared with eq or neq, not `{0}`")]
    NullComparison(Operator),

    #[error("{0} members cannot be sorted")]
    NotSortable(FieldType),
}

/// Failure to turn a resolved path into a predicate or sort key.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Why one clause was left out of a composed query.
///
/// Clause errors never abort composition; they are logged and collected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClauseError {
    #[error("{clause} field `{field}` could not be mapped to the resource")]
    UnresolvableField { clause: ClauseKind, field: String },

    #[error("{clause} field `{field}` could not be mapped: redirect chain {} does not resolve", .chain.join(" -> "))]
    ResolutionChain {
        clause: ClauseKind,
        field: String,
        chain: Vec<String>,
    },

    #[error("{clause} field `{field}` has an unusable mapping expression: {source}")]
    InvalidMapping {
        clause: ClauseKind,
        field: String,
        source: PathError,
    },

    #[error("filter operator `{operator}` is not supported, filter on `{field}` ignored")]
    UnsupportedOperator { field: String, operator: String },

    #[error("{clause} on `{field}` could not be compiled: {source}")]
    InvalidPath {
        clause: ClauseKind,
        field: String,
        source: PathError,
    },

    #[error("{clause} on `{field}` could not be compiled: {source}")]
    TypeConversion {
        clause: ClauseKind,
        field: String,
        source: ConversionError,
    },
}

impl ClauseError {
    pub(crate) fn compile(clause: ClauseKind, field: &str, err: CompileError) -> Self {
        let field = field.to_string();
        match err {
            CompileError::UnsupportedOperator(operator) => {
                ClauseError::UnsupportedOperator { field, operator }
            }
            CompileError::Path(source) => ClauseError::InvalidPath {
                clause,
                field,
                source,
            },
            CompileError::Conversion(source) => ClauseError::TypeConversion {
                clause,
                field,
                source,
            },
        }
    }

    pub fn clause(&self) -> ClauseKind {
        match self {
            ClauseError::UnresolvableField { clause, .. }
            | ClauseError::ResolutionChain { clause, .. }
            | ClauseError::InvalidMapping { clause, .. }
            | ClauseError::InvalidPath { clause, .. }
            | ClauseError::TypeConversion { clause, .. } => *clause,
            ClauseError::UnsupportedOperator { .. } => ClauseKind::Filter,
        }
    }

    /// External field name the clause was written against.
    pub fn field(&self) -> &str {
        match self {
            ClauseError::UnresolvableField { field, .. }
            | ClauseError::ResolutionChain { field, .. }
            | ClauseError::InvalidMapping { field, .. }
            | ClauseError::UnsupportedOperator { field, .. }
            | ClauseError::InvalidPath { field, .. }
            | ClauseError::TypeConversion { field, .. } => field,
        }
    }

    /// Event kind carried on the log record.
    pub fn event(&self) -> &'static str {
        match self {
            ClauseError::UnresolvableField { .. }
            | ClauseError::ResolutionChain { .. }
            | ClauseError::InvalidMapping { .. } => "unresolvable_field",
            ClauseError::UnsupportedOperator { .. } => "unsupported_operator",
            ClauseError::InvalidPath { .. } | ClauseError::TypeConversion { .. } => {
                "compile_failure"
            }
        }
    }

    pub fn is_unresolvable(&self) -> bool {
        self.event() == "unresolvable_field"
    }
}

/// Caller contract violations. Only these fail a composition outright.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("element type {0} exposes no members")]
    EmptySchema(&'static str),

    #[error("resource type {0} exposes no properties")]
    EmptyResource(&'static str),
}
