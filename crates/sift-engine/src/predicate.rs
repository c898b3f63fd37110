use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use bson::Bson;
use sift_query::{FilterOperator, FilterValue, Operator};

use crate::compare::{compare_values, values_equal};
use crate::convert::convert;
use crate::error::{CompileError, ConversionError};
use crate::path::PropertyPath;
use crate::schema::{Entity, FieldType, Member};

type Test<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A compiled filter over elements of `T`.
pub struct Predicate<T> {
    path: PropertyPath,
    operator: Operator,
    value: Bson,
    test: Test<T>,
}

impl<T> Predicate<T> {
    pub fn matches(&self, item: &T) -> bool {
        (self.test)(item)
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Operand after conversion to the member's type.
    pub fn value(&self) -> &Bson {
        &self.value
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            operator: self.operator,
            value: self.value.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.operator, self.value)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("path", &self.path)
            .field("operator", &self.operator)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Compile `path <operator> value` against `T`'s schema.
///
/// The value is converted to the member's type up front; anything that does
/// not convert, or an operator the member type does not support, is an error
/// rather than a predicate that never matches.
pub fn compile_predicate<T: Entity>(
    path: &PropertyPath,
    operator: &FilterOperator,
    value: &FilterValue,
) -> Result<Predicate<T>, CompileError> {
    let Some(op) = operator.known() else {
        return Err(CompileError::UnsupportedOperator(operator.name().to_string()));
    };
    let member = T::schema().resolve(path)?;

    let (value, test) = if op.is_text() {
        text(member, op, value)?
    } else if op.is_relational() {
        relational(member, op, value)?
    } else {
        equality(member, op, value)?
    };

    Ok(Predicate {
        path: path.clone(),
        operator: op,
        value,
        test,
    })
}

fn equality<T: 'static>(
    member: Member<T>,
    op: Operator,
    value: &FilterValue,
) -> Result<(Bson, Test<T>), ConversionError> {
    let ty = member.ty();
    if !ty.is_comparable() {
        return Err(not_applicable(op, ty));
    }
    let operand = convert(value, ty)?;
    let expected = operand.clone();
    let negate = op == Operator::Neq;

    let test: Test<T> = Arc::new(move |item: &T| {
        let equal = match (member.get(item), &expected) {
            (None, Bson::Null) => true,
            (Some(actual), expected) => values_equal(&actual, expected),
            (None, _) => false,
        };
        equal != negate
    });
    Ok((operand, test))
}

fn relational<T: 'static>(
    member: Member<T>,
    op: Operator,
    value: &FilterValue,
) -> Result<(Bson, Test<T>), ConversionError> {
    let ty = member.ty();
    if !ty.is_ordered() {
        return Err(not_applicable(op, ty));
    }
    if value.is_null() {
        return Err(ConversionError::NullComparison(op));
    }
    let operand = convert(value, ty)?;
    let bound = operand.clone();
    let accept: fn(Ordering) -> bool = match op {
        Operator::Lt => Ordering::is_lt,
        Operator::Lte => Ordering::is_le,
        Operator::Gt => Ordering::is_gt,
        _ => Ordering::is_ge,
    };

    let test: Test<T> = Arc::new(move |item: &T| {
        member
            .get(item)
            .and_then(|actual| compare_values(&actual, &bound))
            .is_some_and(accept)
    });
    Ok((operand, test))
}

fn text<T: 'static>(
    member: Member<T>,
    op: Operator,
    value: &FilterValue,
) -> Result<(Bson, Test<T>), ConversionError> {
    let ty = member.ty();
    if *ty != FieldType::String {
        return Err(not_applicable(op, ty));
    }
    if value.is_null() {
        return Err(ConversionError::NullComparison(op));
    }
    let needle = value.to_string();
    let operand = Bson::String(needle.clone());
    let check: fn(&str, &str) -> bool = match op {
        Operator::Contains => |hay: &str, needle: &str| hay.contains(needle),
        Operator::StartsWith => |hay: &str, needle: &str| hay.starts_with(needle),
        _ => |hay: &str, needle: &str| hay.ends_with(needle),
    };

    let test: Test<T> = Arc::new(move |item: &T| match member.get(item) {
        Some(Bson::String(hay)) => check(&hay, &needle),
        _ => false,
    });
    Ok((operand, test))
}

fn not_applicable(op: Operator, ty: &FieldType) -> ConversionError {
    ConversionError::OperatorNotApplicable { op, ty: ty.clone() }
}
