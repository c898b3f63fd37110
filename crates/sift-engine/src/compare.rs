use std::cmp::Ordering;

use bson::Bson;

/// Order two member values. `None` when the types cannot be compared.
pub(crate) fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Bson::Int32(a), Bson::Int32(b)) => Some(a.cmp(b)),
        (Bson::Int64(a), Bson::Int64(b)) => Some(a.cmp(b)),
        (Bson::Int32(a), Bson::Int64(b)) => Some(i64::from(*a).cmp(b)),
        (Bson::Int64(a), Bson::Int32(b)) => Some(a.cmp(&i64::from(*b))),
        (Bson::Double(a), Bson::Double(b)) => a.partial_cmp(b),
        (Bson::Double(a), Bson::Int64(b)) => a.partial_cmp(&(*b as f64)),
        (Bson::Double(a), Bson::Int32(b)) => a.partial_cmp(&f64::from(*b)),
        (Bson::Int64(a), Bson::Double(b)) => (*a as f64).partial_cmp(b),
        (Bson::Int32(a), Bson::Double(b)) => f64::from(*a).partial_cmp(b),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => {
            Some(a.timestamp_millis().cmp(&b.timestamp_millis()))
        }
        _ => None,
    }
}

pub(crate) fn values_equal(a: &Bson, b: &Bson) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

/// Total order for sorting.
///
/// Absent values sort first and NaN sorts after every other number. Values of
/// different kinds order by kind; values of a kind with no order tie.
pub(crate) fn compare_keys(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b).unwrap_or_else(|| {
            rank(a)
                .cmp(&rank(b))
                .then_with(|| is_nan(a).cmp(&is_nan(b)))
        }),
    }
}

fn rank(value: &Bson) -> u8 {
    match value {
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 0,
        Bson::String(_) => 1,
        Bson::Boolean(_) => 2,
        Bson::DateTime(_) => 3,
        _ => 4,
    }
}

fn is_nan(value: &Bson) -> bool {
    matches!(value, Bson::Double(x) if x.is_nan())
}
