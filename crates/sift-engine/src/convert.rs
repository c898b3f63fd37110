use bson::Bson;
use sift_query::FilterValue;

use crate::error::ConversionError;
use crate::schema::FieldType;

/// Checked conversion of a caller-supplied value into a member's type.
///
/// | member | accepts |
/// |--------|---------|
/// | string | string |
/// | int    | int, integral float, numeric string |
/// | float  | int, float, numeric string |
/// | bool   | bool, `"true"` / `"false"` |
/// | date   | RFC 3339 string, int (epoch seconds) |
///
/// `Null` converts to `Bson::Null` for every comparable type; lists accept nothing.
pub(crate) fn convert(value: &FilterValue, ty: &FieldType) -> Result<Bson, ConversionError> {
    let converted = match (ty, value) {
        (FieldType::List(_), _) => None,
        (_, FilterValue::Null) => Some(Bson::Null),

        (FieldType::String, FilterValue::String(s)) => Some(Bson::String(s.clone())),

        (FieldType::Int, FilterValue::Int(i)) => Some(Bson::Int64(*i)),
        (FieldType::Int, FilterValue::Float(x)) => integral(*x).map(Bson::Int64),
        (FieldType::Int, FilterValue::String(s)) => s.trim().parse::<i64>().ok().map(Bson::Int64),

        (FieldType::Float, FilterValue::Int(i)) => Some(Bson::Double(*i as f64)),
        (FieldType::Float, FilterValue::Float(x)) => Some(Bson::Double(*x)),
        (FieldType::Float, FilterValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Bson::Double),

        (FieldType::Bool, FilterValue::Bool(b)) => Some(Bson::Boolean(*b)),
        (FieldType::Bool, FilterValue::String(s)) => match s.as_str() {
            "true" => Some(Bson::Boolean(true)),
            "false" => Some(Bson::Boolean(false)),
            _ => None,
        },

        (FieldType::Date, FilterValue::String(s)) => {
            bson::DateTime::parse_rfc3339_str(s).ok().map(Bson::DateTime)
        }
        (FieldType::Date, FilterValue::Int(secs)) => secs
            .checked_mul(1000)
            .map(|millis| Bson::DateTime(bson::DateTime::from_millis(millis))),

        _ => None,
    };

    converted.ok_or_else(|| ConversionError::Incompatible {
        value: value.clone(),
        ty: ty.clone(),
    })
}

/// Float with no fractional part that fits in an i64.
fn integral(x: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    (x.is_finite() && x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x)).then_some(x as i64)
}
