//! Polars `AnyValue` and `Column` helpers for survey response codes.

use polars::prelude::{AnyValue, Column};

/// Converts an `AnyValue` to an integer response code.
///
/// Floats are accepted only when they carry no fractional part; `2.5` is not
/// a response code and yields `None`.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => float_code(f64::from(v)),
        AnyValue::Float64(v) => float_code(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

fn float_code(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

/// Parses a string as an integer code, returning `None` for invalid or empty strings.
///
/// `"3.0"` parses as `3` because exported survey files often write codes that way.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(float_code))
}

/// Extracts every row of a column as an integer code.
///
/// Nulls and values that are not integer codes come back as `None`.
pub fn column_codes(column: &Column) -> Vec<Option<i64>> {
    (0..column.len())
        .map(|idx| column.get(idx).ok().and_then(any_to_i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Null), None);
        assert_eq!(any_to_i64(AnyValue::Int32(42)), Some(42));
        assert_eq!(any_to_i64(AnyValue::Float64(4.0)), Some(4));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
        assert_eq!(any_to_i64(AnyValue::String("98")), Some(98));
        assert_eq!(any_to_i64(AnyValue::String("agree")), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("  "), None);
        assert_eq!(parse_i64(" 7 "), Some(7));
        assert_eq!(parse_i64("2.0"), Some(2));
        assert_eq!(parse_i64("2.5"), None);
    }

    #[test]
    fn test_column_codes() {
        let column = Column::new("q1".into(), [Some(1i64), None, Some(99)]);
        assert_eq!(column_codes(&column), vec![Some(1), None, Some(99)]);

        let text = Column::new("q2".into(), ["3", "", "x"]);
        assert_eq!(column_codes(&text), vec![Some(3), None, None]);
    }
}
